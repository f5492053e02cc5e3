// PoolRide
// Copyright 2025 The PoolRide Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Service configuration.
//!
//! All recognized options are loaded once at process start and injected into
//! the driver.  Business logic never reads ambient state: if an option is
//! needed somewhere, it travels there through this type.

use crate::emissions::{DEFAULT_FACTOR_KG_PER_KM, EmissionFactors};
use crate::env::get_optional_var;
use std::collections::HashMap;

/// Default value for the `APP_NAME` setting when not specified.
const DEFAULT_APP_NAME: &str = "PoolRide";

/// Default value for the `ENVIRONMENT` setting when not specified.
const DEFAULT_ENVIRONMENT: &str = "development";

/// Default value for the `DEFAULT_GATE_NAME` setting when not specified.
const DEFAULT_GATE_NAME: &str = "Main Campus Gate";

/// Default value for the `MAX_BOOKINGS_PER_DAY` setting when not specified.
const DEFAULT_MAX_BOOKINGS_PER_DAY: u32 = 5;

/// Default value for the `MAX_CANCELLATIONS_PER_WEEK` setting when not specified.
const DEFAULT_MAX_CANCELLATIONS_PER_WEEK: u32 = 3;

/// Where guest riders may be dropped off.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GuestDropPolicy {
    /// Guests are dropped at a campus gate and handled by gate security.
    GateOnly,

    /// Guests may be dropped anywhere on campus.
    Anywhere,
}

impl GuestDropPolicy {
    /// Parses a policy from its configuration name.
    fn from_name(name: &str) -> Result<Self, String> {
        match name.trim().to_uppercase().as_str() {
            "GATE_ONLY" => Ok(GuestDropPolicy::GateOnly),
            "ANYWHERE" => Ok(GuestDropPolicy::Anywhere),
            s => Err(format!("Unknown guest drop policy {}", s)),
        }
    }
}

/// Configuration options for the service.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Name the service reports about itself.
    pub app_name: String,

    /// Deployment environment name, for diagnostics only.
    pub environment: String,

    /// Whether campus users' email domains are checked against the allowlist.
    pub enable_campus_verification: bool,

    /// Email domains recognized as campus domains, compared case-insensitively.
    pub allowed_campus_domains: Vec<String>,

    /// Whether rides accept guest riders when the driver does not say.
    pub allow_guests_by_default: bool,

    /// Where guest riders are dropped off.
    pub guest_drop_policy: GuestDropPolicy,

    /// Gate named in guest drop-off notes.
    pub default_gate_name: String,

    /// Emission factor table for the CO2 estimator.
    pub emission_factors: EmissionFactors,

    /// Cap on bookings per rider per day.  Recognized but not enforced yet.
    pub max_bookings_per_day: u32,

    /// Cap on cancellations per rider per week.  Recognized but not enforced yet.
    pub max_cancellations_per_week: u32,

    /// Whether operations record in-app notifications as side effects.
    pub enable_in_app_notifications: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_owned(),
            environment: DEFAULT_ENVIRONMENT.to_owned(),
            enable_campus_verification: true,
            allowed_campus_domains: vec![],
            allow_guests_by_default: false,
            guest_drop_policy: GuestDropPolicy::GateOnly,
            default_gate_name: DEFAULT_GATE_NAME.to_owned(),
            emission_factors: EmissionFactors::default(),
            max_bookings_per_day: DEFAULT_MAX_BOOKINGS_PER_DAY,
            max_cancellations_per_week: DEFAULT_MAX_CANCELLATIONS_PER_WEEK,
            enable_in_app_notifications: true,
        }
    }
}

/// Splits a comma-separated list option into its trimmed, non-empty items.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect()
}

/// Parses a comma-separated `type=factor` list into a per-vehicle factor map.
fn parse_factors(raw: &str) -> Result<HashMap<String, f64>, String> {
    let mut factors = HashMap::default();
    for item in parse_list(raw) {
        let (vehicle_type, factor) = match item.split_once('=') {
            Some((k, v)) => (k.trim().to_lowercase(), v.trim()),
            None => return Err(format!("Invalid vehicle factor entry {}", item)),
        };
        let factor = factor
            .parse::<f64>()
            .map_err(|e| format!("Invalid factor for vehicle type {}: {}", vehicle_type, e))?;
        factors.insert(vehicle_type, factor);
    }
    Ok(factors)
}

impl Config {
    /// Creates a new set of options from environment variables.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let defaults = Config::default();

        let default_factor = get_optional_var::<f64>(prefix, "DEFAULT_EMISSION_FACTOR")?;
        let per_vehicle = match get_optional_var::<String>(prefix, "VEHICLE_TYPE_FACTORS")? {
            Some(raw) => Some(parse_factors(&raw)?),
            None => None,
        };
        let emission_factors = match (default_factor, per_vehicle) {
            (None, None) => defaults.emission_factors,
            (default_factor, per_vehicle) => EmissionFactors::new(
                default_factor.unwrap_or(DEFAULT_FACTOR_KG_PER_KM),
                per_vehicle.unwrap_or_default(),
            ),
        };

        Ok(Self {
            app_name: get_optional_var::<String>(prefix, "APP_NAME")?
                .unwrap_or(defaults.app_name),
            environment: get_optional_var::<String>(prefix, "ENVIRONMENT")?
                .unwrap_or(defaults.environment),
            enable_campus_verification: get_optional_var::<bool>(
                prefix,
                "ENABLE_CAMPUS_VERIFICATION",
            )?
            .unwrap_or(defaults.enable_campus_verification),
            allowed_campus_domains: get_optional_var::<String>(prefix, "ALLOWED_CAMPUS_DOMAINS")?
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.allowed_campus_domains),
            allow_guests_by_default: get_optional_var::<bool>(prefix, "ALLOW_GUESTS_BY_DEFAULT")?
                .unwrap_or(defaults.allow_guests_by_default),
            guest_drop_policy: match get_optional_var::<String>(prefix, "GUEST_DROP_POLICY")? {
                Some(name) => GuestDropPolicy::from_name(&name)?,
                None => defaults.guest_drop_policy,
            },
            default_gate_name: get_optional_var::<String>(prefix, "DEFAULT_GATE_NAME")?
                .unwrap_or(defaults.default_gate_name),
            emission_factors,
            max_bookings_per_day: get_optional_var::<u32>(prefix, "MAX_BOOKINGS_PER_DAY")?
                .unwrap_or(defaults.max_bookings_per_day),
            max_cancellations_per_week: get_optional_var::<u32>(
                prefix,
                "MAX_CANCELLATIONS_PER_WEEK",
            )?
            .unwrap_or(defaults.max_cancellations_per_week),
            enable_in_app_notifications: get_optional_var::<bool>(
                prefix,
                "ENABLE_IN_APP_NOTIFICATIONS",
            )?
            .unwrap_or(defaults.enable_in_app_notifications),
        })
    }

    /// Checks whether `domain` belongs to the campus domain allowlist.
    pub(crate) fn is_campus_domain(&self, domain: &str) -> bool {
        self.allowed_campus_domains.iter().any(|d| d.eq_ignore_ascii_case(domain))
    }
}
