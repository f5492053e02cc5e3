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

//! CO2-savings estimator.
//!
//! The estimate is deliberately simple: a solo trip emits
//! `distance * factor` kilograms, sharing the car divides that emission by
//! the number of people on board, and the difference is what each rider
//! "saves".  Factors are configured per vehicle type with a fallback default.

use std::collections::HashMap;

/// Emission factor to use for vehicle types not present in the per-type table.
pub(crate) const DEFAULT_FACTOR_KG_PER_KM: f64 = 0.21;

/// Per-vehicle-type emission factors, in kilograms of CO2 per kilometer.
#[derive(Clone, Debug, PartialEq)]
pub struct EmissionFactors {
    /// Factor for vehicle types without an explicit entry.
    default_kg_per_km: f64,

    /// Explicit factors keyed by lowercase vehicle type.
    per_vehicle: HashMap<String, f64>,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self { default_kg_per_km: DEFAULT_FACTOR_KG_PER_KM, per_vehicle: HashMap::default() }
    }
}

impl EmissionFactors {
    /// Creates a factor table with the given fallback and per-type entries.
    pub fn new(default_kg_per_km: f64, per_vehicle: HashMap<String, f64>) -> Self {
        Self { default_kg_per_km, per_vehicle }
    }

    /// Returns the factor to use for `vehicle_type`.
    pub(crate) fn factor_for(&self, vehicle_type: &str) -> f64 {
        let key = vehicle_type.trim().to_lowercase();
        match self.per_vehicle.get(&key) {
            Some(factor) => *factor,
            None => self.default_kg_per_km,
        }
    }
}

/// Rounds `value` to three decimal places, the resolution we report
/// kilograms of CO2 with.
pub(crate) fn round_kg(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Estimates the CO2 saved by one rider on a shared trip, in kilograms.
///
/// `passengers_total` counts everybody in the vehicle, driver included.  With
/// a single person on board there is no sharing and thus nothing saved.
pub(crate) fn estimate_co2_saved(
    factors: &EmissionFactors,
    distance_km: f64,
    vehicle_type: &str,
    passengers_total: u32,
) -> f64 {
    let factor = factors.factor_for(vehicle_type);
    let solo = distance_km * factor;
    let shared_per_person = solo / f64::from(passengers_total.max(1));
    let saved = (solo - shared_per_person).max(0.0);
    round_kg(saved)
}
