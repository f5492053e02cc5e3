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

//! API to post a new ride.

use crate::driver::Driver;
use crate::model::{DistanceKm, Location, NewRide, SeatCount, VehicleType};
use crate::rest::{RestError, RideBody, require_user};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use serde::Deserialize;
#[cfg(test)]
use serde::Serialize;
use time::OffsetDateTime;

/// Contents of a ride creation request.  The driver is always the calling
/// user, never a field of the payload.
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct RideCreateRequest {
    /// Where the ride starts.
    pub(crate) from_text: String,

    /// Where the ride ends.
    pub(crate) to_text: String,

    /// Departure time of the ride.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) depart_time: OffsetDateTime,

    /// Number of seats offered, between 1 and 8.
    pub(crate) seats_total: u8,

    /// Kind of vehicle used for the ride; defaults to `car`.
    pub(crate) vehicle_type: Option<String>,

    /// Whether guests may book this ride; defaults to the configured policy.
    pub(crate) allow_guests: Option<bool>,

    /// Trip distance in kilometers.
    pub(crate) distance_km: f64,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Json(request): Json<RideCreateRequest>,
) -> Result<impl IntoResponse, RestError> {
    let user = require_user(&driver, &headers).await?;

    let details = NewRide::new(
        Location::new(request.from_text)?,
        Location::new(request.to_text)?,
        request.depart_time,
        SeatCount::ride_total(request.seats_total)?,
        VehicleType::new(request.vehicle_type.as_deref().unwrap_or("car"))?,
        request.allow_guests,
        DistanceKm::new(request.distance_km)?,
    );

    let ride = driver.create_ride(user.id(), details).await?;
    Ok(Json(RideBody::from(&ride)))
}
