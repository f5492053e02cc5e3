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

//! API to book seats on a ride.

use crate::driver::Driver;
use crate::model::{RideId, SeatCount};
use crate::rest::{BookingBody, RestError, require_user};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use serde::Deserialize;
#[cfg(test)]
use serde::Serialize;

/// Contents of a booking creation request.  The rider is always the calling
/// user, never a field of the payload.
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct BookingCreateRequest {
    /// Ride to book seats on.
    pub(crate) ride_id: RideId,

    /// Number of seats to book, between 1 and 4; defaults to one.
    pub(crate) seats: Option<u8>,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Json(request): Json<BookingCreateRequest>,
) -> Result<impl IntoResponse, RestError> {
    let rider = require_user(&driver, &headers).await?;
    let seats = SeatCount::per_booking(request.seats.unwrap_or(1))?;

    let details = driver.create_booking(request.ride_id, rider.id(), seats).await?;
    Ok(Json(BookingBody::from(&details)))
}
