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

//! API to fetch one ride by its identifier.

use crate::driver::Driver;
use crate::model::RideId;
use crate::rest::{RestError, RideBody};
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(ride_id): Path<RideId>,
) -> Result<impl IntoResponse, RestError> {
    let ride = driver.get_ride(ride_id).await?;
    Ok(Json(RideBody::from(&ride)))
}
