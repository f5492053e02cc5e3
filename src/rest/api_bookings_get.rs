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

//! APIs to list a user's bookings.

use crate::driver::Driver;
use crate::model::UserId;
use crate::rest::{BookingBody, RestError, require_user};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use serde::Serialize;
#[cfg(test)]
use serde::Deserialize;

/// Message returned by the server with a user's bookings.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct BookingListResponse {
    /// The user's bookings, newest first.
    pub(crate) bookings: Vec<BookingBody>,
}

/// Fetches the bookings of `user_id` and builds the response.
async fn list_for(driver: Driver, user_id: UserId) -> Result<Json<BookingListResponse>, RestError> {
    let bookings = driver.get_user_bookings(user_id).await?;
    let response =
        BookingListResponse { bookings: bookings.iter().map(BookingBody::from).collect() };
    Ok(Json(response))
}

/// GET handler for the calling user's own bookings.
pub(crate) async fn me_handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, RestError> {
    let user = require_user(&driver, &headers).await?;
    list_for(driver, user.id()).await
}

/// GET handler for an arbitrary user's bookings.
pub(crate) async fn user_handler(
    State(driver): State<Driver>,
    Path(user_id): Path<UserId>,
) -> Result<impl IntoResponse, RestError> {
    list_for(driver, user_id).await
}
