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

//! API to end the session identified by the caller's bearer token.

use crate::driver::Driver;
use crate::rest::httputils::get_bearer_auth;
use crate::rest::{EmptyBody, MessageResponse, RestError};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;

/// POST handler for this API.
///
/// The token is deleted without checking that it names a live session, so
/// logging out twice is fine; a malformed header is still an error.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let token = get_bearer_auth(&headers)?;
    driver.logout(&token).await?;

    Ok(Json(MessageResponse { message: "Logged out".to_owned() }))
}
