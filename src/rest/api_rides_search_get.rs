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

//! API to search for rides with seats available.

use crate::driver::Driver;
use crate::rest::{RestError, RideBody};
use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde::Serialize;

/// Query parameters accepted by the search.
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct SearchQuery {
    /// Substring to look for in the rides' origin text.
    pub(crate) from_q: String,

    /// Substring to look for in the rides' destination text.
    pub(crate) to_q: String,
}

/// Message returned by the server with the rides that matched a search.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct RideListResponse {
    /// The matching rides, soonest departure first.
    pub(crate) rides: Vec<RideBody>,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, RestError> {
    if query.from_q.trim().is_empty() || query.to_q.trim().is_empty() {
        return Err(RestError::InvalidRequest(
            "from_q and to_q must not be empty".to_owned(),
        ));
    }

    let rides = driver.search_rides(&query.from_q, &query.to_q).await?;
    let response = RideListResponse { rides: rides.iter().map(RideBody::from).collect() };
    Ok(Json(response))
}
