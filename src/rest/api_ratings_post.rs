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

//! API to rate the driver of a booked ride.

use crate::driver::Driver;
use crate::model::{RatingComment, RideId, Stars};
use crate::rest::{MessageResponse, RestError, require_user};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use serde::Deserialize;
#[cfg(test)]
use serde::Serialize;

/// Contents of a rating submission.  The rater is the calling user and the
/// rated driver is resolved from the ride, so neither is part of the payload.
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct RatingCreateRequest {
    /// Ride the rating refers to.
    pub(crate) ride_id: RideId,

    /// Stars given to the driver, between 1 and 5.
    pub(crate) stars: u8,

    /// Optional free-form comment.
    pub(crate) comment: Option<String>,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Json(request): Json<RatingCreateRequest>,
) -> Result<impl IntoResponse, RestError> {
    let rater = require_user(&driver, &headers).await?;

    let stars = Stars::new(request.stars)?;
    let comment = match request.comment {
        Some(comment) => Some(RatingComment::new(comment)?),
        None => None,
    };

    driver.submit_rating(request.ride_id, rater.id(), stars, comment).await?;
    Ok(Json(MessageResponse { message: "Rating submitted successfully".to_owned() }))
}
