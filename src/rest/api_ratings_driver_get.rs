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

//! API to fetch the rating summary of a driver.

use crate::driver::Driver;
use crate::model::UserId;
use crate::rest::RestError;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Serialize;
#[cfg(test)]
use serde::Deserialize;

/// Message returned by the server with a driver's rating summary.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct RatingSummaryResponse {
    /// Driver the summary is about.
    pub(crate) driver_id: UserId,

    /// Average of all stars, rounded to two decimals; zero without ratings.
    pub(crate) average_stars: f64,

    /// Number of ratings the driver received.
    pub(crate) total_ratings: i64,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(driver_id): Path<UserId>,
) -> Result<impl IntoResponse, RestError> {
    let summary = driver.get_driver_rating_summary(driver_id).await?;
    let response = RatingSummaryResponse {
        driver_id: *summary.driver_id(),
        average_stars: *summary.average_stars(),
        total_ratings: *summary.total_ratings(),
    };
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SeatCount, Stars};
    use crate::rest::testutils::*;

    /// Builds the route for fetching the summary of `driver_id`.
    fn route(driver_id: i64) -> (http::Method, String) {
        (http::Method::GET, format!("/ratings/driver/{}", driver_id))
    }

    #[tokio::test]
    async fn test_summary_empty() {
        let context = TestContext::setup().await;
        let driver_id = context.insert_campus_user("dana").await;

        let response = OneShotBuilder::new(context.app(), route(driver_id.as_i64()))
            .send_empty()
            .await
            .expect_json::<RatingSummaryResponse>()
            .await;
        assert_eq!(driver_id, response.driver_id);
        assert_eq!(0.0, response.average_stars);
        assert_eq!(0, response.total_ratings);
    }

    #[tokio::test]
    async fn test_summary_rounds_average() {
        let context = TestContext::setup().await;
        let driver_id = context.insert_campus_user("dana").await;
        let (_token, rider_id) = context.login_campus_user("Evan").await;
        let ride = context.insert_ride(driver_id, 4, false).await;
        context
            .driver()
            .create_booking(ride.id(), rider_id, SeatCount::per_booking(1).unwrap())
            .await
            .unwrap();

        for stars in [5, 4, 4] {
            context
                .driver()
                .submit_rating(ride.id(), rider_id, Stars::new(stars).unwrap(), None)
                .await
                .unwrap();
        }

        let response = OneShotBuilder::new(context.app(), route(driver_id.as_i64()))
            .send_empty()
            .await
            .expect_json::<RatingSummaryResponse>()
            .await;
        assert_eq!(4.33, response.average_stars);
        assert_eq!(3, response.total_ratings);
    }
}
