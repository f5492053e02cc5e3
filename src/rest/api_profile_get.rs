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

//! APIs to fetch a user's activity profile.

use crate::driver::Driver;
use crate::model::UserId;
use crate::rest::{RestError, UserBody, require_user};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use serde::Serialize;
#[cfg(test)]
use serde::Deserialize;

/// Message returned by the server with a user's activity profile.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct ProfileResponse {
    /// The user the profile belongs to.
    pub(crate) user: UserBody,

    /// Number of rides the user posted as a driver.
    pub(crate) rides_posted: i64,

    /// Number of confirmed bookings the user holds as a rider.
    pub(crate) rides_taken: i64,

    /// Total CO2 savings across the user's confirmed bookings, in kilograms.
    pub(crate) total_co2_saved_kg: f64,
}

/// Fetches the profile of `user_id` and builds the response.
async fn profile_for(driver: Driver, user_id: UserId) -> Result<Json<ProfileResponse>, RestError> {
    let profile = driver.get_profile(user_id).await?;
    let response = ProfileResponse {
        user: UserBody::from(profile.user()),
        rides_posted: *profile.rides_posted(),
        rides_taken: *profile.rides_taken(),
        total_co2_saved_kg: *profile.total_co2_saved_kg(),
    };
    Ok(Json(response))
}

/// GET handler for the calling user's own profile.
pub(crate) async fn me_handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, RestError> {
    let user = require_user(&driver, &headers).await?;
    profile_for(driver, user.id()).await
}

/// GET handler for an arbitrary user's profile.
pub(crate) async fn user_handler(
    State(driver): State<Driver>,
    Path(user_id): Path<UserId>,
) -> Result<impl IntoResponse, RestError> {
    profile_for(driver, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SeatCount;
    use crate::rest::testutils::*;
    use http::StatusCode;

    #[tokio::test]
    async fn test_my_profile() {
        let context = TestContext::setup().await;
        let driver_id = context.insert_campus_user("dana").await;
        let (token, rider_id) = context.login_campus_user("Evan").await;
        let ride = context.insert_ride(driver_id, 4, false).await;
        context
            .driver()
            .create_booking(ride.id(), rider_id, SeatCount::per_booking(1).unwrap())
            .await
            .unwrap();

        let response = OneShotBuilder::new(context.app(), (http::Method::GET, "/profile/me"))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<ProfileResponse>()
            .await;

        assert_eq!(rider_id, response.user.id);
        assert_eq!("Evan", response.user.name);
        assert_eq!(0, response.rides_posted);
        assert_eq!(1, response.rides_taken);
        assert_eq!(1.05, response.total_co2_saved_kg);
    }

    #[tokio::test]
    async fn test_my_profile_requires_authentication() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), (http::Method::GET, "/profile/me"))
            .send_empty()
            .await
            .expect_status(StatusCode::UNAUTHORIZED)
            .expect_error("Missing Authorization")
            .await;
    }

    #[tokio::test]
    async fn test_user_profile_is_public() {
        let context = TestContext::setup().await;
        let driver_id = context.insert_campus_user("dana").await;
        context.insert_ride(driver_id, 4, false).await;

        let response = OneShotBuilder::new(
            context.app(),
            (http::Method::GET, format!("/profile/{}", driver_id.as_i64())),
        )
        .send_empty()
        .await
        .expect_json::<ProfileResponse>()
        .await;
        assert_eq!(1, response.rides_posted);
        assert_eq!(0, response.rides_taken);
    }

    #[tokio::test]
    async fn test_user_profile_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), (http::Method::GET, "/profile/123"))
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .expect_error("User not found")
            .await;
    }
}
