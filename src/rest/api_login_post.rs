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

//! API to log a user in by their contact, creating the account on first login.

use crate::driver::Driver;
use crate::model::AccessToken;
use crate::rest::{RestError, UserBody};
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

/// Contents of a login request.
#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct LoginRequest {
    /// Display name of the user.
    pub(crate) name: String,

    /// Email address or phone number the user logs in with.
    pub(crate) contact: String,

    /// Kind of account: `campus` or `guest`.
    pub(crate) user_type: String,
}

/// Message returned by the server after a successful login attempt.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct LoginResponse {
    /// Access token for the newly-created session.
    pub(crate) token: AccessToken,

    /// The user that logged in.
    pub(crate) user: UserBody,

    /// Human-readable confirmation message.
    pub(crate) message: String,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, RestError> {
    let outcome = driver
        .login_or_create(&request.name, &request.contact, &request.user_type)
        .await?;

    let response = LoginResponse {
        token: outcome.token,
        user: UserBody::from(&outcome.user),
        message: outcome.message.to_owned(),
    };
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserType;
    use crate::rest::testutils::*;
    use http::StatusCode;

    fn route() -> (http::Method, &'static str) {
        (http::Method::POST, "/auth/login")
    }

    /// Builds a campus login request for `name`.
    fn campus_request(name: &str, contact: &str) -> LoginRequest {
        LoginRequest {
            name: name.to_owned(),
            contact: contact.to_owned(),
            user_type: "campus".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_first_login_creates_user() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(campus_request("Dana", "dana@example.edu"))
            .await
            .expect_json::<LoginResponse>()
            .await;

        assert_eq!("Login successful", response.message);
        assert_eq!("Dana", response.user.name);
        assert_eq!(UserType::Campus, response.user.user_type);
        assert!(response.user.is_verified);

        // The returned token must identify a live session.
        let user =
            context.driver().get_session_user(&response.token).await.unwrap();
        assert_eq!(response.user.id, user.id());
    }

    #[tokio::test]
    async fn test_repeat_login_stacks_sessions() {
        let context = TestContext::setup().await;

        let first = OneShotBuilder::new(context.app(), route())
            .send_json(campus_request("Dana", "dana@example.edu"))
            .await
            .expect_json::<LoginResponse>()
            .await;
        let second = OneShotBuilder::new(context.app(), route())
            .send_json(campus_request("Dana", "dana@example.edu"))
            .await
            .expect_json::<LoginResponse>()
            .await;

        assert_eq!(first.user.id, second.user.id);
        assert_ne!(first.token, second.token);
        context.driver().get_session_user(&first.token).await.unwrap();
        context.driver().get_session_user(&second.token).await.unwrap();
    }

    #[tokio::test]
    async fn test_guest_login_by_phone() {
        let context = TestContext::setup().await;

        let request = LoginRequest {
            name: "Guest".to_owned(),
            contact: "+91 12345 67890".to_owned(),
            user_type: "guest".to_owned(),
        };
        let response = OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_json::<LoginResponse>()
            .await;
        assert_eq!(UserType::Guest, response.user.user_type);
    }

    #[tokio::test]
    async fn test_bad_user_type() {
        let context = TestContext::setup().await;

        let request = LoginRequest {
            name: "Dana".to_owned(),
            contact: "dana@example.edu".to_owned(),
            user_type: "admin".to_owned(),
        };
        OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("user_type must be")
            .await;
    }

    #[tokio::test]
    async fn test_campus_domain_rejected() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(campus_request("Dana", "dana@elsewhere.com"))
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("domain not allowed")
            .await;
    }

    #[tokio::test]
    async fn test_bad_contact() {
        let context = TestContext::setup().await;

        let request = LoginRequest {
            name: "Guest".to_owned(),
            contact: "not a contact".to_owned(),
            user_type: "guest".to_owned(),
        };
        OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("Invalid phone number")
            .await;
    }
}
