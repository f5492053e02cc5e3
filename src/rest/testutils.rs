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

//! Utilities to help testing the REST server.

use crate::config::Config;
use crate::driver::{Driver, testutils as driver_testutils};
use crate::model::{AccessToken, Ride, UserId};
use crate::rest::{ErrorResponse, app};
use axum::Router;
use axum::extract::Request;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use tower::util::ServiceExt;

/// Maximum body size for testing purposes.
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Builder for a single request to the API server.
#[must_use]
pub(crate) struct OneShotBuilder {
    /// The router for the app being tested.
    app: Router,

    /// Builder for the request that will be sent to the app.
    builder: http::request::Builder,
}

impl OneShotBuilder {
    /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
    pub(crate) fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
        let builder = Request::builder().method(method).uri(uri.as_ref());
        Self { app, builder }
    }

    /// Extends the URI in the request with a `query`.
    pub(crate) fn with_query<Q: Serialize>(mut self, query: Q) -> Self {
        let uri = self.builder.uri_ref().unwrap().to_string();
        assert!(!uri.contains('?'), "URI already contains a query: {}", uri);
        self.builder =
            self.builder.uri(format!("{}?{}", uri, serde_urlencoded::to_string(query).unwrap()));
        self
    }

    /// Adds bearer authentication to the request.
    pub(crate) fn with_bearer_auth<T>(mut self, token: T) -> Self
    where
        T: fmt::Display,
    {
        let value = format!("Bearer {}", token);
        self.builder = self.builder.header(http::header::AUTHORIZATION, value);
        self
    }

    /// Finishes building the request and sends it with an empty payload.
    pub(crate) async fn send_empty(self) -> ResponseChecker {
        let request = self.builder.body(axum::body::Body::empty()).unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }

    /// Finishes building the request and sends it with a text payload.
    pub(crate) async fn send_text<T: Into<String>>(self, text: T) -> ResponseChecker {
        let request = self
            .builder
            .header(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref())
            .body(axum::body::Body::from(text.into()))
            .unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }

    /// Finishes building the request and sends it with a JSON payload.
    pub(crate) async fn send_json<T: Serialize>(self, request: T) -> ResponseChecker {
        let request = self
            .builder
            .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(axum::body::Body::from(serde_json::to_vec(&request).unwrap()))
            .unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }
}

/// Type alias for the response type returned by the `oneshot` call.
type HttpResponse = http::Response<axum::body::Body>;

/// Validator for the outcome of a request sent by a `OneShotBuilder`.
#[must_use]
pub(crate) struct ResponseChecker {
    /// Actual response that we received from the app.
    response: HttpResponse,

    /// Expected HTTP status code in the response above.
    exp_status: http::StatusCode,
}

impl From<HttpResponse> for ResponseChecker {
    fn from(response: HttpResponse) -> Self {
        Self { response, exp_status: http::StatusCode::OK }
    }
}

impl ResponseChecker {
    /// Sets the expected exit HTTP status to `status`.
    pub(crate) fn expect_status(mut self, status: http::StatusCode) -> Self {
        self.exp_status = status;
        self
    }

    /// Performs common validation operations on the response.
    fn verify(&self) {
        assert_eq!(self.exp_status, self.response.status());
    }

    /// Finishes checking the response and expects its body to be an `ErrorResponse` whose
    /// message matches `exp_re`.
    pub(crate) async fn expect_error(self, exp_re: &str) {
        self.verify();

        let body = axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
        let response: ErrorResponse = match serde_json::from_slice(&body) {
            Ok(response) => response,
            Err(e) => {
                let body = String::from_utf8(body.to_vec()).unwrap();
                panic!("Invalid error response due to {}; content was {}", e, body);
            }
        };
        let re = regex::Regex::new(exp_re).unwrap();
        assert!(
            re.is_match(&response.message),
            "Response content '{:?}' does not match re '{}'",
            response,
            exp_re
        );
    }

    /// Finishes checking the response and expects it to contain a valid JSON object of
    /// type `T`.
    pub(crate) async fn expect_json<T: DeserializeOwned>(self) -> T {
        self.verify();

        let body = axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
        serde_json::from_slice::<T>(&body).unwrap_or_else(|e| {
            panic!(
                "Invalid JSON response due to {}; content was {}",
                e,
                String::from_utf8_lossy(&body)
            )
        })
    }

    /// Finishes checking the response and returns the response itself for out of band
    /// validation of properties not covered by the checker.
    pub(crate) async fn take_response(self) -> HttpResponse {
        self.verify();

        self.response
    }
}

/// State of a running test.
pub(crate) struct TestContext {
    /// The driver-level context this REST context builds upon.
    inner: driver_testutils::TestContext,

    /// The router under test.
    app: Router,
}

impl TestContext {
    /// Initializes a server with the test configuration, an in-memory database and a
    /// settable clock.
    pub(crate) async fn setup() -> Self {
        Self::setup_with(driver_testutils::test_config()).await
    }

    /// Initializes a server with the given `config`, an in-memory database and a settable
    /// clock.
    pub(crate) async fn setup_with(config: Config) -> Self {
        let inner = driver_testutils::TestContext::setup_with(config).await;
        let app = app(inner.driver());
        TestContext { inner, app }
    }

    /// Gets a copy of the router under test.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Gets a copy of the driver backing the router under test.
    pub(crate) fn driver(&self) -> Driver {
        self.inner.driver()
    }

    /// Creates a verified campus user named `name` with a matching campus email.
    pub(crate) async fn insert_campus_user(&self, name: &str) -> UserId {
        self.inner.insert_campus_user(name).await
    }

    /// Creates a ride by directly modifying the backing database.
    pub(crate) async fn insert_ride(
        &self,
        driver_id: UserId,
        seats_total: u8,
        allow_guests: bool,
    ) -> Ride {
        self.inner.insert_ride(driver_id, seats_total, allow_guests).await
    }

    /// Logs `name` in as a campus user and returns the session token and user id.
    pub(crate) async fn login_campus_user(&self, name: &str) -> (AccessToken, UserId) {
        let contact = format!("{}@example.edu", name.to_lowercase());
        let outcome = self
            .driver()
            .login_or_create(name, &contact, "campus")
            .await
            .unwrap();
        (outcome.token, outcome.user.id())
    }

    /// Logs `name` in as a guest user identified by `phone` and returns the session token
    /// and user id.
    pub(crate) async fn login_guest_user(&self, name: &str, phone: &str) -> (AccessToken, UserId) {
        let outcome = self.driver().login_or_create(name, phone, "guest").await.unwrap();
        (outcome.token, outcome.user.id())
    }
}
