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

//! REST interface for the service.
//!
//! Every API lives in its own `api_<entity>_<method>.rs` file together with
//! its request/response types and its integration tests.  The handlers here
//! are thin: they authenticate the caller where needed, translate the wire
//! types into model types, call one driver operation, and let errors float
//! back up to be mapped onto HTTP status codes.

use crate::driver::{Driver, DriverError};
use crate::model::{
    BookingDetails, BookingId, ModelError, Notification, NotificationId, Ride, RideId, User,
    UserId, UserType,
};
use async_trait::async_trait;
use axum::body::HttpBody;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::{Json, Router};
use log::error;
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

mod api_booking_delete;
mod api_bookings_get;
mod api_bookings_post;
mod api_health_get;
mod api_login_post;
mod api_logout_post;
mod api_notification_read_post;
mod api_notifications_get;
mod api_profile_get;
mod api_ratings_driver_get;
mod api_ratings_post;
mod api_ride_get;
mod api_rides_post;
mod api_rides_search_get;
mod httputils;
#[cfg(test)]
mod testutils;

/// Authentication realm reported on unauthorized responses.
const REALM: &str = "poolride";

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum RestError {
    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,

    /// Indicates an authentication problem.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::Conflict(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::InvalidInput(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::NoCapacity(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::NotFound(_) => RestError::NotFound(e.to_string()),
            DriverError::NotPermitted(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::PolicyViolation(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::Unauthorized(_) => RestError::Unauthorized(e.to_string()),
        }
    }
}

impl From<ModelError> for RestError {
    fn from(e: ModelError) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        let status;
        let mut headers = HeaderMap::new();
        match &self {
            RestError::InternalError(msg) => {
                error!("Internal error in request handling: {}", msg);
                status = http::StatusCode::INTERNAL_SERVER_ERROR;
            }
            RestError::InvalidRequest(_) => {
                status = http::StatusCode::BAD_REQUEST;
            }
            RestError::NotFound(_) => {
                status = http::StatusCode::NOT_FOUND;
            }
            RestError::PayloadNotEmpty => {
                status = http::StatusCode::PAYLOAD_TOO_LARGE;
            }
            RestError::Unauthorized(_) => {
                status = http::StatusCode::UNAUTHORIZED;
                headers.insert(
                    "WWW-Authenticate",
                    HeaderValue::from_str(&format!("Bearer realm=\"{}\"", REALM))
                        .expect("Static realm must be a valid header value"),
                );
            }
        };

        let response = ErrorResponse { message: self.to_string() };

        (status, headers, Json(response)).into_response()
    }
}

/// Result type for this module.
pub(crate) type RestResult<T> = Result<T, RestError>;

/// Representation of the details of an error response.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct ErrorResponse {
    /// Textual representation of the error message.
    pub(crate) message: String,
}

/// Representation of a plain confirmation response.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct MessageResponse {
    /// Human-readable confirmation of what happened.
    pub(crate) message: String,
}

/// Wire representation of a user's public fields.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct UserBody {
    /// Identifier of the user.
    pub(crate) id: UserId,

    /// Display name of the user.
    pub(crate) name: String,

    /// Kind of account the user holds.
    pub(crate) user_type: UserType,

    /// Whether the user passed contact verification.
    pub(crate) is_verified: bool,
}

impl From<&User> for UserBody {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().as_str().to_owned(),
            user_type: user.user_type(),
            is_verified: user.verified(),
        }
    }
}

/// Wire representation of a ride.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct RideBody {
    /// Identifier of the ride.
    pub(crate) id: RideId,

    /// User that posted the ride.
    pub(crate) driver_id: UserId,

    /// Where the ride starts.
    pub(crate) from_text: String,

    /// Where the ride ends.
    pub(crate) to_text: String,

    /// Departure time of the ride.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) depart_time: OffsetDateTime,

    /// Number of seats the ride was posted with.
    pub(crate) seats_total: u8,

    /// Number of seats still available.
    pub(crate) seats_left: u8,

    /// Kind of vehicle used for the ride.
    pub(crate) vehicle_type: String,

    /// Whether guests may book this ride.
    pub(crate) allow_guests: bool,

    /// Trip distance in kilometers.
    pub(crate) distance_km: f64,
}

impl From<&Ride> for RideBody {
    fn from(ride: &Ride) -> Self {
        Self {
            id: ride.id(),
            driver_id: ride.driver_id(),
            from_text: ride.from_text().as_str().to_owned(),
            to_text: ride.to_text().as_str().to_owned(),
            depart_time: ride.depart_time(),
            seats_total: ride.seats_total().as_u8(),
            seats_left: ride.seats_left(),
            vehicle_type: ride.vehicle_type().as_str().to_owned(),
            allow_guests: ride.allow_guests(),
            distance_km: ride.distance_km().as_f64(),
        }
    }
}

/// Wire representation of a booking, annotated with its ride's display
/// fields and the freshly-computed CO2 estimate.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct BookingBody {
    /// Identifier of the booking.
    pub(crate) id: BookingId,

    /// Ride the seats were booked on.
    pub(crate) ride_id: RideId,

    /// User holding the seats.
    pub(crate) rider_id: UserId,

    /// Number of seats held.
    pub(crate) seats: u8,

    /// Lifecycle state of the booking.
    pub(crate) status: String,

    /// Time the booking was created.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,

    /// Estimated CO2 savings for this booking, in kilograms.
    pub(crate) co2_saved_kg_est: f64,

    /// Gate drop-off note for guest riders, if any.
    pub(crate) drop_note: Option<String>,

    /// Driver of the booked ride.
    pub(crate) driver_id: UserId,

    /// Where the booked ride starts.
    pub(crate) from_text: String,

    /// Where the booked ride ends.
    pub(crate) to_text: String,

    /// Departure time of the booked ride.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) depart_time: OffsetDateTime,
}

impl From<&BookingDetails> for BookingBody {
    fn from(details: &BookingDetails) -> Self {
        let booking = details.booking();
        Self {
            id: booking.id(),
            ride_id: booking.ride_id(),
            rider_id: booking.rider_id(),
            seats: booking.seats().as_u8(),
            status: booking.status().as_str().to_owned(),
            created_at: booking.created_at(),
            co2_saved_kg_est: *details.co2_saved_kg_est(),
            drop_note: details.drop_note().clone(),
            driver_id: *details.driver_id(),
            from_text: details.from_text().as_str().to_owned(),
            to_text: details.to_text().as_str().to_owned(),
            depart_time: *details.depart_time(),
        }
    }
}

/// Wire representation of an in-app notification.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct NotificationBody {
    /// Identifier of the notification.
    pub(crate) id: NotificationId,

    /// User the notification is addressed to.
    pub(crate) user_id: UserId,

    /// Short headline of the notification.
    pub(crate) title: String,

    /// Full text of the notification.
    pub(crate) body: String,

    /// Time the notification was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,

    /// Whether the user marked the notification as read.
    pub(crate) is_read: bool,
}

impl From<&Notification> for NotificationBody {
    fn from(notification: &Notification) -> Self {
        Self {
            id: *notification.id(),
            user_id: *notification.user_id(),
            title: notification.title().clone(),
            body: notification.body().clone(),
            created_at: *notification.created_at(),
            is_read: *notification.is_read(),
        }
    }
}

/// A request body extractor that forbids any content.
///
/// Any API that doesn't expect a body should use this to ensure we don't get garbage data
/// that we don't care about.  This future-proofs the service.
pub(crate) struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// Authenticates the request in `headers` and resolves it to the calling user.
pub(crate) async fn require_user(driver: &Driver, headers: &HeaderMap) -> RestResult<User> {
    let token = httputils::get_bearer_auth(headers)?;
    Ok(driver.clone().get_session_user(&token).await?)
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{delete, get, post};

    Router::new()
        .route("/health", get(api_health_get::handler))
        .route("/auth/login", post(api_login_post::handler))
        .route("/auth/logout", post(api_logout_post::handler))
        .route("/rides", post(api_rides_post::handler))
        .route("/rides/search", get(api_rides_search_get::handler))
        .route("/rides/:ride_id", get(api_ride_get::handler))
        .route("/bookings", post(api_bookings_post::handler))
        .route("/bookings/me", get(api_bookings_get::me_handler))
        .route("/bookings/user/:user_id", get(api_bookings_get::user_handler))
        .route("/bookings/:booking_id", delete(api_booking_delete::handler))
        .route("/notifications/me", get(api_notifications_get::me_handler))
        .route("/notifications/user/:user_id", get(api_notifications_get::user_handler))
        .route(
            "/notifications/:notification_id/read",
            post(api_notification_read_post::handler),
        )
        .route("/ratings", post(api_ratings_post::handler))
        .route("/ratings/driver/:driver_id", get(api_ratings_driver_get::handler))
        .route("/profile/me", get(api_profile_get::me_handler))
        .route("/profile/:user_id", get(api_profile_get::user_handler))
        .with_state(driver)
}
