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

//! API to mark a notification as read.

use crate::driver::Driver;
use crate::model::NotificationId;
use crate::rest::{EmptyBody, MessageResponse, RestError, require_user};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(notification_id): Path<NotificationId>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let _user = require_user(&driver, &headers).await?;

    driver.mark_notification_read(notification_id).await?;
    Ok(Json(MessageResponse { message: "Notification marked as read".to_owned() }))
}
