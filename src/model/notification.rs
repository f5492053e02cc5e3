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

//! The `Notification` data type.

use crate::model::{NotificationId, UserId};
use derive_getters::Getters;
use derive_more::Constructor;
use time::OffsetDateTime;

/// Representation of an in-app notification.
///
/// Notifications are append-only: once recorded, only the read flag ever
/// changes.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct Notification {
    /// Identifier of the notification.
    id: NotificationId,

    /// User the notification is addressed to.
    user_id: UserId,

    /// Short headline of the notification.
    title: String,

    /// Full text of the notification.
    body: String,

    /// Time the notification was recorded.
    created_at: OffsetDateTime,

    /// Whether the user marked the notification as read.
    is_read: bool,
}
