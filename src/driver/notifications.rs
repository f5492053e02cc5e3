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

//! Extends the driver with the notification operations.

use crate::db::{self, DbError, Executor};
use crate::driver::{Driver, DriverError, DriverResult};
use crate::model::{Notification, NotificationId, UserId};
use time::OffsetDateTime;

impl Driver {
    /// Records an in-app notification for `user_id`, unless notifications are
    /// disabled by configuration, in which case this silently does nothing.
    pub(super) async fn notify(
        &self,
        ex: &mut Executor,
        user_id: UserId,
        title: &str,
        body: &str,
        now: OffsetDateTime,
    ) -> DriverResult<()> {
        if !self.config.enable_in_app_notifications {
            return Ok(());
        }
        db::create_notification(ex, user_id, title, body, now).await?;
        Ok(())
    }

    /// Returns the notifications addressed to `user_id`, newest first.
    pub(crate) async fn get_user_notifications(
        self,
        user_id: UserId,
    ) -> DriverResult<Vec<Notification>> {
        let mut ex = self.db.ex().await?;
        Ok(db::list_notifications(&mut ex, user_id).await?)
    }

    /// Marks the notification `id` as read.
    pub(crate) async fn mark_notification_read(self, id: NotificationId) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        match db::mark_notification_read(&mut ex, id).await {
            Ok(()) => Ok(()),
            Err(DbError::NotFound) => {
                Err(DriverError::NotFound("Notification not found".to_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
