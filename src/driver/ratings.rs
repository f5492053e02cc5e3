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

//! Extends the driver with the rating operations.

use crate::db::{self, DbError};
use crate::driver::{Driver, DriverError, DriverResult};
use crate::model::{RatingComment, RatingSummary, RideId, Stars, UserId};

impl Driver {
    /// Submits a rating of `stars` for the driver of `ride_id`, given by `rater_id`.
    ///
    /// The rated driver is resolved from the ride itself so callers cannot
    /// rate an unrelated user.  The rater must hold a confirmed booking on
    /// the ride; repeat ratings are accepted and all count.
    pub(crate) async fn submit_rating(
        self,
        ride_id: RideId,
        rater_id: UserId,
        stars: Stars,
        comment: Option<RatingComment>,
    ) -> DriverResult<()> {
        let now = self.clock.now_utc();
        let mut tx = self.db.begin().await?;

        let ride = match db::get_ride(tx.ex(), ride_id).await {
            Ok(ride) => ride,
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound("Ride not found".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        if !db::has_confirmed_booking(tx.ex(), ride_id, rater_id).await? {
            return Err(DriverError::PolicyViolation(
                "You can only rate after you have booked this ride".to_owned(),
            ));
        }

        db::create_rating(
            tx.ex(),
            ride_id,
            rater_id,
            ride.driver_id(),
            stars,
            comment.as_ref(),
            now,
        )
        .await?;

        self.notify(tx.ex(), ride.driver_id(), "New Rating", "You received a new rating.", now)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Summarizes the ratings received by `driver_id`.
    pub(crate) async fn get_driver_rating_summary(
        self,
        driver_id: UserId,
    ) -> DriverResult<RatingSummary> {
        let mut ex = self.db.ex().await?;
        let (average_stars, total_ratings) = db::rating_summary(&mut ex, driver_id).await?;
        Ok(RatingSummary::new(
            driver_id,
            (average_stars * 100.0).round() / 100.0,
            total_ratings,
        ))
    }
}
