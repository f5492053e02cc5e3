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

//! Extends the driver with the ride operations.

use crate::db::{self, DbError};
use crate::driver::{Driver, DriverError, DriverResult};
use crate::model::{NewRide, Ride, RideId, UserId, UserType};

impl Driver {
    /// Posts a new ride driven by `driver_id`.
    ///
    /// Only verified campus users may post rides.  When the ride does not say
    /// whether guests are welcome, the configured default applies.
    pub(crate) async fn create_ride(
        self,
        driver_id: UserId,
        details: NewRide,
    ) -> DriverResult<Ride> {
        let now = self.clock.now_utc();
        let mut tx = self.db.begin().await?;

        let driver = match db::get_user(tx.ex(), driver_id).await {
            Ok(driver) => driver,
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound("Driver not found".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        if driver.user_type() != UserType::Campus {
            return Err(DriverError::NotPermitted("Only campus users can post rides".to_owned()));
        }
        if !driver.verified() {
            return Err(DriverError::NotPermitted(
                "Driver must be verified before posting rides".to_owned(),
            ));
        }

        let allow_guests =
            (*details.allow_guests()).unwrap_or(self.config.allow_guests_by_default);
        let ride = db::create_ride(tx.ex(), driver_id, &details, allow_guests, now).await?;

        self.notify(
            tx.ex(),
            driver_id,
            "Ride Posted",
            "Your ride is now visible for bookings.",
            now,
        )
        .await?;

        tx.commit().await?;
        Ok(ride)
    }

    /// Finds the rides with seats available whose route matches the `from_q` and `to_q`
    /// case-insensitive substrings, soonest departure first.
    pub(crate) async fn search_rides(self, from_q: &str, to_q: &str) -> DriverResult<Vec<Ride>> {
        let mut ex = self.db.ex().await?;
        Ok(db::search_rides(&mut ex, from_q, to_q).await?)
    }

    /// Gets an existing ride by `id`.
    pub(crate) async fn get_ride(self, id: RideId) -> DriverResult<Ride> {
        let mut ex = self.db.ex().await?;
        match db::get_ride(&mut ex, id).await {
            Ok(ride) => Ok(ride),
            Err(DbError::NotFound) => Err(DriverError::NotFound("Ride not found".to_owned())),
            Err(e) => Err(e.into()),
        }
    }
}
