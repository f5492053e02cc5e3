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

//! Extends the driver with the profile operation.

use crate::db::{self, DbError};
use crate::driver::{Driver, DriverError, DriverResult};
use crate::emissions::{estimate_co2_saved, round_kg};
use crate::model::{ProfileSummary, UserId};

impl Driver {
    /// Builds the activity summary for `user_id`.
    ///
    /// The CO2 total is derived from the *current* occupancy of every ride
    /// the user holds a confirmed booking on, so it changes retroactively as
    /// other riders join or leave those rides.
    pub(crate) async fn get_profile(self, user_id: UserId) -> DriverResult<ProfileSummary> {
        let mut ex = self.db.ex().await?;

        let user = match db::get_user(&mut ex, user_id).await {
            Ok(user) => user,
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound("User not found".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        let rides_posted = db::count_rides_by_driver(&mut ex, user_id).await?;
        let rides_taken = db::count_confirmed_bookings_by_rider(&mut ex, user_id).await?;

        let mut total_co2_saved_kg = 0.0;
        for (_booking, ride) in db::list_confirmed_bookings_by_rider(&mut ex, user_id).await? {
            total_co2_saved_kg += estimate_co2_saved(
                &self.config.emission_factors,
                ride.distance_km().as_f64(),
                ride.vehicle_type().as_str(),
                ride.passengers_total(),
            );
        }

        Ok(ProfileSummary::new(user, rides_posted, rides_taken, round_kg(total_co2_saved_kg)))
    }
}
