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

//! Utilities to help testing the business logic.

use crate::clocks::Clock;
use crate::clocks::testutils::SettableClock;
use crate::config::Config;
use crate::db::{self, Db, Executor};
use crate::driver::Driver;
use crate::model::{
    DistanceKm, EmailAddress, Location, NewRide, Notification, PersonName, PhoneNumber, Ride,
    SeatCount, UserId, UserType, VehicleType,
};
use std::sync::Arc;
use time::macros::datetime;

/// Returns the configuration used by tests that don't tweak any options: the
/// defaults, with `example.edu` recognized as a campus domain.
pub(crate) fn test_config() -> Config {
    Config { allowed_campus_domains: vec!["example.edu".to_owned()], ..Config::default() }
}

/// State of a running test.
pub(crate) struct TestContext {
    /// The database the driver is backed by.
    db: Arc<dyn Db + Send + Sync>,

    /// The settable clock the driver is backed by.
    clock: Arc<SettableClock>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes a driver with the test configuration, an in-memory database and a
    /// settable clock.
    pub(crate) async fn setup() -> Self {
        Self::setup_with(test_config()).await
    }

    /// Initializes a driver with the given `config`, an in-memory database and a settable
    /// clock.
    pub(crate) async fn setup_with(config: Config) -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::from(db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();

        let clock = Arc::from(SettableClock::new(datetime!(2025-03-10 08:00:00 UTC)));
        let driver = Driver::new(db.clone(), clock.clone(), config);

        TestContext { db, clock, driver }
    }

    /// Gets a copy of the driver in this test context.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Gets the clock backing the driver in this test context.
    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Creates a user by directly modifying the backing database.
    pub(crate) async fn insert_user(
        &self,
        name: &str,
        user_type: UserType,
        email: Option<&str>,
        phone: Option<&str>,
        verified: bool,
    ) -> UserId {
        let email = email.map(EmailAddress::from);
        let phone = phone.map(PhoneNumber::from);
        let user = db::create_user(
            &mut self.ex().await,
            &PersonName::from(name),
            user_type,
            email.as_ref(),
            phone.as_ref(),
            verified,
            self.clock.now_utc(),
        )
        .await
        .unwrap();
        user.id()
    }

    /// Creates a verified campus user named `name` with a matching campus email.
    pub(crate) async fn insert_campus_user(&self, name: &str) -> UserId {
        let email = format!("{}@example.edu", name.to_lowercase());
        self.insert_user(name, UserType::Campus, Some(&email), None, true).await
    }

    /// Creates a ride by directly modifying the backing database: a 10 km car
    /// trip with `seats_total` seats.
    pub(crate) async fn insert_ride(
        &self,
        driver_id: UserId,
        seats_total: u8,
        allow_guests: bool,
    ) -> Ride {
        db::create_ride(
            &mut self.ex().await,
            driver_id,
            &NewRide::new(
                Location::from("Hostel H"),
                Location::from("City Center"),
                datetime!(2025-03-12 09:00:00 UTC),
                SeatCount::ride_total(seats_total).unwrap(),
                VehicleType::from("car"),
                None,
                DistanceKm::new(10.0).unwrap(),
            ),
            allow_guests,
            self.clock.now_utc(),
        )
        .await
        .unwrap()
    }

    /// Returns the notifications recorded for `user_id`, newest first.
    pub(crate) async fn notifications_for(&self, user_id: UserId) -> Vec<Notification> {
        db::list_notifications(&mut self.ex().await, user_id).await.unwrap()
    }
}
