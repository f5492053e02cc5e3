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

//! Extends the driver with the booking operations.

use crate::config::GuestDropPolicy;
use crate::db::{self, DbError};
use crate::driver::{Driver, DriverError, DriverResult};
use crate::emissions::estimate_co2_saved;
use crate::model::{
    Booking, BookingDetails, BookingId, BookingStatus, Ride, RideId, SeatCount, UserId, UserType,
};

impl Driver {
    /// Annotates `booking` with its ride's display fields and a CO2 estimate
    /// derived from the ride's current occupancy.
    fn booking_details(&self, booking: Booking, ride: &Ride, drop_note: Option<String>)
    -> BookingDetails {
        let co2_saved_kg_est = estimate_co2_saved(
            &self.config.emission_factors,
            ride.distance_km().as_f64(),
            ride.vehicle_type().as_str(),
            ride.passengers_total(),
        );
        BookingDetails::new(
            booking,
            ride.driver_id(),
            ride.from_text().clone(),
            ride.to_text().clone(),
            ride.depart_time(),
            co2_saved_kg_est,
            drop_note,
        )
    }

    /// Books `seats` seats on `ride_id` for `rider_id`.
    ///
    /// The capacity check, the seat decrement and the booking insertion all
    /// happen inside one transaction, with the check-and-decrement itself
    /// expressed as a single guarded update, so two racing bookings on the
    /// same ride can never jointly overbook it.
    pub(crate) async fn create_booking(
        self,
        ride_id: RideId,
        rider_id: UserId,
        seats: SeatCount,
    ) -> DriverResult<BookingDetails> {
        let now = self.clock.now_utc();
        let mut tx = self.db.begin().await?;

        let rider = match db::get_user(tx.ex(), rider_id).await {
            Ok(rider) => rider,
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound("User not found".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };
        if !rider.verified() {
            return Err(DriverError::NotPermitted(
                "User must be verified to perform this action".to_owned(),
            ));
        }

        let ride = match db::get_ride(tx.ex(), ride_id).await {
            Ok(ride) => ride,
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound("Ride not found".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        if ride.seats_left() < seats.as_u8() {
            return Err(DriverError::NoCapacity("Not enough seats available".to_owned()));
        }

        let rider_is_guest = rider.user_type() == UserType::Guest;
        if rider_is_guest && !ride.allow_guests() {
            return Err(DriverError::PolicyViolation(
                "This ride does not allow guest bookings".to_owned(),
            ));
        }

        if !db::take_ride_seats(tx.ex(), ride_id, seats).await? {
            // Lost a race against another booking since the read above.
            return Err(DriverError::NoCapacity("Not enough seats available".to_owned()));
        }
        let booking = db::create_booking(tx.ex(), ride_id, rider_id, seats, now).await?;

        // Re-read the ride so the estimate sees the occupancy with this
        // booking included.
        let ride = db::get_ride(tx.ex(), ride_id).await?;

        self.notify(
            tx.ex(),
            ride.driver_id(),
            "New Booking",
            "Someone booked a seat on your ride.",
            now,
        )
        .await?;
        self.notify(tx.ex(), rider_id, "Booking Confirmed", "Your booking is confirmed.", now)
            .await?;

        tx.commit().await?;

        let drop_note = if rider_is_guest
            && self.config.guest_drop_policy == GuestDropPolicy::GateOnly
        {
            Some(format!(
                "Guest drop-off at {}. Entry inside campus is handled by gate security.",
                self.config.default_gate_name
            ))
        } else {
            None
        };

        Ok(self.booking_details(booking, &ride, drop_note))
    }

    /// Cancels the confirmed booking `id`, returning its seats to the ride.
    pub(crate) async fn cancel_booking(self, id: BookingId) -> DriverResult<()> {
        let now = self.clock.now_utc();
        let mut tx = self.db.begin().await?;

        let booking = match db::get_booking(tx.ex(), id).await {
            Ok(booking) => booking,
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound("Booking not found".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        if booking.status() != BookingStatus::Confirmed {
            return Err(DriverError::Conflict("Booking already cancelled".to_owned()));
        }

        db::mark_booking_cancelled(tx.ex(), id, now).await?;
        db::restore_ride_seats(tx.ex(), booking.ride_id(), booking.seats()).await?;

        self.notify(tx.ex(), booking.rider_id(), "Booking Cancelled", "Your booking was cancelled.", now)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Returns all bookings held by `user_id`, newest first, each annotated
    /// with a CO2 estimate freshly derived from its ride's current occupancy.
    pub(crate) async fn get_user_bookings(
        self,
        user_id: UserId,
    ) -> DriverResult<Vec<BookingDetails>> {
        let mut ex = self.db.ex().await?;
        let rows = db::list_bookings_by_rider(&mut ex, user_id).await?;
        Ok(rows
            .into_iter()
            .map(|(booking, ride)| self.booking_details(booking, &ride, None))
            .collect())
    }
}
