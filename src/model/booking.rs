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

//! The `Booking` data type and its components.

use crate::model::{BookingId, Location, ModelError, ModelResult, RideId, SeatCount, UserId};
use derive_getters::Getters;
use derive_more::Constructor;
use time::OffsetDateTime;

/// The lifecycle state of a booking.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BookingStatus {
    /// The booking holds its seats.
    Confirmed,

    /// The booking was cancelled and its seats were returned to the ride.
    Cancelled,
}

impl BookingStatus {
    /// Parses a status from its database representation.
    pub(crate) fn parse(raw: &str) -> ModelResult<Self> {
        match raw {
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            _ => Err(ModelError(format!("Unknown booking status {}", raw))),
        }
    }

    /// Returns the database and wire representation of the status.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Representation of a booking of seats on a ride.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Booking {
    /// Identifier of the booking.
    id: BookingId,

    /// Ride the seats were booked on.
    ride_id: RideId,

    /// User holding the seats.
    rider_id: UserId,

    /// Number of seats held.
    seats: SeatCount,

    /// Lifecycle state of the booking.
    status: BookingStatus,

    /// Time the booking was created.
    created_at: OffsetDateTime,

    /// Time the booking was cancelled, if it was.
    cancelled_at: Option<OffsetDateTime>,
}

impl Booking {
    /// Creates a new booking with the given fields.
    pub(crate) fn new(
        id: BookingId,
        ride_id: RideId,
        rider_id: UserId,
        seats: SeatCount,
        status: BookingStatus,
        created_at: OffsetDateTime,
        cancelled_at: Option<OffsetDateTime>,
    ) -> Self {
        Self { id, ride_id, rider_id, seats, status, created_at, cancelled_at }
    }

    /// Gets the booking's identifier.
    pub(crate) fn id(&self) -> BookingId {
        self.id
    }

    /// Gets the ride the seats were booked on.
    pub(crate) fn ride_id(&self) -> RideId {
        self.ride_id
    }

    /// Gets the user holding the seats.
    pub(crate) fn rider_id(&self) -> UserId {
        self.rider_id
    }

    /// Gets the number of seats held.
    pub(crate) fn seats(&self) -> SeatCount {
        self.seats
    }

    /// Gets the lifecycle state of the booking.
    pub(crate) fn status(&self) -> BookingStatus {
        self.status
    }

    /// Gets the time the booking was created.
    pub(crate) fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Gets the time the booking was cancelled, if it was.
    pub(crate) fn cancelled_at(&self) -> Option<OffsetDateTime> {
        self.cancelled_at
    }
}

/// A booking annotated with its ride's display fields and a freshly-computed
/// CO2 estimate, as returned to riders.
#[derive(Constructor, Debug, Getters)]
#[cfg_attr(test, derive(PartialEq))]
pub(crate) struct BookingDetails {
    /// The booking itself.
    booking: Booking,

    /// Driver of the booked ride.
    driver_id: UserId,

    /// Where the booked ride starts.
    from_text: Location,

    /// Where the booked ride ends.
    to_text: Location,

    /// Departure time of the booked ride.
    depart_time: OffsetDateTime,

    /// Estimated CO2 savings for this booking, in kilograms, derived from the
    /// ride's current occupancy.
    co2_saved_kg_est: f64,

    /// Gate drop-off note for guest riders, when the drop policy requires one.
    drop_note: Option<String>,
}
