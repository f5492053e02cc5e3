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

//! The `Ride` data type and its components.

use crate::model::{ModelError, ModelResult, RideId, UserId};
use derive_getters::Getters;
use derive_more::Constructor;
use time::OffsetDateTime;

/// Maximum length of the free-form origin/destination texts.
const MAX_LOCATION_LENGTH: usize = 120;

/// Maximum length of vehicle type names.
const MAX_VEHICLE_TYPE_LENGTH: usize = 20;

/// Largest number of seats a ride can offer.
const MAX_SEATS_PER_RIDE: u8 = 8;

/// Largest number of seats a single booking can take.
const MAX_SEATS_PER_BOOKING: u8 = 4;

/// Shortest bookable trip, in kilometers.
const MIN_DISTANCE_KM: f64 = 0.5;

/// Longest bookable trip, in kilometers.
const MAX_DISTANCE_KM: f64 = 200.0;

/// Free-form text describing where a ride starts or ends.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Location(String);

impl Location {
    /// Creates a new location from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into().trim().to_owned();
        if s.is_empty() {
            return Err(ModelError("Location text cannot be empty".to_owned()));
        }
        if s.len() > MAX_LOCATION_LENGTH {
            return Err(ModelError("Location text is too long".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the location text.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
impl From<&str> for Location {
    fn from(raw: &str) -> Self {
        Self::new(raw).expect("Hardcoded locations for testing must be valid")
    }
}

/// The normalized, lowercase name of a vehicle type, e.g. `car` or `bike`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct VehicleType(String);

impl VehicleType {
    /// Creates a new vehicle type from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into().trim().to_lowercase();
        if s.is_empty() {
            return Err(ModelError("Vehicle type cannot be empty".to_owned()));
        }
        if s.len() > MAX_VEHICLE_TYPE_LENGTH {
            return Err(ModelError("Vehicle type is too long".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the vehicle type.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
impl From<&str> for VehicleType {
    fn from(raw: &str) -> Self {
        Self::new(raw).expect("Hardcoded vehicle types for testing must be valid")
    }
}

/// A validated count of seats.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) struct SeatCount(u8);

impl SeatCount {
    /// Creates the seat capacity of a ride, between 1 and 8.
    pub(crate) fn ride_total(n: u8) -> ModelResult<Self> {
        if n < 1 || n > MAX_SEATS_PER_RIDE {
            return Err(ModelError(format!(
                "seats_total must be between 1 and {}",
                MAX_SEATS_PER_RIDE
            )));
        }
        Ok(Self(n))
    }

    /// Creates the seat count of a booking request, between 1 and 4.
    pub(crate) fn per_booking(n: u8) -> ModelResult<Self> {
        if n < 1 || n > MAX_SEATS_PER_BOOKING {
            return Err(ModelError(format!(
                "seats must be between 1 and {}",
                MAX_SEATS_PER_BOOKING
            )));
        }
        Ok(Self(n))
    }

    /// Recovers a seat count from its database representation with range validation.
    pub(crate) fn from_db(n: i64) -> ModelResult<Self> {
        match u8::try_from(n) {
            Ok(n) if n >= 1 && n <= MAX_SEATS_PER_RIDE => Ok(Self(n)),
            _ => Err(ModelError(format!("Seat count {} out of range", n))),
        }
    }

    /// Returns the count as a `u8`.
    pub(crate) fn as_u8(self) -> u8 {
        self.0
    }

    /// Returns the count as an `i64` for database storage.
    pub(crate) fn as_i64(self) -> i64 {
        i64::from(self.0)
    }
}

/// A trip distance in kilometers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DistanceKm(f64);

impl DistanceKm {
    /// Creates a new distance, making sure it is within the serviced range.
    pub(crate) fn new(km: f64) -> ModelResult<Self> {
        if !km.is_finite() || km < MIN_DISTANCE_KM || km > MAX_DISTANCE_KM {
            return Err(ModelError(format!(
                "distance_km must be between {} and {}",
                MIN_DISTANCE_KM, MAX_DISTANCE_KM
            )));
        }
        Ok(Self(km))
    }

    /// Returns the distance as an `f64`.
    pub(crate) fn as_f64(self) -> f64 {
        self.0
    }
}

/// The validated fields of a ride yet to be posted.
#[derive(Constructor, Debug, Getters)]
#[cfg_attr(test, derive(Clone))]
pub(crate) struct NewRide {
    /// Free-form text describing where the ride starts.
    from_text: Location,

    /// Free-form text describing where the ride ends.
    to_text: Location,

    /// Departure time of the ride.
    depart_time: OffsetDateTime,

    /// Number of seats offered.
    seats_total: SeatCount,

    /// Kind of vehicle used for the ride.
    vehicle_type: VehicleType,

    /// Whether guests may book this ride; `None` defers to the configured default.
    allow_guests: Option<bool>,

    /// Trip distance in kilometers.
    distance_km: DistanceKm,
}

/// Representation of a posted ride.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Ride {
    /// Identifier of the ride.
    id: RideId,

    /// User that posted the ride and drives the vehicle.
    driver_id: UserId,

    /// Free-form text describing where the ride starts.
    from_text: Location,

    /// Free-form text describing where the ride ends.
    to_text: Location,

    /// Departure time of the ride.
    depart_time: OffsetDateTime,

    /// Number of seats the ride was posted with.
    seats_total: SeatCount,

    /// Number of seats still available.  Always between 0 and `seats_total`.
    seats_left: u8,

    /// Kind of vehicle used for the ride.
    vehicle_type: VehicleType,

    /// Whether guests may book this ride.
    allow_guests: bool,

    /// Trip distance in kilometers.
    distance_km: DistanceKm,

    /// Time the ride was posted.
    created_at: OffsetDateTime,
}

impl Ride {
    /// Creates a new ride with the given fields.
    ///
    /// `seats_left` must not exceed `seats_total`; rows that violate this are
    /// rejected when loaded from the database.
    pub(crate) fn new(
        id: RideId,
        driver_id: UserId,
        from_text: Location,
        to_text: Location,
        depart_time: OffsetDateTime,
        seats_total: SeatCount,
        seats_left: u8,
        vehicle_type: VehicleType,
        allow_guests: bool,
        distance_km: DistanceKm,
        created_at: OffsetDateTime,
    ) -> ModelResult<Self> {
        if seats_left > seats_total.as_u8() {
            return Err(ModelError(format!(
                "seats_left {} exceeds seats_total {}",
                seats_left,
                seats_total.as_u8()
            )));
        }
        Ok(Self {
            id,
            driver_id,
            from_text,
            to_text,
            depart_time,
            seats_total,
            seats_left,
            vehicle_type,
            allow_guests,
            distance_km,
            created_at,
        })
    }

    /// Gets the ride's identifier.
    pub(crate) fn id(&self) -> RideId {
        self.id
    }

    /// Gets the user that posted the ride.
    pub(crate) fn driver_id(&self) -> UserId {
        self.driver_id
    }

    /// Gets the text describing where the ride starts.
    pub(crate) fn from_text(&self) -> &Location {
        &self.from_text
    }

    /// Gets the text describing where the ride ends.
    pub(crate) fn to_text(&self) -> &Location {
        &self.to_text
    }

    /// Gets the departure time of the ride.
    pub(crate) fn depart_time(&self) -> OffsetDateTime {
        self.depart_time
    }

    /// Gets the number of seats the ride was posted with.
    pub(crate) fn seats_total(&self) -> SeatCount {
        self.seats_total
    }

    /// Gets the number of seats still available.
    pub(crate) fn seats_left(&self) -> u8 {
        self.seats_left
    }

    /// Gets the kind of vehicle used for the ride.
    pub(crate) fn vehicle_type(&self) -> &VehicleType {
        &self.vehicle_type
    }

    /// Gets whether guests may book this ride.
    pub(crate) fn allow_guests(&self) -> bool {
        self.allow_guests
    }

    /// Gets the trip distance in kilometers.
    pub(crate) fn distance_km(&self) -> DistanceKm {
        self.distance_km
    }

    /// Gets the time the ride was posted.
    pub(crate) fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Computes the number of people in the vehicle given the current seat
    /// occupancy: the driver plus every booked seat.
    pub(crate) fn passengers_total(&self) -> u32 {
        let riders_now = i32::from(self.seats_total.as_u8()) - i32::from(self.seats_left);
        1 + u32::try_from(riders_now.max(0)).expect("Clamped to be non-negative")
    }
}
