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

//! High-level data types for the carpooling domain.
//!
//! Validation happens at construction time: once a value of one of these
//! types exists, it is well-formed.  There is no logic in this module beyond
//! that.

use serde::{Deserialize, Serialize};

mod accesstoken;
pub(crate) use accesstoken::AccessToken;
mod booking;
pub(crate) use booking::{Booking, BookingDetails, BookingStatus};
mod contact;
pub(crate) use contact::{Contact, EmailAddress, PhoneNumber};
mod notification;
pub(crate) use notification::Notification;
mod rating;
pub(crate) use rating::{RatingComment, RatingSummary, Stars};
mod ride;
pub(crate) use ride::{DistanceKm, Location, NewRide, Ride, SeatCount, VehicleType};
mod user;
pub(crate) use user::{PersonName, ProfileSummary, User, UserType};

/// Indicates an error in the validation of a model type.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
pub(crate) struct ModelError(pub(crate) String);

/// Result type for this module.
pub(crate) type ModelResult<T> = Result<T, ModelError>;

/// Generates the newtype for a database row identifier.
macro_rules! numeric_id [
    ( $name:ident, $doc:expr ) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
        )]
        #[serde(transparent)]
        pub(crate) struct $name(i64);

        impl $name {
            /// Creates an identifier from its raw database value.
            pub(crate) fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw database value of the identifier.
            pub(crate) fn as_i64(self) -> i64 {
                self.0
            }
        }
    }
];

numeric_id!(UserId, "Identifier of a user.");
numeric_id!(RideId, "Identifier of a posted ride.");
numeric_id!(BookingId, "Identifier of a booking on a ride.");
numeric_id!(NotificationId, "Identifier of an in-app notification.");
