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

//! The `User` data type and its components.

use crate::model::{EmailAddress, ModelError, ModelResult, PhoneNumber, UserId};
use derive_getters::Getters;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Maximum length of user names per the schema.
const MAX_NAME_LENGTH: usize = 80;

/// The kind of account a user holds.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum UserType {
    /// A member of the campus community, identified by a campus email address.
    Campus,

    /// An off-campus rider, identified by any email address or a phone number.
    Guest,
}

impl UserType {
    /// Parses a user type from its wire form.
    pub(crate) fn parse(raw: &str) -> ModelResult<Self> {
        let raw = raw.trim().to_lowercase();
        match raw.as_str() {
            "" => Err(ModelError("user_type is required".to_owned())),
            "campus" => Ok(UserType::Campus),
            "guest" => Ok(UserType::Guest),
            _ => Err(ModelError("user_type must be 'campus' or 'guest'".to_owned())),
        }
    }

    /// Returns the wire form of the user type.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            UserType::Campus => "campus",
            UserType::Guest => "guest",
        }
    }
}

/// Represents a user's display name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PersonName(String);

impl PersonName {
    /// Creates a new name from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into().trim().to_owned();
        if s.is_empty() {
            return Err(ModelError("name is required".to_owned()));
        }
        if s.len() > MAX_NAME_LENGTH {
            return Err(ModelError("Name is too long".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the name.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
impl From<&str> for PersonName {
    fn from(raw_name: &str) -> Self {
        Self::new(raw_name).expect("Hardcoded names for testing must be valid")
    }
}

/// Representation of a user's information.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct User {
    /// Identifier of the user.
    id: UserId,

    /// Display name of the user.
    name: PersonName,

    /// Kind of account the user holds.
    user_type: UserType,

    /// Email the user logs in with, if any.
    email: Option<EmailAddress>,

    /// Phone number the user logs in with, if any.
    phone: Option<PhoneNumber>,

    /// Whether the user passed contact verification.
    verified: bool,

    /// Time the user first logged in.
    created_at: OffsetDateTime,
}

impl User {
    /// Creates a new user with the given fields.
    pub(crate) fn new(
        id: UserId,
        name: PersonName,
        user_type: UserType,
        email: Option<EmailAddress>,
        phone: Option<PhoneNumber>,
        verified: bool,
        created_at: OffsetDateTime,
    ) -> Self {
        Self { id, name, user_type, email, phone, verified, created_at }
    }

    /// Gets the user's identifier.
    pub(crate) fn id(&self) -> UserId {
        self.id
    }

    /// Gets the user's display name.
    pub(crate) fn name(&self) -> &PersonName {
        &self.name
    }

    /// Gets the kind of account the user holds.
    pub(crate) fn user_type(&self) -> UserType {
        self.user_type
    }

    /// Gets the user's email address, if they log in with one.
    pub(crate) fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Gets the user's phone number, if they log in with one.
    pub(crate) fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    /// Gets whether the user passed contact verification.
    pub(crate) fn verified(&self) -> bool {
        self.verified
    }

    /// Gets the time the user first logged in.
    pub(crate) fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

/// A user's activity summary as shown on their profile.
#[derive(Constructor, Debug, Getters, PartialEq)]
pub(crate) struct ProfileSummary {
    /// The user the profile belongs to.
    user: User,

    /// Number of rides the user posted as a driver.
    rides_posted: i64,

    /// Number of confirmed bookings the user holds as a rider.
    rides_taken: i64,

    /// Total CO2 savings across the user's confirmed bookings, in kilograms,
    /// recomputed from the current occupancy of each booked ride.
    total_co2_saved_kg: f64,
}
