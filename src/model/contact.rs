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

//! Contact data types: email addresses and phone numbers.

use crate::model::{ModelError, ModelResult, UserType};

/// Maximum length of email addresses per the schema.
const MAX_EMAIL_LENGTH: usize = 64;

/// Represents a correctly-formatted, normalized email address.
///
/// Addresses are lowercased on construction.  The domain part of an email
/// address is case insensitive per the standard, and the original service
/// treated the whole address as case insensitive when matching users, so we
/// normalize both halves to keep lookups consistent.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct EmailAddress(String);

impl EmailAddress {
    /// Creates a new email address from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into().trim().to_lowercase();

        if s.is_empty() {
            return Err(ModelError("Email address cannot be empty".to_owned()));
        }
        if s.len() > MAX_EMAIL_LENGTH {
            return Err(ModelError("Email address is too long".to_owned()));
        }

        // Deep validation of email addresses is futile; we only insist on the
        // local@domain.tld shape that the mobile client promises to send.
        let valid = match s.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !s.contains(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(ModelError(format!("Email does not look like a valid address '{}'", s)));
        }

        Ok(Self(s))
    }

    /// Returns the domain part of the address.
    pub(crate) fn domain(&self) -> &str {
        self.0.split_once('@').expect("Validated at construction time").1
    }

    /// Returns a string view of the email address.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
impl From<&str> for EmailAddress {
    fn from(raw_email: &str) -> Self {
        Self::new(raw_email).expect("Hardcoded email addresses for testing must be valid")
    }
}

/// Represents a phone number: an optional `+` followed by 8 to 15 digits.
///
/// Interior spaces are dropped on construction; no other normalization is
/// attempted.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct PhoneNumber(String);

impl PhoneNumber {
    /// Creates a new phone number from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s: String = s.into().trim().chars().filter(|ch| *ch != ' ').collect();

        let digits = s.strip_prefix('+').unwrap_or(&s);
        if digits.len() < 8
            || digits.len() > 15
            || !digits.chars().all(|ch| ch.is_ascii_digit())
        {
            return Err(ModelError(format!("Invalid phone number '{}'", s)));
        }

        Ok(Self(s))
    }

    /// Returns a string view of the phone number.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
impl From<&str> for PhoneNumber {
    fn from(raw_phone: &str) -> Self {
        Self::new(raw_phone).expect("Hardcoded phone numbers for testing must be valid")
    }
}

/// A login contact: the one piece of identity users log in with.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Contact {
    /// An email address, accepted for every user type.
    Email(EmailAddress),

    /// A phone number, accepted for guests only.
    Phone(PhoneNumber),
}

impl Contact {
    /// Parses an untrusted contact string according to the `user_type` rules:
    /// campus users must supply an email address while guests may supply an
    /// email address or a phone number.
    pub(crate) fn parse(raw: &str, user_type: UserType) -> ModelResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ModelError("contact is required".to_owned()));
        }

        if raw.contains('@') {
            return Ok(Contact::Email(EmailAddress::new(raw)?));
        }

        match user_type {
            UserType::Campus => {
                Err(ModelError("Campus users must provide an email address".to_owned()))
            }
            UserType::Guest => Ok(Contact::Phone(PhoneNumber::new(raw)?)),
        }
    }
}
