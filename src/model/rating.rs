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

//! Data types for driver ratings.

use crate::model::{ModelError, ModelResult, UserId};
use derive_getters::Getters;
use derive_more::Constructor;

/// Maximum length of rating comments.
const MAX_COMMENT_LENGTH: usize = 300;

/// A star rating between 1 and 5.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Stars(u8);

impl Stars {
    /// Creates a new star rating, making sure it is in range.
    pub(crate) fn new(n: u8) -> ModelResult<Self> {
        if n < 1 || n > 5 {
            return Err(ModelError("stars must be between 1 and 5".to_owned()));
        }
        Ok(Self(n))
    }

    /// Returns the rating as an `i64` for database storage.
    pub(crate) fn as_i64(self) -> i64 {
        i64::from(self.0)
    }
}

/// A free-form comment attached to a rating.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RatingComment(String);

impl RatingComment {
    /// Creates a new comment from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.len() > MAX_COMMENT_LENGTH {
            return Err(ModelError("Comment is too long".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the comment.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Aggregate rating information for one driver.
#[derive(Constructor, Debug, Getters, PartialEq)]
pub(crate) struct RatingSummary {
    /// Driver the summary is about.
    driver_id: UserId,

    /// Average of all stars given to the driver, rounded to two decimals;
    /// zero when the driver has no ratings yet.
    average_stars: f64,

    /// Number of ratings the driver received.
    total_ratings: i64,
}
