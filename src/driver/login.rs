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

//! Extends the driver with the login, logout and session operations.

use crate::db::{self, DbError};
use crate::driver::{Driver, DriverError, DriverResult};
use crate::model::{AccessToken, Contact, PersonName, User, UserType};

/// Result of a successful login: the session token and the user it belongs to.
#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub(crate) struct LoginOutcome {
    /// The token identifying the newly-created session.
    pub(crate) token: AccessToken,

    /// The user that logged in, created on the fly if this was a first login.
    pub(crate) user: User,

    /// Human-readable confirmation message.
    pub(crate) message: &'static str,
}

impl Driver {
    /// Logs a user in by their contact, creating the account on first login.
    ///
    /// Every call issues a fresh session token and leaves previously-issued
    /// tokens valid.  Repeat logins refresh the stored name and user type.
    pub(crate) async fn login_or_create(
        self,
        name: &str,
        contact: &str,
        user_type: &str,
    ) -> DriverResult<LoginOutcome> {
        let user_type = UserType::parse(user_type)?;
        let name = PersonName::new(name)?;
        let contact = Contact::parse(contact, user_type)?;

        if let Contact::Email(email) = &contact {
            if user_type == UserType::Campus
                && self.config.enable_campus_verification
                && !self.config.is_campus_domain(email.domain())
            {
                return Err(DriverError::InvalidInput(
                    "Email domain not allowed for campus verification".to_owned(),
                ));
            }
        }

        let now = self.clock.now_utc();
        let mut tx = self.db.begin().await?;

        let existing = match &contact {
            Contact::Email(email) => db::find_user_by_email(tx.ex(), email).await?,
            Contact::Phone(phone) => db::find_user_by_phone(tx.ex(), phone).await?,
        };

        let user = match existing {
            None => {
                let (email, phone) = match &contact {
                    Contact::Email(email) => (Some(email), None),
                    Contact::Phone(phone) => (None, Some(phone)),
                };

                // New accounts are verified from the start: contact
                // verification is not performed yet even though the schema has
                // room for it.
                let user =
                    db::create_user(tx.ex(), &name, user_type, email, phone, true, now).await?;

                self.notify(tx.ex(), user.id(), "Welcome to PoolRide", "You're all set.", now)
                    .await?;
                user
            }
            Some(user) => {
                db::update_user_identity(tx.ex(), user.id(), &name, user_type).await?;
                User::new(
                    user.id(),
                    name.clone(),
                    user_type,
                    user.email().cloned(),
                    user.phone().cloned(),
                    user.verified(),
                    user.created_at(),
                )
            }
        };

        let token = AccessToken::generate();
        db::put_session(tx.ex(), &token, user.id(), now).await?;

        tx.commit().await?;
        Ok(LoginOutcome { token, user, message: "Login successful" })
    }

    /// Ends the session identified by `token`.
    ///
    /// Deleting a token that does not exist is a silent success: the caller
    /// ends up logged out either way.
    pub(crate) async fn logout(self, token: &AccessToken) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        let _existed = db::delete_session(&mut ex, token).await?;
        Ok(())
    }

    /// Resolves the session identified by `token` to the user that owns it.
    pub(crate) async fn get_session_user(self, token: &AccessToken) -> DriverResult<User> {
        let mut ex = self.db.ex().await?;

        let user_id = match db::get_session_user_id(&mut ex, token).await {
            Ok(user_id) => user_id,
            Err(DbError::NotFound) => {
                return Err(DriverError::Unauthorized("Invalid or expired token".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(db::get_user(&mut ex, user_id).await?)
    }
}
