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

//! Database abstraction in terms of the operations needed by the service.

use crate::model::{
    AccessToken, Booking, BookingId, BookingStatus, DistanceKm, EmailAddress, Location,
    ModelError, NewRide, Notification, NotificationId, PersonName, PhoneNumber, RatingComment,
    Ride, RideId, SeatCount, Stars, User, UserId, UserType, VehicleType,
};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use time::OffsetDateTime;

pub mod sqlite;
use sqlite::{build_timestamp, map_sqlx_error, run_schema, unpack_timestamp};
pub use sqlite::{Executor, TxExecutor};
#[cfg(test)]
mod tests;

/// Database errors.  Any unexpected errors that come from the database are classified as
/// `BackendError`, but errors we know about have more specific types.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DbError {
    /// Indicates that a request to create an entry failed because it already exists.
    #[error("Already exists")]
    AlreadyExists,

    /// Catch-all error type for unexpected database errors.
    #[error("Database error: {0}")]
    BackendError(String),

    /// Indicates a failure processing the data that already exists in the database.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),

    /// Indicates that a requested entry does not exist.
    #[error("Entity not found")]
    NotFound,
}

impl From<ModelError> for DbError {
    fn from(e: ModelError) -> Self {
        DbError::DataIntegrityError(e.to_string())
    }
}

/// Result type for this module.
pub type DbResult<T> = Result<T, DbError>;

/// Abstraction over the database connection.
#[async_trait]
pub trait Db {
    /// Obtains an executor for direct access to the pool.
    ///
    /// This would be better called `executor` but this method is used so frequently that it
    /// makes call sites too verbose.
    async fn ex(&self) -> DbResult<Executor>;

    /// Begins a transaction.
    ///
    /// It is the responsibility of the caller to call `commit` on the returned executor.
    /// Otherwise the transaction is rolled back on drop.
    async fn begin(&self) -> DbResult<TxExecutor>;
}

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    run_schema(ex.conn(), include_str!("sqlite.sql")).await
}

impl TryFrom<SqliteRow> for User {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(map_sqlx_error)?;
        let user_type: String = row.try_get("user_type").map_err(map_sqlx_error)?;
        let email: Option<String> = row.try_get("email").map_err(map_sqlx_error)?;
        let phone: Option<String> = row.try_get("phone").map_err(map_sqlx_error)?;
        let is_verified: i64 = row.try_get("is_verified").map_err(map_sqlx_error)?;
        let created_at_secs: i64 = row.try_get("created_at_secs").map_err(map_sqlx_error)?;
        let created_at_nsecs: i64 = row.try_get("created_at_nsecs").map_err(map_sqlx_error)?;

        let email = match email {
            Some(email) => Some(EmailAddress::new(email)?),
            None => None,
        };
        let phone = match phone {
            Some(phone) => Some(PhoneNumber::new(phone)?),
            None => None,
        };

        Ok(User::new(
            UserId::new(id),
            PersonName::new(name)?,
            UserType::parse(&user_type)?,
            email,
            phone,
            is_verified != 0,
            build_timestamp(created_at_secs, created_at_nsecs)?,
        ))
    }
}

impl TryFrom<SqliteRow> for Ride {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        let driver_id: i64 = row.try_get("driver_id").map_err(map_sqlx_error)?;
        ride_from_columns(&row, RideId::new(id), UserId::new(driver_id), "")
    }
}

/// Builds a `Ride` from the `prefix`ed ride columns of `row`.
///
/// The plain ride queries use no prefix; the booking-listing queries join the
/// rides table in with aliased columns to avoid clashing with the booking's
/// own columns.
fn ride_from_columns(
    row: &SqliteRow,
    id: RideId,
    driver_id: UserId,
    prefix: &str,
) -> DbResult<Ride> {
    /// Fetches the value of the `prefix`ed column `$name` as type `$t`.
    macro_rules! get [
        ( $name:expr, $t:ty ) => {
            row.try_get::<$t, _>(format!("{}{}", prefix, $name).as_str())
                .map_err(map_sqlx_error)?
        }
    ];

    let from_text = get!("from_text", String);
    let to_text = get!("to_text", String);
    let depart_time_secs = get!("depart_time_secs", i64);
    let depart_time_nsecs = get!("depart_time_nsecs", i64);
    let seats_total = get!("seats_total", i64);
    let seats_left = get!("seats_left", i64);
    let vehicle_type = get!("vehicle_type", String);
    let allow_guests = get!("allow_guests", i64);
    let distance_km = get!("distance_km", f64);
    let created_at_secs = get!("created_at_secs", i64);
    let created_at_nsecs = get!("created_at_nsecs", i64);

    let seats_left = u8::try_from(seats_left)
        .map_err(|_| DbError::DataIntegrityError(format!("seats_left {} out of range", seats_left)))?;

    Ok(Ride::new(
        id,
        driver_id,
        Location::new(from_text)?,
        Location::new(to_text)?,
        build_timestamp(depart_time_secs, depart_time_nsecs)?,
        SeatCount::from_db(seats_total)?,
        seats_left,
        VehicleType::new(vehicle_type)?,
        allow_guests != 0,
        DistanceKm::new(distance_km)?,
        build_timestamp(created_at_secs, created_at_nsecs)?,
    )?)
}

impl TryFrom<SqliteRow> for Booking {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        let ride_id: i64 = row.try_get("ride_id").map_err(map_sqlx_error)?;
        let rider_id: i64 = row.try_get("rider_id").map_err(map_sqlx_error)?;
        let seats: i64 = row.try_get("seats").map_err(map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(map_sqlx_error)?;
        let created_at_secs: i64 = row.try_get("created_at_secs").map_err(map_sqlx_error)?;
        let created_at_nsecs: i64 = row.try_get("created_at_nsecs").map_err(map_sqlx_error)?;
        let cancelled_at_secs: Option<i64> =
            row.try_get("cancelled_at_secs").map_err(map_sqlx_error)?;
        let cancelled_at_nsecs: Option<i64> =
            row.try_get("cancelled_at_nsecs").map_err(map_sqlx_error)?;

        let cancelled_at = match (cancelled_at_secs, cancelled_at_nsecs) {
            (Some(secs), Some(nsecs)) => Some(build_timestamp(secs, nsecs)?),
            (None, None) => None,
            (_, _) => {
                return Err(DbError::DataIntegrityError(
                    "Inconsistent values for cancelled_at".to_owned(),
                ));
            }
        };

        Ok(Booking::new(
            BookingId::new(id),
            RideId::new(ride_id),
            UserId::new(rider_id),
            SeatCount::from_db(seats)?,
            BookingStatus::parse(&status)?,
            build_timestamp(created_at_secs, created_at_nsecs)?,
            cancelled_at,
        ))
    }
}

impl TryFrom<SqliteRow> for Notification {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        let user_id: i64 = row.try_get("user_id").map_err(map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(map_sqlx_error)?;
        let body: String = row.try_get("body").map_err(map_sqlx_error)?;
        let created_at_secs: i64 = row.try_get("created_at_secs").map_err(map_sqlx_error)?;
        let created_at_nsecs: i64 = row.try_get("created_at_nsecs").map_err(map_sqlx_error)?;
        let is_read: i64 = row.try_get("is_read").map_err(map_sqlx_error)?;

        Ok(Notification::new(
            NotificationId::new(id),
            UserId::new(user_id),
            title,
            body,
            build_timestamp(created_at_secs, created_at_nsecs)?,
            is_read != 0,
        ))
    }
}

/// Creates a new user with the given identity fields.
pub(crate) async fn create_user(
    ex: &mut Executor,
    name: &PersonName,
    user_type: UserType,
    email: Option<&EmailAddress>,
    phone: Option<&PhoneNumber>,
    verified: bool,
    created_at: OffsetDateTime,
) -> DbResult<User> {
    let (created_at_secs, created_at_nsecs) = unpack_timestamp(created_at);

    let query_str = "
        INSERT INTO users (name, user_type, email, phone, is_verified, created_at_secs,
            created_at_nsecs)
        VALUES (?, ?, ?, ?, ?, ?, ?)";
    let done = sqlx::query(query_str)
        .bind(name.as_str())
        .bind(user_type.as_str())
        .bind(email.map(EmailAddress::as_str))
        .bind(phone.map(PhoneNumber::as_str))
        .bind(i64::from(verified))
        .bind(created_at_secs)
        .bind(created_at_nsecs)
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    if done.rows_affected() != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }

    Ok(User::new(
        UserId::new(done.last_insert_rowid()),
        name.clone(),
        user_type,
        email.cloned(),
        phone.cloned(),
        verified,
        created_at,
    ))
}

/// Gets information about an existing user by `id`.
pub(crate) async fn get_user(ex: &mut Executor, id: UserId) -> DbResult<User> {
    let query_str = "SELECT * FROM users WHERE id = ?";
    let raw_user = sqlx::query(query_str)
        .bind(id.as_i64())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    User::try_from(raw_user)
}

/// Looks up a user by the `email` they log in with.
pub(crate) async fn find_user_by_email(
    ex: &mut Executor,
    email: &EmailAddress,
) -> DbResult<Option<User>> {
    let query_str = "SELECT * FROM users WHERE email = ?";
    let raw_user = sqlx::query(query_str)
        .bind(email.as_str())
        .fetch_optional(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    match raw_user {
        Some(raw_user) => Ok(Some(User::try_from(raw_user)?)),
        None => Ok(None),
    }
}

/// Looks up a user by the `phone` number they log in with.
pub(crate) async fn find_user_by_phone(
    ex: &mut Executor,
    phone: &PhoneNumber,
) -> DbResult<Option<User>> {
    let query_str = "SELECT * FROM users WHERE phone = ?";
    let raw_user = sqlx::query(query_str)
        .bind(phone.as_str())
        .fetch_optional(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    match raw_user {
        Some(raw_user) => Ok(Some(User::try_from(raw_user)?)),
        None => Ok(None),
    }
}

/// Updates the `name` and `user_type` of an existing user on repeat login.
pub(crate) async fn update_user_identity(
    ex: &mut Executor,
    id: UserId,
    name: &PersonName,
    user_type: UserType,
) -> DbResult<()> {
    let query_str = "UPDATE users SET name = ?, user_type = ? WHERE id = ?";
    let done = sqlx::query(query_str)
        .bind(name.as_str())
        .bind(user_type.as_str())
        .bind(id.as_i64())
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    match done.rows_affected() {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Saves a new session for `user_id` keyed by `token`.
pub(crate) async fn put_session(
    ex: &mut Executor,
    token: &AccessToken,
    user_id: UserId,
    created_at: OffsetDateTime,
) -> DbResult<()> {
    let (created_at_secs, created_at_nsecs) = unpack_timestamp(created_at);

    let query_str = "
        INSERT INTO sessions (token, user_id, created_at_secs, created_at_nsecs)
        VALUES (?, ?, ?, ?)";
    let done = sqlx::query(query_str)
        .bind(token.as_str())
        .bind(user_id.as_i64())
        .bind(created_at_secs)
        .bind(created_at_nsecs)
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    if done.rows_affected() != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(())
}

/// Gets the user that owns the session identified by `token`.
pub(crate) async fn get_session_user_id(
    ex: &mut Executor,
    token: &AccessToken,
) -> DbResult<UserId> {
    let query_str = "SELECT user_id FROM sessions WHERE token = ?";
    let row = sqlx::query(query_str)
        .bind(token.as_str())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    let user_id: i64 = row.try_get("user_id").map_err(map_sqlx_error)?;
    Ok(UserId::new(user_id))
}

/// Deletes the session identified by `token`, reporting whether it existed.
pub(crate) async fn delete_session(ex: &mut Executor, token: &AccessToken) -> DbResult<bool> {
    let query_str = "DELETE FROM sessions WHERE token = ?";
    let done = sqlx::query(query_str)
        .bind(token.as_str())
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    Ok(done.rows_affected() > 0)
}

/// Creates a new ride posted by `driver_id` with all seats available.
pub(crate) async fn create_ride(
    ex: &mut Executor,
    driver_id: UserId,
    details: &NewRide,
    allow_guests: bool,
    created_at: OffsetDateTime,
) -> DbResult<Ride> {
    let (depart_time_secs, depart_time_nsecs) = unpack_timestamp(*details.depart_time());
    let (created_at_secs, created_at_nsecs) = unpack_timestamp(created_at);

    let query_str = "
        INSERT INTO rides (driver_id, from_text, to_text, depart_time_secs, depart_time_nsecs,
            seats_total, seats_left, vehicle_type, allow_guests, distance_km, created_at_secs,
            created_at_nsecs)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
    let done = sqlx::query(query_str)
        .bind(driver_id.as_i64())
        .bind(details.from_text().as_str())
        .bind(details.to_text().as_str())
        .bind(depart_time_secs)
        .bind(depart_time_nsecs)
        .bind(details.seats_total().as_i64())
        .bind(details.seats_total().as_i64())
        .bind(details.vehicle_type().as_str())
        .bind(i64::from(allow_guests))
        .bind(details.distance_km().as_f64())
        .bind(created_at_secs)
        .bind(created_at_nsecs)
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    if done.rows_affected() != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }

    Ok(Ride::new(
        RideId::new(done.last_insert_rowid()),
        driver_id,
        details.from_text().clone(),
        details.to_text().clone(),
        *details.depart_time(),
        *details.seats_total(),
        details.seats_total().as_u8(),
        details.vehicle_type().clone(),
        allow_guests,
        *details.distance_km(),
        created_at,
    )?)
}

/// Gets information about an existing ride by `id`.
pub(crate) async fn get_ride(ex: &mut Executor, id: RideId) -> DbResult<Ride> {
    let query_str = "SELECT * FROM rides WHERE id = ?";
    let raw_ride = sqlx::query(query_str)
        .bind(id.as_i64())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    Ride::try_from(raw_ride)
}

/// Finds the rides with seats available whose route matches the `from_q` and `to_q`
/// case-insensitive substrings, soonest departure first.
pub(crate) async fn search_rides(
    ex: &mut Executor,
    from_q: &str,
    to_q: &str,
) -> DbResult<Vec<Ride>> {
    let query_str = "
        SELECT * FROM rides
        WHERE seats_left > 0
            AND LOWER(from_text) LIKE ?
            AND LOWER(to_text) LIKE ?
        ORDER BY depart_time_secs ASC, depart_time_nsecs ASC";
    let raw_rides = sqlx::query(query_str)
        .bind(format!("%{}%", from_q.to_lowercase()))
        .bind(format!("%{}%", to_q.to_lowercase()))
        .fetch_all(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    let mut rides = Vec::with_capacity(raw_rides.len());
    for raw_ride in raw_rides {
        rides.push(Ride::try_from(raw_ride)?);
    }
    Ok(rides)
}

/// Counts the rides posted by `driver_id`.
pub(crate) async fn count_rides_by_driver(ex: &mut Executor, driver_id: UserId) -> DbResult<i64> {
    let query_str = "SELECT COUNT(*) AS count FROM rides WHERE driver_id = ?";
    let row = sqlx::query(query_str)
        .bind(driver_id.as_i64())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    row.try_get("count").map_err(map_sqlx_error)
}

/// Atomically takes `seats` seats from the ride `id` if, and only if, that many are still
/// available.  Returns whether the seats were taken.
///
/// The capacity check and the decrement happen in one statement so that two
/// racing bookings can never jointly overbook the ride.
pub(crate) async fn take_ride_seats(
    ex: &mut Executor,
    id: RideId,
    seats: SeatCount,
) -> DbResult<bool> {
    let query_str = "UPDATE rides SET seats_left = seats_left - ? WHERE id = ? AND seats_left >= ?";
    let done = sqlx::query(query_str)
        .bind(seats.as_i64())
        .bind(id.as_i64())
        .bind(seats.as_i64())
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    Ok(done.rows_affected() == 1)
}

/// Returns `seats` seats to the ride `id` after a cancellation.
pub(crate) async fn restore_ride_seats(
    ex: &mut Executor,
    id: RideId,
    seats: SeatCount,
) -> DbResult<()> {
    let query_str = "UPDATE rides SET seats_left = seats_left + ? WHERE id = ?";
    let done = sqlx::query(query_str)
        .bind(seats.as_i64())
        .bind(id.as_i64())
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    match done.rows_affected() {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Creates a new confirmed booking of `seats` seats on `ride_id` held by `rider_id`.
pub(crate) async fn create_booking(
    ex: &mut Executor,
    ride_id: RideId,
    rider_id: UserId,
    seats: SeatCount,
    created_at: OffsetDateTime,
) -> DbResult<Booking> {
    let (created_at_secs, created_at_nsecs) = unpack_timestamp(created_at);

    let query_str = "
        INSERT INTO bookings (ride_id, rider_id, seats, status, created_at_secs, created_at_nsecs)
        VALUES (?, ?, ?, ?, ?, ?)";
    let done = sqlx::query(query_str)
        .bind(ride_id.as_i64())
        .bind(rider_id.as_i64())
        .bind(seats.as_i64())
        .bind(BookingStatus::Confirmed.as_str())
        .bind(created_at_secs)
        .bind(created_at_nsecs)
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    if done.rows_affected() != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }

    Ok(Booking::new(
        BookingId::new(done.last_insert_rowid()),
        ride_id,
        rider_id,
        seats,
        BookingStatus::Confirmed,
        created_at,
        None,
    ))
}

/// Gets information about an existing booking by `id`.
pub(crate) async fn get_booking(ex: &mut Executor, id: BookingId) -> DbResult<Booking> {
    let query_str = "SELECT * FROM bookings WHERE id = ?";
    let raw_booking = sqlx::query(query_str)
        .bind(id.as_i64())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    Booking::try_from(raw_booking)
}

/// Marks the booking `id` as cancelled at `cancelled_at`.
pub(crate) async fn mark_booking_cancelled(
    ex: &mut Executor,
    id: BookingId,
    cancelled_at: OffsetDateTime,
) -> DbResult<()> {
    let (cancelled_at_secs, cancelled_at_nsecs) = unpack_timestamp(cancelled_at);

    let query_str = "
        UPDATE bookings SET status = ?, cancelled_at_secs = ?, cancelled_at_nsecs = ?
        WHERE id = ?";
    let done = sqlx::query(query_str)
        .bind(BookingStatus::Cancelled.as_str())
        .bind(cancelled_at_secs)
        .bind(cancelled_at_nsecs)
        .bind(id.as_i64())
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    match done.rows_affected() {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Columns to select when joining bookings with their rides.
///
/// The booking columns keep their bare names so that `Booking::try_from` can
/// decode them; the ride columns that would clash are aliased with a `ride_`
/// prefix and decoded by `ride_from_columns`.
const BOOKING_RIDE_COLUMNS: &str = "
    b.id, b.ride_id, b.rider_id, b.seats, b.status, b.created_at_secs, b.created_at_nsecs,
    b.cancelled_at_secs, b.cancelled_at_nsecs,
    r.driver_id AS ride_driver_id, r.from_text AS ride_from_text, r.to_text AS ride_to_text,
    r.depart_time_secs AS ride_depart_time_secs, r.depart_time_nsecs AS ride_depart_time_nsecs,
    r.seats_total AS ride_seats_total, r.seats_left AS ride_seats_left,
    r.vehicle_type AS ride_vehicle_type, r.allow_guests AS ride_allow_guests,
    r.distance_km AS ride_distance_km, r.created_at_secs AS ride_created_at_secs,
    r.created_at_nsecs AS ride_created_at_nsecs";

/// Decodes a row produced with `BOOKING_RIDE_COLUMNS` into its booking and ride.
fn booking_with_ride_from_row(row: SqliteRow) -> DbResult<(Booking, Ride)> {
    let ride_driver_id: i64 = row.try_get("ride_driver_id").map_err(map_sqlx_error)?;
    let ride_id: i64 = row.try_get("ride_id").map_err(map_sqlx_error)?;
    let ride = ride_from_columns(
        &row,
        RideId::new(ride_id),
        UserId::new(ride_driver_id),
        "ride_",
    )?;
    let booking = Booking::try_from(row)?;
    Ok((booking, ride))
}

/// Lists all bookings held by `rider_id` with their rides, newest booking first.
pub(crate) async fn list_bookings_by_rider(
    ex: &mut Executor,
    rider_id: UserId,
) -> DbResult<Vec<(Booking, Ride)>> {
    let query_str = format!(
        "SELECT {} FROM bookings b JOIN rides r ON r.id = b.ride_id
        WHERE b.rider_id = ?
        ORDER BY b.id DESC",
        BOOKING_RIDE_COLUMNS
    );
    let raw_rows = sqlx::query(&query_str)
        .bind(rider_id.as_i64())
        .fetch_all(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    let mut bookings = Vec::with_capacity(raw_rows.len());
    for raw_row in raw_rows {
        bookings.push(booking_with_ride_from_row(raw_row)?);
    }
    Ok(bookings)
}

/// Lists the confirmed bookings held by `rider_id` with their rides, newest booking first.
pub(crate) async fn list_confirmed_bookings_by_rider(
    ex: &mut Executor,
    rider_id: UserId,
) -> DbResult<Vec<(Booking, Ride)>> {
    let query_str = format!(
        "SELECT {} FROM bookings b JOIN rides r ON r.id = b.ride_id
        WHERE b.rider_id = ? AND b.status = ?
        ORDER BY b.id DESC",
        BOOKING_RIDE_COLUMNS
    );
    let raw_rows = sqlx::query(&query_str)
        .bind(rider_id.as_i64())
        .bind(BookingStatus::Confirmed.as_str())
        .fetch_all(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    let mut bookings = Vec::with_capacity(raw_rows.len());
    for raw_row in raw_rows {
        bookings.push(booking_with_ride_from_row(raw_row)?);
    }
    Ok(bookings)
}

/// Checks whether `rider_id` holds a confirmed booking on `ride_id`.
pub(crate) async fn has_confirmed_booking(
    ex: &mut Executor,
    ride_id: RideId,
    rider_id: UserId,
) -> DbResult<bool> {
    let query_str = "
        SELECT id FROM bookings WHERE ride_id = ? AND rider_id = ? AND status = ? LIMIT 1";
    let row = sqlx::query(query_str)
        .bind(ride_id.as_i64())
        .bind(rider_id.as_i64())
        .bind(BookingStatus::Confirmed.as_str())
        .fetch_optional(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    Ok(row.is_some())
}

/// Counts the confirmed bookings held by `rider_id`.
pub(crate) async fn count_confirmed_bookings_by_rider(
    ex: &mut Executor,
    rider_id: UserId,
) -> DbResult<i64> {
    let query_str = "SELECT COUNT(*) AS count FROM bookings WHERE rider_id = ? AND status = ?";
    let row = sqlx::query(query_str)
        .bind(rider_id.as_i64())
        .bind(BookingStatus::Confirmed.as_str())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    row.try_get("count").map_err(map_sqlx_error)
}

/// Records a new notification for `user_id`, unread.
pub(crate) async fn create_notification(
    ex: &mut Executor,
    user_id: UserId,
    title: &str,
    body: &str,
    created_at: OffsetDateTime,
) -> DbResult<()> {
    let (created_at_secs, created_at_nsecs) = unpack_timestamp(created_at);

    let query_str = "
        INSERT INTO notifications (user_id, title, body, created_at_secs, created_at_nsecs,
            is_read)
        VALUES (?, ?, ?, ?, ?, 0)";
    let done = sqlx::query(query_str)
        .bind(user_id.as_i64())
        .bind(title)
        .bind(body)
        .bind(created_at_secs)
        .bind(created_at_nsecs)
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    if done.rows_affected() != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(())
}

/// Lists the notifications addressed to `user_id`, newest first.
pub(crate) async fn list_notifications(
    ex: &mut Executor,
    user_id: UserId,
) -> DbResult<Vec<Notification>> {
    let query_str = "SELECT * FROM notifications WHERE user_id = ? ORDER BY id DESC";
    let raw_rows = sqlx::query(query_str)
        .bind(user_id.as_i64())
        .fetch_all(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    let mut notifications = Vec::with_capacity(raw_rows.len());
    for raw_row in raw_rows {
        notifications.push(Notification::try_from(raw_row)?);
    }
    Ok(notifications)
}

/// Marks the notification `id` as read.
pub(crate) async fn mark_notification_read(
    ex: &mut Executor,
    id: NotificationId,
) -> DbResult<()> {
    let query_str = "UPDATE notifications SET is_read = 1 WHERE id = ?";
    let done = sqlx::query(query_str)
        .bind(id.as_i64())
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    match done.rows_affected() {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Records a rating of `stars` for `driver_id`, given by `rater_id` for `ride_id`.
pub(crate) async fn create_rating(
    ex: &mut Executor,
    ride_id: RideId,
    rater_id: UserId,
    driver_id: UserId,
    stars: Stars,
    comment: Option<&RatingComment>,
    created_at: OffsetDateTime,
) -> DbResult<()> {
    let (created_at_secs, created_at_nsecs) = unpack_timestamp(created_at);

    let query_str = "
        INSERT INTO ratings (ride_id, rater_id, driver_id, stars, comment, created_at_secs,
            created_at_nsecs)
        VALUES (?, ?, ?, ?, ?, ?, ?)";
    let done = sqlx::query(query_str)
        .bind(ride_id.as_i64())
        .bind(rater_id.as_i64())
        .bind(driver_id.as_i64())
        .bind(stars.as_i64())
        .bind(comment.map(RatingComment::as_str))
        .bind(created_at_secs)
        .bind(created_at_nsecs)
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;

    if done.rows_affected() != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(())
}

/// Computes the raw average stars and rating count for `driver_id`.
///
/// The average is zero when the driver has no ratings; rounding for display
/// is the caller's concern.
pub(crate) async fn rating_summary(ex: &mut Executor, driver_id: UserId) -> DbResult<(f64, i64)> {
    let query_str = "
        SELECT AVG(stars) AS avg_stars, COUNT(*) AS total FROM ratings WHERE driver_id = ?";
    let row = sqlx::query(query_str)
        .bind(driver_id.as_i64())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    let avg_stars: Option<f64> = row.try_get("avg_stars").map_err(map_sqlx_error)?;
    let total: i64 = row.try_get("total").map_err(map_sqlx_error)?;
    Ok((avg_stars.unwrap_or(0.0), total))
}
