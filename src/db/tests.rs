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

//! Tests for the persistence layer.

use crate::db::sqlite::SqliteDb;
use crate::db::*;
use crate::model::*;
use time::OffsetDateTime;
use time::macros::datetime;

/// Initializes an in-memory test database with the service schema.
async fn setup() -> SqliteDb {
    let db = sqlite::testutils::setup().await;
    init_schema(&mut db.ex().await.unwrap()).await.unwrap();
    db
}

/// Syntactic sugar to create a verified campus user given only its name and email.
async fn create_campus_user(ex: &mut Executor, name: &str, email: &str) -> User {
    create_user(
        ex,
        &PersonName::from(name),
        UserType::Campus,
        Some(&EmailAddress::from(email)),
        None,
        true,
        datetime!(2025-03-01 08:00:00 UTC),
    )
    .await
    .unwrap()
}

/// Syntactic sugar to create a ride posted by `driver_id` on the given route.
async fn create_ride_on_route(
    ex: &mut Executor,
    driver_id: UserId,
    from: &str,
    to: &str,
    seats_total: u8,
    depart_time: OffsetDateTime,
) -> Ride {
    create_ride(
        ex,
        driver_id,
        &NewRide::new(
            Location::new(from).unwrap(),
            Location::new(to).unwrap(),
            depart_time,
            SeatCount::ride_total(seats_total).unwrap(),
            VehicleType::from("car"),
            None,
            DistanceKm::new(10.0).unwrap(),
        ),
        true,
        datetime!(2025-03-10 12:00:00 UTC),
    )
    .await
    .unwrap()
}

/// Syntactic sugar to create a ride posted by `driver_id` with `seats_total` seats.
async fn create_simple_ride(ex: &mut Executor, driver_id: UserId, seats_total: u8) -> Ride {
    create_ride_on_route(
        ex,
        driver_id,
        "Hostel H",
        "City Center",
        seats_total,
        datetime!(2025-03-12 09:00:00 UTC),
    )
    .await
}

#[tokio::test]
async fn test_users_create_and_get() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let user = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;
    assert_eq!("Dana", user.name().as_str());
    assert!(user.verified());

    assert_eq!(user, get_user(&mut ex, user.id()).await.unwrap());
    assert_eq!(
        Some(user.clone()),
        find_user_by_email(&mut ex, &EmailAddress::from("dana@example.edu")).await.unwrap()
    );
    assert_eq!(
        None,
        find_user_by_email(&mut ex, &EmailAddress::from("other@example.edu")).await.unwrap()
    );
    assert_eq!(
        None,
        find_user_by_phone(&mut ex, &PhoneNumber::from("12345678")).await.unwrap()
    );

    assert_eq!(DbError::NotFound, get_user(&mut ex, UserId::new(123)).await.unwrap_err());
}

#[tokio::test]
async fn test_users_guest_by_phone() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let user = create_user(
        &mut ex,
        &PersonName::from("Guest"),
        UserType::Guest,
        None,
        Some(&PhoneNumber::from("+911234567890")),
        true,
        datetime!(2025-03-01 08:00:00 UTC),
    )
    .await
    .unwrap();

    assert_eq!(
        Some(user),
        find_user_by_phone(&mut ex, &PhoneNumber::from("+911234567890")).await.unwrap()
    );
}

#[tokio::test]
async fn test_users_duplicate_email() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    create_campus_user(&mut ex, "Dana", "dana@example.edu").await;

    let err = create_user(
        &mut ex,
        &PersonName::from("Other"),
        UserType::Campus,
        Some(&EmailAddress::from("dana@example.edu")),
        None,
        true,
        datetime!(2025-03-02 08:00:00 UTC),
    )
    .await
    .unwrap_err();
    assert_eq!(DbError::AlreadyExists, err);
}

#[tokio::test]
async fn test_users_update_identity() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let user = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;

    update_user_identity(&mut ex, user.id(), &PersonName::from("Dana D."), UserType::Guest)
        .await
        .unwrap();

    let updated = get_user(&mut ex, user.id()).await.unwrap();
    assert_eq!("Dana D.", updated.name().as_str());
    assert_eq!(UserType::Guest, updated.user_type());
    assert_eq!(user.email(), updated.email());

    assert_eq!(
        DbError::NotFound,
        update_user_identity(&mut ex, UserId::new(123), &PersonName::from("X"), UserType::Guest)
            .await
            .unwrap_err()
    );
}

#[tokio::test]
async fn test_sessions_lifecycle() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let user = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;
    let token = AccessToken::generate();

    put_session(&mut ex, &token, user.id(), datetime!(2025-03-01 09:00:00 UTC)).await.unwrap();
    assert_eq!(user.id(), get_session_user_id(&mut ex, &token).await.unwrap());

    // A second login stacks a second session; the first one stays valid.
    let token2 = AccessToken::generate();
    put_session(&mut ex, &token2, user.id(), datetime!(2025-03-01 10:00:00 UTC)).await.unwrap();
    assert_eq!(user.id(), get_session_user_id(&mut ex, &token).await.unwrap());
    assert_eq!(user.id(), get_session_user_id(&mut ex, &token2).await.unwrap());

    assert!(delete_session(&mut ex, &token).await.unwrap());
    assert_eq!(
        DbError::NotFound,
        get_session_user_id(&mut ex, &token).await.unwrap_err()
    );
    assert!(!delete_session(&mut ex, &token).await.unwrap());
    assert_eq!(user.id(), get_session_user_id(&mut ex, &token2).await.unwrap());
}

#[tokio::test]
async fn test_rides_create_and_get() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let driver = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;
    let ride = create_simple_ride(&mut ex, driver.id(), 4).await;

    assert_eq!(driver.id(), ride.driver_id());
    assert_eq!(4, ride.seats_total().as_u8());
    assert_eq!(4, ride.seats_left());
    assert!(ride.allow_guests());

    assert_eq!(ride, get_ride(&mut ex, ride.id()).await.unwrap());
    assert_eq!(DbError::NotFound, get_ride(&mut ex, RideId::new(123)).await.unwrap_err());
}

#[tokio::test]
async fn test_rides_search() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let driver = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;
    let id = driver.id();

    let late = create_ride_on_route(
        &mut ex, id, "Hostel H", "City Center", 2, datetime!(2025-03-12 18:00:00 UTC))
        .await;
    let early = create_ride_on_route(
        &mut ex, id, "hostel h gate", "city center mall", 2, datetime!(2025-03-12 08:00:00 UTC))
        .await;
    let other = create_ride_on_route(
        &mut ex, id, "Hostel B", "Airport", 2, datetime!(2025-03-12 09:00:00 UTC))
        .await;
    let full = create_ride_on_route(
        &mut ex, id, "Hostel H", "City Center", 2, datetime!(2025-03-12 10:00:00 UTC))
        .await;
    assert!(take_ride_seats(&mut ex, full.id(), SeatCount::ride_total(2).unwrap()).await.unwrap());

    // Case-insensitive substring match on both ends, soonest departure first,
    // and full rides are not offered.
    let found = search_rides(&mut ex, "HOSTEL H", "city").await.unwrap();
    assert_eq!(
        vec![early.id(), late.id()],
        found.iter().map(Ride::id).collect::<Vec<RideId>>()
    );

    let found = search_rides(&mut ex, "hostel", "airport").await.unwrap();
    assert_eq!(vec![other.id()], found.iter().map(Ride::id).collect::<Vec<RideId>>());

    assert!(search_rides(&mut ex, "nowhere", "city").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_count_rides_by_driver() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let driver = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;
    let other = create_campus_user(&mut ex, "Evan", "evan@example.edu").await;

    assert_eq!(0, count_rides_by_driver(&mut ex, driver.id()).await.unwrap());
    create_simple_ride(&mut ex, driver.id(), 4).await;
    create_simple_ride(&mut ex, driver.id(), 2).await;
    assert_eq!(2, count_rides_by_driver(&mut ex, driver.id()).await.unwrap());
    assert_eq!(0, count_rides_by_driver(&mut ex, other.id()).await.unwrap());
}

#[tokio::test]
async fn test_take_ride_seats_is_guarded() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let driver = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;
    let ride = create_simple_ride(&mut ex, driver.id(), 2).await;

    let one = SeatCount::per_booking(1).unwrap();
    let two = SeatCount::per_booking(2).unwrap();

    assert!(take_ride_seats(&mut ex, ride.id(), one).await.unwrap());
    assert_eq!(1, get_ride(&mut ex, ride.id()).await.unwrap().seats_left());

    // Insufficient capacity leaves the counter untouched.
    assert!(!take_ride_seats(&mut ex, ride.id(), two).await.unwrap());
    assert_eq!(1, get_ride(&mut ex, ride.id()).await.unwrap().seats_left());

    assert!(take_ride_seats(&mut ex, ride.id(), one).await.unwrap());
    assert_eq!(0, get_ride(&mut ex, ride.id()).await.unwrap().seats_left());
    assert!(!take_ride_seats(&mut ex, ride.id(), one).await.unwrap());
}

#[tokio::test]
async fn test_restore_ride_seats() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let driver = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;
    let ride = create_simple_ride(&mut ex, driver.id(), 3).await;

    let two = SeatCount::per_booking(2).unwrap();
    assert!(take_ride_seats(&mut ex, ride.id(), two).await.unwrap());
    restore_ride_seats(&mut ex, ride.id(), two).await.unwrap();
    assert_eq!(3, get_ride(&mut ex, ride.id()).await.unwrap().seats_left());

    assert_eq!(
        DbError::NotFound,
        restore_ride_seats(&mut ex, RideId::new(123), two).await.unwrap_err()
    );
}

#[tokio::test]
async fn test_bookings_create_get_cancel() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let driver = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;
    let rider = create_campus_user(&mut ex, "Evan", "evan@example.edu").await;
    let ride = create_simple_ride(&mut ex, driver.id(), 4).await;

    let seats = SeatCount::per_booking(2).unwrap();
    let booking = create_booking(
        &mut ex,
        ride.id(),
        rider.id(),
        seats,
        datetime!(2025-03-11 10:00:00 UTC),
    )
    .await
    .unwrap();
    assert_eq!(BookingStatus::Confirmed, booking.status());
    assert_eq!(None, booking.cancelled_at());
    assert_eq!(booking, get_booking(&mut ex, booking.id()).await.unwrap());

    let cancelled_at = datetime!(2025-03-11 11:00:00 UTC);
    mark_booking_cancelled(&mut ex, booking.id(), cancelled_at).await.unwrap();
    let cancelled = get_booking(&mut ex, booking.id()).await.unwrap();
    assert_eq!(BookingStatus::Cancelled, cancelled.status());
    assert_eq!(Some(cancelled_at), cancelled.cancelled_at());

    assert_eq!(
        DbError::NotFound,
        get_booking(&mut ex, BookingId::new(123)).await.unwrap_err()
    );
    assert_eq!(
        DbError::NotFound,
        mark_booking_cancelled(&mut ex, BookingId::new(123), cancelled_at).await.unwrap_err()
    );
}

#[tokio::test]
async fn test_list_bookings_by_rider() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let driver = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;
    let rider = create_campus_user(&mut ex, "Evan", "evan@example.edu").await;
    let ride = create_simple_ride(&mut ex, driver.id(), 4).await;

    let one = SeatCount::per_booking(1).unwrap();
    let first =
        create_booking(&mut ex, ride.id(), rider.id(), one, datetime!(2025-03-11 10:00:00 UTC))
            .await
            .unwrap();
    let second =
        create_booking(&mut ex, ride.id(), rider.id(), one, datetime!(2025-03-11 11:00:00 UTC))
            .await
            .unwrap();
    mark_booking_cancelled(&mut ex, first.id(), datetime!(2025-03-11 12:00:00 UTC))
        .await
        .unwrap();

    // All bookings, newest first, joined with their ride.
    let all = list_bookings_by_rider(&mut ex, rider.id()).await.unwrap();
    assert_eq!(2, all.len());
    assert_eq!(second.id(), all[0].0.id());
    assert_eq!(first.id(), all[1].0.id());
    assert_eq!(BookingStatus::Cancelled, all[1].0.status());
    assert_eq!(ride.id(), all[0].1.id());
    assert_eq!("Hostel H", all[0].1.from_text().as_str());

    let confirmed = list_confirmed_bookings_by_rider(&mut ex, rider.id()).await.unwrap();
    assert_eq!(1, confirmed.len());
    assert_eq!(second.id(), confirmed[0].0.id());

    assert!(list_bookings_by_rider(&mut ex, driver.id()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_has_and_count_confirmed_bookings() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let driver = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;
    let rider = create_campus_user(&mut ex, "Evan", "evan@example.edu").await;
    let ride = create_simple_ride(&mut ex, driver.id(), 4).await;

    assert!(!has_confirmed_booking(&mut ex, ride.id(), rider.id()).await.unwrap());
    assert_eq!(0, count_confirmed_bookings_by_rider(&mut ex, rider.id()).await.unwrap());

    let one = SeatCount::per_booking(1).unwrap();
    let booking =
        create_booking(&mut ex, ride.id(), rider.id(), one, datetime!(2025-03-11 10:00:00 UTC))
            .await
            .unwrap();
    assert!(has_confirmed_booking(&mut ex, ride.id(), rider.id()).await.unwrap());
    assert!(!has_confirmed_booking(&mut ex, ride.id(), driver.id()).await.unwrap());
    assert_eq!(1, count_confirmed_bookings_by_rider(&mut ex, rider.id()).await.unwrap());

    mark_booking_cancelled(&mut ex, booking.id(), datetime!(2025-03-11 11:00:00 UTC))
        .await
        .unwrap();
    assert!(!has_confirmed_booking(&mut ex, ride.id(), rider.id()).await.unwrap());
    assert_eq!(0, count_confirmed_bookings_by_rider(&mut ex, rider.id()).await.unwrap());
}

#[tokio::test]
async fn test_notifications_lifecycle() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let user = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;

    create_notification(
        &mut ex,
        user.id(),
        "Welcome to PoolRide",
        "You're all set.",
        datetime!(2025-03-01 08:00:00 UTC),
    )
    .await
    .unwrap();
    create_notification(
        &mut ex,
        user.id(),
        "Ride Posted",
        "Your ride is now visible for bookings.",
        datetime!(2025-03-01 09:00:00 UTC),
    )
    .await
    .unwrap();

    let notifications = list_notifications(&mut ex, user.id()).await.unwrap();
    assert_eq!(2, notifications.len());
    assert_eq!("Ride Posted", notifications[0].title().as_str());
    assert_eq!("Welcome to PoolRide", notifications[1].title().as_str());
    assert!(notifications.iter().all(|n| !n.is_read()));

    mark_notification_read(&mut ex, *notifications[0].id()).await.unwrap();
    let notifications = list_notifications(&mut ex, user.id()).await.unwrap();
    assert!(*notifications[0].is_read());
    assert!(!*notifications[1].is_read());

    assert_eq!(
        DbError::NotFound,
        mark_notification_read(&mut ex, NotificationId::new(123)).await.unwrap_err()
    );
}

#[tokio::test]
async fn test_ratings_summary() {
    let db = setup().await;
    let mut ex = db.ex().await.unwrap();

    let driver = create_campus_user(&mut ex, "Dana", "dana@example.edu").await;
    let rider = create_campus_user(&mut ex, "Evan", "evan@example.edu").await;
    let ride = create_simple_ride(&mut ex, driver.id(), 4).await;

    assert_eq!((0.0, 0), rating_summary(&mut ex, driver.id()).await.unwrap());

    create_rating(
        &mut ex,
        ride.id(),
        rider.id(),
        driver.id(),
        Stars::new(5).unwrap(),
        Some(&RatingComment::new("great").unwrap()),
        datetime!(2025-03-13 08:00:00 UTC),
    )
    .await
    .unwrap();
    create_rating(
        &mut ex,
        ride.id(),
        rider.id(),
        driver.id(),
        Stars::new(4).unwrap(),
        None,
        datetime!(2025-03-13 09:00:00 UTC),
    )
    .await
    .unwrap();

    // Repeat ratings by the same rider are not deduplicated.
    assert_eq!((4.5, 2), rating_summary(&mut ex, driver.id()).await.unwrap());
    assert_eq!((0.0, 0), rating_summary(&mut ex, rider.id()).await.unwrap());
}
