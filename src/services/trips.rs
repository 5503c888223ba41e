use chrono::Utc;
use sqlx::{query, query_as, QueryBuilder, Sqlite, SqliteConnection};
use tracing::{debug, info};

use crate::{
    error::AppError,
    models::trip::{NewTrip, Trip, TripUpdate},
};

pub async fn create_trip(conn: &mut SqliteConnection, new: NewTrip) -> Result<Trip, AppError> {
    let now = Utc::now();
    let trip = query_as::<_, Trip>(
        "INSERT INTO trips (destination, budget, start_date, end_date, female_allowed, male_count,
             female_count, status, creator_id, itinerary, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
         RETURNING *",
    )
    .bind(&new.destination)
    .bind(new.budget)
    .bind(new.start_date)
    .bind(new.end_date)
    .bind(new.female_allowed)
    .bind(new.male_count)
    .bind(new.female_count)
    .bind(new.status)
    .bind(new.creator_id)
    .bind(&new.itinerary)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    info!("user {} created trip {} to {}", trip.creator_id, trip.id, trip.destination);
    Ok(trip)
}

pub async fn get_trip(conn: &mut SqliteConnection, id: i64) -> Result<Option<Trip>, AppError> {
    let trip = query_as::<_, Trip>("SELECT * FROM trips WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(trip)
}

pub async fn list_trips(
    conn: &mut SqliteConnection,
    skip: u32,
    limit: u32,
) -> Result<Vec<Trip>, AppError> {
    let trips = query_as::<_, Trip>("SELECT * FROM trips ORDER BY id LIMIT ?1 OFFSET ?2")
        .bind(i64::from(limit))
        .bind(i64::from(skip))
        .fetch_all(&mut *conn)
        .await?;
    Ok(trips)
}

pub async fn list_trips_for_creator(
    conn: &mut SqliteConnection,
    creator_id: i64,
) -> Result<Vec<Trip>, AppError> {
    let trips = query_as::<_, Trip>("SELECT * FROM trips WHERE creator_id = ?1 ORDER BY id")
        .bind(creator_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(trips)
}

/// Writes only the fields present in `changes`, in a single statement, and
/// bumps `updated_at`. Columns left out are never touched, so concurrent edits
/// to different fields both stick.
///
/// Status moves are not checked against any lifecycle; a completed trip can be
/// reopened.
pub async fn update_trip(
    conn: &mut SqliteConnection,
    id: i64,
    changes: TripUpdate,
) -> Result<Option<Trip>, AppError> {
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE trips SET ");
    let mut set = builder.separated(", ");
    if let Some(destination) = changes.destination {
        set.push("destination = ").push_bind_unseparated(destination);
    }
    if let Some(budget) = changes.budget {
        set.push("budget = ").push_bind_unseparated(budget);
    }
    if let Some(start_date) = changes.start_date {
        set.push("start_date = ").push_bind_unseparated(start_date);
    }
    if let Some(end_date) = changes.end_date {
        set.push("end_date = ").push_bind_unseparated(end_date);
    }
    if let Some(female_allowed) = changes.female_allowed {
        set.push("female_allowed = ").push_bind_unseparated(female_allowed);
    }
    if let Some(male_count) = changes.male_count {
        set.push("male_count = ").push_bind_unseparated(male_count);
    }
    if let Some(female_count) = changes.female_count {
        set.push("female_count = ").push_bind_unseparated(female_count);
    }
    if let Some(status) = changes.status {
        set.push("status = ").push_bind_unseparated(status);
    }
    if let Some(itinerary) = changes.itinerary {
        set.push("itinerary = ").push_bind_unseparated(itinerary);
    }
    set.push("updated_at = ").push_bind_unseparated(Utc::now());
    builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    let updated = builder
        .build_query_as::<Trip>()
        .fetch_optional(&mut *conn)
        .await?;

    debug!("updated trip {id}");
    Ok(updated)
}

/// Removes the trip and every join request made for it.
pub async fn delete_trip(conn: &mut SqliteConnection, id: i64) -> Result<bool, AppError> {
    let result = query("DELETE FROM trips WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    let removed = result.rows_affected() > 0;
    if removed {
        info!("deleted trip {id}");
    }
    Ok(removed)
}
