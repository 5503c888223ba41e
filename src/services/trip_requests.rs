use chrono::Utc;
use sqlx::{query, query_as, SqliteConnection};
use tracing::{debug, info};

use crate::{
    error::AppError,
    models::trip_request::{TripRequest, TripRequestStatus},
};

/// Records that `user_id` wants to join `trip_id`. New requests are always pending.
pub async fn create_trip_request(
    conn: &mut SqliteConnection,
    user_id: i64,
    trip_id: i64,
) -> Result<TripRequest, AppError> {
    let request = query_as::<_, TripRequest>(
        "INSERT INTO trip_requests (user_id, trip_id, status, created_at)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING *",
    )
    .bind(user_id)
    .bind(trip_id)
    .bind(TripRequestStatus::Pending)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    info!("user {user_id} requested to join trip {trip_id}");
    Ok(request)
}

pub async fn get_trip_request(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<TripRequest>, AppError> {
    let request = query_as::<_, TripRequest>("SELECT * FROM trip_requests WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(request)
}

pub async fn list_trip_requests(
    conn: &mut SqliteConnection,
    skip: u32,
    limit: u32,
) -> Result<Vec<TripRequest>, AppError> {
    let requests =
        query_as::<_, TripRequest>("SELECT * FROM trip_requests ORDER BY id LIMIT ?1 OFFSET ?2")
            .bind(i64::from(limit))
            .bind(i64::from(skip))
            .fetch_all(&mut *conn)
            .await?;
    Ok(requests)
}

pub async fn list_requests_for_trip(
    conn: &mut SqliteConnection,
    trip_id: i64,
) -> Result<Vec<TripRequest>, AppError> {
    let requests =
        query_as::<_, TripRequest>("SELECT * FROM trip_requests WHERE trip_id = ?1 ORDER BY id")
            .bind(trip_id)
            .fetch_all(&mut *conn)
            .await?;
    Ok(requests)
}

pub async fn list_requests_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<TripRequest>, AppError> {
    let requests =
        query_as::<_, TripRequest>("SELECT * FROM trip_requests WHERE user_id = ?1 ORDER BY id")
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?;
    Ok(requests)
}

// No transition table: accepted -> pending is as valid as pending -> accepted.
pub async fn update_status(
    conn: &mut SqliteConnection,
    id: i64,
    status: TripRequestStatus,
) -> Result<Option<TripRequest>, AppError> {
    let request = query_as::<_, TripRequest>(
        "UPDATE trip_requests SET status = ?1 WHERE id = ?2 RETURNING *",
    )
    .bind(status)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    if request.is_some() {
        debug!("trip request {id} is now {status}");
    }
    Ok(request)
}

pub async fn delete_trip_request(conn: &mut SqliteConnection, id: i64) -> Result<bool, AppError> {
    let result = query("DELETE FROM trip_requests WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::scratch_db;
    use crate::models::{trip::NewTrip, user::NewUser};
    use crate::services::{trips, users};
    use tempfile::TempDir;

    struct Fixture {
        owner: i64,
        guest: i64,
        trip: i64,
    }

    async fn fixture(conn: &mut SqliteConnection) -> Fixture {
        let owner = users::create_user(&mut *conn, NewUser::new("Ana", "a@x.com"))
            .await
            .unwrap();
        let guest = users::create_user(&mut *conn, NewUser::new("Bea", "b@x.com"))
            .await
            .unwrap();
        let trip = trips::create_trip(&mut *conn, NewTrip::new("Lisbon", owner.id))
            .await
            .unwrap();
        Fixture {
            owner: owner.id,
            guest: guest.id,
            trip: trip.id,
        }
    }

    #[tokio::test]
    async fn test_new_request_is_pending() {
        let dir = TempDir::new().unwrap();
        let db = scratch_db(&dir).await;
        let mut session = db.session().await.unwrap();
        let f = fixture(&mut session).await;

        let request = create_trip_request(&mut session, f.guest, f.trip)
            .await
            .unwrap();
        assert!(request.id > 0);
        assert_eq!(request.status, TripRequestStatus::Pending);
        assert_eq!(request.user_id, f.guest);
        assert_eq!(request.trip_id, f.trip);
        assert_eq!(
            get_trip_request(&mut session, request.id).await.unwrap(),
            Some(request)
        );
    }

    #[tokio::test]
    async fn test_status_moves_both_ways() {
        let dir = TempDir::new().unwrap();
        let db = scratch_db(&dir).await;
        let mut session = db.session().await.unwrap();
        let f = fixture(&mut session).await;
        let request = create_trip_request(&mut session, f.guest, f.trip)
            .await
            .unwrap();

        let accepted = update_status(&mut session, request.id, TripRequestStatus::Accepted)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(accepted.status, TripRequestStatus::Accepted);
        assert_eq!(accepted.created_at, request.created_at);

        let pending = update_status(&mut session, request.id, TripRequestStatus::Pending)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pending.status, TripRequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_missing_request_is_none() {
        let dir = TempDir::new().unwrap();
        let db = scratch_db(&dir).await;
        let mut session = db.session().await.unwrap();

        assert!(get_trip_request(&mut session, 1).await.unwrap().is_none());
        assert!(update_status(&mut session, 1, TripRequestStatus::Rejected)
            .await
            .unwrap()
            .is_none());
        assert!(!delete_trip_request(&mut session, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_request_for_unknown_trip_is_foreign_key_violation() {
        let dir = TempDir::new().unwrap();
        let db = scratch_db(&dir).await;
        let mut session = db.session().await.unwrap();
        let f = fixture(&mut session).await;

        let err = create_trip_request(&mut session, f.guest, f.trip + 100)
            .await
            .unwrap_err();
        assert!(err.is_foreign_key_violation(), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_scoped_listings_ignore_status() {
        let dir = TempDir::new().unwrap();
        let db = scratch_db(&dir).await;
        let mut session = db.session().await.unwrap();
        let f = fixture(&mut session).await;
        let other_trip = trips::create_trip(&mut session, NewTrip::new("Oslo", f.guest))
            .await
            .unwrap();

        let first = create_trip_request(&mut session, f.guest, f.trip)
            .await
            .unwrap();
        let second = create_trip_request(&mut session, f.owner, other_trip.id)
            .await
            .unwrap();
        let third = create_trip_request(&mut session, f.guest, other_trip.id)
            .await
            .unwrap();
        update_status(&mut session, first.id, TripRequestStatus::Cancelled)
            .await
            .unwrap();

        let for_trip: Vec<i64> = list_requests_for_trip(&mut session, other_trip.id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(for_trip, vec![second.id, third.id]);

        let for_guest: Vec<i64> = list_requests_for_user(&mut session, f.guest)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(for_guest, vec![first.id, third.id]);

        assert_eq!(list_trip_requests(&mut session, 1, 10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_request_leaves_user_and_trip() {
        let dir = TempDir::new().unwrap();
        let db = scratch_db(&dir).await;
        let mut session = db.session().await.unwrap();
        let f = fixture(&mut session).await;
        let request = create_trip_request(&mut session, f.guest, f.trip)
            .await
            .unwrap();

        assert!(delete_trip_request(&mut session, request.id).await.unwrap());
        assert!(users::get_user(&mut session, f.guest).await.unwrap().is_some());
        assert!(trips::get_trip(&mut session, f.trip).await.unwrap().is_some());
    }
}
