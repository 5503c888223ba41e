use chrono::Utc;
use sqlx::{query, query_as, query_scalar, QueryBuilder, Sqlite, SqliteConnection};
use tracing::{debug, info};

use crate::{
    error::AppError,
    models::user::{NewUser, User, UserUpdate},
};

pub async fn create_user(conn: &mut SqliteConnection, new: NewUser) -> Result<User, AppError> {
    let now = Utc::now();
    let user = query_as::<_, User>(
        "INSERT INTO users (name, email, picture, provider, bio, gender, age, location, interests, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
         RETURNING *",
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.picture)
    .bind(&new.provider)
    .bind(&new.bio)
    .bind(&new.gender)
    .bind(new.age)
    .bind(&new.location)
    .bind(&new.interests)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    info!("created user {}", user.id);
    Ok(user)
}

pub async fn get_user(conn: &mut SqliteConnection, id: i64) -> Result<Option<User>, AppError> {
    let user = query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<User>, AppError> {
    let user = query_as::<_, User>("SELECT * FROM users WHERE email = ?1")
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn list_users(
    conn: &mut SqliteConnection,
    skip: u32,
    limit: u32,
) -> Result<Vec<User>, AppError> {
    let users = query_as::<_, User>("SELECT * FROM users ORDER BY id LIMIT ?1 OFFSET ?2")
        .bind(i64::from(limit))
        .bind(i64::from(skip))
        .fetch_all(&mut *conn)
        .await?;
    Ok(users)
}

pub async fn count_users(conn: &mut SqliteConnection) -> Result<i64, AppError> {
    let count: i64 = query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

pub async fn update_user(
    conn: &mut SqliteConnection,
    id: i64,
    changes: UserUpdate,
) -> Result<Option<User>, AppError> {
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE users SET ");
    let mut set = builder.separated(", ");
    if let Some(name) = changes.name {
        set.push("name = ").push_bind_unseparated(name);
    }
    if let Some(email) = changes.email {
        set.push("email = ").push_bind_unseparated(email);
    }
    if let Some(picture) = changes.picture {
        set.push("picture = ").push_bind_unseparated(picture);
    }
    if let Some(provider) = changes.provider {
        set.push("provider = ").push_bind_unseparated(provider);
    }
    if let Some(bio) = changes.bio {
        set.push("bio = ").push_bind_unseparated(bio);
    }
    if let Some(gender) = changes.gender {
        set.push("gender = ").push_bind_unseparated(gender);
    }
    if let Some(age) = changes.age {
        set.push("age = ").push_bind_unseparated(age);
    }
    if let Some(location) = changes.location {
        set.push("location = ").push_bind_unseparated(location);
    }
    if let Some(interests) = changes.interests {
        set.push("interests = ").push_bind_unseparated(interests);
    }
    set.push("updated_at = ").push_bind_unseparated(Utc::now());
    builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    let updated = builder
        .build_query_as::<User>()
        .fetch_optional(&mut *conn)
        .await?;

    debug!("updated user {id}");
    Ok(updated)
}

/// Removes the user together with their trips and join requests.
pub async fn delete_user(conn: &mut SqliteConnection, id: i64) -> Result<bool, AppError> {
    let result = query("DELETE FROM users WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    let removed = result.rows_affected() > 0;
    if removed {
        info!("deleted user {id}");
    }
    Ok(removed)
}
