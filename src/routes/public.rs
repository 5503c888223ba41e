use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{error::AppError, services::users, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/test-db", get(test_db))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Serialize)]
struct UserCountResponse {
    user_count: i64,
}

async fn test_db(State(state): State<AppState>) -> Result<Json<UserCountResponse>, AppError> {
    let mut session = state.db.session().await?;
    let user_count = users::count_users(&mut session).await?;
    Ok(Json(UserCountResponse { user_count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, db::scratch_db, models::user::NewUser, routes::create_router};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::net::SocketAddr;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn app_state(dir: &TempDir) -> AppState {
        let db = scratch_db(dir).await;
        let config = AppConfig {
            database_url: "sqlite::memory:".into(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            max_connections: 2,
        };
        AppState::new(config, db)
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let app = create_router(app_state(&dir).await);
        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_db_reports_user_count() {
        let dir = TempDir::new().unwrap();
        let state = app_state(&dir).await;
        {
            let mut session = state.db.session().await.unwrap();
            users::create_user(&mut session, NewUser::new("Ana", "ana@example.com"))
                .await
                .unwrap();
            users::create_user(&mut session, NewUser::new("Bea", "bea@example.com"))
                .await
                .unwrap();
        }

        let (status, body) = get_json(create_router(state), "/api/test-db").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "user_count": 2 }));
    }
}
