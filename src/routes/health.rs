//! Health endpoints
//!
//! The only dependency worth probing is Postgres, so the aggregate check is
//! a single round-trip; liveness answers as long as the process serves
//! requests.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// Aggregate health: one database round-trip decides the verdict
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    let (status_code, status) = if db_ok {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database: if db_ok { "reachable" } else { "unreachable" },
        }),
    )
}

/// Liveness probe: 200 whenever the process is up
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use sqlx::postgres::PgPoolOptions;
    use tower::util::ServiceExt;

    use crate::config::Config;

    fn test_state() -> AppState {
        let config = Config {
            bind_address: "127.0.0.1:0".to_string(),
            database_url: "postgres://unused".to_string(),
            database_max_connections: 1,
            jwt_secret: "test-jwt-secret-at-least-32-characters!!".to_string(),
            totp_issuer: "SecureApp".to_string(),
        };
        // Lazy pool pointing nowhere: the database probe must fail
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(100))
            .connect_lazy("postgres://127.0.0.1:1/unused")
            .unwrap();
        AppState::new(pool, config)
    }

    fn app() -> Router {
        let state = test_state();
        Router::new()
            .route("/health", get(health))
            .route("/health/live", get(liveness))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_liveness_is_always_ok() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_database() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), 503);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["database"], "unreachable");
    }
}
