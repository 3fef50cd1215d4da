use std::net::SocketAddr;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;
use crate::{auth, employers, jobs, ratelimit, seekers};

pub fn build_app(state: AppState) -> Router {
    let api = Router::new()
        .nest(
            "/auth",
            auth::router().layer(middleware::from_fn_with_state(
                state.clone(),
                ratelimit::auth_limit,
            )),
        )
        .nest(
            "/jobs",
            jobs::router().layer(middleware::from_fn_with_state(
                state.clone(),
                ratelimit::jobs_limit,
            )),
        )
        .nest("/profile", seekers::router().merge(employers::router()))
        .route("/health-check", get(health_check));

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            ratelimit::global_limit,
        ))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

async fn health_check() -> Envelope<()> {
    Envelope::message("server is up and running")
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".into())
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRef;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use time::OffsetDateTime;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::jwt::JwtKeys;
    use crate::auth::repo::{Role, User};
    use crate::config::{RateLimitConfig, WindowConfig};
    use crate::ratelimit::RateLimits;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn session_token(state: &AppState, role: Role, verified: bool) -> String {
        let user = User {
            id: Uuid::new_v4(),
            email: "user@example.com".into(),
            password_hash: String::new(),
            first_name: "Test".into(),
            last_name: "User".into(),
            role,
            is_verified: verified,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        JwtKeys::from_ref(state).sign_session(&user).unwrap()
    }

    #[tokio::test]
    async fn health_check_reports_success() {
        let app = build_app(AppState::fake());
        let response = app
            .oneshot(Request::get("/api/health-check").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
    }

    #[tokio::test]
    async fn unknown_route_falls_back_to_not_found_envelope() {
        let app = build_app(AppState::fake());
        let response = app
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Not Found");
    }

    #[tokio::test]
    async fn protected_route_requires_authorization_header() {
        let app = build_app(AppState::fake());
        let response = app
            .oneshot(
                Request::get("/api/profile/seeker-profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "missing authorization header");
    }

    #[tokio::test]
    async fn malformed_authorization_header_is_rejected() {
        let app = build_app(AppState::fake());
        let response = app
            .oneshot(
                Request::get("/api/profile/seeker-profile")
                    .header(header::AUTHORIZATION, "Token abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "invalid authorization header");
    }

    #[tokio::test]
    async fn seeker_token_cannot_reach_employer_routes() {
        let state = AppState::fake();
        let token = session_token(&state, Role::Seeker, true);
        let app = build_app(state);
        let response = app
            .oneshot(
                Request::get("/api/profile/employer-profile")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(
            json["message"],
            "you do not have permission to access this resource"
        );
    }

    #[tokio::test]
    async fn unverified_employer_cannot_post_jobs() {
        let state = AppState::fake();
        let token = session_token(&state, Role::Employer, false);
        let app = build_app(state);
        let response = app
            .oneshot(
                Request::post("/api/jobs")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(json["message"], "account not verified");
    }

    #[tokio::test]
    async fn global_limit_returns_429_with_retry_after() {
        let mut state = AppState::fake();
        let tight = WindowConfig { window_secs: 60, max_requests: 2 };
        let loose = WindowConfig { window_secs: 60, max_requests: 1000 };
        state.limits = std::sync::Arc::new(RateLimits::new(&RateLimitConfig {
            global: tight,
            auth: loose,
            jobs: loose,
        }));
        let app = build_app(state);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(Request::get("/api/health-check").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = app
            .oneshot(Request::get("/api/health-check").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
        let json = body_json(response).await;
        assert_eq!(
            json["message"],
            "Too many requests from this IP, please try again later."
        );
    }
}
