use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, catalog, dashboard, food_logs, plans, tracking, users, workout_logs};

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(catalog::router())
        .merge(food_logs::router())
        .merge(workout_logs::router())
        .merge(dashboard::router())
        .merge(tracking::router())
        .merge(plans::router())
        .route("/health", get(|| async { "ok" }))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
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
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn call(uri: &str, auth: Option<&str>) -> StatusCode {
        let app = build_app(AppState::fake());
        let mut req = Request::builder().uri(uri);
        if let Some(a) = auth {
            req = req.header("authorization", a);
        }
        app.oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn health_is_open() {
        assert_eq!(call("/api/v1/health", None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        for uri in [
            "/api/v1/foods",
            "/api/v1/food-logs/summary",
            "/api/v1/dashboard/trends?days=3",
            "/api/v1/tracking/water/today",
            "/api/v1/plans",
            "/api/v1/user/me",
        ] {
            assert_eq!(call(uri, None).await, StatusCode::UNAUTHORIZED, "{uri}");
        }
        assert_eq!(
            call("/api/v1/plans", Some("Bearer not-a-jwt")).await,
            StatusCode::UNAUTHORIZED
        );
    }
}
