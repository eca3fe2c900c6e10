//! HTTP API: request/response shapes and handlers.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use autovia_core::Error;
use autovia_core::routing::route_with_cancel;

use crate::state::AppState;

/// Budget for a single route computation; searches still running when it
/// expires are cancelled through the engine's cancellation flag.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_router(state: AppState, web_dir: Option<PathBuf>) -> Router {
    // CORS (relaxed for local dev)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/route", post(route_handler));

    // Front-end map UI, when one is configured
    if let Some(dir) = web_dir {
        router = router
            .route("/", get(|| async { Redirect::permanent("/web/") }))
            .nest_service("/web", ServeDir::new(dir).append_index_html_on_directories(true));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "autovia" }))
}

/// Route request body; coordinate pairs are `(lat, lon)`.
#[derive(Debug, Deserialize)]
struct RouteRequest {
    start: (f64, f64),
    end: (f64, f64),
}

#[derive(Debug, Serialize)]
struct RouteResponse {
    distance_m: f64,
    duration_s: f64,
    geojson: geojson::Feature,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

async fn route_handler(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Response {
    let network = Arc::clone(&state.network);
    let start = Point::new(request.start.1, request.start.0);
    let end = Point::new(request.end.1, request.end.0);

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let task = tokio::task::spawn_blocking(move || {
        route_with_cancel(&network, start, end, Some(flag.as_ref()))
    });

    let result = match tokio::time::timeout(REQUEST_TIMEOUT, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => {
            tracing::error!("routing task failed: {join_error}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "routing task failed".to_string(),
            );
        }
        Err(_) => {
            cancel.store(true, Ordering::Relaxed);
            return error_response(
                StatusCode::GATEWAY_TIMEOUT,
                "timeout",
                format!("routing exceeded {}s", REQUEST_TIMEOUT.as_secs()),
            );
        }
    };

    match result {
        Ok(route) => (
            StatusCode::OK,
            Json(RouteResponse {
                distance_m: round1(route.distance),
                duration_s: round1(route.duration),
                geojson: route.to_geojson(),
            }),
        )
            .into_response(),
        Err(error) => {
            tracing::warn!(kind = error.kind(), "routing failed: {error}");
            error_response(status_for(&error), error.kind(), error.to_string())
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::NoPath { .. } => StatusCode::NOT_FOUND,
        Error::OutOfRegion(_, _) | Error::Projection(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, error: &'static str, message: String) -> Response {
    (status, Json(ErrorResponse { error, message })).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use tower::util::ServiceExt;

    use autovia_core::loading::{RawEdge, RawNode, build_road_network};
    use autovia_core::weights::SpeedDefaults;

    use super::*;

    fn test_state() -> AppState {
        let nodes = vec![
            RawNode { id: 1, lon: -0.1180, lat: 51.5090 },
            RawNode { id: 2, lon: -0.1170, lat: 51.5095 },
            RawNode { id: 3, lon: -0.1160, lat: 51.5100 },
        ];
        let edges = vec![
            RawEdge::new(1, 2, 100.0).with_speed(36.0),
            RawEdge::new(2, 3, 200.0).with_speed(36.0),
        ];
        let network = build_road_network(nodes, edges, &SpeedDefaults::default()).unwrap();
        AppState {
            network: Arc::new(network),
        }
    }

    fn post_route(body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/route")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let router = build_router(test_state(), None);
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn route_endpoint_returns_metrics_and_geometry() {
        let router = build_router(test_state(), None);
        let body = json!({ "start": [51.5090, -0.1180], "end": [51.5100, -0.1160] });

        let response = router.oneshot(post_route(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["distance_m"], 300.0);
        assert_eq!(payload["duration_s"], 30.0);
        assert_eq!(payload["geojson"]["geometry"]["type"], "LineString");
    }

    #[tokio::test]
    async fn out_of_region_maps_to_unprocessable_entity() {
        let router = build_router(test_state(), None);
        let body = json!({ "start": [48.8566, 2.3522], "end": [51.5100, -0.1160] });

        let response = router.oneshot(post_route(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["error"], "out_of_region");
    }
}
