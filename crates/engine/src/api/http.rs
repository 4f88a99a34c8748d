//! HTTP routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use ordercast_protocol::{
    ConnectionStatsData, GroupDeliveryData, GroupStatsData, PublishRequest, PublishResponse,
};

use crate::app::App;
use crate::use_cases::notification::{GatewayError, PublishReport};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/events", post(publish_event))
        .route("/api/connections", get(connection_stats))
        .fallback(not_found)
}

async fn health() -> &'static str {
    "OK"
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

// =============================================================================
// Events
// =============================================================================

/// Publish an order event on behalf of a backend producer.
async fn publish_event(
    State(app): State<Arc<App>>,
    Json(request): Json<PublishRequest>,
) -> Result<(StatusCode, Json<PublishResponse>), ApiError> {
    let report = app
        .use_cases
        .notification
        .gateway
        .publish_named(&request.kind, request.payload)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(to_publish_response(report))))
}

fn to_publish_response(report: PublishReport) -> PublishResponse {
    PublishResponse {
        kind: report.kind,
        attempted: report.attempted(),
        succeeded: report.succeeded(),
        groups: report
            .deliveries
            .into_iter()
            .map(|d| GroupDeliveryData {
                group: d.group,
                attempted: d.attempted,
                succeeded: d.succeeded,
            })
            .collect(),
    }
}

// =============================================================================
// Connections
// =============================================================================

async fn connection_stats(State(app): State<Arc<App>>) -> Json<ConnectionStatsData> {
    let stats = app.connections.stats().await;
    Json(ConnectionStatsData {
        total: stats.total,
        authenticated: stats.authenticated,
        unauthenticated: stats.unauthenticated,
        groups: stats
            .groups
            .into_iter()
            .map(|g| GroupStatsData {
                name: g.name,
                members: g.members,
            })
            .collect(),
    })
}

// =============================================================================
// Error Handling
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
