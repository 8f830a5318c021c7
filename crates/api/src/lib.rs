// Event tracker HTTP API
//
// Routes (all under an optional API_PREFIX except health and docs):
// - POST /api/v0/record             direct JSON API
// - POST /api/v0/github             GitHub webhook, dual-HMAC verified
// - POST /api/v0/slack/command      Slack slash command, signature verified
// - POST /api/v0/slack/interaction  Slack form submission, signature verified
//
// Every route funnels into the core EventRecorder; backends arrive through
// AppState so tests can swap in in-memory implementations.

pub mod config;
pub mod github;
pub mod middleware;
pub mod record;
pub mod response;
pub mod slack;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use event_tracker_core::{Event, EventDraft};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub use config::Config;
pub use response::{ApiError, Envelope};
pub use state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(record::record_event),
    components(schemas(Event, EventDraft, Envelope<Event>)),
    tags(
        (name = "events", description = "Event recording endpoints")
    ),
    info(
        title = "Event Tracker API",
        version = "0.1.0",
        description = "Records deployments, incidents, merges and pushes",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router
pub fn build_router(state: AppState, api_prefix: &str) -> Router {
    let github_routes = Router::new()
        .route("/api/v0/github", post(github::webhook))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::verify_github,
        ))
        .layer(DefaultBodyLimit::max(middleware::MAX_BODY_BYTES));

    let slack_routes = Router::new()
        .route("/api/v0/slack/command", post(slack::command))
        .route("/api/v0/slack/interaction", post(slack::interaction))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::verify_slack,
        ))
        .layer(DefaultBodyLimit::max(middleware::MAX_BODY_BYTES));

    let api_routes = Router::new()
        .route("/api/v0/record", post(record::record_event))
        .merge(github_routes)
        .merge(slack_routes)
        .with_state(state);

    Router::new()
        .route("/", get(|| async { StatusCode::OK }))
        .route("/health", get(health))
        .route("/api-doc/openapi.json", get(openapi_json))
        .merge(build_router_with_prefix(api_routes, api_prefix))
        .layer(TraceLayer::new_for_http())
}

/// Nest routes under `api_prefix` when one is configured
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
