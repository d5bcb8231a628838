use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use crate::config::SubmitConfig;
use crate::error::Result;
use crate::monitor::Monitor;
use crate::snapshot::view::worker_views;
use crate::snapshot::{JobView, SnapshotView, WorkerView};

#[derive(Clone)]
pub struct DashboardState {
    pub monitor: Arc<Monitor>,
    pub submit_defaults: SubmitConfig,
}

#[derive(Deserialize)]
struct RecentQuery {
    recent: Option<usize>,
}

#[derive(Serialize)]
struct JobsResponse {
    jobs: Vec<JobView>,
    #[serde(rename = "errorMessage")]
    error_message: String,
}

#[derive(Serialize)]
struct WorkersResponse {
    workers: Vec<WorkerView>,
    #[serde(rename = "errorMessage")]
    error_message: String,
}

#[derive(Deserialize)]
struct SubmitRequest {
    quantity: Option<u32>,
    interval: Option<f64>,
}

#[derive(Serialize)]
struct SubmitResponse {
    accepted: bool,
    quantity: u32,
    interval: f64,
}

#[derive(Serialize, Deserialize)]
struct ApiServerBody {
    address: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// JSON routes over a running [`Monitor`].
pub fn router(state: DashboardState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/snapshot", get(snapshot_handler))
        .route("/api/jobs", get(list_jobs_handler))
        .route("/api/workers", get(list_workers_handler))
        .route("/api/submissions", post(submit_handler))
        .route(
            "/api/apiserver",
            get(get_api_server_handler).put(set_api_server_handler),
        )
        .layer(cors)
        .with_state(state)
}

/// Serve the dashboard until `token` is cancelled.
pub async fn run_dashboard(
    addr: SocketAddr,
    state: DashboardState,
    token: CancellationToken,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!(addr = %addr, error = %e, "Failed to bind dashboard server");
        e
    })?;

    tracing::info!(addr = %addr, "Starting dashboard server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(token.cancelled_owned())
        .await?;

    tracing::info!("Dashboard server stopped");
    Ok(())
}

async fn snapshot_handler(
    State(state): State<DashboardState>,
    Query(query): Query<RecentQuery>,
) -> impl IntoResponse {
    let snapshot = state.monitor.snapshot();
    Json(SnapshotView::new(&snapshot, query.recent))
}

async fn list_jobs_handler(State(state): State<DashboardState>) -> impl IntoResponse {
    let snapshot = state.monitor.snapshot();
    Json(JobsResponse {
        jobs: snapshot.all_jobs().map(JobView::from).collect(),
        error_message: snapshot.error_message().to_string(),
    })
}

async fn list_workers_handler(
    State(state): State<DashboardState>,
    Query(query): Query<RecentQuery>,
) -> impl IntoResponse {
    let snapshot = state.monitor.snapshot();
    Json(WorkersResponse {
        workers: worker_views(&snapshot, query.recent),
        error_message: snapshot.error_message().to_string(),
    })
}

async fn submit_handler(
    State(state): State<DashboardState>,
    Json(payload): Json<SubmitRequest>,
) -> impl IntoResponse {
    let quantity = payload.quantity.unwrap_or(state.submit_defaults.quantity);
    let interval = payload
        .interval
        .unwrap_or(state.submit_defaults.interval_secs);

    // The run continues in the background; its handle is not needed here.
    let _handle = state.monitor.submit(quantity, interval).await;

    (
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            accepted: true,
            quantity,
            interval,
        }),
    )
}

async fn get_api_server_handler(State(state): State<DashboardState>) -> impl IntoResponse {
    Json(ApiServerBody {
        address: state.monitor.api_server(),
    })
}

async fn set_api_server_handler(
    State(state): State<DashboardState>,
    Json(payload): Json<ApiServerBody>,
) -> axum::response::Response {
    let address = payload.address.trim().to_string();
    if address.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "address must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    state.monitor.set_api_server(address.clone());
    (StatusCode::OK, Json(ApiServerBody { address })).into_response()
}
