use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::info;
use vclock_core::CoreResult;

use crate::codec::PackedTime;
use crate::delta::PackedDelta;
use crate::error::ClockError;
use crate::service::ClockService;

type Params = Query<HashMap<String, String>>;

#[derive(Debug, Serialize)]
struct TimeResponse {
    time: PackedTime,
}

#[derive(Debug, Serialize)]
struct StringResponse {
    str: String,
}

#[derive(Clone)]
struct ClockApiState {
    clock: ClockService,
}

/// Helper used to compose the clock REST API router.
#[derive(Clone)]
pub struct ClockApiBuilder {
    state: ClockApiState,
}

impl ClockApiBuilder {
    pub fn new(clock: ClockService) -> Self {
        Self {
            state: ClockApiState { clock },
        }
    }

    /// Routes under `/time`. Methods other than the listed one answer 404.
    pub fn into_router(self) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/time/now", get(now).fallback(not_found))
            .route("/time/string", get(stringify).fallback(not_found))
            .route("/time/add", get(add).fallback(not_found))
            .route("/time/set", post(set).fallback(not_found))
            .route("/time/reset", post(reset).fallback(not_found))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state)
    }

    /// Spawns an HTTP server binding to `bind_address`.
    ///
    /// Bind failures are returned before anything is spawned.
    pub async fn serve(self, bind_address: &str) -> CoreResult<oneshot::Sender<()>> {
        let (tx, rx) = oneshot::channel();
        let listener = tokio::net::TcpListener::bind(bind_address).await?;
        let address = listener.local_addr()?;
        let app = self.into_router();

        tokio::spawn(async move {
            info!(%address, "starting clock service");
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = rx.await;
                })
                .await
                .ok();
        });

        Ok(tx)
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn now(State(state): State<ClockApiState>) -> Json<TimeResponse> {
    Json(TimeResponse {
        time: state.clock.now(),
    })
}

async fn stringify(
    State(state): State<ClockApiState>,
    Query(params): Params,
) -> Result<Json<StringResponse>, ApiError> {
    let time = required_time(&params)?;
    let text = state.clock.stringify(time).map_err(ClockError::from)?;
    Ok(Json(StringResponse { str: text }))
}

async fn add(
    State(state): State<ClockApiState>,
    Query(params): Params,
) -> Result<Json<TimeResponse>, ApiError> {
    let time = number_param(&params, "time").map(PackedTime);
    let delta = number_param(&params, "delta").map(PackedDelta);
    let time = state.clock.add_delta(time, delta)?;
    Ok(Json(TimeResponse { time }))
}

async fn set(State(state): State<ClockApiState>, Query(params): Params) -> Result<StatusCode, ApiError> {
    let time = required_time(&params)?;
    state.clock.set_offset(time).map_err(ClockError::from)?;
    Ok(StatusCode::OK)
}

async fn reset(State(state): State<ClockApiState>) -> StatusCode {
    state.clock.reset_offset();
    StatusCode::OK
}

/// `time` must be present (404 otherwise) and numeric (406 otherwise).
fn required_time(params: &HashMap<String, String>) -> Result<PackedTime, ApiError> {
    if !params.contains_key("time") {
        return Err(ApiError::not_found());
    }
    number_param(params, "time")
        .map(PackedTime)
        .ok_or_else(|| ClockError::MissingField("time").into())
}

fn number_param(params: &HashMap<String, String>, key: &str) -> Option<f64> {
    params.get(key).and_then(|raw| raw.trim().parse::<f64>().ok())
}

#[derive(Debug, Clone)]
struct ApiError {
    status: StatusCode,
    message: Option<String>,
}

impl ApiError {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: None,
        }
    }

    fn not_acceptable(message: Option<String>) -> Self {
        Self {
            status: StatusCode::NOT_ACCEPTABLE,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.message {
            Some(message) => {
                let body = Json(serde_json::json!({ "error": message }));
                (self.status, body).into_response()
            }
            None => self.status.into_response(),
        }
    }
}

impl From<ClockError> for ApiError {
    fn from(err: ClockError) -> Self {
        match err {
            ClockError::MissingField(_) => ApiError::not_acceptable(None),
            other => ApiError::not_acceptable(Some(other.to_string())),
        }
    }
}
