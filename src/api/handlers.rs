//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{
    error::AppError,
    state::AppState,
    tasks::TimerSnapshot,
};
use super::responses::{AddTimeRequest, ApiResponse, HealthResponse, StartRequest, StatusResponse};

/// Seconds added by the "+1 Minute" button
pub const ADD_MINUTE_SECONDS: i64 = 60;
/// Seconds added by the "+30 Seconds" button
pub const ADD_HALF_MINUTE_SECONDS: i64 = 30;

fn respond(
    result: Result<TimerSnapshot, AppError>,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(timer) => Ok(Json(ApiResponse::from_timer(message.to_string(), timer))),
        Err(e) => {
            error!("Failed to {}: {}", message.to_lowercase(), e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start the countdown from the minute/second fields
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start(&request.minutes, &request.seconds) {
        Ok(timer) => {
            info!("Start endpoint called - countdown running from {}s", timer.remaining_seconds);
            Ok(Json(ApiResponse::from_timer("Countdown started".to_string(), timer)))
        }
        Err(AppError::InvalidInput(e)) => {
            // Invalid input is shown to the user, not treated as a server failure
            match state.snapshot() {
                Ok(timer) => Ok(Json(ApiResponse::error(e.to_string(), timer))),
                Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
            }
        }
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Toggle between paused and running
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond(state.toggle_pause(), "Pause toggled")
}

/// Handle POST /reset - Stop and clear the countdown
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond(state.reset(), "Countdown reset")
}

/// Handle POST /add-minute - Add one minute
pub async fn add_minute_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond(state.add_time(ADD_MINUTE_SECONDS), "Added one minute")
}

/// Handle POST /add-30-seconds - Add thirty seconds
pub async fn add_half_minute_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond(state.add_time(ADD_HALF_MINUTE_SECONDS), "Added thirty seconds")
}

/// Handle POST /add - Add an arbitrary number of seconds
pub async fn add_time_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddTimeRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(state.add_time(request.seconds), "Added time")
}

/// Handle GET /status - Return current timer and clock
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        timer_text: state.timer_text(),
        clock_text: state.clock_text(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
