use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::Records;
use crate::models::Game;
use crate::pipeline::{self, ScanReport};

/// Run a full scan off the async runtime.
async fn run_scan(state: &AppState) -> Result<ScanReport, ApiError> {
    let data_dir = state.data_dir.clone();
    let stats = state.stats.clone();

    let report = tokio::task::spawn_blocking(move || pipeline::scan(&data_dir, &stats))
        .await
        .map_err(|e| ApiError::Internal(format!("scan task failed: {}", e)))?;

    Ok(report?)
}

/// Every processed game, newest first.
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Vec<Game>>, ApiError> {
    let report = run_scan(&state).await?;
    Ok(Json(report.games))
}

pub async fn get_records(State(state): State<AppState>) -> Result<Json<Records>, ApiError> {
    let report = run_scan(&state).await?;
    Ok(Json(Records::from_games(&report.games)))
}
