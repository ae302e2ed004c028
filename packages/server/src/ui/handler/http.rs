//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::header, response::IntoResponse};

use crate::{
    infrastructure::dto::{http::ChannelStatusDto, snapshot::DonationRecord},
    ui::state::AppState,
};

/// Body returned by the reset endpoint
pub const RESET_CONFIRMATION: &str = "Donations reset.";

/// Manual reset: clear the ledger and tell every connection to reset.
///
/// Always answers 200, whether or not there was anything to clear.
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let report = state.reset_donations_usecase.execute().await;
    tracing::info!(
        "Manual reset done (snapshot removed: {}, notified: {})",
        report.cleared.snapshot_removed,
        report.notified
    );

    (
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        RESET_CONFIRMATION,
    )
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Per-channel liveness, sorted by channel name
pub async fn get_channels(State(state): State<Arc<AppState>>) -> Json<Vec<ChannelStatusDto>> {
    let snapshot = state.get_channel_status_usecase.execute().await;

    // Domain Model から DTO への変換
    let channels = snapshot.iter().map(ChannelStatusDto::from).collect();
    Json(channels)
}

/// Current ledger in snapshot format
pub async fn get_donations(State(state): State<Arc<AppState>>) -> Json<Vec<DonationRecord>> {
    let donations = state.list_donations_usecase.execute().await;
    Json(donations.iter().map(DonationRecord::from).collect())
}
