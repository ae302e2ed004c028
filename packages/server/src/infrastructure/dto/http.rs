//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Liveness of one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatusDto {
    pub channel: String,
    pub connected: bool,
    /// `YYYY-MM-DD HH:MM:SS`, absent while disconnected
    pub connected_since: Option<String>,
}
