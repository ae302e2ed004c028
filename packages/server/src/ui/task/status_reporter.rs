//! Periodic channel status log.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use chrono::NaiveDateTime;
use donation_relay_shared::time::{Clock, format_elapsed};
use tokio::task::JoinHandle;

use crate::{
    domain::{ChannelName, ChannelStatus},
    usecase::GetChannelStatusUseCase,
};

/// Logs every channel's liveness at a fixed interval
pub struct ChannelStatusReporter {
    get_channel_status_usecase: Arc<GetChannelStatusUseCase>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl ChannelStatusReporter {
    pub fn new(
        get_channel_status_usecase: Arc<GetChannelStatusUseCase>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            get_channel_status_usecase,
            clock,
            interval,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            let snapshot = self.get_channel_status_usecase.execute().await;
            if let Some(line) = render_status_line(&snapshot, self.clock.now_local()) {
                tracing::info!("Channels: {}", line);
            }
        }
    }
}

fn describe(status: &ChannelStatus, now: NaiveDateTime) -> String {
    match (status.connected, status.connected_since) {
        (true, Some(since)) => format!("Connected, {}", format_elapsed(now - since)),
        (true, None) => "Connected".to_string(),
        (false, _) => "Tab closed".to_string(),
    }
}

/// `None` when no channel has been seen yet
fn render_status_line(
    snapshot: &BTreeMap<ChannelName, ChannelStatus>,
    now: NaiveDateTime,
) -> Option<String> {
    if snapshot.is_empty() {
        return None;
    }
    let parts: Vec<String> = snapshot
        .iter()
        .map(|(channel, status)| format!("{}: {}", channel, describe(status, now)))
        .collect();
    Some(parts.join(" | "))
}
