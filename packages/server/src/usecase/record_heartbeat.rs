//! UseCase: heartbeat 記録

use std::sync::Arc;

use donation_relay_shared::time::Clock;

use crate::domain::{ChannelName, ConnectionId, ConnectionRegistry};

/// heartbeat 記録のユースケース
pub struct RecordHeartbeatUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl RecordHeartbeatUseCase {
    /// 新しい RecordHeartbeatUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// 接続をチャンネルに紐づける。チャンネルが新たに接続状態になったら `true`
    pub async fn execute(&self, connection_id: &ConnectionId, channel: ChannelName) -> bool {
        let now = self.clock.now_local();
        let connected = self
            .registry
            .record_heartbeat(connection_id, channel.clone(), now)
            .await;
        if connected {
            tracing::info!("Channel '{}' connected", channel);
        }
        connected
    }
}
