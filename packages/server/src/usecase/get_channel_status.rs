//! UseCase: チャンネル接続状態の取得

use std::{collections::BTreeMap, sync::Arc};

use crate::domain::{ChannelName, ChannelStatus, ConnectionRegistry};

/// チャンネル接続状態取得のユースケース
pub struct GetChannelStatusUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetChannelStatusUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// チャンネル名順の接続状態
    pub async fn execute(&self) -> BTreeMap<ChannelName, ChannelStatus> {
        self.registry.snapshot().await
    }
}
