//! UseCase: クライアント切断処理
//!
//! 切断時、接続がチャンネルに紐づいていればそのチャンネルは未接続になる。

use std::sync::Arc;

use crate::domain::{ChannelName, ConnectionId, ConnectionRegistry, MessagePusher};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 切断を実行し、未接続になったチャンネルがあれば返す
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<ChannelName> {
        let channel = self.registry.unregister(connection_id).await;
        self.message_pusher.unregister_client(connection_id).await;
        channel
    }

    /// 残りの接続数を取得
    pub async fn count_remaining_connections(&self) -> usize {
        self.registry.count_connections().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryConnectionRegistry,
        },
        usecase::ConnectClientUseCase,
    };
    use chrono::NaiveDate;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_disconnect_marks_bound_channel_closed() {
        // テスト項目: 切断すると紐づいていたチャンネルが未接続になる
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let connect = ConnectClientUseCase::new(registry.clone(), pusher.clone());
        let usecase = DisconnectClientUseCase::new(registry.clone(), pusher.clone());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = connect.execute(tx).await;
        let now = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        registry
            .record_heartbeat(&id, ChannelName::new("Studio"), now)
            .await;

        // when (操作):
        let channel = usecase.execute(&id).await;

        // then (期待する結果):
        assert_eq!(channel, Some(ChannelName::new("Studio")));
        assert_eq!(usecase.count_remaining_connections().await, 0);
        assert!(!registry.snapshot().await[&ChannelName::new("Studio")].connected);
        assert_eq!(pusher.broadcast(vec![id], "reset").await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_unbound_connection() {
        // テスト項目: チャンネル未登録の接続の切断
        let registry = Arc::new(InMemoryConnectionRegistry::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let connect = ConnectClientUseCase::new(registry.clone(), pusher.clone());
        let usecase = DisconnectClientUseCase::new(registry.clone(), pusher);
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = connect.execute(tx).await;

        let channel = usecase.execute(&id).await;

        assert_eq!(channel, None);
        assert!(registry.snapshot().await.is_empty());
    }
}
