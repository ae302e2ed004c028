//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 各接続の送信キュー（`UnboundedSender`）を管理
//! - 制御メッセージのブロードキャスト
//!
//! WebSocket の生成と書き込みは UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装はキューへの投入だけを行い、接続ごとの失敗は警告ログに留めます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

fn push_one(
    sender: Option<&PusherChannel>,
    target: &ConnectionId,
    content: &str,
) -> Result<(), MessagePushError> {
    let sender = sender.ok_or_else(|| MessagePushError::ClientNotFound(target.to_string()))?;
    sender
        .send(content.to_string())
        .map_err(|e| MessagePushError::PushFailed(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> usize {
        let clients = self.clients.lock().await;

        let mut delivered = 0;
        for target in targets {
            // ブロードキャストでは一部の送信失敗を許容
            match push_one(clients.get(&target), &target, content) {
                Ok(()) => {
                    delivered += 1;
                    tracing::debug!("Broadcasted message to connection '{}'", target);
                }
                Err(e) => {
                    tracing::warn!("Failed to push message to connection '{}': {}", target, e);
                }
            }
        }

        delivered
    }
}
