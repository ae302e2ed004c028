//! InMemory Connection Registry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! `ConnectionTable` を Mutex で保護し、各操作をロックの中で完結させます。

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use crate::domain::{ChannelName, ChannelStatus, ConnectionId, ConnectionRegistry, ConnectionTable};

/// インメモリ Connection Registry 実装
pub struct InMemoryConnectionRegistry {
    table: Arc<Mutex<ConnectionTable>>,
}

impl InMemoryConnectionRegistry {
    /// 新しい InMemoryConnectionRegistry を作成
    pub fn new(table: Arc<Mutex<ConnectionTable>>) -> Self {
        Self { table }
    }
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(ConnectionTable::new())))
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, connection_id: ConnectionId) {
        let mut table = self.table.lock().await;
        table.register(connection_id);
        tracing::debug!("Connection '{}' registered", connection_id);
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<ChannelName> {
        let mut table = self.table.lock().await;
        let channel = table.unregister(connection_id);
        tracing::debug!("Connection '{}' unregistered", connection_id);
        channel
    }

    async fn record_heartbeat(
        &self,
        connection_id: &ConnectionId,
        channel: ChannelName,
        now: NaiveDateTime,
    ) -> bool {
        let mut table = self.table.lock().await;
        table.record_heartbeat(connection_id, channel, now)
    }

    async fn snapshot(&self) -> BTreeMap<ChannelName, ChannelStatus> {
        let table = self.table.lock().await;
        table.snapshot()
    }

    async fn connection_ids(&self) -> Vec<ConnectionId> {
        let table = self.table.lock().await;
        table.connection_ids()
    }

    async fn count_connections(&self) -> usize {
        let table = self.table.lock().await;
        table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryConnectionRegistry の登録・削除・heartbeat 記録
    //
    // 【どのようなシナリオをテストするか】
    // 1. 登録と削除で接続数が増減する
    // 2. heartbeat でチャンネルが接続状態になり、切断で未接続になる
    // 3. 存在しない接続の削除は何も起こさない
    // ========================================

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_and_unregister() {
        // テスト項目: 登録と削除で接続数が増減する
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::default();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();

        // when (操作):
        registry.register(alice).await;
        registry.register(bob).await;

        // then (期待する結果):
        assert_eq!(registry.count_connections().await, 2);

        registry.unregister(&alice).await;
        assert_eq!(registry.count_connections().await, 1);
        assert_eq!(registry.connection_ids().await, vec![bob]);
    }

    #[tokio::test]
    async fn test_heartbeat_then_disconnect_updates_channel_status() {
        // テスト項目: heartbeat → 切断 → heartbeat で状態が遷移する
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::default();
        let conn = ConnectionId::generate();
        registry.register(conn).await;

        // when (操作):
        let connected = registry
            .record_heartbeat(&conn, ChannelName::new("Studio"), now())
            .await;
        let unbound = registry.unregister(&conn).await;

        // then (期待する結果):
        assert!(connected);
        assert_eq!(unbound, Some(ChannelName::new("Studio")));
        let snapshot = registry.snapshot().await;
        assert!(!snapshot[&ChannelName::new("Studio")].connected);
        assert_eq!(snapshot[&ChannelName::new("Studio")].connected_since, None);

        // 新しい接続からの heartbeat で再び接続状態になる
        let next = ConnectionId::generate();
        registry.register(next).await;
        let later = now() + Duration::seconds(90);
        registry
            .record_heartbeat(&next, ChannelName::new("Studio"), later)
            .await;
        let snapshot = registry.snapshot().await;
        assert_eq!(
            snapshot[&ChannelName::new("Studio")],
            ChannelStatus::connected(later)
        );
    }

    #[tokio::test]
    async fn test_unregister_nonexistent_connection() {
        // テスト項目: 存在しない接続を削除しても問題なく処理される（冪等性）
        let registry = InMemoryConnectionRegistry::default();

        let result = registry.unregister(&ConnectionId::generate()).await;

        assert_eq!(result, None);
        assert!(registry.snapshot().await.is_empty());
    }
}
