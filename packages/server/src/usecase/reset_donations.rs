//! UseCase: 寄付履歴のリセット
//!
//! 手動リセット（HTTP）と毎日の自動リセット（スケジューラ）の両方から呼ばれる。
//! 寄付履歴を空にしてから、接続中の全てのクライアントに `"reset"` を送る。

use std::sync::Arc;

use crate::domain::{
    ClearOutcome, ConnectionRegistry, DonationRepository, MessagePusher, RESET_MESSAGE,
};

/// Result of one reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetReport {
    pub cleared: ClearOutcome,
    /// Connections the reset message was queued for
    pub notified: usize,
}

/// 寄付履歴リセットのユースケース
pub struct ResetDonationsUseCase {
    repository: Arc<dyn DonationRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ResetDonationsUseCase {
    /// 新しい ResetDonationsUseCase を作成
    pub fn new(
        repository: Arc<dyn DonationRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            registry,
            message_pusher,
        }
    }

    /// リセットを実行
    ///
    /// 失敗は全て内部でログに残すので、常に完了する。
    pub async fn execute(&self) -> ResetReport {
        let cleared = self.repository.clear().await;

        let targets = self.registry.connection_ids().await;
        let total = targets.len();
        let notified = self.message_pusher.broadcast(targets, RESET_MESSAGE).await;

        tracing::info!(
            "Ledger reset: {} donations cleared, reset sent to {}/{} connections",
            cleared.removed,
            notified,
            total
        );

        ResetReport { cleared, notified }
    }
}
