//! Repository trait 定義
//!
//! ドメイン層が必要とする状態ストアへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! どちらのストアも、1 つの操作の中の読み取りと書き込みは不可分に行う。

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::{
    entity::{AppendOutcome, ChannelStatus, ClearOutcome, Donation},
    value_object::{ChannelName, ConnectionId},
};

/// Donation Repository trait
///
/// 寄付履歴（メモリ上の列が正、スナップショットファイルはその写し）を管理する。
/// ストレージの失敗はここでログに残し、呼び出し側には伝播しない。
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// 重複チェックの上で寄付を追加し、スナップショットと監査ログに書き出す
    async fn append(&self, donation: Donation) -> AppendOutcome;

    /// 寄付履歴を空にし、スナップショットファイルを削除する（監査ログは残す）
    async fn clear(&self) -> ClearOutcome;

    /// 現在の寄付履歴を到着順で取得
    async fn list(&self) -> Vec<Donation>;

    /// 現在の寄付件数を取得
    async fn count(&self) -> usize;
}

/// Connection Registry trait
///
/// 接続中のコネクション集合とチャンネルごとの接続状態を管理する。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// コネクションを登録
    async fn register(&self, connection_id: ConnectionId);

    /// コネクションを削除し、紐づいていたチャンネルがあれば返す
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<ChannelName>;

    /// heartbeat を記録し、チャンネルが新たに接続状態になったら `true` を返す
    async fn record_heartbeat(
        &self,
        connection_id: &ConnectionId,
        channel: ChannelName,
        now: NaiveDateTime,
    ) -> bool;

    /// チャンネルごとの接続状態を取得
    async fn snapshot(&self) -> BTreeMap<ChannelName, ChannelStatus>;

    /// 接続中の全てのコネクション ID を取得
    async fn connection_ids(&self) -> Vec<ConnectionId>;

    /// 接続中のコネクション数を取得
    async fn count_connections(&self) -> usize;
}
