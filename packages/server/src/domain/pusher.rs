//! MessagePusher trait 定義
//!
//! 接続中のクライアントへの制御メッセージ送信を抽象化します。
//! 具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// Outbound queue of one connection, drained by its websocket writer task
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Message Pusher trait
///
/// ブロードキャストは接続ごとに送信を試み、失敗はその接続の中で完結させる。
/// 失敗した接続の削除は行わない（削除は各接続自身の切断処理でのみ行う）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 指定した全クライアントに送信し、送信できた数を返す
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> usize;
}
