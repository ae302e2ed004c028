//! UseCase: 寄付メッセージ受信処理
//!
//! Parser → Deduplicator → Ledger Store の順に流す。
//! 解析に失敗したメッセージは記録されない。

use std::sync::Arc;

use donation_relay_shared::time::Clock;

use crate::domain::{AppendOutcome, DonationRepository, ParseError, parse_donation};

/// 寄付メッセージ受信のユースケース
pub struct ReceiveDonationUseCase {
    repository: Arc<dyn DonationRepository>,
    clock: Arc<dyn Clock>,
}

impl ReceiveDonationUseCase {
    /// 新しい ReceiveDonationUseCase を作成
    pub fn new(repository: Arc<dyn DonationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 寄付メッセージを解析して記録する
    ///
    /// # Returns
    ///
    /// * `Ok(AppendOutcome)` - 記録された、または直前の寄付の重複として破棄された
    /// * `Err(ParseError)` - 解析失敗（何も記録されない）
    pub async fn execute(&self, text: &str) -> Result<AppendOutcome, ParseError> {
        let donation = parse_donation(text, self.clock.now_local())?;
        Ok(self.repository.append(donation).await)
    }
}
