//! UseCase: 寄付履歴の取得

use std::sync::Arc;

use crate::domain::{Donation, DonationRepository};

/// 寄付履歴取得のユースケース
pub struct ListDonationsUseCase {
    repository: Arc<dyn DonationRepository>,
}

impl ListDonationsUseCase {
    pub fn new(repository: Arc<dyn DonationRepository>) -> Self {
        Self { repository }
    }

    /// 到着順の寄付履歴
    pub async fn execute(&self) -> Vec<Donation> {
        self.repository.list().await
    }
}
