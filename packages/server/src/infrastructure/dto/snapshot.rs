//! Snapshot file records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One donation as stored in the snapshot file
///
/// `date` is local time formatted as `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub channel: String,
    pub donor_name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub donation_type: String,
    pub message: String,
    pub date: String,
}
