//! Conversion logic between DTOs and domain entities.

use donation_relay_shared::time::{format_local_datetime, parse_local_datetime};

use crate::domain::{ChannelName, ChannelStatus, Donation};
use crate::infrastructure::dto::{http::ChannelStatusDto, snapshot::DonationRecord};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<DonationRecord> for Donation {
    type Error = chrono::ParseError;

    fn try_from(record: DonationRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: parse_local_datetime(&record.date)?,
            channel: record.channel,
            donor_name: record.donor_name,
            amount: record.amount,
            donation_type: record.donation_type,
            message: record.message,
        })
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Donation> for DonationRecord {
    fn from(donation: &Donation) -> Self {
        Self {
            channel: donation.channel.clone(),
            donor_name: donation.donor_name.clone(),
            amount: donation.amount,
            donation_type: donation.donation_type.clone(),
            message: donation.message.clone(),
            date: format_local_datetime(donation.timestamp),
        }
    }
}

impl From<(&ChannelName, &ChannelStatus)> for ChannelStatusDto {
    fn from((channel, status): (&ChannelName, &ChannelStatus)) -> Self {
        Self {
            channel: channel.as_str().to_string(),
            connected: status.connected,
            connected_since: status.connected_since.map(format_local_datetime),
        }
    }
}
