//! Domain entities.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use donation_relay_shared::time::format_local_datetime;
use rust_decimal::Decimal;

use super::{
    deduplicator::is_burst_duplicate,
    value_object::{ChannelName, ConnectionId},
};

/// One accepted donation. Immutable once persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    pub channel: String,
    pub donor_name: String,
    pub amount: Decimal,
    pub donation_type: String,
    pub message: String,
    /// Local wall-clock time, whole seconds
    pub timestamp: NaiveDateTime,
}

impl Donation {
    /// Line written to the append-only audit log (without trailing newline)
    pub fn audit_line(&self) -> String {
        format!(
            "{} - {} - {} TL - {} - {}",
            format_local_datetime(self.timestamp),
            self.donor_name,
            self.amount,
            self.donation_type,
            self.message
        )
    }
}

/// Result of offering a donation to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    Duplicate,
}

/// Result of clearing the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearOutcome {
    /// Number of donations dropped from memory
    pub removed: usize,
    /// Whether a snapshot file existed and was deleted
    pub snapshot_removed: bool,
}

/// Ordered donation history; insertion order is arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    donations: Vec<Donation>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_donations(donations: Vec<Donation>) -> Self {
        Self { donations }
    }

    /// Append `donation` unless it repeats the last entry within the duplicate window
    pub fn append(&mut self, donation: Donation) -> AppendOutcome {
        if is_burst_duplicate(self.donations.last(), &donation) {
            return AppendOutcome::Duplicate;
        }
        self.donations.push(donation);
        AppendOutcome::Appended
    }

    /// Empty the ledger, returning how many entries were dropped
    pub fn clear(&mut self) -> usize {
        let removed = self.donations.len();
        self.donations.clear();
        removed
    }

    pub fn donations(&self) -> &[Donation] {
        &self.donations
    }

    pub fn len(&self) -> usize {
        self.donations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.donations.is_empty()
    }
}

/// Liveness of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStatus {
    pub connected: bool,
    pub connected_since: Option<NaiveDateTime>,
}

impl ChannelStatus {
    pub fn connected(since: NaiveDateTime) -> Self {
        Self {
            connected: true,
            connected_since: Some(since),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            connected: false,
            connected_since: None,
        }
    }
}

/// Live connections and the per-channel status derived from their heartbeats
#[derive(Debug, Clone, Default)]
pub struct ConnectionTable {
    /// Live connections and the channel each one has bound to, if any
    connections: HashMap<ConnectionId, Option<ChannelName>>,
    channels: BTreeMap<ChannelName, ChannelStatus>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: ConnectionId) {
        self.connections.entry(id).or_insert(None);
    }

    /// Remove `id` from the live set.
    ///
    /// If the connection was bound to a channel, that channel is marked
    /// disconnected and its bound channel is returned.
    pub fn unregister(&mut self, id: &ConnectionId) -> Option<ChannelName> {
        let channel = self.connections.remove(id).flatten()?;
        self.channels
            .insert(channel.clone(), ChannelStatus::disconnected());
        Some(channel)
    }

    /// Bind `id` to `channel` and mark the channel connected if it is not already.
    ///
    /// Returns `true` when the channel transitioned to connected.
    pub fn record_heartbeat(
        &mut self,
        id: &ConnectionId,
        channel: ChannelName,
        now: NaiveDateTime,
    ) -> bool {
        if let Some(bound) = self.connections.get_mut(id) {
            *bound = Some(channel.clone());
        }

        match self.channels.get(&channel) {
            Some(status) if status.connected => false,
            _ => {
                self.channels.insert(channel, ChannelStatus::connected(now));
                true
            }
        }
    }

    pub fn snapshot(&self) -> BTreeMap<ChannelName, ChannelStatus> {
        self.channels.clone()
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.connections.keys().copied().collect()
    }

    pub fn bound_channel(&self, id: &ConnectionId) -> Option<&ChannelName> {
        self.connections.get(id).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn base_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
    }

    fn donation(name: &str, amount: i64, timestamp: NaiveDateTime) -> Donation {
        Donation {
            channel: "Channel 1".to_string(),
            donor_name: name.to_string(),
            amount: Decimal::new(amount, 0),
            donation_type: "Bits".to_string(),
            message: "Thanks!".to_string(),
            timestamp,
        }
    }

    // ========================================
    // Ledger
    // ========================================

    #[test]
    fn test_ledger_drops_burst_duplicate() {
        // テスト項目: 60 秒以内の同一寄付は 1 件だけ記録される
        // given (前提条件):
        let mut ledger = Ledger::new();

        // when (操作):
        let first = ledger.append(donation("Ada", 50, base_time()));
        let second = ledger.append(donation("Ada", 50, base_time() + Duration::seconds(10)));

        // then (期待する結果):
        assert_eq!(first, AppendOutcome::Appended);
        assert_eq!(second, AppendOutcome::Duplicate);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_ledger_accepts_repeat_after_gap() {
        let mut ledger = Ledger::new();
        ledger.append(donation("Ada", 50, base_time()));

        let outcome = ledger.append(donation("Ada", 50, base_time() + Duration::seconds(61)));

        assert_eq!(outcome, AppendOutcome::Appended);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_ledger_only_looks_at_last_entry() {
        // テスト項目: 間に別の寄付が入ると同一寄付でも重複扱いにならない
        // given (前提条件):
        let mut ledger = Ledger::new();
        ledger.append(donation("Ada", 50, base_time()));
        ledger.append(donation("Grace", 20, base_time() + Duration::seconds(1)));

        // when (操作):
        let outcome = ledger.append(donation("Ada", 50, base_time() + Duration::seconds(2)));

        // then (期待する結果):
        assert_eq!(outcome, AppendOutcome::Appended);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_ledger_clear_returns_removed_count() {
        let mut ledger = Ledger::from_donations(vec![
            donation("Ada", 50, base_time()),
            donation("Grace", 20, base_time()),
        ]);

        assert_eq!(ledger.clear(), 2);
        assert!(ledger.is_empty());
        assert_eq!(ledger.clear(), 0);
    }

    #[test]
    fn test_audit_line_format() {
        let d = donation("Ada", 50, base_time());
        assert_eq!(d.audit_line(), "2024-05-01 20:00:00 - Ada - 50 TL - Bits - Thanks!");
    }

    // ========================================
    // ConnectionTable
    // ========================================

    #[test]
    fn test_register_and_unregister_unbound_connection() {
        // テスト項目: チャンネル未登録の接続の切断はチャンネル状態に影響しない
        // given (前提条件):
        let mut table = ConnectionTable::new();
        let id = ConnectionId::generate();
        table.register(id);

        // when (操作):
        let channel = table.unregister(&id);

        // then (期待する結果):
        assert_eq!(channel, None);
        assert!(table.is_empty());
        assert!(table.snapshot().is_empty());
    }

    #[test]
    fn test_heartbeat_marks_channel_connected_once() {
        // テスト項目: 接続済みチャンネルへの heartbeat は何も変えない
        // given (前提条件):
        let mut table = ConnectionTable::new();
        let id = ConnectionId::generate();
        table.register(id);

        // when (操作):
        let first = table.record_heartbeat(&id, ChannelName::new("Studio"), base_time());
        let second = table.record_heartbeat(
            &id,
            ChannelName::new("Studio"),
            base_time() + Duration::seconds(30),
        );

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        let status = table.snapshot()[&ChannelName::new("Studio")];
        assert_eq!(status, ChannelStatus::connected(base_time()));
        assert_eq!(table.bound_channel(&id), Some(&ChannelName::new("Studio")));
    }

    #[test]
    fn test_disconnect_then_heartbeat_reconnects_channel() {
        // テスト項目: 切断後の heartbeat で新しい connected_since が設定される
        // given (前提条件):
        let mut table = ConnectionTable::new();
        let first = ConnectionId::generate();
        table.register(first);
        table.record_heartbeat(&first, ChannelName::new("Studio"), base_time());

        // when (操作): 切断
        let unbound = table.unregister(&first);

        // then (期待する結果):
        assert_eq!(unbound, Some(ChannelName::new("Studio")));
        assert_eq!(
            table.snapshot()[&ChannelName::new("Studio")],
            ChannelStatus::disconnected()
        );

        // when (操作): 新しい接続から heartbeat
        let second = ConnectionId::generate();
        table.register(second);
        let later = base_time() + Duration::minutes(5);
        let reconnected = table.record_heartbeat(&second, ChannelName::new("Studio"), later);

        // then (期待する結果):
        assert!(reconnected);
        assert_eq!(
            table.snapshot()[&ChannelName::new("Studio")],
            ChannelStatus::connected(later)
        );
    }

    #[test]
    fn test_connection_ids_lists_all_live_connections() {
        let mut table = ConnectionTable::new();
        let ids: Vec<_> = (0..3).map(|_| ConnectionId::generate()).collect();
        for id in &ids {
            table.register(*id);
        }
        table.unregister(&ids[1]);

        let mut live = table.connection_ids();
        live.sort();
        let mut expected = vec![ids[0], ids[2]];
        expected.sort();
        assert_eq!(live, expected);
    }
}
