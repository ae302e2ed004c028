//! File-backed donation ledger.
//!
//! The in-memory [`Ledger`] is the source of truth. After every append the
//! snapshot file is rewritten in full and one line is appended to the audit
//! log. `clear` deletes the snapshot but never touches the audit log.
//!
//! The ledger mutex is held for the whole of each operation, so the duplicate
//! check, the push, the snapshot rewrite and the audit append happen as one
//! step. Each operation runs on its own task: a caller that is cancelled
//! mid-way (e.g. an aborted connection task) cannot leave memory, snapshot
//! and audit log out of step.

use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use super::error::StorageError;
use crate::{
    domain::{AppendOutcome, ClearOutcome, Donation, DonationRepository, Ledger},
    infrastructure::dto::snapshot::DonationRecord,
};

/// Snapshot file name inside the data directory
pub const SNAPSHOT_FILE_NAME: &str = "donations.json";

/// Audit log file name inside the data directory
pub const AUDIT_LOG_FILE_NAME: &str = "donation_log.txt";

/// Locations of the ledger's two files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPaths {
    pub snapshot: PathBuf,
    pub audit_log: PathBuf,
}

impl LedgerPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            snapshot: dir.join(SNAPSHOT_FILE_NAME),
            audit_log: dir.join(AUDIT_LOG_FILE_NAME),
        }
    }
}

/// ファイルに永続化する Donation Repository 実装
pub struct FileLedgerRepository {
    files: Arc<LedgerFiles>,
}

/// In-memory ledger and the files mirroring it
struct LedgerFiles {
    ledger: Mutex<Ledger>,
    paths: LedgerPaths,
}

impl FileLedgerRepository {
    /// Load the snapshot at `paths.snapshot`, if any.
    ///
    /// A missing file yields an empty ledger. An unreadable or malformed
    /// file is logged and also yields an empty ledger; startup never fails here.
    pub async fn load(paths: LedgerPaths) -> Self {
        let ledger = match read_snapshot(&paths.snapshot).await {
            Ok(Some(donations)) => {
                tracing::info!(
                    "Loaded {} donations from {}",
                    donations.len(),
                    paths.snapshot.display()
                );
                Ledger::from_donations(donations)
            }
            Ok(None) => {
                tracing::info!(
                    "No snapshot at {}, starting with an empty ledger",
                    paths.snapshot.display()
                );
                Ledger::new()
            }
            Err(e) => {
                tracing::error!("Failed to load snapshot, starting empty: {}", e);
                Ledger::new()
            }
        };

        Self {
            files: Arc::new(LedgerFiles {
                ledger: Mutex::new(ledger),
                paths,
            }),
        }
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.files.paths
    }
}

/// Run `operation` on its own task and wait for it.
///
/// The spawned task is never aborted, so once started the operation always
/// runs to completion even if the awaiting future is dropped.
async fn run_to_completion<T, F>(operation: F) -> T
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    match tokio::spawn(operation).await {
        Ok(output) => output,
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    }
}

impl LedgerFiles {
    async fn append(&self, donation: Donation) -> AppendOutcome {
        let mut ledger = self.ledger.lock().await;

        if ledger.append(donation.clone()) == AppendOutcome::Duplicate {
            tracing::debug!(
                "Dropped duplicate donation from '{}' ({})",
                donation.donor_name,
                donation.amount
            );
            return AppendOutcome::Duplicate;
        }

        if let Err(e) = self.write_snapshot(ledger.donations()).await {
            tracing::error!("Failed to persist snapshot: {}", e);
        }
        if let Err(e) = self.append_audit_line(&donation).await {
            tracing::error!("Failed to append to audit log: {}", e);
        }

        tracing::info!(
            "Recorded donation from '{}': {} ({}) on '{}'",
            donation.donor_name,
            donation.amount,
            donation.donation_type,
            donation.channel
        );
        AppendOutcome::Appended
    }

    async fn clear(&self) -> ClearOutcome {
        let mut ledger = self.ledger.lock().await;
        let removed = ledger.clear();

        let snapshot_removed = match self.remove_snapshot().await {
            Ok(true) => {
                tracing::info!("Snapshot {} deleted", self.paths.snapshot.display());
                true
            }
            Ok(false) => {
                tracing::info!("Snapshot {} does not exist", self.paths.snapshot.display());
                false
            }
            Err(e) => {
                tracing::error!("Failed to delete snapshot: {}", e);
                false
            }
        };

        ClearOutcome {
            removed,
            snapshot_removed,
        }
    }

    async fn write_snapshot(&self, donations: &[Donation]) -> Result<(), StorageError> {
        let records: Vec<DonationRecord> = donations.iter().map(DonationRecord::from).collect();
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&self.paths.snapshot, json)
            .await
            .map_err(|source| StorageError::Write {
                path: self.paths.snapshot.clone(),
                source,
            })
    }

    async fn append_audit_line(&self, donation: &Donation) -> Result<(), StorageError> {
        let path = &self.paths.audit_log;
        let write_err = |source| StorageError::Write {
            path: path.clone(),
            source,
        };

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(write_err)?;
        let line = format!("{}\n", donation.audit_line());
        file.write_all(line.as_bytes()).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)
    }

    /// Returns whether a snapshot file existed
    async fn remove_snapshot(&self) -> Result<bool, StorageError> {
        match fs::remove_file(&self.paths.snapshot).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StorageError::Remove {
                path: self.paths.snapshot.clone(),
                source,
            }),
        }
    }
}

#[async_trait]
impl DonationRepository for FileLedgerRepository {
    async fn append(&self, donation: Donation) -> AppendOutcome {
        let files = Arc::clone(&self.files);
        run_to_completion(async move { files.append(donation).await }).await
    }

    async fn clear(&self) -> ClearOutcome {
        let files = Arc::clone(&self.files);
        run_to_completion(async move { files.clear().await }).await
    }

    async fn list(&self) -> Vec<Donation> {
        let ledger = self.files.ledger.lock().await;
        ledger.donations().to_vec()
    }

    async fn count(&self) -> usize {
        let ledger = self.files.ledger.lock().await;
        ledger.len()
    }
}

/// `Ok(None)` when there is no snapshot file
async fn read_snapshot(path: &Path) -> Result<Option<Vec<Donation>>, StorageError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let records: Vec<DonationRecord> =
        serde_json::from_str(&content).map_err(|source| StorageError::Deserialize {
            path: path.to_path_buf(),
            source,
        })?;

    records
        .into_iter()
        .map(|record| {
            let date = record.date.clone();
            Donation::try_from(record).map_err(|source| StorageError::InvalidDate { date, source })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - FileLedgerRepository の追加・重複排除・クリア・読み込み
    // - スナップショットと監査ログの扱い
    //
    // 【どのようなシナリオをテストするか】
    // 1. 追加するとスナップショットと監査ログに書き出される
    // 2. 60 秒以内の重複は記録されない
    // 3. クリアでスナップショットは消えるが監査ログは残る
    // 4. 壊れたスナップショットからでも空の状態で起動できる
    // 5. 読み込み → 再読み込みで同じ内容になる
    // 6. 呼び出し側が中断されても 3 つの件数がずれない
    // ========================================

    fn base_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
    }

    fn donation(name: &str, amount: Decimal, timestamp: NaiveDateTime) -> Donation {
        Donation {
            channel: "Channel 1".to_string(),
            donor_name: name.to_string(),
            amount,
            donation_type: "Bits".to_string(),
            message: "Thanks! - extra".to_string(),
            timestamp,
        }
    }

    async fn create_test_repository(dir: &TempDir) -> FileLedgerRepository {
        FileLedgerRepository::load(LedgerPaths::in_dir(dir.path())).await
    }

    #[tokio::test]
    async fn test_append_writes_snapshot_and_audit_log() {
        // テスト項目: 追加するとスナップショットと監査ログに書き出される
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let repo = create_test_repository(&dir).await;

        // when (操作):
        let outcome = repo
            .append(donation("Ada", Decimal::new(50, 0), base_time()))
            .await;

        // then (期待する結果):
        assert_eq!(outcome, AppendOutcome::Appended);
        assert_eq!(repo.count().await, 1);

        let snapshot = std::fs::read_to_string(&repo.paths().snapshot).unwrap();
        let records: Vec<DonationRecord> = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].donor_name, "Ada");
        assert_eq!(records[0].date, "2024-05-01 20:00:00");

        let audit = std::fs::read_to_string(&repo.paths().audit_log).unwrap();
        assert_eq!(
            audit,
            "2024-05-01 20:00:00 - Ada - 50 TL - Bits - Thanks! - extra\n"
        );
    }

    #[tokio::test]
    async fn test_append_duplicate_within_window() {
        // テスト項目: 60 秒以内の同一寄付は 1 件、61 秒後なら 2 件
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let repo = create_test_repository(&dir).await;
        let amount = Decimal::new(50, 0);

        // when (操作):
        repo.append(donation("Ada", amount, base_time())).await;
        let dup = repo
            .append(donation("Ada", amount, base_time() + Duration::seconds(5)))
            .await;

        // then (期待する結果):
        assert_eq!(dup, AppendOutcome::Duplicate);
        assert_eq!(repo.count().await, 1);

        let later = repo
            .append(donation("Ada", amount, base_time() + Duration::seconds(61)))
            .await;
        assert_eq!(later, AppendOutcome::Appended);
        assert_eq!(repo.count().await, 2);

        let audit = std::fs::read_to_string(&repo.paths().audit_log).unwrap();
        assert_eq!(audit.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_clear_removes_snapshot_but_keeps_audit_log() {
        // テスト項目: クリア後は 0 件・スナップショットなし・監査ログは縮まない
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let repo = create_test_repository(&dir).await;
        repo.append(donation("Ada", Decimal::new(50, 0), base_time()))
            .await;
        repo.append(donation("Grace", Decimal::new(20, 0), base_time()))
            .await;
        let audit_size_before = std::fs::metadata(&repo.paths().audit_log).unwrap().len();

        // when (操作):
        let outcome = repo.clear().await;

        // then (期待する結果):
        assert_eq!(
            outcome,
            ClearOutcome {
                removed: 2,
                snapshot_removed: true
            }
        );
        assert_eq!(repo.count().await, 0);
        assert!(!repo.paths().snapshot.exists());
        let audit_size_after = std::fs::metadata(&repo.paths().audit_log).unwrap().len();
        assert!(audit_size_after >= audit_size_before);
    }

    #[tokio::test]
    async fn test_clear_without_snapshot() {
        let dir = TempDir::new().unwrap();
        let repo = create_test_repository(&dir).await;

        let outcome = repo.clear().await;

        assert_eq!(outcome, ClearOutcome::default());
    }

    #[tokio::test]
    async fn test_load_corrupt_snapshot_starts_empty() {
        // テスト項目: 壊れたスナップショットでも起動は失敗しない
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let paths = LedgerPaths::in_dir(dir.path());
        std::fs::write(&paths.snapshot, "{ not json").unwrap();

        // when (操作):
        let repo = FileLedgerRepository::load(paths).await;

        // then (期待する結果):
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn test_load_snapshot_with_bad_date_starts_empty() {
        let dir = TempDir::new().unwrap();
        let paths = LedgerPaths::in_dir(dir.path());
        std::fs::write(
            &paths.snapshot,
            r#"[{"channel":"c","donorName":"n","amount":1.0,"type":"t","message":"m","date":"soon"}]"#,
        )
        .unwrap();

        let repo = FileLedgerRepository::load(paths).await;

        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn test_reload_round_trip_is_stable() {
        // テスト項目: 読み込み → 変更なしで再読み込みしても同じ内容
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let repo = create_test_repository(&dir).await;
        repo.append(donation("Ada", Decimal::new(5000, 2), base_time()))
            .await;
        repo.append(donation(
            "Grace",
            Decimal::new(125, 1),
            base_time() + Duration::seconds(3),
        ))
        .await;
        let written = repo.list().await;

        // when (操作):
        let first = create_test_repository(&dir).await.list().await;
        let second = create_test_repository(&dir).await.list().await;

        // then (期待する結果):
        assert_eq!(first, written);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_cancelled_append_keeps_memory_snapshot_and_audit_log_in_step() {
        // テスト項目: 追加の途中で呼び出し側が中断されても、メモリ・スナップショット・監査ログの件数が揃う
        // given (前提条件):
        let dir = TempDir::new().unwrap();
        let repo = Arc::new(create_test_repository(&dir).await);

        // when (操作): 追加を開始したタスクを様々なタイミングで abort する
        let mut handles = Vec::new();
        for i in 0..200i64 {
            let repo = repo.clone();
            let handle = tokio::spawn(async move {
                repo.append(donation(&format!("donor-{}", i), Decimal::new(i, 0), base_time()))
                    .await
            });
            for _ in 0..(i % 20) {
                tokio::task::yield_now().await;
            }
            handle.abort();
            handles.push(handle);
        }
        for handle in handles {
            let _ = handle.await;
        }

        // 切り離されたタスクが全て終わるまで待つ
        let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
        while Arc::strong_count(&repo.files) > 1 {
            assert!(tokio::time::Instant::now() < deadline, "ledger tasks did not finish");
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        // then (期待する結果):
        let in_memory = repo.count().await;
        let audit_lines = std::fs::read_to_string(&repo.paths().audit_log)
            .map(|audit| audit.lines().count())
            .unwrap_or(0);
        let snapshot_len = std::fs::read_to_string(&repo.paths().snapshot)
            .map(|json| serde_json::from_str::<Vec<DonationRecord>>(&json).unwrap().len())
            .unwrap_or(0);
        assert!(in_memory > 0);
        assert_eq!(audit_lines, in_memory);
        assert_eq!(snapshot_len, in_memory);
    }
}
