//! # Transaction Log Mirror
//!
//! Keeps a durable copy of the committed transaction log.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  startup ──► load() ──► absent?     → empty log                        │
//! │                         malformed?  → empty log + warning              │
//! │                         valid JSON  → Vec<Transaction>                 │
//! │                                                                         │
//! │  commit  ──► save(&log) ──► whole-log overwrite under one key          │
//! │                                                                         │
//! │  close   ──► clear() ──► key removed                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored Format
//! ```json
//! [
//!   {
//!     "items": [{ "name": "Coffee", "quantity": "2", "unitPrice": 350 }],
//!     "timestamp": "16/10/2026, 09:30:00"
//!   }
//! ]
//! ```

use till_core::Transaction;
use tracing::{debug, info, warn};

use crate::error::DbResult;
use crate::repository::kv::KvRepository;

/// Key under which the committed log is stored.
pub const TRANSACTION_LOG_KEY: &str = "till.transactions";

/// Mirrors the committed transaction log into the key-value store.
#[derive(Debug, Clone)]
pub struct TransactionLogMirror {
    kv: KvRepository,
    key: String,
}

impl TransactionLogMirror {
    /// Creates a mirror over the default key.
    pub fn new(kv: KvRepository) -> Self {
        Self::with_key(kv, TRANSACTION_LOG_KEY)
    }

    /// Creates a mirror over a custom key.
    pub fn with_key(kv: KvRepository, key: impl Into<String>) -> Self {
        TransactionLogMirror {
            kv,
            key: key.into(),
        }
    }

    /// The key this mirror writes to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Rehydrates the log.
    ///
    /// A missing key or an unreadable document yields an empty log; only a
    /// storage failure is returned as an error.
    pub async fn load(&self) -> DbResult<Vec<Transaction>> {
        let Some(raw) = self.kv.get(&self.key).await? else {
            info!(key = %self.key, "No stored transaction log, starting empty");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Transaction>>(&raw) {
            Ok(log) => {
                info!(key = %self.key, transactions = log.len(), "Transaction log restored");
                Ok(log)
            }
            Err(e) => {
                warn!(
                    key = %self.key,
                    error = %e,
                    "Stored transaction log is malformed, starting empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Overwrites the stored log with `log`.
    pub async fn save(&self, log: &[Transaction]) -> DbResult<()> {
        let json = serde_json::to_string(log)?;
        self.kv.put(&self.key, &json).await?;
        debug!(key = %self.key, transactions = log.len(), "Transaction log mirrored");
        Ok(())
    }

    /// Removes the stored log.
    pub async fn clear(&self) -> DbResult<()> {
        self.kv.delete(&self.key).await?;
        info!(key = %self.key, "Stored transaction log cleared");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use till_core::{LineItem, RegisterState};

    fn sample_log() -> Vec<Transaction> {
        let mut register = RegisterState::new();
        register.submit_item("Coffee", "2", "3.50");
        register.submit_item("Cake", "1", "5.00");
        register.commit_transaction("16/10/2026, 09:30:00");
        register.submit_item("Tea", "2", "2.00");
        register.commit_transaction("16/10/2026, 09:45:12");
        register.committed_transactions().to_vec()
    }

    async fn memory_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_load_absent_is_empty() {
        let db = memory_db().await;
        assert!(db.transaction_log().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_empty_log() {
        let db = memory_db().await;
        let mirror = db.transaction_log();
        mirror.save(&[]).await.unwrap();

        assert_eq!(db.kv().get(TRANSACTION_LOG_KEY).await.unwrap().as_deref(), Some("[]"));
        assert!(mirror.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_single_transaction() {
        let db = memory_db().await;
        let mirror = db.transaction_log();
        let log = vec![Transaction::new(
            vec![LineItem::from_input("Tea", "2", "2.00")],
            "16/10/2026, 10:00:00",
        )];

        mirror.save(&log).await.unwrap();
        let loaded = mirror.load().await.unwrap();
        assert_eq!(loaded, log);
        assert_eq!(loaded[0].total().cents(), 400);
    }

    #[tokio::test]
    async fn test_round_trip_keeps_sub_cent_prices() {
        let db = memory_db().await;
        let mirror = db.transaction_log();
        let log = vec![Transaction::new(
            vec![LineItem::from_input("Screw", "8", "0.125")],
            "16/10/2026, 10:00:00",
        )];

        mirror.save(&log).await.unwrap();
        let loaded = mirror.load().await.unwrap();
        assert_eq!(loaded[0].items[0].unit_price.to_string(), "0.125");
        assert_eq!(loaded[0].total().cents(), 100);
    }

    #[tokio::test]
    async fn test_round_trip_many_transactions() {
        let db = memory_db().await;
        let mirror = db.transaction_log();
        let log = sample_log();

        mirror.save(&log).await.unwrap();
        let loaded = mirror.load().await.unwrap();
        assert_eq!(loaded, log);
        assert_eq!(loaded[0].total().cents(), 1200);
    }

    #[tokio::test]
    async fn test_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("till.db");
        let log = sample_log();

        {
            let db = Database::new(DbConfig::new(&path)).await.unwrap();
            db.transaction_log().save(&log).await.unwrap();
            db.close().await;
        }

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(db.transaction_log().load().await.unwrap(), log);
    }

    #[tokio::test]
    async fn test_malformed_value_loads_empty() {
        let db = memory_db().await;
        db.kv().put(TRANSACTION_LOG_KEY, "{not json").await.unwrap();
        assert!(db.transaction_log().load().await.unwrap().is_empty());

        db.kv().put(TRANSACTION_LOG_KEY, r#"{"items": []}"#).await.unwrap();
        assert!(db.transaction_log().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_removes_key() {
        let db = memory_db().await;
        let mirror = db.transaction_log();
        mirror.save(&sample_log()).await.unwrap();

        mirror.clear().await.unwrap();
        assert_eq!(db.kv().get(TRANSACTION_LOG_KEY).await.unwrap(), None);
        assert!(mirror.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_key_is_isolated() {
        let db = memory_db().await;
        let other = TransactionLogMirror::with_key(db.kv(), "other.log");
        other.save(&sample_log()).await.unwrap();

        assert_eq!(other.key(), "other.log");
        assert!(db.transaction_log().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_is_surfaced() {
        let db = memory_db().await;
        db.close().await;
        assert!(db.transaction_log().load().await.is_err());
    }
}
