//! In-memory invoice tracker implementation for testing

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::report::MissingInvoiceRecord;
use crate::traits::*;
use crate::types::*;
use crate::utils::validate_missing_record;

/// In-memory tracker for testing and development
///
/// Records are keyed by `external_ref`, so resubmitting the same report is
/// a no-op.
#[derive(Debug, Clone, Default)]
pub struct MemoryTracker {
    records: Arc<RwLock<Vec<MissingInvoiceRecord>>>,
}

impl MemoryTracker {
    /// Create a new memory tracker instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all records (useful for testing)
    pub fn clear(&self) -> ReconResult<()> {
        self.records.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

fn poisoned<T>(_: T) -> ReconError {
    ReconError::Tracker("tracker lock poisoned".to_string())
}

#[async_trait]
impl InvoiceTracker for MemoryTracker {
    async fn submit_missing(&mut self, records: &[MissingInvoiceRecord]) -> ReconResult<usize> {
        for record in records {
            validate_missing_record(record)?;
        }

        let mut stored = self.records.write().map_err(poisoned)?;
        let mut seen: HashSet<Uuid> = stored.iter().map(|r| r.external_ref).collect();
        let mut accepted = 0;
        for record in records {
            if seen.insert(record.external_ref) {
                stored.push(record.clone());
                accepted += 1;
            }
        }

        tracing::debug!(submitted = records.len(), accepted, "missing invoices tracked");
        Ok(accepted)
    }

    async fn list_submitted(&self) -> ReconResult<Vec<MissingInvoiceRecord>> {
        Ok(self.records.read().map_err(poisoned)?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{external_ref, MissingDirection};
    use bigdecimal::BigDecimal;

    fn record(code: &str, amount: i64) -> MissingInvoiceRecord {
        MissingInvoiceRecord {
            external_ref: external_ref("Acme", MissingDirection::MissingInVendor, code),
            invoice_number: code.to_string(),
            vendor: "Acme".to_string(),
            entity: String::new(),
            amount: BigDecimal::from(amount),
            currency: "EUR".to_string(),
            source: "RECON".to_string(),
            direction: MissingDirection::MissingInVendor,
            date: None,
        }
    }

    #[tokio::test]
    async fn test_submit_dedupes_by_reference() {
        let mut tracker = MemoryTracker::new();

        let first = tracker
            .submit_missing(&[record("A1", 10), record("B2", 20)])
            .await
            .unwrap();
        assert_eq!(first, 2);

        let again = tracker
            .submit_missing(&[record("B2", 20), record("C3", 30)])
            .await
            .unwrap();
        assert_eq!(again, 1);

        let listed = tracker.list_submitted().await.unwrap();
        let codes: Vec<&str> = listed.iter().map(|r| r.invoice_number.as_str()).collect();
        assert_eq!(codes, vec!["A1", "B2", "C3"]);
    }

    #[tokio::test]
    async fn test_invalid_batch_rejected_whole() {
        let mut tracker = MemoryTracker::new();
        let result = tracker
            .submit_missing(&[record("A1", 10), record("B2", 0)])
            .await;

        assert!(matches!(result, Err(ReconError::Tracker(_))));
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let mut tracker = MemoryTracker::new();
        let view = tracker.clone();
        tracker.submit_missing(&[record("A1", 10)]).await.unwrap();
        assert_eq!(view.len(), 1);

        view.clear().unwrap();
        assert!(tracker.is_empty());
    }
}
