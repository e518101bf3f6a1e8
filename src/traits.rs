//! Traits for per-side accounting rules and downstream collaborators

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::report::MissingInvoiceRecord;
use crate::types::*;

/// Accounting-perspective rule that turns a row's monetary cells into one amount
///
/// The returned value is signed: positive raises the open balance of the
/// invoice (an invoice posting), negative reduces it (a credit note or
/// payment). Only its absolute value is exposed on [`LedgerRow::amount`];
/// the sign is used for netting during consolidation.
pub trait AmountPolicy: Send + Sync {
    /// Ledger side this policy applies to
    fn side(&self) -> LedgerSide;

    /// Resolve the signed amount for a row; zero marks the row unusable
    fn resolve(&self, cells: &MonetaryCells) -> BigDecimal;
}

/// Workflow-tracking system that turns missing invoices into trackable records
///
/// The engine never persists anything itself. Hosts implement this trait
/// over their own storage or API and hand it the records produced by
/// [`crate::ReconciliationReport::missing_invoice_records`].
#[async_trait]
pub trait InvoiceTracker: Send + Sync {
    /// Submit missing-invoice records, returning how many were newly accepted
    async fn submit_missing(&mut self, records: &[MissingInvoiceRecord]) -> ReconResult<usize>;

    /// Records accepted so far, in submission order
    async fn list_submitted(&self) -> ReconResult<Vec<MissingInvoiceRecord>>;
}
