//! Core types and data structures for the reconciliation engine

use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which ledger an input row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerSide {
    /// The organization's own accounts-payable extract
    Erp,
    /// The counterparty's statement (accounts-receivable from their view)
    Vendor,
}

impl LedgerSide {
    /// Short label used in logs and exports
    pub fn label(&self) -> &'static str {
        match self {
            LedgerSide::Erp => "ERP",
            LedgerSide::Vendor => "VENDOR",
        }
    }
}

impl fmt::Display for LedgerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical semantic fields a spreadsheet column can map to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Date,
    Debit,
    Credit,
    Amount,
    Description,
    Invoice,
    Vendor,
    Entity,
}

impl CanonicalField {
    /// All fields in alias matching priority order
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::Date,
        CanonicalField::Debit,
        CanonicalField::Credit,
        CanonicalField::Amount,
        CanonicalField::Description,
        CanonicalField::Invoice,
        CanonicalField::Vendor,
        CanonicalField::Entity,
    ];

    /// Whether the field carries a monetary value
    pub fn is_monetary(&self) -> bool {
        matches!(
            self,
            CanonicalField::Debit | CanonicalField::Credit | CanonicalField::Amount
        )
    }
}

/// Parsed monetary cells of one row, zero where missing or unparseable
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonetaryCells {
    /// Direct "amount" column
    pub amount: BigDecimal,
    /// Debit column
    pub debit: BigDecimal,
    /// Credit column
    pub credit: BigDecimal,
}

impl MonetaryCells {
    pub fn new(amount: BigDecimal, debit: BigDecimal, credit: BigDecimal) -> Self {
        Self {
            amount,
            debit,
            credit,
        }
    }
}

/// One spreadsheet row after column normalization and amount resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerRow {
    /// 1-based position among the data rows of its table
    pub row_number: usize,
    /// Ledger the row belongs to
    pub side: LedgerSide,
    /// Original column name to original cell value, in column order
    pub raw_fields: IndexMap<String, String>,
    /// Invoice reference as written, trimmed
    pub invoice_code_raw: String,
    /// Alphanumeric-only, uppercased invoice reference; empty means none
    pub invoice_code_clean: String,
    /// Resolved unsigned amount; zero marks an unusable row
    pub amount: BigDecimal,
    #[serde(skip)]
    pub(crate) signed_amount: BigDecimal,
    pub date: Option<String>,
    pub description: Option<String>,
    pub vendor_name: Option<String>,
    pub entity: Option<String>,
}

impl LedgerRow {
    /// Whether the row has a usable (non-zero) amount
    pub fn is_usable(&self) -> bool {
        !self.amount.is_zero()
    }

    /// Whether the row carries an invoice reference
    pub fn has_invoice_code(&self) -> bool {
        !self.invoice_code_clean.is_empty()
    }
}

/// One invoice code's net position on one side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedEntry {
    pub invoice_code_clean: String,
    pub side: LedgerSide,
    /// Absolute value of the signed sum of contributing rows, always > 0
    pub net_amount: BigDecimal,
    /// Number of raw rows netted into this entry
    pub entry_count: usize,
    /// Row numbers of the contributing rows, in input order
    pub row_numbers: Vec<usize>,
    /// Row used for display and export
    pub representative: LedgerRow,
}

/// Matching strategy that produced an invoice match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Identical cleaned invoice code
    Exact,
    /// Similar cleaned invoice code with a close amount
    Fuzzy,
}

/// Output of the matcher; every consolidated entry and payment row lands in exactly one
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchRecord {
    InvoiceMatch {
        erp_entry: ConsolidatedEntry,
        vendor_entry: ConsolidatedEntry,
        amount_delta: BigDecimal,
        tier: MatchTier,
        /// Code similarity ratio; 1.0 for exact matches
        similarity: f64,
    },
    PaymentMatch {
        erp_row: LedgerRow,
        vendor_row: LedgerRow,
        amount: BigDecimal,
    },
    MissingInErp {
        vendor_entry: ConsolidatedEntry,
    },
    MissingInVendor {
        erp_entry: ConsolidatedEntry,
    },
    /// Payment-only row with no counterpart on the other side
    UnmatchedPayment {
        row: LedgerRow,
    },
}

/// Errors that can occur during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty input: {side} side has no usable rows")]
    EmptyInput { side: LedgerSide },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Export error: {0}")]
    Export(String),
    #[error("Tracker error: {0}")]
    Tracker(String),
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;
