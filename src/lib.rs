//! # ReconRaptor
//!
//! A reconciliation engine that compares a company's ERP ledger export with a
//! vendor's statement of account and reports which invoices agree, which
//! differ in amount, and which appear on one side only.
//!
//! ## Features
//!
//! - **Column detection**: Header aliases in English, Spanish and Greek
//! - **Amount resolution**: Per-side debit/credit rules with locale-aware number parsing
//! - **Consolidation**: Invoice postings, credit notes and cancellations netted per invoice code
//! - **Tiered matching**: Exact code, fuzzy code with amount guard, then amount-only payments
//! - **Reporting**: Flat tables with CSV export and records for a workflow tracker
//!
//! ## Quick Start
//!
//! ```rust
//! use recon_raptor::{RawTable, ReconciliationEngine};
//!
//! let erp = RawTable::new(
//!     vec!["Invoice".into(), "Credit".into()],
//!     vec![vec!["FAC-100".into(), "500".into()]],
//! );
//! let vendor = RawTable::new(
//!     vec!["Document".into(), "Debit".into()],
//!     vec![vec!["FAC100".into(), "500,00".into()]],
//! );
//!
//! let engine = ReconciliationEngine::default();
//! let report = engine.reconcile(&erp, &vendor, "Acme SL").unwrap();
//! assert_eq!(report.summary.perfect_matches, 1);
//! ```

pub mod config;
pub mod engine;
pub mod normalize;
pub mod report;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::{ReconConfig, ToleranceConfig};
pub use engine::{
    ErpAmountPolicy, MatchOutcome, Matcher, PreparedSide, PreparedSides, ReconciliationEngine,
    VendorAmountPolicy,
};
pub use normalize::{AliasTable, ColumnMapping, RawTable};
pub use report::*;
pub use traits::*;
pub use types::*;
pub use utils::MemoryTracker;
