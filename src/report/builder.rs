//! Assembles matcher output into flat, exportable report tables

use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use serde::Serialize;

use crate::config::ToleranceConfig;
use crate::engine::{MatchOutcome, PreparedSides};
use crate::report::{MissingDirection, MissingInvoiceRecord};
use crate::types::*;

/// Decimal places used for amounts in report rows
const REPORT_SCALE: i64 = 2;

/// One invoice matched across both sides
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceMatchRow {
    pub erp_invoice: String,
    pub vendor_invoice: String,
    pub erp_amount: BigDecimal,
    pub vendor_amount: BigDecimal,
    pub difference: BigDecimal,
    pub erp_date: Option<String>,
    pub vendor_date: Option<String>,
    pub erp_entity: Option<String>,
    pub vendor_entity: Option<String>,
    pub erp_entries: usize,
    pub vendor_entries: usize,
    pub tier: MatchTier,
    pub similarity: f64,
}

/// Two payment-only rows matched by amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentMatchRow {
    pub erp_row: usize,
    pub vendor_row: usize,
    pub erp_amount: BigDecimal,
    pub vendor_amount: BigDecimal,
    pub difference: BigDecimal,
    pub erp_date: Option<String>,
    pub vendor_date: Option<String>,
    pub erp_description: Option<String>,
    pub vendor_description: Option<String>,
}

/// An invoice present on one side only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingInvoiceRow {
    pub invoice: String,
    pub invoice_code: String,
    pub amount: BigDecimal,
    pub date: Option<String>,
    pub vendor: String,
    pub entity: Option<String>,
    pub description: Option<String>,
    pub entry_count: usize,
}

/// A payment-only row with no counterpart, reported for information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedPaymentRow {
    pub side: LedgerSide,
    pub row_number: usize,
    pub amount: BigDecimal,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// A row excluded because its amount resolved to zero
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedRow {
    pub side: LedgerSide,
    pub row_number: usize,
    pub raw_fields: IndexMap<String, String>,
}

/// Counts and totals across the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconSummary {
    pub perfect_matches: usize,
    pub difference_matches: usize,
    pub fuzzy_matches: usize,
    pub payment_matches: usize,
    pub missing_in_erp: usize,
    pub missing_in_vendor: usize,
    pub unmatched_payments: usize,
    pub excluded_rows: usize,
    /// ERP side total over all invoice matches
    pub matched_erp_total: BigDecimal,
    /// Vendor side total over all invoice matches
    pub matched_vendor_total: BigDecimal,
    /// Sum of absolute differences over all invoice matches
    pub total_difference: BigDecimal,
    pub missing_in_erp_total: BigDecimal,
    pub missing_in_vendor_total: BigDecimal,
}

/// Complete reconciliation result for one ERP/vendor pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    pub vendor_name: String,
    pub summary: ReconSummary,
    pub perfect_matches: Vec<InvoiceMatchRow>,
    pub difference_matches: Vec<InvoiceMatchRow>,
    pub payment_matches: Vec<PaymentMatchRow>,
    pub missing_in_erp: Vec<MissingInvoiceRow>,
    pub missing_in_vendor: Vec<MissingInvoiceRow>,
    pub unmatched_payments: Vec<UnmatchedPaymentRow>,
    pub excluded_rows: Vec<ExcludedRow>,
}

impl ReconciliationReport {
    /// Records for the workflow tracker, missing in ERP first
    pub fn missing_invoice_records(&self, currency: &str) -> Vec<MissingInvoiceRecord> {
        let erp = self.missing_in_erp.iter().map(|row| {
            MissingInvoiceRecord::from_row(row, MissingDirection::MissingInErp, currency)
        });
        let vendor = self.missing_in_vendor.iter().map(|row| {
            MissingInvoiceRecord::from_row(row, MissingDirection::MissingInVendor, currency)
        });
        erp.chain(vendor).collect()
    }
}

/// Builds a [`ReconciliationReport`] from prepared sides and matcher output
pub struct ReportBuilder<'a> {
    vendor_name: &'a str,
    tolerances: &'a ToleranceConfig,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(vendor_name: &'a str, tolerances: &'a ToleranceConfig) -> Self {
        Self {
            vendor_name,
            tolerances,
        }
    }

    /// Split match records into the report tables and compute the summary
    pub fn build(&self, prepared: &PreparedSides, outcome: &MatchOutcome) -> ReconciliationReport {
        let mut perfect_matches = Vec::new();
        let mut difference_matches = Vec::new();
        let mut payment_matches = Vec::new();
        let mut missing_in_erp = Vec::new();
        let mut missing_in_vendor = Vec::new();
        let mut unmatched_payments = Vec::new();

        for record in &outcome.records {
            match record {
                MatchRecord::InvoiceMatch {
                    erp_entry,
                    vendor_entry,
                    amount_delta,
                    tier,
                    similarity,
                } => {
                    let row = invoice_match_row(
                        erp_entry,
                        vendor_entry,
                        amount_delta,
                        *tier,
                        *similarity,
                    );
                    if *amount_delta <= self.tolerances.perfect_match {
                        perfect_matches.push(row);
                    } else {
                        difference_matches.push(row);
                    }
                }
                MatchRecord::PaymentMatch {
                    erp_row, vendor_row, ..
                } => payment_matches.push(payment_match_row(erp_row, vendor_row)),
                MatchRecord::MissingInErp { vendor_entry } => {
                    missing_in_erp.push(self.missing_row(vendor_entry))
                }
                MatchRecord::MissingInVendor { erp_entry } => {
                    missing_in_vendor.push(self.missing_row(erp_entry))
                }
                MatchRecord::UnmatchedPayment { row } => {
                    unmatched_payments.push(UnmatchedPaymentRow {
                        side: row.side,
                        row_number: row.row_number,
                        amount: money(&row.amount),
                        date: row.date.clone(),
                        description: row.description.clone(),
                    })
                }
            }
        }

        let excluded_rows: Vec<ExcludedRow> = prepared
            .erp
            .excluded_rows()
            .chain(prepared.vendor.excluded_rows())
            .map(|row| ExcludedRow {
                side: row.side,
                row_number: row.row_number,
                raw_fields: row.raw_fields.clone(),
            })
            .collect();

        let all_matches = || perfect_matches.iter().chain(difference_matches.iter());
        let summary = ReconSummary {
            perfect_matches: perfect_matches.len(),
            difference_matches: difference_matches.len(),
            fuzzy_matches: all_matches().filter(|m| m.tier == MatchTier::Fuzzy).count(),
            payment_matches: payment_matches.len(),
            missing_in_erp: missing_in_erp.len(),
            missing_in_vendor: missing_in_vendor.len(),
            unmatched_payments: unmatched_payments.len(),
            excluded_rows: excluded_rows.len(),
            matched_erp_total: all_matches().map(|m| &m.erp_amount).sum(),
            matched_vendor_total: all_matches().map(|m| &m.vendor_amount).sum(),
            total_difference: all_matches().map(|m| &m.difference).sum(),
            missing_in_erp_total: sum_amounts(&missing_in_erp),
            missing_in_vendor_total: sum_amounts(&missing_in_vendor),
        };

        ReconciliationReport {
            vendor_name: self.vendor_name.to_string(),
            summary,
            perfect_matches,
            difference_matches,
            payment_matches,
            missing_in_erp,
            missing_in_vendor,
            unmatched_payments,
            excluded_rows,
        }
    }

    fn missing_row(&self, entry: &ConsolidatedEntry) -> MissingInvoiceRow {
        let row = &entry.representative;
        MissingInvoiceRow {
            invoice: row.invoice_code_raw.clone(),
            invoice_code: entry.invoice_code_clean.clone(),
            amount: money(&entry.net_amount),
            date: row.date.clone(),
            vendor: row
                .vendor_name
                .clone()
                .unwrap_or_else(|| self.vendor_name.to_string()),
            entity: row.entity.clone(),
            description: row.description.clone(),
            entry_count: entry.entry_count,
        }
    }
}

fn invoice_match_row(
    erp: &ConsolidatedEntry,
    vendor: &ConsolidatedEntry,
    delta: &BigDecimal,
    tier: MatchTier,
    similarity: f64,
) -> InvoiceMatchRow {
    InvoiceMatchRow {
        erp_invoice: erp.representative.invoice_code_raw.clone(),
        vendor_invoice: vendor.representative.invoice_code_raw.clone(),
        erp_amount: money(&erp.net_amount),
        vendor_amount: money(&vendor.net_amount),
        difference: money(delta),
        erp_date: erp.representative.date.clone(),
        vendor_date: vendor.representative.date.clone(),
        erp_entity: erp.representative.entity.clone(),
        vendor_entity: vendor.representative.entity.clone(),
        erp_entries: erp.entry_count,
        vendor_entries: vendor.entry_count,
        tier,
        similarity: (similarity * 100.0).round() / 100.0,
    }
}

fn payment_match_row(erp: &LedgerRow, vendor: &LedgerRow) -> PaymentMatchRow {
    PaymentMatchRow {
        erp_row: erp.row_number,
        vendor_row: vendor.row_number,
        erp_amount: money(&erp.amount),
        vendor_amount: money(&vendor.amount),
        difference: money(&(&erp.amount - &vendor.amount).abs()),
        erp_date: erp.date.clone(),
        vendor_date: vendor.date.clone(),
        erp_description: erp.description.clone(),
        vendor_description: vendor.description.clone(),
    }
}

fn money(value: &BigDecimal) -> BigDecimal {
    value.round(REPORT_SCALE).with_scale(REPORT_SCALE)
}

fn sum_amounts(rows: &[MissingInvoiceRow]) -> BigDecimal {
    rows.iter()
        .fold(BigDecimal::zero(), |acc, row| acc + &row.amount)
}
