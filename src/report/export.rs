//! CSV export of report tables

use bigdecimal::BigDecimal;
use serde::Serialize;
use std::io;

use crate::report::{MissingInvoiceRow, ReconciliationReport};
use crate::types::*;

/// Report tables that can be written on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTable {
    PerfectMatches,
    DifferenceMatches,
    PaymentMatches,
    MissingInErp,
    MissingInVendor,
    UnmatchedPayments,
}

impl ReportTable {
    pub const ALL: [ReportTable; 6] = [
        ReportTable::PerfectMatches,
        ReportTable::DifferenceMatches,
        ReportTable::PaymentMatches,
        ReportTable::MissingInErp,
        ReportTable::MissingInVendor,
        ReportTable::UnmatchedPayments,
    ];

    /// File stem used when a host writes one file per table
    pub fn file_stem(&self) -> &'static str {
        match self {
            ReportTable::PerfectMatches => "perfect_matches",
            ReportTable::DifferenceMatches => "difference_matches",
            ReportTable::PaymentMatches => "payment_matches",
            ReportTable::MissingInErp => "missing_in_erp",
            ReportTable::MissingInVendor => "missing_in_vendor",
            ReportTable::UnmatchedPayments => "unmatched_payments",
        }
    }
}

/// Row of the combined missing-invoice sheet
#[derive(Debug, Serialize)]
struct MissingSheetRow<'a> {
    section: &'static str,
    invoice: &'a str,
    amount: &'a BigDecimal,
    date: Option<&'a str>,
    vendor: &'a str,
    entity: Option<&'a str>,
    description: Option<&'a str>,
}

impl<'a> MissingSheetRow<'a> {
    fn new(section: &'static str, row: &'a MissingInvoiceRow) -> Self {
        Self {
            section,
            invoice: &row.invoice,
            amount: &row.amount,
            date: row.date.as_deref(),
            vendor: &row.vendor,
            entity: row.entity.as_deref(),
            description: row.description.as_deref(),
        }
    }
}

/// Write serializable rows as CSV with a header row
///
/// An empty slice writes nothing.
pub fn write_table<W: io::Write, T: Serialize>(writer: W, rows: &[T]) -> ReconResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| ReconError::Export(e.to_string()))?;
    }
    wtr.flush().map_err(|e| ReconError::Export(e.to_string()))
}

/// Write both missing-invoice tables as one sheet, ERP section first
pub fn write_missing_sheet<W: io::Write>(
    writer: W,
    report: &ReconciliationReport,
) -> ReconResult<()> {
    let rows: Vec<MissingSheetRow<'_>> = report
        .missing_in_erp
        .iter()
        .map(|row| MissingSheetRow::new("missing_in_erp", row))
        .chain(
            report
                .missing_in_vendor
                .iter()
                .map(|row| MissingSheetRow::new("missing_in_vendor", row)),
        )
        .collect();
    write_table(writer, &rows)
}

/// Write one named report table
pub fn write_report_table<W: io::Write>(
    writer: W,
    report: &ReconciliationReport,
    table: ReportTable,
) -> ReconResult<()> {
    match table {
        ReportTable::PerfectMatches => write_table(writer, &report.perfect_matches),
        ReportTable::DifferenceMatches => write_table(writer, &report.difference_matches),
        ReportTable::PaymentMatches => write_table(writer, &report.payment_matches),
        ReportTable::MissingInErp => write_table(writer, &report.missing_in_erp),
        ReportTable::MissingInVendor => write_table(writer, &report.missing_in_vendor),
        ReportTable::UnmatchedPayments => write_table(writer, &report.unmatched_payments),
    }
}
