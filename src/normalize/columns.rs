//! Raw tables, header-to-field mapping and row normalization

use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::normalize::{clean_invoice_code, normalize_date, parse_amount_or_zero, AliasTable};
use crate::traits::AmountPolicy;
use crate::types::*;
use crate::utils::validate_table;

/// A spreadsheet already read by the host: one header row plus data rows
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table from a header row and data rows
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Create a table from per-row header-to-value records
    ///
    /// Headers are collected in first-seen order across all records.
    pub fn from_records(records: &[IndexMap<String, String>]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|h| record.get(h).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Which column index feeds each canonical field
///
/// Each field is fed by at most one column: the first header whose first
/// matching alias names that field. Later headers resolving to an already
/// claimed field stay unmapped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMapping {
    columns: Vec<(CanonicalField, usize)>,
}

impl ColumnMapping {
    /// Infer the mapping from header strings
    pub fn from_headers(headers: &[String], aliases: &AliasTable) -> Self {
        let mut columns: Vec<(CanonicalField, usize)> = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(field) = aliases.field_for(header) {
                if columns.iter().all(|(f, _)| *f != field) {
                    columns.push((field, idx));
                }
            }
        }
        Self { columns }
    }

    /// Column index mapped to a field
    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, idx)| *idx)
    }

    /// Whether any column maps to the field
    pub fn has(&self, field: CanonicalField) -> bool {
        self.column(field).is_some()
    }

    /// Whether at least one debit, credit or amount column is mapped
    pub fn has_monetary(&self) -> bool {
        self.columns.iter().any(|(f, _)| f.is_monetary())
    }

    /// Mapped fields with their column index, in header order
    pub fn fields(&self) -> &[(CanonicalField, usize)] {
        &self.columns
    }
}

/// Normalize every data row of one side into a [`LedgerRow`]
///
/// Rows are processed in parallel and collected in input order. Cells that
/// fail to parse as amounts count as zero; rows whose resolved amount is
/// zero are still returned so their raw fields stay available for audit.
pub fn normalize_table(
    table: &RawTable,
    side: LedgerSide,
    aliases: &AliasTable,
    policy: &dyn AmountPolicy,
) -> ReconResult<Vec<LedgerRow>> {
    validate_table(table, side)?;

    if policy.side() != side {
        return Err(ReconError::InvalidInput(format!(
            "{} amount policy used for {} rows",
            policy.side(),
            side
        )));
    }

    let mapping = ColumnMapping::from_headers(&table.headers, aliases);
    if !mapping.has(CanonicalField::Invoice) {
        tracing::warn!(side = %side, "no invoice column recognised; every row is payment-only");
    }
    if !mapping.has_monetary() {
        tracing::warn!(side = %side, "no debit, credit or amount column recognised");
    }
    tracing::debug!(side = %side, mapping = ?mapping.fields(), "column mapping inferred");

    let keys = field_keys(&table.headers);

    let rows = table
        .rows
        .par_iter()
        .enumerate()
        .map(|(idx, cells)| build_row(idx + 1, side, &keys, cells, &mapping, policy))
        .collect();

    Ok(rows)
}

fn build_row(
    row_number: usize,
    side: LedgerSide,
    keys: &[String],
    cells: &[String],
    mapping: &ColumnMapping,
    policy: &dyn AmountPolicy,
) -> LedgerRow {
    let cell = |idx: usize| cells.get(idx).map(String::as_str).unwrap_or("");
    let text = |field: CanonicalField| {
        mapping
            .column(field)
            .map(|idx| cell(idx).trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let money = |field: CanonicalField| {
        mapping
            .column(field)
            .map(|idx| parse_amount_or_zero(cell(idx)))
            .unwrap_or_else(BigDecimal::zero)
    };

    let raw_fields: IndexMap<String, String> = keys
        .iter()
        .enumerate()
        .map(|(idx, key)| (key.clone(), cell(idx).to_string()))
        .collect();

    let invoice_code_raw = text(CanonicalField::Invoice).unwrap_or_default();
    let invoice_code_clean = clean_invoice_code(&invoice_code_raw);

    let monetary = MonetaryCells::new(
        money(CanonicalField::Amount),
        money(CanonicalField::Debit),
        money(CanonicalField::Credit),
    );
    let signed_amount = policy.resolve(&monetary);

    LedgerRow {
        row_number,
        side,
        raw_fields,
        invoice_code_raw,
        invoice_code_clean,
        amount: signed_amount.abs(),
        signed_amount,
        date: text(CanonicalField::Date).map(|d| normalize_date(&d).unwrap_or(d)),
        description: text(CanonicalField::Description),
        vendor_name: text(CanonicalField::Vendor),
        entity: text(CanonicalField::Entity),
    }
}

/// Raw-field keys: blank headers get a positional name, repeats get a suffix
fn field_keys(headers: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(headers.len());
    for (idx, header) in headers.iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("column_{}", idx + 1)
        } else {
            header.clone()
        };
        let mut key = base.clone();
        let mut n = 2;
        while keys.contains(&key) {
            key = format!("{} ({})", base, n);
            n += 1;
        }
        keys.push(key);
    }
    keys
}
