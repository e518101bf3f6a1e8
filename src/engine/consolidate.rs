//! Row classification and per-invoice netting

use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;

use crate::config::ToleranceConfig;
use crate::types::*;

/// Indices into a side's rows, split by bucket, each in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowClasses {
    /// Usable rows carrying an invoice code
    pub invoiced: Vec<usize>,
    /// Usable rows without an invoice code
    pub payments: Vec<usize>,
    /// Rows whose amount resolved to zero
    pub excluded: Vec<usize>,
}

impl RowClasses {
    /// Number of rows that take part in matching
    pub fn usable_count(&self) -> usize {
        self.invoiced.len() + self.payments.len()
    }
}

/// Split rows into invoice-referenced, payment-only and excluded buckets
pub fn classify_rows(rows: &[LedgerRow]) -> RowClasses {
    let mut classes = RowClasses::default();
    for (idx, row) in rows.iter().enumerate() {
        if !row.is_usable() {
            classes.excluded.push(idx);
        } else if row.has_invoice_code() {
            classes.invoiced.push(idx);
        } else {
            classes.payments.push(idx);
        }
    }
    classes
}

/// Net invoice-referenced rows into one entry per cleaned invoice code
///
/// Entries come out in order of each code's first appearance. Codes whose
/// signed rows net to less than the zero-net tolerance are settled and
/// dropped.
pub fn consolidate(
    rows: &[LedgerRow],
    classes: &RowClasses,
    tolerances: &ToleranceConfig,
) -> Vec<ConsolidatedEntry> {
    let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for &idx in &classes.invoiced {
        groups
            .entry(rows[idx].invoice_code_clean.as_str())
            .or_default()
            .push(idx);
    }

    groups
        .into_iter()
        .filter_map(|(code, members)| {
            let sum: BigDecimal = members.iter().map(|&i| &rows[i].signed_amount).sum();
            let net_amount = sum.abs();
            if net_amount < tolerances.zero_net {
                tracing::debug!(code, rows = members.len(), "invoice nets to zero, dropped");
                return None;
            }

            // Prefer the invoice posting over a credit note for display
            let representative = members
                .iter()
                .copied()
                .find(|&i| rows[i].signed_amount > BigDecimal::zero())
                .unwrap_or(members[0]);

            Some(ConsolidatedEntry {
                invoice_code_clean: code.to_string(),
                side: rows[representative].side,
                net_amount,
                entry_count: members.len(),
                row_numbers: members.iter().map(|&i| rows[i].row_number).collect(),
                representative: rows[representative].clone(),
            })
        })
        .collect()
}

/// Clone the payment-only rows in input order
pub fn payment_rows(rows: &[LedgerRow], classes: &RowClasses) -> Vec<LedgerRow> {
    classes.payments.iter().map(|&i| rows[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::row;
    use std::str::FromStr;

    #[test]
    fn test_classify_rows() {
        let rows = vec![
            row(LedgerSide::Erp, 1, "FAC-1", "10"),
            row(LedgerSide::Erp, 2, "", "25"),
            row(LedgerSide::Erp, 3, "FAC-2", "0"),
            row(LedgerSide::Erp, 4, "", "0"),
        ];
        let classes = classify_rows(&rows);
        assert_eq!(classes.invoiced, vec![0]);
        assert_eq!(classes.payments, vec![1]);
        assert_eq!(classes.excluded, vec![2, 3]);
        assert_eq!(classes.usable_count(), 2);
    }

    #[test]
    fn test_reversal_nets_to_zero() {
        let rows = vec![
            row(LedgerSide::Erp, 1, "FAC-200", "300"),
            row(LedgerSide::Erp, 2, "FAC 200", "-300"),
        ];
        let classes = classify_rows(&rows);
        let entries = consolidate(&rows, &classes, &ToleranceConfig::default());
        assert!(entries.is_empty());
    }

    #[test]
    fn test_partial_credit_note_nets() {
        let rows = vec![
            row(LedgerSide::Vendor, 1, "CN-9", "-40"),
            row(LedgerSide::Vendor, 2, "INV-7", "99.99"),
            row(LedgerSide::Vendor, 3, "CN9", "140"),
            row(LedgerSide::Vendor, 4, "INV-7", "0.01"),
        ];
        let classes = classify_rows(&rows);
        let entries = consolidate(&rows, &classes, &ToleranceConfig::default());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].invoice_code_clean, "CN9");
        assert_eq!(entries[0].net_amount, BigDecimal::from(100));
        assert_eq!(entries[0].entry_count, 2);
        assert_eq!(entries[0].row_numbers, vec![1, 3]);
        // Positive posting represents the entry
        assert_eq!(entries[0].representative.row_number, 3);

        assert_eq!(entries[1].invoice_code_clean, "INV7");
        assert_eq!(entries[1].net_amount, BigDecimal::from(100));
    }

    #[test]
    fn test_net_credit_balance_is_absolute() {
        let rows = vec![row(LedgerSide::Erp, 1, "NC-5", "-75.50")];
        let classes = classify_rows(&rows);
        let entries = consolidate(&rows, &classes, &ToleranceConfig::default());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].net_amount, BigDecimal::from_str("75.50").unwrap());
        assert_eq!(entries[0].representative.row_number, 1);
    }

    #[test]
    fn test_payment_rows_in_order() {
        let rows = vec![
            row(LedgerSide::Erp, 1, "", "5"),
            row(LedgerSide::Erp, 2, "A1", "5"),
            row(LedgerSide::Erp, 3, "", "7"),
        ];
        let classes = classify_rows(&rows);
        let payments = payment_rows(&rows, &classes);
        let numbers: Vec<usize> = payments.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }
}
