//! Reconciliation orchestrator that runs the pipeline end to end

use crate::config::ReconConfig;
use crate::engine::{
    classify_rows, consolidate, default_policy, payment_rows, MatchOutcome, Matcher, RowClasses,
};
use crate::normalize::{normalize_table, AliasTable, RawTable};
use crate::report::{ReconciliationReport, ReportBuilder};
use crate::traits::AmountPolicy;
use crate::types::*;
use crate::utils::validate_config;

/// One side after normalization, classification and consolidation
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSide {
    pub side: LedgerSide,
    /// Every data row in input order, including unusable ones
    pub rows: Vec<LedgerRow>,
    pub classes: RowClasses,
    /// Net invoice balances in first-appearance order
    pub entries: Vec<ConsolidatedEntry>,
    /// Payment-only rows in input order
    pub payments: Vec<LedgerRow>,
}

impl PreparedSide {
    /// Rows whose amount resolved to zero, kept for audit
    pub fn excluded_rows(&self) -> impl Iterator<Item = &LedgerRow> {
        self.classes.excluded.iter().map(move |&i| &self.rows[i])
    }
}

/// Both sides ready for matching
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSides {
    pub erp: PreparedSide,
    pub vendor: PreparedSide,
}

/// Main reconciliation engine
///
/// Pure over its inputs: it reads two tables already parsed by the host and
/// returns a report. It holds no locks and writes nothing.
pub struct ReconciliationEngine {
    config: ReconConfig,
    aliases: AliasTable,
    erp_policy: Box<dyn AmountPolicy>,
    vendor_policy: Box<dyn AmountPolicy>,
}

impl ReconciliationEngine {
    /// Create an engine with the default accounting rules for each side
    pub fn new(config: ReconConfig) -> Self {
        Self::with_policies(
            config,
            default_policy(LedgerSide::Erp),
            default_policy(LedgerSide::Vendor),
        )
    }

    /// Create an engine with custom amount policies
    pub fn with_policies(
        config: ReconConfig,
        erp_policy: Box<dyn AmountPolicy>,
        vendor_policy: Box<dyn AmountPolicy>,
    ) -> Self {
        let aliases = AliasTable::with_extra(&config.extra_aliases);
        Self {
            config,
            aliases,
            erp_policy,
            vendor_policy,
        }
    }

    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    /// Normalize, classify and consolidate one side
    pub fn prepare_side(&self, table: &RawTable, side: LedgerSide) -> ReconResult<PreparedSide> {
        let policy = match side {
            LedgerSide::Erp => self.erp_policy.as_ref(),
            LedgerSide::Vendor => self.vendor_policy.as_ref(),
        };

        let rows = normalize_table(table, side, &self.aliases, policy)?;
        let classes = classify_rows(&rows);
        if classes.usable_count() == 0 {
            return Err(ReconError::EmptyInput { side });
        }

        let entries = consolidate(&rows, &classes, &self.config.tolerances);
        let payments = payment_rows(&rows, &classes);

        tracing::info!(
            side = %side,
            rows = rows.len(),
            invoiced = classes.invoiced.len(),
            payments = payments.len(),
            excluded = classes.excluded.len(),
            entries = entries.len(),
            "side prepared"
        );

        Ok(PreparedSide {
            side,
            rows,
            classes,
            entries,
            payments,
        })
    }

    /// Prepare both sides; the ERP side is checked first for emptiness
    pub fn prepare(&self, erp: &RawTable, vendor: &RawTable) -> ReconResult<PreparedSides> {
        validate_config(&self.config)?;

        // Worker threads do not inherit the caller's span
        let span = tracing::Span::current();
        let (erp, vendor) = rayon::join(
            || span.in_scope(|| self.prepare_side(erp, LedgerSide::Erp)),
            || span.in_scope(|| self.prepare_side(vendor, LedgerSide::Vendor)),
        );

        Ok(PreparedSides {
            erp: erp?,
            vendor: vendor?,
        })
    }

    /// Run the matcher over already prepared sides
    pub fn match_prepared(&self, prepared: &PreparedSides) -> MatchOutcome {
        Matcher::new(&self.config.tolerances).run(
            &prepared.erp.entries,
            &prepared.vendor.entries,
            &prepared.erp.payments,
            &prepared.vendor.payments,
        )
    }

    /// Prepare both tables and match them
    pub fn match_tables(&self, erp: &RawTable, vendor: &RawTable) -> ReconResult<MatchOutcome> {
        let prepared = self.prepare(erp, vendor)?;
        Ok(self.match_prepared(&prepared))
    }

    /// Full run: prepare, match and build the report
    pub fn reconcile(
        &self,
        erp: &RawTable,
        vendor: &RawTable,
        vendor_name: &str,
    ) -> ReconResult<ReconciliationReport> {
        let vendor_name = self.config.vendor_display_name(vendor_name);
        let span = tracing::info_span!("reconcile", vendor = vendor_name);
        let _guard = span.enter();

        let prepared = self.prepare(erp, vendor)?;
        let outcome = self.match_prepared(&prepared);
        let report =
            ReportBuilder::new(vendor_name, &self.config.tolerances).build(&prepared, &outcome);

        tracing::info!(
            perfect = report.summary.perfect_matches,
            differences = report.summary.difference_matches,
            payments = report.summary.payment_matches,
            missing_in_erp = report.summary.missing_in_erp,
            missing_in_vendor = report.summary.missing_in_vendor,
            "reconciliation complete"
        );

        Ok(report)
    }
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new(ReconConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_prepare_side_consolidates() {
        let engine = ReconciliationEngine::default();
        let erp = table(
            &["Invoice", "Debit", "Credit"],
            &[
                &["FAC-200", "", "300"],
                &["FAC-200", "300", ""],
                &["FAC-201", "", "80"],
                &["", "45", ""],
                &["FAC-202", "", ""],
            ],
        );

        let side = engine.prepare_side(&erp, LedgerSide::Erp).unwrap();
        assert_eq!(side.rows.len(), 5);
        assert_eq!(side.entries.len(), 1);
        assert_eq!(side.entries[0].invoice_code_clean, "FAC201");
        assert_eq!(side.entries[0].net_amount, BigDecimal::from(80));
        assert_eq!(side.payments.len(), 1);
        assert_eq!(side.excluded_rows().count(), 1);
    }

    #[test]
    fn test_empty_side_is_fatal() {
        let engine = ReconciliationEngine::default();
        let erp = table(&["Invoice", "Credit"], &[&["FAC-1", "10"]]);
        let vendor = table(&["Invoice", "Debit"], &[&["FAC-1", "0"], &["FAC-2", "n/a"]]);

        let err = engine.reconcile(&erp, &vendor, "Acme").unwrap_err();
        assert!(matches!(
            err,
            ReconError::EmptyInput {
                side: LedgerSide::Vendor
            }
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ReconConfig::default();
        config.tolerances.fuzzy_min_ratio = 1.5;
        let engine = ReconciliationEngine::new(config);

        let erp = table(&["Invoice", "Credit"], &[&["FAC-1", "10"]]);
        let vendor = table(&["Invoice", "Debit"], &[&["FAC-1", "10"]]);
        assert!(matches!(
            engine.match_tables(&erp, &vendor),
            Err(ReconError::Config(_))
        ));
    }

    #[test]
    fn test_extra_aliases_from_config() {
        let mut config = ReconConfig::default();
        config
            .extra_aliases
            .insert(CanonicalField::Invoice, vec!["beleg".to_string()]);
        let engine = ReconciliationEngine::new(config);

        let erp = table(&["Belegnummer", "Credit"], &[&["R-77", "10"]]);
        let side = engine.prepare_side(&erp, LedgerSide::Erp).unwrap();
        assert_eq!(side.entries[0].invoice_code_clean, "R77");
    }
}
