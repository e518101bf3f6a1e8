//! Validation utilities

use bigdecimal::{BigDecimal, Zero};

use crate::config::ReconConfig;
use crate::normalize::RawTable;
use crate::report::MissingInvoiceRecord;
use crate::types::*;

/// Validate that a table has a usable header row
pub fn validate_table(table: &RawTable, side: LedgerSide) -> ReconResult<()> {
    if table.headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ReconError::InvalidInput(format!(
            "{} table has no header row",
            side
        )));
    }

    let width = table.headers.len();
    let ragged = table.rows.iter().filter(|r| r.len() != width).count();
    if ragged > 0 {
        tracing::debug!(side = %side, ragged, width, "rows with a different width than the header");
    }

    Ok(())
}

/// Validate that a tolerance is a non-negative amount
pub fn validate_tolerance(name: &str, value: &BigDecimal) -> ReconResult<()> {
    if *value < BigDecimal::zero() {
        Err(ReconError::Config(format!(
            "Tolerance '{}' cannot be negative",
            name
        )))
    } else {
        Ok(())
    }
}

/// Validate engine configuration before a run
pub fn validate_config(config: &ReconConfig) -> ReconResult<()> {
    let tol = &config.tolerances;
    validate_tolerance("perfect_match", &tol.perfect_match)?;
    validate_tolerance("zero_net", &tol.zero_net)?;
    validate_tolerance("fuzzy_max_delta", &tol.fuzzy_max_delta)?;
    validate_tolerance("payment", &tol.payment)?;

    if !(0.0..=1.0).contains(&tol.fuzzy_min_ratio) {
        return Err(ReconError::Config(format!(
            "fuzzy_min_ratio must be between 0 and 1, got {}",
            tol.fuzzy_min_ratio
        )));
    }

    if config.currency.trim().is_empty() {
        return Err(ReconError::Config("Currency cannot be empty".to_string()));
    }

    for (field, aliases) in &config.extra_aliases {
        if aliases.iter().any(|a| a.trim().is_empty()) {
            return Err(ReconError::Config(format!(
                "Empty alias configured for field {:?}",
                field
            )));
        }
    }

    Ok(())
}

/// Validate a record before a tracker accepts it
pub fn validate_missing_record(record: &MissingInvoiceRecord) -> ReconResult<()> {
    if record.invoice_number.trim().is_empty() {
        return Err(ReconError::Tracker(
            "Invoice number cannot be empty".to_string(),
        ));
    }

    if record.amount <= BigDecimal::zero() {
        return Err(ReconError::Tracker(format!(
            "Amount for invoice '{}' must be positive",
            record.invoice_number
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MissingDirection;
    use uuid::Uuid;

    #[test]
    fn test_validate_table() {
        let ok = RawTable::new(vec!["Invoice".into()], vec![vec!["A".into(), "extra".into()]]);
        assert!(validate_table(&ok, LedgerSide::Erp).is_ok());

        let headerless = RawTable::new(vec![], vec![vec!["A".into()]]);
        assert!(matches!(
            validate_table(&headerless, LedgerSide::Vendor),
            Err(ReconError::InvalidInput(_))
        ));

        let blank = RawTable::new(vec!["  ".into(), "".into()], vec![]);
        assert!(validate_table(&blank, LedgerSide::Erp).is_err());
    }

    #[test]
    fn test_validate_config() {
        assert!(validate_config(&ReconConfig::default()).is_ok());

        let mut negative = ReconConfig::default();
        negative.tolerances.payment = BigDecimal::from(-1);
        assert!(matches!(validate_config(&negative), Err(ReconError::Config(_))));

        let mut ratio = ReconConfig::default();
        ratio.tolerances.fuzzy_min_ratio = -0.1;
        assert!(validate_config(&ratio).is_err());

        let mut currency = ReconConfig::default();
        currency.currency = " ".to_string();
        assert!(validate_config(&currency).is_err());
    }

    #[test]
    fn test_validate_missing_record() {
        let mut record = MissingInvoiceRecord {
            external_ref: Uuid::nil(),
            invoice_number: "FAC-1".to_string(),
            vendor: "Acme".to_string(),
            entity: String::new(),
            amount: BigDecimal::from(10),
            currency: "EUR".to_string(),
            source: "RECON".to_string(),
            direction: MissingDirection::MissingInErp,
            date: None,
        };
        assert!(validate_missing_record(&record).is_ok());

        record.amount = BigDecimal::zero();
        assert!(validate_missing_record(&record).is_err());

        record.amount = BigDecimal::from(10);
        record.invoice_number = " ".to_string();
        assert!(validate_missing_record(&record).is_err());
    }
}
