//! Missing-invoice records handed to a workflow tracker

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::report::MissingInvoiceRow;

/// Source tag stamped on every record produced by the engine
pub const RECORD_SOURCE: &str = "RECON";

/// Which statement lacks the invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDirection {
    /// On the vendor statement, not in the ERP export
    MissingInErp,
    /// In the ERP export, not on the vendor statement
    MissingInVendor,
}

impl MissingDirection {
    pub fn label(&self) -> &'static str {
        match self {
            MissingDirection::MissingInErp => "missing_in_erp",
            MissingDirection::MissingInVendor => "missing_in_vendor",
        }
    }
}

impl fmt::Display for MissingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A missing invoice in the shape a tracker stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingInvoiceRecord {
    /// Stable reference; the same invoice always yields the same value
    pub external_ref: Uuid,
    pub invoice_number: String,
    pub vendor: String,
    /// Empty when the statement carries no entity column
    pub entity: String,
    pub amount: BigDecimal,
    pub currency: String,
    pub source: String,
    pub direction: MissingDirection,
    pub date: Option<String>,
}

impl MissingInvoiceRecord {
    /// Build a record from a report row
    pub fn from_row(row: &MissingInvoiceRow, direction: MissingDirection, currency: &str) -> Self {
        Self {
            external_ref: external_ref(&row.vendor, direction, &row.invoice_code),
            invoice_number: row.invoice.clone(),
            vendor: row.vendor.clone(),
            entity: row.entity.clone().unwrap_or_default(),
            amount: row.amount.clone(),
            currency: currency.to_string(),
            source: RECORD_SOURCE.to_string(),
            direction,
            date: row.date.clone(),
        }
    }
}

/// Name-based reference over vendor, direction and cleaned invoice code
pub fn external_ref(vendor: &str, direction: MissingDirection, invoice_code: &str) -> Uuid {
    let name = format!("{}|{}|{}", vendor, direction.label(), invoice_code);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_row(invoice: &str, code: &str) -> MissingInvoiceRow {
        MissingInvoiceRow {
            invoice: invoice.to_string(),
            invoice_code: code.to_string(),
            amount: BigDecimal::from(120),
            date: Some("2024-03-01".to_string()),
            vendor: "Acme SL".to_string(),
            entity: None,
            description: None,
            entry_count: 1,
        }
    }

    #[test]
    fn test_record_fields() {
        let record = MissingInvoiceRecord::from_row(
            &missing_row("FAC-77", "FAC77"),
            MissingDirection::MissingInVendor,
            "EUR",
        );
        assert_eq!(record.invoice_number, "FAC-77");
        assert_eq!(record.source, "RECON");
        assert_eq!(record.currency, "EUR");
        assert_eq!(record.entity, "");
        assert_eq!(record.amount, BigDecimal::from(120));
    }

    #[test]
    fn test_external_ref_is_stable() {
        let a = external_ref("Acme SL", MissingDirection::MissingInErp, "FAC77");
        let b = external_ref("Acme SL", MissingDirection::MissingInErp, "FAC77");
        assert_eq!(a, b);

        assert_ne!(a, external_ref("Acme SL", MissingDirection::MissingInVendor, "FAC77"));
        assert_ne!(a, external_ref("Other", MissingDirection::MissingInErp, "FAC77"));
    }
}
