//! Reconciliation engine: amount resolution, consolidation and tiered matching

pub mod consolidate;
pub mod core;
pub mod matcher;
pub mod resolver;
pub mod similarity;

pub use consolidate::*;
pub use self::core::*;
pub use matcher::*;
pub use resolver::*;
pub use similarity::*;

#[cfg(test)]
pub(crate) mod fixtures {
    use bigdecimal::BigDecimal;
    use indexmap::IndexMap;
    use std::str::FromStr;

    use crate::normalize::clean_invoice_code;
    use crate::types::*;

    /// Minimal row with a signed amount, as the resolver would produce it
    pub(crate) fn row(side: LedgerSide, row_number: usize, code: &str, signed: &str) -> LedgerRow {
        let signed_amount = BigDecimal::from_str(signed).unwrap();
        LedgerRow {
            row_number,
            side,
            raw_fields: IndexMap::new(),
            invoice_code_raw: code.to_string(),
            invoice_code_clean: clean_invoice_code(code),
            amount: signed_amount.abs(),
            signed_amount,
            date: None,
            description: None,
            vendor_name: None,
            entity: None,
        }
    }
}
