//! Per-side amount resolution from debit, credit and amount cells

use bigdecimal::{BigDecimal, Zero};

use crate::traits::AmountPolicy;
use crate::types::*;

/// Internal liability ledger (accounts payable)
///
/// A credit raises what is owed to the vendor, so credits are invoices and
/// debits are credit notes or payments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErpAmountPolicy;

impl AmountPolicy for ErpAmountPolicy {
    fn side(&self) -> LedgerSide {
        LedgerSide::Erp
    }

    fn resolve(&self, cells: &MonetaryCells) -> BigDecimal {
        if !cells.amount.is_zero() {
            cells.amount.clone()
        } else if !cells.credit.is_zero() {
            // A negative credit is already a reversal
            cells.credit.clone()
        } else if !cells.debit.is_zero() {
            -cells.debit.abs()
        } else {
            BigDecimal::zero()
        }
    }
}

/// Vendor statement (the counterparty's receivables view)
///
/// The vendor debits what they say is owed and credits notes and receipts.
#[derive(Debug, Clone, Copy, Default)]
pub struct VendorAmountPolicy;

impl AmountPolicy for VendorAmountPolicy {
    fn side(&self) -> LedgerSide {
        LedgerSide::Vendor
    }

    fn resolve(&self, cells: &MonetaryCells) -> BigDecimal {
        if !cells.amount.is_zero() {
            cells.amount.clone()
        } else if !cells.debit.is_zero() {
            cells.debit.clone()
        } else if !cells.credit.is_zero() {
            -cells.credit.abs()
        } else {
            BigDecimal::zero()
        }
    }
}

/// Default policy for a side
pub fn default_policy(side: LedgerSide) -> Box<dyn AmountPolicy> {
    match side {
        LedgerSide::Erp => Box::new(ErpAmountPolicy),
        LedgerSide::Vendor => Box::new(VendorAmountPolicy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(amount: i64, debit: i64, credit: i64) -> MonetaryCells {
        MonetaryCells::new(
            BigDecimal::from(amount),
            BigDecimal::from(debit),
            BigDecimal::from(credit),
        )
    }

    #[test]
    fn test_erp_credit_is_invoice() {
        let policy = ErpAmountPolicy;
        assert_eq!(policy.resolve(&cells(0, 0, 500)), BigDecimal::from(500));
        assert_eq!(policy.resolve(&cells(0, 300, 0)), BigDecimal::from(-300));
        assert_eq!(policy.resolve(&cells(0, -300, 0)), BigDecimal::from(-300));
        assert_eq!(policy.resolve(&cells(0, 0, -40)), BigDecimal::from(-40));
    }

    #[test]
    fn test_vendor_debit_is_invoice() {
        let policy = VendorAmountPolicy;
        assert_eq!(policy.resolve(&cells(0, 500, 0)), BigDecimal::from(500));
        assert_eq!(policy.resolve(&cells(0, 0, 120)), BigDecimal::from(-120));
        assert_eq!(policy.resolve(&cells(0, -75, 0)), BigDecimal::from(-75));
    }

    #[test]
    fn test_direct_amount_takes_precedence() {
        assert_eq!(ErpAmountPolicy.resolve(&cells(80, 5, 6)), BigDecimal::from(80));
        assert_eq!(VendorAmountPolicy.resolve(&cells(-80, 5, 6)), BigDecimal::from(-80));
    }

    #[test]
    fn test_all_zero_is_unusable() {
        assert!(ErpAmountPolicy.resolve(&MonetaryCells::default()).is_zero());
        assert!(VendorAmountPolicy.resolve(&MonetaryCells::default()).is_zero());
        assert_eq!(default_policy(LedgerSide::Vendor).side(), LedgerSide::Vendor);
    }
}
