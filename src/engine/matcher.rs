//! Three-tier matching of consolidated invoices and payment-only rows

use bigdecimal::BigDecimal;
use std::collections::HashMap;

use crate::config::ToleranceConfig;
use crate::engine::code_similarity;
use crate::types::*;

/// Every record produced by one matcher run, in emission order
///
/// Order: Tier 1 matches, Tier 2 matches, missing in vendor, missing in
/// ERP, payment matches, unmatched ERP payments, unmatched vendor payments.
/// Within each group records follow input order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct MatchOutcome {
    pub records: Vec<MatchRecord>,
}

impl MatchOutcome {
    /// Invoice matches produced by a given tier
    pub fn invoice_matches(&self, tier: MatchTier) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, MatchRecord::InvoiceMatch { tier: t, .. } if *t == tier))
            .count()
    }

    /// Payment-only rows matched across sides
    pub fn payment_matches(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, MatchRecord::PaymentMatch { .. }))
            .count()
    }

    /// Vendor invoices with no ERP counterpart
    pub fn missing_in_erp(&self) -> impl Iterator<Item = &ConsolidatedEntry> {
        self.records.iter().filter_map(|r| match r {
            MatchRecord::MissingInErp { vendor_entry } => Some(vendor_entry),
            _ => None,
        })
    }

    /// ERP invoices with no vendor counterpart
    pub fn missing_in_vendor(&self) -> impl Iterator<Item = &ConsolidatedEntry> {
        self.records.iter().filter_map(|r| match r {
            MatchRecord::MissingInVendor { erp_entry } => Some(erp_entry),
            _ => None,
        })
    }

    /// Payment-only rows left without a counterpart
    pub fn unmatched_payments(&self) -> impl Iterator<Item = &LedgerRow> {
        self.records.iter().filter_map(|r| match r {
            MatchRecord::UnmatchedPayment { row } => Some(row),
            _ => None,
        })
    }
}

/// Consumption flags for one side, indexed like the side's entries
struct Consumed(Vec<bool>);

impl Consumed {
    fn new(len: usize) -> Self {
        Self(vec![false; len])
    }

    fn is_used(&self, idx: usize) -> bool {
        self.0[idx]
    }

    fn take(&mut self, idx: usize) {
        self.0[idx] = true;
    }

    fn remaining(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(idx, _)| idx)
    }
}

/// Runs the exact, fuzzy and payment tiers against one pair of sides
pub struct Matcher<'a> {
    tolerances: &'a ToleranceConfig,
}

impl<'a> Matcher<'a> {
    pub fn new(tolerances: &'a ToleranceConfig) -> Self {
        Self { tolerances }
    }

    /// Run all tiers and classify leftovers
    ///
    /// Tiers 1 and 2 run in sequence on the invoice entries while Tier 3
    /// runs concurrently on the payment-only rows; results are merged after
    /// both finish.
    pub fn run(
        &self,
        erp_entries: &[ConsolidatedEntry],
        vendor_entries: &[ConsolidatedEntry],
        erp_payments: &[LedgerRow],
        vendor_payments: &[LedgerRow],
    ) -> MatchOutcome {
        let span = tracing::Span::current();
        let (mut records, payments) = rayon::join(
            || span.in_scope(|| self.match_invoices(erp_entries, vendor_entries)),
            || span.in_scope(|| self.match_payments(erp_payments, vendor_payments)),
        );
        records.extend(payments);
        MatchOutcome { records }
    }

    /// Tier 1 (exact code), Tier 2 (fuzzy code), then missing-invoice leftovers
    pub fn match_invoices(
        &self,
        erp: &[ConsolidatedEntry],
        vendor: &[ConsolidatedEntry],
    ) -> Vec<MatchRecord> {
        let mut erp_used = Consumed::new(erp.len());
        let mut vendor_used = Consumed::new(vendor.len());
        let mut records = Vec::with_capacity(erp.len() + vendor.len());

        // Tier 1
        let mut vendor_by_code: HashMap<&str, usize> = HashMap::with_capacity(vendor.len());
        for (vi, entry) in vendor.iter().enumerate() {
            vendor_by_code
                .entry(entry.invoice_code_clean.as_str())
                .or_insert(vi);
        }
        for (ei, erp_entry) in erp.iter().enumerate() {
            let Some(&vi) = vendor_by_code.get(erp_entry.invoice_code_clean.as_str()) else {
                continue;
            };
            if vendor_used.is_used(vi) {
                continue;
            }
            erp_used.take(ei);
            vendor_used.take(vi);
            records.push(invoice_match(erp_entry, &vendor[vi], MatchTier::Exact, 1.0));
        }
        let exact = records.len();

        // Tier 2
        for (ei, erp_entry) in erp.iter().enumerate() {
            if erp_used.is_used(ei) {
                continue;
            }
            let mut best: Option<(usize, f64)> = None;

            for vi in vendor_used.remaining() {
                let vendor_entry = &vendor[vi];
                let delta = (&erp_entry.net_amount - &vendor_entry.net_amount).abs();
                if delta >= self.tolerances.fuzzy_max_delta {
                    continue;
                }
                let ratio = code_similarity(
                    &erp_entry.invoice_code_clean,
                    &vendor_entry.invoice_code_clean,
                );
                if ratio <= self.tolerances.fuzzy_min_ratio {
                    continue;
                }
                // Strictly greater keeps the first best candidate
                if best.map_or(true, |(_, best_ratio)| ratio > best_ratio) {
                    best = Some((vi, ratio));
                }
            }

            if let Some((vi, ratio)) = best {
                erp_used.take(ei);
                vendor_used.take(vi);
                records.push(invoice_match(erp_entry, &vendor[vi], MatchTier::Fuzzy, ratio));
            }
        }
        let fuzzy = records.len() - exact;

        let missing_in_vendor: Vec<MatchRecord> = erp_used
            .remaining()
            .map(|ei| MatchRecord::MissingInVendor {
                erp_entry: erp[ei].clone(),
            })
            .collect();
        let missing_in_erp: Vec<MatchRecord> = vendor_used
            .remaining()
            .map(|vi| MatchRecord::MissingInErp {
                vendor_entry: vendor[vi].clone(),
            })
            .collect();

        tracing::info!(
            exact,
            fuzzy,
            missing_in_vendor = missing_in_vendor.len(),
            missing_in_erp = missing_in_erp.len(),
            "invoice tiers complete"
        );

        records.extend(missing_in_vendor);
        records.extend(missing_in_erp);
        records
    }

    /// Tier 3: amount-only matching of payment rows, first match wins
    pub fn match_payments(&self, erp: &[LedgerRow], vendor: &[LedgerRow]) -> Vec<MatchRecord> {
        let mut vendor_used = Consumed::new(vendor.len());
        let mut matched = Vec::new();
        let mut unmatched_erp = Vec::new();

        for erp_row in erp {
            let hit = vendor_used.remaining().find(|&vi| {
                (&erp_row.amount - &vendor[vi].amount).abs() <= self.tolerances.payment
            });
            match hit {
                Some(vi) => {
                    vendor_used.take(vi);
                    matched.push(MatchRecord::PaymentMatch {
                        erp_row: erp_row.clone(),
                        vendor_row: vendor[vi].clone(),
                        amount: erp_row.amount.clone(),
                    });
                }
                None => unmatched_erp.push(MatchRecord::UnmatchedPayment {
                    row: erp_row.clone(),
                }),
            }
        }

        let unmatched_vendor: Vec<MatchRecord> = vendor_used
            .remaining()
            .map(|vi| MatchRecord::UnmatchedPayment {
                row: vendor[vi].clone(),
            })
            .collect();

        tracing::info!(
            matched = matched.len(),
            unmatched_erp = unmatched_erp.len(),
            unmatched_vendor = unmatched_vendor.len(),
            "payment tier complete"
        );

        matched.extend(unmatched_erp);
        matched.extend(unmatched_vendor);
        matched
    }
}

fn invoice_match(
    erp_entry: &ConsolidatedEntry,
    vendor_entry: &ConsolidatedEntry,
    tier: MatchTier,
    similarity: f64,
) -> MatchRecord {
    let amount_delta: BigDecimal = (&erp_entry.net_amount - &vendor_entry.net_amount).abs();
    MatchRecord::InvoiceMatch {
        erp_entry: erp_entry.clone(),
        vendor_entry: vendor_entry.clone(),
        amount_delta,
        tier,
        similarity,
    }
}
