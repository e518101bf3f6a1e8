//! Locale-tolerant amount parsing for spreadsheet cells

use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;

use crate::types::*;

/// Parse a monetary cell written in European (`1.234,56`) or US (`1,234.56`) style
///
/// When both separators appear, the later one is the decimal point. A lone
/// comma is a decimal point. A separator repeated with no other separator
/// present is a thousands separator. Negatives may be written with a minus
/// sign anywhere in the cell, or wrapped in parentheses. Blank cells are zero.
pub fn parse_amount(value: &str) -> ReconResult<BigDecimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(BigDecimal::zero());
    }

    let negative = trimmed.contains('-') || (trimmed.starts_with('(') && trimmed.ends_with(')'));

    let kept: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if !kept.chars().any(|c| c.is_ascii_digit()) {
        return Err(ReconError::Parse(format!("no digits in amount '{}'", trimmed)));
    }

    let normalized = normalize_separators(&kept);
    let magnitude = BigDecimal::from_str(&normalized)
        .map_err(|e| ReconError::Parse(format!("invalid amount '{}': {}", trimmed, e)))?;

    Ok(if negative { -magnitude } else { magnitude })
}

/// Parse a cell, treating failures as zero
pub fn parse_amount_or_zero(value: &str) -> BigDecimal {
    match parse_amount(value) {
        Ok(amount) => amount,
        Err(e) => {
            tracing::debug!(cell = value, error = %e, "treating unparseable amount as zero");
            BigDecimal::zero()
        }
    }
}

/// Rewrite digits and separators into a plain `1234.56` form
fn normalize_separators(s: &str) -> String {
    let commas = s.matches(',').count();
    let dots = s.matches('.').count();

    let decimal = match (commas, dots) {
        (1, 0) => Some(','),
        (0, 1) => Some('.'),
        // Repeated single separator is grouping only
        (_, 0) | (0, _) => None,
        _ if s.rfind(',') > s.rfind('.') => Some(','),
        _ => Some('.'),
    };
    let decimal_at = decimal.and_then(|d| s.rfind(d));

    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if Some(i) == decimal_at {
            out.push('.');
        }
    }

    if out.starts_with('.') {
        out.insert(0, '0');
    }
    if out.ends_with('.') {
        out.pop();
    }
    out
}
