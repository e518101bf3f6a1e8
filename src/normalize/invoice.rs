//! Invoice reference cleanup

/// Strip everything but letters and digits and uppercase the rest
///
/// `"fac-100 "` and `"FAC 100"` both become `"FAC100"`. An empty result
/// means the row carries no invoice reference.
pub fn clean_invoice_code(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}
