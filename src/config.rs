//! Engine configuration: matching tolerances, alias extensions and defaults

use bigdecimal::BigDecimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::types::*;

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    pub tolerances: ToleranceConfig,
    /// Currency stamped on records handed to the workflow tracker
    pub currency: String,
    /// Vendor display name used when the caller supplies a blank one
    pub default_vendor_name: String,
    /// Additional lowercase aliases appended to the built-in table
    pub extra_aliases: BTreeMap<CanonicalField, Vec<String>>,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            tolerances: ToleranceConfig::default(),
            currency: "EUR".to_string(),
            default_vendor_name: "Unknown Vendor".to_string(),
            extra_aliases: BTreeMap::new(),
        }
    }
}

/// Numeric thresholds used by consolidation and matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    /// Tier 1 deltas at or below this are perfect matches
    #[serde(deserialize_with = "decimal_from_any")]
    pub perfect_match: BigDecimal,
    /// Consolidated sums with absolute value below this are dropped as settled
    #[serde(deserialize_with = "decimal_from_any")]
    pub zero_net: BigDecimal,
    /// Tier 2 requires a similarity ratio strictly above this
    pub fuzzy_min_ratio: f64,
    /// Tier 2 requires an amount delta strictly below this
    #[serde(deserialize_with = "decimal_from_any")]
    pub fuzzy_max_delta: BigDecimal,
    /// Tier 3 requires an amount delta at or below this
    #[serde(deserialize_with = "decimal_from_any")]
    pub payment: BigDecimal,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            perfect_match: cents(1),
            zero_net: cents(1),
            fuzzy_min_ratio: 0.85,
            fuzzy_max_delta: BigDecimal::from(10),
            payment: cents(1),
        }
    }
}

/// Read a tolerance from a string, integer or float value
///
/// Floats go through their shortest decimal form, so `0.01` in a config
/// file is exactly one cent.
fn decimal_from_any<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = BigDecimal;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal number or numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(BigDecimal::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(BigDecimal::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if !v.is_finite() {
                return Err(E::custom(format!("tolerance must be finite, got {}", v)));
            }
            BigDecimal::from_str(&v.to_string()).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            BigDecimal::from_str(v.trim()).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(DecimalVisitor)
}

/// Build a decimal from a whole number of cents
pub(crate) fn cents(n: i64) -> BigDecimal {
    BigDecimal::from(n) / BigDecimal::from(100)
}

impl ReconConfig {
    /// Load configuration from an optional file, overridden by `RECON__*` environment variables
    ///
    /// Nested keys use a double underscore, e.g. `RECON__TOLERANCES__FUZZY_MIN_RATIO=0.9`.
    pub fn load(path: Option<&Path>) -> ReconResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix("RECON")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| ReconError::Config(e.to_string()))?;

        let config: ReconConfig = settings
            .try_deserialize()
            .map_err(|e| ReconError::Config(e.to_string()))?;
        crate::utils::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> ReconResult<Self> {
        Self::load(None)
    }

    /// Vendor display name to use for a run
    pub fn vendor_display_name<'a>(&'a self, supplied: &'a str) -> &'a str {
        let trimmed = supplied.trim();
        if trimmed.is_empty() {
            &self.default_vendor_name
        } else {
            trimmed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ReconciliationEngine;
    use crate::normalize::RawTable;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_tolerances() {
        let tol = ToleranceConfig::default();
        assert_eq!(tol.perfect_match, BigDecimal::from_str("0.01").unwrap());
        assert_eq!(tol.zero_net, BigDecimal::from_str("0.01").unwrap());
        assert_eq!(tol.fuzzy_max_delta, BigDecimal::from(10));
        assert_eq!(tol.payment, BigDecimal::from_str("0.01").unwrap());
        assert!((tol.fuzzy_min_ratio - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_vendor_display_name_fallback() {
        let config = ReconConfig::default();
        assert_eq!(config.vendor_display_name("  "), "Unknown Vendor");
        assert_eq!(config.vendor_display_name(" Acme SL "), "Acme SL");
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_load_without_sources_gives_defaults() {
        let config = ReconConfig::load(None).unwrap();
        assert_eq!(config.currency, "EUR");
    }

    #[test]
    #[serial]
    fn test_load_file_keeps_exact_tolerances() {
        let file = toml_file(
            r#"
currency = "USD"

[tolerances]
zero_net = 0.01
perfect_match = 0.01
payment = 0.05
fuzzy_max_delta = 10

[extra_aliases]
invoice = ["beleg"]
"#,
        );

        let config = ReconConfig::load(Some(file.path())).unwrap();
        let tol = &config.tolerances;
        assert_eq!(config.currency, "USD");
        assert_eq!(tol.zero_net.to_string(), "0.01");
        assert_eq!(tol.perfect_match, BigDecimal::from_str("0.01").unwrap());
        assert_eq!(tol.payment, BigDecimal::from_str("0.05").unwrap());
        assert_eq!(tol.fuzzy_max_delta, BigDecimal::from(10));
        assert_eq!(
            config.extra_aliases.get(&CanonicalField::Invoice),
            Some(&vec!["beleg".to_string()])
        );
    }

    #[test]
    #[serial]
    fn test_one_cent_invoice_survives_file_config() {
        let file = toml_file("[tolerances]\nzero_net = 0.01\nperfect_match = 0.01\n");
        let config = ReconConfig::load(Some(file.path())).unwrap();

        let rows = vec![
            vec!["FAC-1".to_string(), "0.01".to_string()],
            vec!["FAC-2".to_string(), "5".to_string()],
        ];
        let erp = RawTable::new(vec!["Invoice".into(), "Credit".into()], rows.clone());
        let vendor = RawTable::new(vec!["Invoice".into(), "Debit".into()], rows);

        let report = ReconciliationEngine::new(config)
            .reconcile(&erp, &vendor, "Acme")
            .unwrap();
        assert_eq!(report.summary.perfect_matches, 2);
        assert_eq!(report.summary.missing_in_erp, 0);
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        let file = toml_file("[tolerances]\nfuzzy_min_ratio = 0.85\n");
        std::env::set_var("RECON__TOLERANCES__FUZZY_MIN_RATIO", "0.9");
        std::env::set_var("RECON__TOLERANCES__PAYMENT", "0.5");
        let loaded = ReconConfig::load(Some(file.path()));
        std::env::remove_var("RECON__TOLERANCES__FUZZY_MIN_RATIO");
        std::env::remove_var("RECON__TOLERANCES__PAYMENT");

        let config = loaded.unwrap();
        assert!((config.tolerances.fuzzy_min_ratio - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.tolerances.payment, BigDecimal::from_str("0.5").unwrap());
    }

    #[test]
    #[serial]
    fn test_out_of_range_file_value_rejected() {
        let file = toml_file("[tolerances]\nfuzzy_min_ratio = 2.0\n");
        assert!(matches!(
            ReconConfig::load(Some(file.path())),
            Err(ReconError::Config(_))
        ));
    }
}
