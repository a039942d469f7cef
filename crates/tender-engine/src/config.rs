//! Engine configuration.
//!
//! Loaded from TOML, every key optional:
//!
//! ```toml
//! name = "nightly-batch"
//! sanity_factor = 50
//! suspicious_pct = 500
//! persist_policy = "only_complete"
//!
//! [rollup]
//! parallel = true
//! parallel_threshold = 500
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tender_rollup::RollupConfig;

use crate::error::EngineError;

/// When a recalculation result is handed to the sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistPolicy {
    /// Persist even when some items were rejected.
    Always,
    /// Persist only when every item was priced.
    #[default]
    OnlyComplete,
    /// Never persist; callers inspect the report.
    Never,
}

impl PersistPolicy {
    /// Whether a report with the given completeness should be stored.
    pub fn allows(self, complete: bool) -> bool {
        match self {
            PersistPolicy::Always => true,
            PersistPolicy::OnlyComplete => complete,
            PersistPolicy::Never => false,
        }
    }
}

/// Recalculation engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Label used in logs.
    pub name: String,

    /// An item fails its sanity check when commercial exceeds this multiple of base.
    pub sanity_factor: Decimal,

    /// Percentages above this value are logged as suspicious.
    pub suspicious_pct: Decimal,

    /// Persistence policy.
    pub persist_policy: PersistPolicy,

    /// Aggregation settings.
    pub rollup: RollupConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "tender-engine".to_string(),
            sanity_factor: Decimal::from(50),
            suspicious_pct: Decimal::from(500),
            persist_policy: PersistPolicy::default(),
            rollup: RollupConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sanity factor.
    #[must_use]
    pub fn with_sanity_factor(mut self, factor: Decimal) -> Self {
        self.sanity_factor = factor;
        self
    }

    /// Sets the suspicious percentage threshold.
    #[must_use]
    pub fn with_suspicious_pct(mut self, pct: Decimal) -> Self {
        self.suspicious_pct = pct;
        self
    }

    /// Sets the persistence policy.
    #[must_use]
    pub fn with_persist_policy(mut self, policy: PersistPolicy) -> Self {
        self.persist_policy = policy;
        self
    }

    /// Sets the rollup configuration.
    #[must_use]
    pub fn with_rollup(mut self, rollup: RollupConfig) -> Self {
        self.rollup = rollup;
        self
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        let config: Self =
            toml::from_str(s).map_err(|e| EngineError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sanity_factor <= Decimal::ONE {
            return Err(EngineError::ConfigError(format!(
                "sanity_factor must be greater than 1, got {}",
                self.sanity_factor
            )));
        }
        if self.suspicious_pct < Decimal::ZERO {
            return Err(EngineError::ConfigError(format!(
                "suspicious_pct must not be negative, got {}",
                self.suspicious_pct
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default() {
        let config = EngineConfig::default();
        assert_eq!(config.sanity_factor, dec!(50));
        assert_eq!(config.suspicious_pct, dec!(500));
        assert_eq!(config.persist_policy, PersistPolicy::OnlyComplete);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            name = "nightly"
            sanity_factor = 20
            persist_policy = "always"

            [rollup]
            parallel = false
            "#,
        )
        .unwrap();

        assert_eq!(config.name, "nightly");
        assert_eq!(config.sanity_factor, dec!(20));
        assert_eq!(config.suspicious_pct, dec!(500));
        assert_eq!(config.persist_policy, PersistPolicy::Always);
        assert!(!config.rollup.parallel);
        assert_eq!(config.rollup.parallel_threshold, 500);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_rejects_tiny_sanity_factor() {
        let err = EngineConfig::from_toml_str("sanity_factor = 1").unwrap_err();
        assert!(err.to_string().contains("sanity_factor"));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(EngineConfig::from_toml_str(r#"persist_policy = "sometimes""#).is_err());
    }

    #[test]
    fn test_persist_policy_allows() {
        assert!(PersistPolicy::Always.allows(false));
        assert!(PersistPolicy::OnlyComplete.allows(true));
        assert!(!PersistPolicy::OnlyComplete.allows(false));
        assert!(!PersistPolicy::Never.allows(true));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "suspicious_pct = 300\n").unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.suspicious_pct, dec!(300));

        assert!(EngineConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
