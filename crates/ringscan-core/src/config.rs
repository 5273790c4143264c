//! Planner configuration.
//!
//! ```toml
//! max_partition_key_combinations = 2048
//! on_cardinality_exceeded = "full_scan"
//! ```

use crate::error::InternalError;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Default bound on the number of partition keys one plan may resolve.
pub const DEFAULT_MAX_PARTITION_KEY_COMBINATIONS: u64 = 10_000;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("toml parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("max_partition_key_combinations must be at least 1")]
    ZeroCombinationLimit,
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::config_invalid(err.to_string())
    }
}

///
/// CardinalityPolicy
///
/// What the planner does when the Cartesian product of pinned values would
/// exceed `max_partition_key_combinations`.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardinalityPolicy {
    /// Fail the plan with `PlanError::CardinalityExceeded`.
    #[default]
    Reject,
    /// Drop partition-key narrowing and scan every split.
    FullScan,
}

///
/// PlannerConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    pub max_partition_key_combinations: u64,
    pub on_cardinality_exceeded: CardinalityPolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_partition_key_combinations: DEFAULT_MAX_PARTITION_KEY_COMBINATIONS,
            on_cardinality_exceeded: CardinalityPolicy::default(),
        }
    }
}

impl PlannerConfig {
    /// Parse and validate a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.max_partition_key_combinations == 0 {
            return Err(ConfigError::ZeroCombinationLimit);
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_max_partition_key_combinations(mut self, limit: u64) -> Self {
        self.max_partition_key_combinations = limit;
        self
    }

    #[must_use]
    pub const fn with_cardinality_policy(mut self, policy: CardinalityPolicy) -> Self {
        self.on_cardinality_exceeded = policy;
        self
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = PlannerConfig::from_toml_str("").unwrap();

        assert_eq!(config, PlannerConfig::default());
        assert_eq!(
            config.max_partition_key_combinations,
            DEFAULT_MAX_PARTITION_KEY_COMBINATIONS
        );
        assert_eq!(config.on_cardinality_exceeded, CardinalityPolicy::Reject);
    }

    #[test]
    fn parses_all_fields() {
        let config = PlannerConfig::from_toml_str(
            "max_partition_key_combinations = 16\non_cardinality_exceeded = \"full_scan\"\n",
        )
        .unwrap();

        assert_eq!(config.max_partition_key_combinations, 16);
        assert_eq!(config.on_cardinality_exceeded, CardinalityPolicy::FullScan);
    }

    #[test]
    fn rejects_unknown_keys_and_zero_limit() {
        assert!(matches!(
            PlannerConfig::from_toml_str("max_in_list = 3"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            PlannerConfig::from_toml_str("max_partition_key_combinations = 0"),
            Err(ConfigError::ZeroCombinationLimit)
        ));
    }
}
