// warehouse-config - layered environment/file configuration
//
// Defaults, then an optional TOML file, then environment overrides
// (`WAREHOUSE_*`), then validation — the same priority order the teacher's
// `otlp2parquet-config` uses for its `RuntimeConfig`.

mod env_overrides;
mod sources;
mod validation;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use env_overrides::{EnvSource, ProcessEnv, ENV_PREFIX};

/// Top-level runtime configuration for the warehouse core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_alert_thresholds")]
    pub alert_thresholds: Vec<i64>,

    #[serde(default = "default_dead_stock_days")]
    pub dead_stock_days: i64,

    #[serde(default = "default_scheduler_enabled")]
    pub scheduler_enabled: bool,

    #[serde(default = "default_history_page_size_cap")]
    pub history_page_size_cap: usize,

    #[serde(default)]
    pub numbering: NumberingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NumberingConfig {
    #[serde(default = "default_document_number_width")]
    pub batch_number_width: usize,
    #[serde(default = "default_document_number_width")]
    pub grn_number_width: usize,
    #[serde(default = "default_document_number_width")]
    pub dispatch_number_width: usize,
    #[serde(default = "default_delivery_note_number_width")]
    pub delivery_note_number_width: usize,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            batch_number_width: default_document_number_width(),
            grn_number_width: default_document_number_width(),
            dispatch_number_width: default_document_number_width(),
            delivery_note_number_width: default_delivery_note_number_width(),
        }
    }
}

fn default_currency() -> String {
    "ILS".to_string()
}

fn default_alert_thresholds() -> Vec<i64> {
    vec![120, 90, 60, 30]
}

fn default_dead_stock_days() -> i64 {
    180
}

/// `true` outside test builds; tests default to `false` so unit/integration
/// suites never accidentally spin up a background scheduler thread.
fn default_scheduler_enabled() -> bool {
    !cfg!(test)
}

fn default_history_page_size_cap() -> usize {
    500
}

fn default_document_number_width() -> usize {
    3
}

fn default_delivery_note_number_width() -> usize {
    4
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            alert_thresholds: default_alert_thresholds(),
            dead_stock_days: default_dead_stock_days(),
            scheduler_enabled: default_scheduler_enabled(),
            history_page_size_cap: default_history_page_size_cap(),
            numbering: NumberingConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Loads configuration from the default file/env search path.
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Loads configuration from an explicit TOML file, still applying
    /// environment overrides and validation on top.
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Applies environment overrides from a custom source (used in tests
    /// and by callers that don't want to touch the real process env).
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_values() {
        let config = RuntimeConfig::default();
        assert_eq!(config.currency, "ILS");
        assert_eq!(config.alert_thresholds, vec![120, 90, 60, 30]);
        assert_eq!(config.dead_stock_days, 180);
        assert_eq!(config.history_page_size_cap, 500);
        assert_eq!(config.numbering.delivery_note_number_width, 4);
        assert_eq!(config.numbering.batch_number_width, 3);
        assert!(!config.scheduler_enabled, "test builds default the scheduler off");
    }

    #[test]
    fn deserializes_partial_toml_with_field_defaults() {
        let config: RuntimeConfig = toml::from_str("currency = \"EUR\"").unwrap();
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.dead_stock_days, 180);
    }
}
