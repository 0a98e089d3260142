use crate::RuntimeConfig;
use anyhow::{anyhow, Context, Result};

pub const ENV_PREFIX: &str = "WAREHOUSE_";

/// Abstraction over environment-variable lookups, mirroring the teacher's
/// `EnvSource` split so tests can supply a fake source instead of touching
/// the process environment.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(format!("{ENV_PREFIX}{key}")).ok()
    }
}

/// Applies environment-variable overrides (highest priority) onto `config`.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    if let Some(val) = get_env_string(env, "CURRENCY") {
        config.currency = val;
    }
    if let Some(val) = get_env_i64(env, "DEAD_STOCK_DAYS")? {
        config.dead_stock_days = val;
    }
    if let Some(val) = get_env_bool(env, "SCHEDULER_ENABLED")? {
        config.scheduler_enabled = val;
    }
    if let Some(val) = get_env_usize(env, "HISTORY_PAGE_SIZE_CAP")? {
        config.history_page_size_cap = val;
    }
    if let Some(val) = get_env_string(env, "ALERT_THRESHOLDS") {
        config.alert_thresholds = parse_thresholds(&val)?;
    }
    if let Some(val) = get_env_usize(env, "BATCH_NUMBER_WIDTH")? {
        config.numbering.batch_number_width = val;
    }
    if let Some(val) = get_env_usize(env, "DELIVERY_NOTE_NUMBER_WIDTH")? {
        config.numbering.delivery_note_number_width = val;
    }

    Ok(())
}

fn parse_thresholds(val: &str) -> Result<Vec<i64>> {
    val.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|e| anyhow!("invalid entry in {ENV_PREFIX}ALERT_THRESHOLDS: {e}"))
        })
        .collect()
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key).filter(|v| !v.is_empty())
}

fn get_env_usize<E: EnvSource>(env: &E, key: &str) -> Result<Option<usize>> {
    match get_env_string(env, key) {
        Some(val) => Ok(Some(
            val.parse::<usize>()
                .with_context(|| format!("{ENV_PREFIX}{key} must be a non-negative integer"))?,
        )),
        None => Ok(None),
    }
}

fn get_env_i64<E: EnvSource>(env: &E, key: &str) -> Result<Option<i64>> {
    match get_env_string(env, key) {
        Some(val) => Ok(Some(
            val.parse::<i64>()
                .with_context(|| format!("{ENV_PREFIX}{key} must be an integer"))?,
        )),
        None => Ok(None),
    }
}

fn get_env_bool<E: EnvSource>(env: &E, key: &str) -> Result<Option<bool>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = match val.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => anyhow::bail!("{ENV_PREFIX}{key} must be true or false"),
            };
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeEnv(HashMap<&'static str, &'static str>);
    impl EnvSource for FakeEnv {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|s| s.to_string())
        }
    }

    #[test]
    fn overrides_scalar_fields() {
        let mut config = RuntimeConfig::default();
        let env = FakeEnv(HashMap::from([
            ("CURRENCY", "USD"),
            ("DEAD_STOCK_DAYS", "90"),
            ("SCHEDULER_ENABLED", "false"),
        ]));
        apply_env_overrides(&mut config, &env).unwrap();
        assert_eq!(config.currency, "USD");
        assert_eq!(config.dead_stock_days, 90);
        assert!(!config.scheduler_enabled);
    }

    #[test]
    fn parses_comma_separated_thresholds() {
        let mut config = RuntimeConfig::default();
        let env = FakeEnv(HashMap::from([("ALERT_THRESHOLDS", "100, 60, 20")]));
        apply_env_overrides(&mut config, &env).unwrap();
        assert_eq!(config.alert_thresholds, vec![100, 60, 20]);
    }

    #[test]
    fn rejects_malformed_bool() {
        let mut config = RuntimeConfig::default();
        let env = FakeEnv(HashMap::from([("SCHEDULER_ENABLED", "maybe")]));
        assert!(apply_env_overrides(&mut config, &env).is_err());
    }
}
