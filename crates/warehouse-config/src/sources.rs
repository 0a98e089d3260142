use crate::env_overrides::{apply_env_overrides, ProcessEnv};
use crate::RuntimeConfig;
use anyhow::{Context, Result};
use std::path::Path;

const CONFIG_PATH_VAR: &str = "WAREHOUSE_CONFIG";
const DEFAULT_PATHS: [&str; 2] = ["./config.toml", "./.warehouse.toml"];

/// Loads configuration the way the teacher's `otlp2parquet-config::sources`
/// does: defaults, then an optional TOML file, then environment overrides,
/// then validation.
pub fn load_config() -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::default();

    if let Some(file_config) = load_from_file()? {
        config = file_config;
    }

    apply_env_overrides(&mut config, &ProcessEnv)?;
    config.validate()?;
    Ok(config)
}

/// Loads from an explicit path, skipping the env/default-path search —
/// used by the CLI's `--config` flag.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let mut config: RuntimeConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    apply_env_overrides(&mut config, &ProcessEnv)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<RuntimeConfig>> {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {path}"))?;
        let config: RuntimeConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {path}"))?;
        return Ok(Some(config));
    }

    for path in DEFAULT_PATHS {
        if Path::new(path).exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file: {path}"))?;
            let config: RuntimeConfig = toml::from_str(&content)
                .with_context(|| format!("failed to parse config file: {path}"))?;
            return Ok(Some(config));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_explicit_file_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "currency = \"USD\"\ndead_stock_days = 90").unwrap();
        let config = load_from_file_path(file.path()).unwrap();
        assert_eq!(config.currency, "USD");
        assert_eq!(config.dead_stock_days, 90);
    }

    #[test]
    fn missing_file_path_is_an_error() {
        assert!(load_from_file_path("/nonexistent/path/config.toml").is_err());
    }
}
