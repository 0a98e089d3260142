use crate::RuntimeConfig;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    if config.currency.trim().is_empty() {
        bail!("currency must not be empty");
    }
    if config.currency.len() != 3 {
        bail!("currency must be a 3-letter ISO 4217 code, got {:?}", config.currency);
    }

    if config.dead_stock_days <= 0 {
        bail!("dead_stock_days must be greater than 0");
    }

    if config.alert_thresholds.is_empty() {
        bail!("alert_thresholds must not be empty");
    }
    if config.alert_thresholds.iter().any(|t| *t <= 0) {
        bail!("alert_thresholds entries must all be positive day counts");
    }
    let mut sorted = config.alert_thresholds.clone();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != config.alert_thresholds.len() {
        bail!("alert_thresholds must not contain duplicate bands");
    }

    if config.history_page_size_cap == 0 {
        bail!("history_page_size_cap must be greater than 0");
    }
    if config.history_page_size_cap > 5_000 {
        warn!(
            cap = config.history_page_size_cap,
            "history_page_size_cap is unusually large; pagination responses may be slow"
        );
    }

    validate_numbering(&config.numbering)?;

    Ok(())
}

fn validate_numbering(numbering: &crate::NumberingConfig) -> Result<()> {
    if numbering.batch_number_width == 0 {
        bail!("numbering.batch_number_width must be greater than 0");
    }
    if numbering.delivery_note_number_width == 0 {
        bail!("numbering.delivery_note_number_width must be greater than 0");
    }
    Ok(())
}
