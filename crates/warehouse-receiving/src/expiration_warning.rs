//! Pure expiration-warning helper (spec §4.C): gates UI warnings at
//! receipt time. Does not create Alerts — that's the Alert Generator's
//! job, on a completely separate schedule and threshold set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpirationLevel {
    Critical,
    Warning,
    Info,
}

impl ExpirationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpirationLevel::Critical => "critical",
            ExpirationLevel::Warning => "warning",
            ExpirationLevel::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationWarning {
    pub level: ExpirationLevel,
    pub message: String,
    pub days: i64,
}

/// Returns `None` for a batch expiring 180 days or more from `today` (or
/// already expired — receiving validates `expiration_date >= today`
/// upstream, so that case shouldn't reach here in practice).
pub fn check(expiration_date: NaiveDate, today: NaiveDate) -> Option<ExpirationWarning> {
    let days = (expiration_date - today).num_days();
    if days < 0 {
        return None;
    }
    let level = if days < 30 {
        ExpirationLevel::Critical
    } else if days < 60 {
        ExpirationLevel::Warning
    } else if days < 180 {
        ExpirationLevel::Info
    } else {
        return None;
    };
    Some(ExpirationWarning {
        message: format!("expires in {days} days"),
        level,
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn classifies_thresholds() {
        let today = date(2026, 3, 5);
        assert_eq!(check(date(2026, 3, 20), today).unwrap().level, ExpirationLevel::Critical);
        assert_eq!(check(date(2026, 4, 10), today).unwrap().level, ExpirationLevel::Warning);
        assert_eq!(check(date(2026, 6, 1), today).unwrap().level, ExpirationLevel::Info);
        assert!(check(date(2027, 1, 1), today).is_none());
    }
}
