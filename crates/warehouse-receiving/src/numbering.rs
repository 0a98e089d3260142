//! Deterministic document numbering (spec §4.C/§6): `{prefix}-{YYMMDD}-{N}`,
//! generated by finding the day's current maximum and incrementing — never
//! randomized. `warehouse_store::NumberSequenceStore` does the atomic
//! reservation; this module adds the retry-on-conflict wrapper spec §5/§9
//! recommends for a real database-backed store, even though the in-memory
//! store's single lock can never itself produce the conflict being retried.

use chrono::NaiveDate;
use rand::Rng;
use warehouse_core::{Clock, Error, Result};
use warehouse_store::NumberSequenceStore;

const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Batch,
    Grn,
    Dispatch,
    DeliveryNote,
}

impl DocumentKind {
    fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Batch => "GR",
            DocumentKind::Grn => "GRN",
            DocumentKind::Dispatch => "DSP",
            DocumentKind::DeliveryNote => "DN",
        }
    }

    fn width(&self) -> usize {
        match self {
            DocumentKind::DeliveryNote => 4,
            _ => 3,
        }
    }
}

/// Generates the next number for `kind` on the clock's current date,
/// retrying up to [`MAX_ATTEMPTS`] times with jittered backoff if the
/// store reports a retryable conflict.
pub fn generate_number(store: &dyn NumberSequenceStore, clock: &dyn Clock, kind: DocumentKind) -> Result<String> {
    generate_for_date(store, kind, clock.today())
}

fn generate_for_date(store: &dyn NumberSequenceStore, kind: DocumentKind, date: NaiveDate) -> Result<String> {
    let mut last_err: Option<Error> = None;
    for attempt in 0..MAX_ATTEMPTS {
        match store.next(kind.prefix(), date, kind.width()) {
            Ok(number) => return Ok(number),
            Err(e) if e.is_retryable() => {
                let jitter_ms = rand::thread_rng().gen_range(5..50) * (attempt + 1);
                std::thread::sleep(std::time::Duration::from_millis(jitter_ms as u64));
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| Error::internal("numbering retries exhausted")))
}
