// warehouse-alerts - Component D: the periodic alert generator
//
// Four independent check kinds plus deduplication (`checks`), and an
// explicit, non-reentrant scheduler component that owns the decision of
// when those checks run (`scheduler`).

pub mod checks;
pub mod scheduler;

pub use checks::{
    check_dead_stock, check_expired_batches, check_expiring_batches, check_low_stock, AlertConfig,
    CheckCounts, run_all_checks,
};
pub use scheduler::Scheduler;
