//! Application Use Cases

mod run_daily_cycle;

pub use run_daily_cycle::{CycleOutcome, CycleReport, RunDailyCycleUseCase, SkipReason};
