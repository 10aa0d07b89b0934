//! Session Clock Port (Driven Port)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Platform-supplied context for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Current trading date.
    pub today: NaiveDate,
    /// Whether the platform warm-up period is still running.
    pub warming_up: bool,
}

impl SessionContext {
    /// Context for a live (post warm-up) session.
    #[must_use]
    pub const fn live(today: NaiveDate) -> Self {
        Self {
            today,
            warming_up: false,
        }
    }
}

/// Port for the platform calendar.
pub trait SessionClockPort: Send + Sync {
    /// Context for the evaluation about to run.
    fn context(&self) -> SessionContext;
}
