//! Wall-clock session calendar.

use chrono::{FixedOffset, NaiveDate, Utc};

use crate::application::ports::{SessionClockPort, SessionContext};

/// Session calendar driven by the system clock in the exchange offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemSessionClock {
    utc_offset: FixedOffset,
    warmup_until: Option<NaiveDate>,
}

impl SystemSessionClock {
    /// Create a clock; dates before `warmup_until` count as warm-up.
    #[must_use]
    pub const fn new(utc_offset: FixedOffset, warmup_until: Option<NaiveDate>) -> Self {
        Self {
            utc_offset,
            warmup_until,
        }
    }

    /// Context for an explicit date.
    #[must_use]
    pub fn context_on(&self, today: NaiveDate) -> SessionContext {
        SessionContext {
            today,
            warming_up: self.warmup_until.is_some_and(|until| today < until),
        }
    }
}

impl SessionClockPort for SystemSessionClock {
    fn context(&self) -> SessionContext {
        self.context_on(Utc::now().with_timezone(&self.utc_offset).date_naive())
    }
}
