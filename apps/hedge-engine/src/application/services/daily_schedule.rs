//! Daily Schedule
//!
//! Fires the overlay once per trading day, a fixed number of minutes after
//! the market open. Times are evaluated in a fixed exchange UTC offset.

use std::future::Future;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, TimeZone, Utc, Weekday};
use tokio_util::sync::CancellationToken;

/// Once-a-day trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    trigger_time: NaiveTime,
    utc_offset: FixedOffset,
    trade_weekends: bool,
}

impl DailySchedule {
    /// Schedule firing `minutes_after_open` minutes after `market_open` local time.
    #[must_use]
    pub fn new(
        market_open: NaiveTime,
        minutes_after_open: u32,
        utc_offset: FixedOffset,
        trade_weekends: bool,
    ) -> Self {
        Self {
            trigger_time: market_open + Duration::minutes(i64::from(minutes_after_open)),
            utc_offset,
            trade_weekends,
        }
    }

    /// Local wall-clock time of the trigger.
    #[must_use]
    pub const fn trigger_time(&self) -> NaiveTime {
        self.trigger_time
    }

    /// Whether the schedule fires on `date`.
    #[must_use]
    pub fn trades_on(&self, date: chrono::NaiveDate) -> bool {
        self.trade_weekends || !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// First trigger strictly after `now`.
    #[must_use]
    pub fn next_trigger_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_now = now.with_timezone(&self.utc_offset).naive_local();
        let mut date = local_now.date();

        // A week always contains a trading day.
        for _ in 0..8 {
            let candidate = date.and_time(self.trigger_time);
            if candidate > local_now && self.trades_on(date) {
                let utc = candidate - Duration::seconds(i64::from(self.utc_offset.local_minus_utc()));
                return Utc.from_utc_datetime(&utc);
            }
            let Some(next) = date.succ_opt() else {
                break;
            };
            date = next;
        }

        now + Duration::days(1)
    }

    /// Invoke `on_trigger` at every scheduled time until `shutdown` fires.
    pub async fn run<F, Fut>(&self, shutdown: CancellationToken, mut on_trigger: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            let now = Utc::now();
            let next = self.next_trigger_after(now);
            let wait = (next - now).to_std().unwrap_or_default();

            tracing::info!(next_trigger = %next, "Waiting for next daily trigger");

            tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::info!("Daily schedule stopped");
                    break;
                }
                () = tokio::time::sleep(wait) => {
                    on_trigger().await;
                }
            }
        }
    }
}
