//! Application Services
//!
//! Long-lived orchestration around the daily cycle.

mod daily_schedule;
mod hedge_overlay_service;

pub use daily_schedule::DailySchedule;
pub use hedge_overlay_service::HedgeOverlayService;
