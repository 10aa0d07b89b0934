// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Hedge Engine - Protective Put Overlay
//!
//! Rule-based overlay that holds an underlying in whole lots, protects it
//! with a put bought at a target delta and horizon, and rolls the put once
//! its remaining life falls to a fixed fraction of the horizon.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure decision core
//!   - `position_sizing`: Whole-lot underlying sizing
//!   - `hedge_selection`: Contract choice, hedge quantity, affordability
//!   - `session`: Flat / FullyHedged / Unwinding state machine
//!   - `option_position`, `portfolio`: Value objects
//!
//! - **Application**: Orchestration
//!   - `ports`: Market data, portfolio, broker and calendar interfaces
//!   - `use_cases`: `RunDailyCycle`
//!   - `services`: Stateful daily entry point and its schedule
//!
//! - **Infrastructure**: Adapters
//!   - `paper`: In-process paper trading platform
//!   - `clock`: Wall-clock session calendar

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Decision core with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters for the ports.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// YAML configuration.
pub mod config;

/// Cycle error taxonomy.
pub mod error;

/// Logging setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::hedge_selection::{ContractSelector, HedgeTarget, SelectionError};
pub use domain::option_position::{HedgePosition, OptionContract, OptionRight};
pub use domain::portfolio::{Holding, PortfolioSnapshot, PositionRole};
pub use domain::position_sizing::{PositionSizer, SizingError, SizingParameters};
pub use domain::session::{SessionController, SessionDecision, SessionPhase, SessionState};
pub use domain::shared::Symbol;

// Application re-exports
pub use application::ports::{BrokerPort, MarketDataPort, PortfolioPort, SessionClockPort};
pub use application::services::{DailySchedule, HedgeOverlayService};
pub use application::use_cases::{CycleOutcome, CycleReport, RunDailyCycleUseCase};

// Infrastructure re-exports
pub use infrastructure::{PaperPlatform, SystemSessionClock};

pub use error::HedgeError;
