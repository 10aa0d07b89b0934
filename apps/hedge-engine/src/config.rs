//! Configuration module for the hedge engine.
//!
//! YAML configuration with `${VAR}` / `${VAR:-default}` environment
//! interpolation. Every field has a default, so an empty file is valid.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hedge_engine::config::load_config;
//!
//! // Load from $HEDGE_ENGINE_CONFIG, falling back to config.yaml
//! let config = load_config(None)?;
//!
//! let params = config.strategy.sizing_parameters();
//! ```

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::services::DailySchedule;
use crate::domain::option_position::OptionRight;
use crate::domain::position_sizing::SizingParameters;
use crate::domain::shared::Symbol;

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "HEDGE_ENGINE_CONFIG";

/// Config file used when neither an explicit path nor the env var is set.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Minutes in a regular equity session.
const SESSION_MINUTES: u32 = 390;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Overlay parameters.
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// Daily trigger.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Paper trading platform.
    #[serde(default)]
    pub paper: PaperConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============================================
// Strategy
// ============================================

/// Overlay parameters, fixed for the life of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Underlying ticker.
    #[serde(default = "default_underlying")]
    pub underlying: String,
    /// Units of underlying per hedge contract.
    #[serde(default = "default_lot_size")]
    pub lot_size: u32,
    /// Target days to expiration at entry.
    #[serde(default = "default_initial_horizon_days")]
    pub initial_horizon_days: u32,
    /// Fraction of the horizon remaining at which to roll.
    #[serde(default = "default_exit_horizon_fraction")]
    pub exit_horizon_fraction: Decimal,
    /// Target hedge delta.
    #[serde(default = "default_target_delta")]
    pub target_delta: Decimal,
    /// Fee reserved when sizing the underlying.
    #[serde(default = "default_estimated_fee")]
    pub estimated_fee: Decimal,
    /// Hedge option right.
    #[serde(default = "default_hedge_right")]
    pub hedge_right: OptionRight,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            underlying: default_underlying(),
            lot_size: default_lot_size(),
            initial_horizon_days: default_initial_horizon_days(),
            exit_horizon_fraction: default_exit_horizon_fraction(),
            target_delta: default_target_delta(),
            estimated_fee: default_estimated_fee(),
            hedge_right: default_hedge_right(),
        }
    }
}

impl StrategyConfig {
    /// Immutable sizing parameters for the decision core.
    #[must_use]
    pub fn sizing_parameters(&self) -> SizingParameters {
        SizingParameters {
            lot_size: self.lot_size,
            initial_horizon_days: self.initial_horizon_days,
            exit_horizon_fraction: self.exit_horizon_fraction,
            target_delta: self.target_delta,
            estimated_fee: self.estimated_fee,
            hedge_right: self.hedge_right,
        }
    }

    /// Underlying as a symbol.
    #[must_use]
    pub fn underlying_symbol(&self) -> Symbol {
        Symbol::new(self.underlying.as_str())
    }
}

fn default_underlying() -> String {
    "QQQ".to_string()
}

const fn default_lot_size() -> u32 {
    100
}

const fn default_initial_horizon_days() -> u32 {
    60
}

const fn default_exit_horizon_fraction() -> Decimal {
    Decimal::from_parts(5, 0, 0, false, 1)
}

const fn default_target_delta() -> Decimal {
    Decimal::from_parts(50, 0, 0, true, 2)
}

const fn default_estimated_fee() -> Decimal {
    Decimal::ONE
}

const fn default_hedge_right() -> OptionRight {
    OptionRight::Put
}

// ============================================
// Schedule
// ============================================

/// When the daily evaluation fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Exchange open, local `HH:MM`.
    #[serde(default = "default_market_open")]
    pub market_open: String,
    /// Minutes after the open.
    #[serde(default = "default_minutes_after_open")]
    pub minutes_after_open: u32,
    /// Exchange offset from UTC in hours.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Also fire on Saturdays and Sundays.
    #[serde(default)]
    pub trade_weekends: bool,
    /// Evaluations before this date are warm-up and place no orders.
    #[serde(default)]
    pub warmup_until: Option<NaiveDate>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            market_open: default_market_open(),
            minutes_after_open: default_minutes_after_open(),
            utc_offset_hours: default_utc_offset_hours(),
            trade_weekends: false,
            warmup_until: None,
        }
    }
}

impl ScheduleConfig {
    /// Parsed market open time.
    ///
    /// # Errors
    ///
    /// Returns error if `market_open` is not `HH:MM`.
    pub fn market_open_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(&self.market_open, "%H:%M").map_err(|e| {
            ConfigError::ValidationError(format!(
                "schedule.market_open '{}' is not HH:MM: {e}",
                self.market_open
            ))
        })
    }

    /// Exchange UTC offset.
    ///
    /// # Errors
    ///
    /// Returns error if the offset is outside -12..=14 hours.
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(ConfigError::ValidationError(
                "schedule.utc_offset_hours must be between -12 and 14".to_string(),
            ));
        }
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| {
            ConfigError::ValidationError("schedule.utc_offset_hours is out of range".to_string())
        })
    }

    /// Build the daily schedule.
    ///
    /// # Errors
    ///
    /// Returns error if the open time or offset is invalid.
    pub fn daily_schedule(&self) -> Result<DailySchedule, ConfigError> {
        Ok(DailySchedule::new(
            self.market_open_time()?,
            self.minutes_after_open,
            self.utc_offset()?,
            self.trade_weekends,
        ))
    }
}

fn default_market_open() -> String {
    "09:30".to_string()
}

const fn default_minutes_after_open() -> u32 {
    30
}

const fn default_utc_offset_hours() -> i32 {
    -5
}

// ============================================
// Paper Platform
// ============================================

/// In-process paper trading platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperConfig {
    /// Starting cash.
    #[serde(default = "default_initial_cash")]
    pub initial_cash: Decimal,
    /// Fee charged per filled order.
    #[serde(default = "default_fee_per_order")]
    pub fee_per_order: Decimal,
    /// JSON market snapshot with spot prices and option chains.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            initial_cash: default_initial_cash(),
            fee_per_order: default_fee_per_order(),
            snapshot_path: None,
        }
    }
}

fn default_initial_cash() -> Decimal {
    Decimal::from(100_000)
}

const fn default_fee_per_order() -> Decimal {
    Decimal::ONE
}

// ============================================
// Logging
// ============================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Log output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// The path is `path`, else `$HEDGE_ENGINE_CONFIG`, else `config.yaml`.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path
        .map(str::to_string)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is a constant pattern
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    config
        .strategy
        .underlying_symbol()
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("strategy.underlying: {e}")))?;

    config
        .strategy
        .sizing_parameters()
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("strategy: {e}")))?;

    if config.schedule.minutes_after_open >= SESSION_MINUTES {
        return Err(ConfigError::ValidationError(format!(
            "schedule.minutes_after_open must be less than {SESSION_MINUTES}"
        )));
    }
    config.schedule.daily_schedule()?;

    if config.paper.initial_cash < Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "paper.initial_cash must not be negative".to_string(),
        ));
    }

    if config.paper.fee_per_order < Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "paper.fee_per_order must not be negative".to_string(),
        ));
    }

    Ok(())
}
