//! Hedge Engine Binary
//!
//! Runs the protective put overlay against the paper trading platform.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin hedge-engine
//! ```
//!
//! # Environment Variables
//!
//! - `HEDGE_ENGINE_CONFIG`: Config file path (default: config.yaml)
//! - `HEDGE_ENGINE_RUN_ONCE`: `true` to evaluate once on the snapshot date and exit
//! - `RUST_LOG`: Log filter (default: `logging.level`)

use std::sync::Arc;

use anyhow::Context;
use hedge_engine::application::ports::SessionClockPort;
use hedge_engine::application::services::HedgeOverlayService;
use hedge_engine::application::use_cases::RunDailyCycleUseCase;
use hedge_engine::config::{Config, load_config};
use hedge_engine::infrastructure::{MarketSnapshot, PaperPlatform, SystemSessionClock};
use hedge_engine::telemetry::init_telemetry;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Environment variable selecting single-evaluation mode.
const RUN_ONCE_ENV: &str = "HEDGE_ENGINE_RUN_ONCE";

type PaperService<C> = HedgeOverlayService<PaperPlatform, PaperPlatform, PaperPlatform, C>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = load_config(None).context("failed to load configuration")?;
    init_telemetry(&config.logging);

    tracing::info!(
        underlying = %config.strategy.underlying,
        lot_size = config.strategy.lot_size,
        horizon_days = config.strategy.initial_horizon_days,
        target_delta = %config.strategy.target_delta,
        "Starting hedge engine"
    );

    let system_clock = SystemSessionClock::new(
        config.schedule.utc_offset()?,
        config.schedule.warmup_until,
    );
    let platform = Arc::new(
        PaperPlatform::from_config(&config.paper, system_clock.context().today)
            .context("failed to initialize paper platform")?,
    );

    if run_once() {
        let context = system_clock.context_on(platform.context().today);
        platform.set_warming_up(context.warming_up);

        let service = build_service(&config, &platform, Arc::clone(&platform));
        let report = service.run_cycle().await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let schedule = config.schedule.daily_schedule()?;
    let service = Arc::new(build_service(&config, &platform, Arc::new(system_clock)));
    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    tracing::info!(trigger_time = %schedule.trigger_time(), "Hedge engine ready");

    schedule
        .run(shutdown, || {
            let service = Arc::clone(&service);
            let platform = Arc::clone(&platform);
            let snapshot_path = config.paper.snapshot_path.clone();
            async move {
                if let Some(path) = snapshot_path {
                    match MarketSnapshot::from_file(&path) {
                        Ok(snapshot) => platform.apply_snapshot(&snapshot),
                        Err(e) => tracing::warn!(error = %e, "Keeping previous market snapshot"),
                    }
                }
                service.on_daily_trigger().await;
            }
        })
        .await;

    tracing::info!("Hedge engine stopped");
    Ok(())
}

/// Wire the daily cycle over the paper platform.
fn build_service<C: SessionClockPort>(
    config: &Config,
    platform: &Arc<PaperPlatform>,
    clock: Arc<C>,
) -> PaperService<C> {
    let cycle = RunDailyCycleUseCase::new(
        Arc::clone(platform),
        Arc::clone(platform),
        Arc::clone(platform),
        config.strategy.underlying_symbol(),
        config.strategy.sizing_parameters(),
    );
    HedgeOverlayService::new(cycle, clock)
}

fn run_once() -> bool {
    std::env::var(RUN_ONCE_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for Ctrl+C or SIGTERM, then cancel `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown.cancel();
}
