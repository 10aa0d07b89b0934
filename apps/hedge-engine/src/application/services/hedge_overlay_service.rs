//! Hedge Overlay Service
//!
//! Owns the session state between evaluations and exposes the
//! parameterless daily entry point the platform scheduler invokes.
//! Evaluations never overlap: the state lock is held for a whole cycle.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::application::ports::{BrokerPort, MarketDataPort, PortfolioPort, SessionClockPort};
use crate::application::use_cases::{CycleOutcome, CycleReport, RunDailyCycleUseCase};
use crate::domain::session::SessionState;

/// Stateful wrapper around [`RunDailyCycleUseCase`].
pub struct HedgeOverlayService<M, P, B, C>
where
    M: MarketDataPort,
    P: PortfolioPort,
    B: BrokerPort,
    C: SessionClockPort,
{
    cycle: RunDailyCycleUseCase<M, P, B>,
    clock: Arc<C>,
    state: Mutex<SessionState>,
    last_report: RwLock<Option<CycleReport>>,
}

impl<M, P, B, C> HedgeOverlayService<M, P, B, C>
where
    M: MarketDataPort,
    P: PortfolioPort,
    B: BrokerPort,
    C: SessionClockPort,
{
    /// Create a service starting flat.
    #[must_use]
    pub fn new(cycle: RunDailyCycleUseCase<M, P, B>, clock: Arc<C>) -> Self {
        Self {
            cycle,
            clock,
            state: Mutex::new(SessionState::flat()),
            last_report: RwLock::new(None),
        }
    }

    /// Start from a rehydrated state instead of flat.
    #[must_use]
    pub fn with_state(self, state: SessionState) -> Self {
        Self {
            state: Mutex::new(state),
            ..self
        }
    }

    /// Daily trigger entry point.
    pub async fn on_daily_trigger(&self) {
        let report = self.run_cycle().await;

        match &report.outcome {
            CycleOutcome::Skipped { reason } => {
                tracing::debug!(?reason, "Daily cycle skipped");
            }
            outcome => {
                tracing::info!(
                    underlying = %self.cycle.underlying(),
                    phase = %report.phase(),
                    orders = report.orders.len(),
                    warnings = report.warnings.len(),
                    ?outcome,
                    "Daily cycle complete"
                );
            }
        }
    }

    /// Run one evaluation and return its report.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut state = self.state.lock().await;
        let context = self.clock.context();

        let report = self.cycle.execute(*state, &context).await;
        *state = report.state;
        *self.last_report.write() = Some(report.clone());

        report
    }

    /// State carried into the next evaluation.
    pub async fn state(&self) -> SessionState {
        *self.state.lock().await
    }

    /// Report of the most recent evaluation.
    #[must_use]
    pub fn last_report(&self) -> Option<CycleReport> {
        self.last_report.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::application::ports::{
        BrokerError, LiquidationTarget, MarketDataError, OrderAck, PortfolioError,
        SessionContext, SubmitOrderRequest,
    };
    use crate::application::use_cases::SkipReason;
    use crate::domain::option_position::OptionContract;
    use crate::domain::portfolio::PortfolioSnapshot;
    use crate::domain::position_sizing::SizingParameters;
    use crate::domain::shared::Symbol;

    struct NoMarket;

    #[async_trait]
    impl MarketDataPort for NoMarket {
        async fn price_of(&self, symbol: &Symbol) -> Result<Decimal, MarketDataError> {
            Err(MarketDataError::Unavailable {
                symbol: symbol.clone(),
            })
        }

        async fn chain_for(
            &self,
            _underlying: &Symbol,
            _as_of: NaiveDate,
        ) -> Result<Vec<OptionContract>, MarketDataError> {
            Ok(Vec::new())
        }
    }

    struct CashPortfolio;

    #[async_trait]
    impl PortfolioPort for CashPortfolio {
        async fn snapshot(&self) -> Result<PortfolioSnapshot, PortfolioError> {
            Ok(PortfolioSnapshot::cash_only(dec!(100000)))
        }
    }

    struct NullBroker;

    #[async_trait]
    impl BrokerPort for NullBroker {
        async fn submit_order(&self, request: SubmitOrderRequest) -> Result<OrderAck, BrokerError> {
            Err(BrokerError::OrderRejected {
                reason: format!("unexpected order for {}", request.symbol),
            })
        }

        async fn liquidate(
            &self,
            _target: LiquidationTarget,
            _tag: &str,
        ) -> Result<Vec<OrderAck>, BrokerError> {
            Ok(Vec::new())
        }
    }

    struct FixedClock(SessionContext);

    impl SessionClockPort for FixedClock {
        fn context(&self) -> SessionContext {
            self.0
        }
    }

    fn service(warming_up: bool) -> HedgeOverlayService<NoMarket, CashPortfolio, NullBroker, FixedClock> {
        let today = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        let cycle = RunDailyCycleUseCase::new(
            Arc::new(NoMarket),
            Arc::new(CashPortfolio),
            Arc::new(NullBroker),
            Symbol::new("QQQ"),
            SizingParameters::default(),
        );
        HedgeOverlayService::new(cycle, Arc::new(FixedClock(SessionContext { today, warming_up })))
    }

    #[tokio::test]
    async fn starts_flat_without_report() {
        let svc = service(false);
        assert_eq!(svc.state().await, SessionState::flat());
        assert!(svc.last_report().is_none());
    }

    #[tokio::test]
    async fn trigger_records_report() {
        let svc = service(true);
        svc.on_daily_trigger().await;

        let report = svc.last_report().unwrap();
        assert_eq!(
            report.outcome,
            CycleOutcome::Skipped { reason: SkipReason::WarmingUp }
        );
    }

    #[tokio::test]
    async fn skipped_cycle_keeps_rehydrated_state() {
        let expiration = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap() + Duration::days(50);
        let svc = service(false).with_state(SessionState::resume(expiration));

        let report = svc.run_cycle().await;

        assert_eq!(
            report.outcome,
            CycleOutcome::Skipped { reason: SkipReason::DataUnavailable }
        );
        assert_eq!(svc.state().await.hedge_expiration(), Some(expiration));
    }
}
