//! Run Daily Cycle Use Case
//!
//! One evaluation of the overlay: read the portfolio, ask the session
//! controller what to do, and carry the decision out against the platform.
//!
//! Entry flow:
//! 1. Size the underlying from cash plus the value of shares already held
//! 2. Order only the difference to the target quantity
//! 3. Re-read the portfolio, size the hedge from the held quantity
//! 4. Select the contract and check the premium against remaining cash
//! 5. Buy the hedge
//!
//! A shortfall, a missing contract or a rejected order at any step
//! flattens the portfolio so no unhedged shares are carried overnight.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    BrokerPort, LiquidationTarget, MarketDataPort, OrderAck, PortfolioPort, SessionContext,
    SubmitOrderRequest,
};
use crate::domain::hedge_selection::{
    Affordability, ContractSelector, HedgeTarget, compute_hedge_quantity, evaluate_affordability,
};
use crate::domain::option_position::HedgePosition;
use crate::domain::portfolio::{PortfolioSnapshot, PositionRole};
use crate::domain::position_sizing::{PositionSizer, SizingError, SizingInput, SizingParameters};
use crate::domain::session::{
    Liquidation, SessionController, SessionDecision, SessionPhase, SessionState, UnwindReason,
};
use crate::domain::shared::Symbol;
use crate::error::{ErrorCode, HedgeError};

/// Tag used when flattening a partial position.
const FLATTEN_TAG: &str = "Liquidating partial position.";

/// Why a cycle did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    /// Platform warm-up still running.
    WarmingUp,
    /// Spot price or portfolio unavailable.
    DataUnavailable,
}

/// What a cycle ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleOutcome {
    /// Nothing evaluated.
    Skipped {
        /// Why.
        reason: SkipReason,
    },
    /// Underlying sized and hedge bought.
    Entered {
        /// Units of underlying held after entry.
        underlying_quantity: i64,
        /// The new hedge.
        hedge: HedgePosition,
    },
    /// Both legs kept.
    Held {
        /// Calendar days left on the hedge.
        days_remaining: i64,
    },
    /// Every position liquidated.
    Unwound {
        /// Trigger.
        reason: UnwindReason,
    },
    /// Entry failed and the portfolio was left (or made) flat.
    StayedFlat {
        /// Failure kind.
        code: ErrorCode,
    },
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// State to carry into the next cycle.
    pub state: SessionState,
    /// What happened.
    pub outcome: CycleOutcome,
    /// Orders and liquidations acknowledged this cycle.
    pub orders: Vec<OrderAck>,
    /// Human-readable warnings.
    pub warnings: Vec<String>,
}

impl CycleReport {
    const fn skipped(state: SessionState, reason: SkipReason) -> Self {
        Self {
            state,
            outcome: CycleOutcome::Skipped { reason },
            orders: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Phase the overlay is in after the cycle.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        match self.outcome {
            CycleOutcome::Entered { .. } | CycleOutcome::Held { .. } => SessionPhase::FullyHedged,
            CycleOutcome::Unwound { .. } | CycleOutcome::StayedFlat { .. } => SessionPhase::Flat,
            CycleOutcome::Skipped { .. } => {
                if self.state.is_tracking_hedge() {
                    SessionPhase::FullyHedged
                } else {
                    SessionPhase::Flat
                }
            }
        }
    }
}

/// Use case for one daily evaluation of the overlay.
pub struct RunDailyCycleUseCase<M, P, B>
where
    M: MarketDataPort,
    P: PortfolioPort,
    B: BrokerPort,
{
    market_data: Arc<M>,
    portfolio: Arc<P>,
    broker: Arc<B>,
    underlying: Symbol,
    controller: SessionController,
}

impl<M, P, B> RunDailyCycleUseCase<M, P, B>
where
    M: MarketDataPort,
    P: PortfolioPort,
    B: BrokerPort,
{
    /// Create a new `RunDailyCycleUseCase`.
    pub const fn new(
        market_data: Arc<M>,
        portfolio: Arc<P>,
        broker: Arc<B>,
        underlying: Symbol,
        params: SizingParameters,
    ) -> Self {
        Self {
            market_data,
            portfolio,
            broker,
            underlying,
            controller: SessionController::new(params),
        }
    }

    /// Underlying being overlaid.
    pub const fn underlying(&self) -> &Symbol {
        &self.underlying
    }

    /// Run one evaluation.
    pub async fn execute(&self, state: SessionState, context: &SessionContext) -> CycleReport {
        if context.warming_up {
            tracing::debug!(today = %context.today, "Warm-up in progress, skipping cycle");
            return CycleReport::skipped(state, SkipReason::WarmingUp);
        }

        let spot = match self.market_data.price_of(&self.underlying).await {
            Ok(price) if price > Decimal::ZERO => price,
            Ok(price) => {
                tracing::debug!(underlying = %self.underlying, %price, "Non-positive spot, skipping cycle");
                return CycleReport::skipped(state, SkipReason::DataUnavailable);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Spot price unavailable, skipping cycle");
                return CycleReport::skipped(state, SkipReason::DataUnavailable);
            }
        };

        let portfolio = match self.portfolio.snapshot().await {
            Ok(portfolio) => portfolio,
            Err(e) => {
                tracing::debug!(error = %e, "Portfolio unavailable, skipping cycle");
                return CycleReport::skipped(state, SkipReason::DataUnavailable);
            }
        };

        match self.controller.assess(&state, &portfolio, context.today) {
            SessionDecision::Enter => {
                self.enter_or_flatten(state, spot, &portfolio, context.today).await
            }
            SessionDecision::Hold { days_remaining } => {
                tracing::info!(
                    underlying = %self.underlying,
                    days_remaining,
                    "Hedge still outside the roll window, holding"
                );
                CycleReport {
                    state,
                    outcome: CycleOutcome::Held { days_remaining },
                    orders: Vec::new(),
                    warnings: Vec::new(),
                }
            }
            SessionDecision::Unwind {
                reason,
                liquidations,
            } => self.unwind(state, reason, liquidations).await,
        }
    }

    async fn enter_or_flatten(
        &self,
        state: SessionState,
        spot: Decimal,
        portfolio: &PortfolioSnapshot,
        today: NaiveDate,
    ) -> CycleReport {
        let mut orders = Vec::new();
        let err = match self.enter(spot, portfolio, today, &mut orders).await {
            Ok((underlying_quantity, hedge)) => {
                tracing::info!(
                    underlying = %self.underlying,
                    shares = underlying_quantity,
                    hedge = %hedge.symbol,
                    contracts = hedge.quantity,
                    expiration = %hedge.expiration,
                    phase = %SessionPhase::FullyHedged,
                    "Overlay entered"
                );
                return CycleReport {
                    state: SessionState::resume(hedge.expiration),
                    outcome: CycleOutcome::Entered {
                        underlying_quantity,
                        hedge,
                    },
                    orders,
                    warnings: Vec::new(),
                };
            }
            Err(err) => err,
        };

        if !err.is_recoverable_by_liquidation() && orders.is_empty() {
            tracing::debug!(error = %err, "Entry data unavailable, skipping cycle");
            return CycleReport::skipped(state, SkipReason::DataUnavailable);
        }

        tracing::warn!(code = err.code().as_str(), error = %err, "Hedge entry failed, staying flat");
        let mut warnings = vec![err.to_string()];

        match self.broker.liquidate(LiquidationTarget::All, FLATTEN_TAG).await {
            Ok(acks) => orders.extend(acks),
            Err(e) => {
                tracing::error!(error = %e, "Failed to flatten partial position");
                warnings.push(format!("Failed to flatten partial position: {e}"));
            }
        }

        CycleReport {
            state: SessionState::flat(),
            outcome: CycleOutcome::StayedFlat { code: err.code() },
            orders,
            warnings,
        }
    }

    async fn enter(
        &self,
        spot: Decimal,
        portfolio: &PortfolioSnapshot,
        today: NaiveDate,
        orders: &mut Vec<OrderAck>,
    ) -> Result<(i64, HedgePosition), HedgeError> {
        let params = self.controller.params();
        let held = portfolio.underlying_quantity(&self.underlying);

        let input = SizingInput {
            available_cash: portfolio.cash + Decimal::from(held) * spot,
            spot_price: spot,
            total_portfolio_value: portfolio.total_value,
        };
        let sizing = PositionSizer::new(params)
            .compute_target_underlying_quantity(&input)
            .map_err(|err| match err {
                SizingError::Shortfall { .. } => HedgeError::Shortfall(format!(
                    "Not enough cash to buy a multiple of {} {} shares.",
                    params.lot_size, self.underlying
                )),
                other @ SizingError::InvalidPrice { .. } => other.into(),
            })?;

        let difference = sizing.quantity - held;
        if difference != 0 {
            let tag = if difference > 0 {
                format!("Bought {} {} shares.", sizing.quantity, self.underlying)
            } else {
                format!("Resized to {} {} shares.", sizing.quantity, self.underlying)
            };
            let request = SubmitOrderRequest::underlying(self.underlying.clone(), difference, tag)
                .with_target_allocation(sizing.target_allocation);
            let ack = self.broker.submit_order(request).await?;
            tracing::info!(
                symbol = %ack.symbol,
                quantity = ack.filled_quantity,
                tag = %ack.tag,
                "Underlying order filled"
            );
            orders.push(ack);
        }

        let after = self.portfolio.snapshot().await?;
        let held = after.underlying_quantity(&self.underlying);
        let label = params.hedge_right.plural_label();

        let contracts = compute_hedge_quantity(held, params.lot_size);
        if contracts <= 0 {
            return Err(HedgeError::Shortfall(format!(
                "Not holding enough {} shares to buy {label}.",
                self.underlying
            )));
        }

        let chain = self
            .market_data
            .chain_for(&self.underlying, today)
            .await
            .map_err(|e| HedgeError::NotFound(e.to_string()))?;
        let target = HedgeTarget {
            delta: params.target_delta,
            dte: i64::from(params.initial_horizon_days),
            right: params.hedge_right,
        };
        let contract = ContractSelector::select_contract(&chain, &target, today)?;

        if let Affordability::Insufficient { cost, available } =
            evaluate_affordability(&contract, contracts, after.cash)
        {
            return Err(HedgeError::Shortfall(format!(
                "Not enough cash to buy {contracts} {label}: premium {cost}, available {available}."
            )));
        }

        let request = SubmitOrderRequest::hedge(
            contract.symbol().clone(),
            contracts,
            format!("Bought {contracts} OTM {label}"),
        );
        let ack = self.broker.submit_order(request).await?;
        tracing::info!(
            symbol = %ack.symbol,
            quantity = ack.filled_quantity,
            delta = %contract.delta(),
            strike = %contract.strike(),
            "Hedge order filled"
        );
        orders.push(ack);

        Ok((held, HedgePosition::open(&contract, contracts)?))
    }

    async fn unwind(
        &self,
        state: SessionState,
        reason: UnwindReason,
        liquidations: Vec<Liquidation>,
    ) -> CycleReport {
        tracing::info!(
            underlying = %self.underlying,
            ?reason,
            phase = %SessionPhase::Unwinding,
            "Unwinding overlay"
        );

        let mut orders = Vec::new();
        let mut warnings = Vec::new();
        let mut hedge_left_open = false;

        if reason == UnwindReason::UntrackedHedge {
            tracing::warn!("Hedge held without a tracked expiration, liquidating");
            warnings.push("Hedge held without a tracked expiration.".to_string());
        }

        for liquidation in liquidations {
            let target = LiquidationTarget::Instrument(liquidation.symbol.clone());
            match self.broker.liquidate(target, &liquidation.tag).await {
                Ok(acks) => {
                    tracing::info!(
                        symbol = %liquidation.symbol,
                        role = %liquidation.role,
                        tag = %liquidation.tag,
                        "Position liquidated"
                    );
                    orders.extend(acks);
                }
                Err(e) => {
                    tracing::error!(symbol = %liquidation.symbol, error = %e, "Liquidation failed");
                    warnings.push(format!("Failed to liquidate {}: {e}", liquidation.symbol));
                    hedge_left_open |= liquidation.role == PositionRole::Hedge;
                }
            }
        }

        // A hedge that failed to close keeps its expiration so the next session retries the roll.
        let state = if hedge_left_open {
            tracing::warn!(
                expiration = ?state.hedge_expiration(),
                "Hedge still open after unwind, keeping tracked expiration"
            );
            state
        } else {
            tracing::info!(phase = %SessionPhase::Flat, "Overlay unwound");
            SessionState::flat()
        };

        CycleReport {
            state,
            outcome: CycleOutcome::Unwound { reason },
            orders,
            warnings,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
