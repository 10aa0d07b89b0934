//! Paper platform adapter.
//!
//! Implements every driven port over one shared in-memory account.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use thiserror::Error;

use super::MarketSnapshot;
use crate::application::ports::{
    BrokerError, BrokerPort, LiquidationTarget, MarketDataError, MarketDataPort, OrderAck,
    PortfolioError, PortfolioPort, SessionClockPort, SessionContext, SubmitOrderRequest,
};
use crate::config::PaperConfig;
use crate::domain::option_position::{DEFAULT_MULTIPLIER, OptionContract};
use crate::domain::portfolio::{Holding, PortfolioSnapshot, PositionRole};
use crate::domain::shared::Symbol;

/// Paper platform errors.
#[derive(Debug, Error)]
pub enum PaperError {
    /// Snapshot file could not be read.
    #[error("Failed to read snapshot '{path}': {source}")]
    ReadError {
        /// Snapshot path.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Snapshot file is not valid JSON.
    #[error("Failed to parse snapshot: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
struct PaperPosition {
    role: PositionRole,
    quantity: i64,
    average_price: Decimal,
    multiplier: u32,
}

#[derive(Debug)]
struct PaperAccount {
    today: NaiveDate,
    warming_up: bool,
    cash: Decimal,
    positions: BTreeMap<Symbol, PaperPosition>,
    prices: HashMap<Symbol, Decimal>,
    chains: HashMap<Symbol, Vec<OptionContract>>,
    fills: Vec<OrderAck>,
}

impl PaperAccount {
    fn contract(&self, symbol: &Symbol) -> Option<&OptionContract> {
        self.chains
            .values()
            .flat_map(|chain| chain.iter())
            .find(|c| c.symbol() == symbol)
    }

    fn mark(&self, symbol: &Symbol) -> Option<Decimal> {
        self.prices
            .get(symbol)
            .copied()
            .or_else(|| self.contract(symbol).map(OptionContract::ask))
    }

    fn multiplier(&self, symbol: &Symbol, role: PositionRole) -> u32 {
        if let Some(position) = self.positions.get(symbol) {
            return position.multiplier;
        }
        match role {
            PositionRole::Underlying => 1,
            PositionRole::Hedge => self
                .contract(symbol)
                .map_or(DEFAULT_MULTIPLIER, OptionContract::multiplier),
        }
    }
}

/// In-process paper trading platform.
pub struct PaperPlatform {
    account: RwLock<PaperAccount>,
    fee_per_order: Decimal,
    order_seq: AtomicU64,
}

impl PaperPlatform {
    /// Create a flat account holding only cash.
    #[must_use]
    pub fn new(initial_cash: Decimal, fee_per_order: Decimal, today: NaiveDate) -> Self {
        Self {
            account: RwLock::new(PaperAccount {
                today,
                warming_up: false,
                cash: initial_cash,
                positions: BTreeMap::new(),
                prices: HashMap::new(),
                chains: HashMap::new(),
                fills: Vec::new(),
            }),
            fee_per_order,
            order_seq: AtomicU64::new(1),
        }
    }

    /// Create from configuration, loading the snapshot file if one is set.
    ///
    /// # Errors
    ///
    /// Returns error if the snapshot cannot be loaded.
    pub fn from_config(config: &PaperConfig, today: NaiveDate) -> Result<Self, PaperError> {
        let platform = Self::new(config.initial_cash, config.fee_per_order, today);
        if let Some(path) = &config.snapshot_path {
            platform.apply_snapshot(&MarketSnapshot::from_file(path)?);
        }
        Ok(platform)
    }

    /// Replace prices and chains with a snapshot's contents.
    pub fn apply_snapshot(&self, snapshot: &MarketSnapshot) {
        let mut account = self.account.write();
        account.prices.clone_from(&snapshot.prices);
        account.chains = snapshot.chains_by_underlying();
        if let Some(as_of) = snapshot.as_of {
            account.today = as_of;
        }
        tracing::debug!(
            prices = snapshot.prices.len(),
            contracts = snapshot.chains.len(),
            today = %account.today,
            "Market snapshot applied"
        );
    }

    /// Advance the calendar.
    pub fn set_today(&self, today: NaiveDate) {
        self.account.write().today = today;
    }

    /// Toggle the warm-up flag.
    pub fn set_warming_up(&self, warming_up: bool) {
        self.account.write().warming_up = warming_up;
    }

    /// Set the spot price of an instrument.
    pub fn set_price(&self, symbol: Symbol, price: Decimal) {
        self.account.write().prices.insert(symbol, price);
    }

    /// Remove the spot price of an instrument.
    pub fn clear_price(&self, symbol: &Symbol) {
        self.account.write().prices.remove(symbol);
    }

    /// Replace the option chain for an underlying.
    pub fn set_chain(&self, underlying: Symbol, chain: Vec<OptionContract>) {
        self.account.write().chains.insert(underlying, chain);
    }

    /// Available cash.
    #[must_use]
    pub fn cash(&self) -> Decimal {
        self.account.read().cash
    }

    /// Signed quantity held of an instrument.
    #[must_use]
    pub fn position_quantity(&self, symbol: &Symbol) -> i64 {
        self.account
            .read()
            .positions
            .get(symbol)
            .map_or(0, |p| p.quantity)
    }

    /// Every fill so far, oldest first.
    #[must_use]
    pub fn fills(&self) -> Vec<OrderAck> {
        self.account.read().fills.clone()
    }

    fn fill(
        &self,
        account: &mut PaperAccount,
        symbol: &Symbol,
        role: PositionRole,
        quantity: i64,
        tag: &str,
        client_order_id: String,
    ) -> Result<OrderAck, BrokerError> {
        if quantity == 0 {
            return Err(BrokerError::OrderRejected {
                reason: format!("zero quantity for {symbol}"),
            });
        }

        let held = account.positions.get(symbol).map_or(0, |p| p.quantity);
        if quantity < 0 && held + quantity < 0 {
            return Err(BrokerError::OrderRejected {
                reason: format!("short sale of {symbol} not supported"),
            });
        }

        // Closing a position whose quote dropped out of the feed fills at cost.
        let price = account
            .mark(symbol)
            .or_else(|| {
                (quantity < 0)
                    .then(|| account.positions.get(symbol).map(|p| p.average_price))
                    .flatten()
            })
            .ok_or_else(|| BrokerError::OrderRejected {
                reason: format!("no price for {symbol}"),
            })?;
        let multiplier = account.multiplier(symbol, role);
        let notional = price * Decimal::from(quantity) * Decimal::from(multiplier);
        let debit = notional + self.fee_per_order;

        if quantity > 0 && debit > account.cash {
            return Err(BrokerError::InsufficientFunds {
                required: debit,
                available: account.cash,
            });
        }
        account.cash -= debit;

        let position = account
            .positions
            .entry(symbol.clone())
            .or_insert(PaperPosition {
                role,
                quantity: 0,
                average_price: price,
                multiplier,
            });
        let new_quantity = position.quantity + quantity;
        if quantity > 0 && new_quantity > 0 {
            position.average_price = (position.average_price * Decimal::from(position.quantity)
                + price * Decimal::from(quantity))
                / Decimal::from(new_quantity);
        }
        position.quantity = new_quantity;
        if new_quantity == 0 {
            account.positions.remove(symbol);
        }

        let ack = OrderAck {
            client_order_id,
            broker_order_id: format!("paper-{}", self.order_seq.fetch_add(1, Ordering::Relaxed)),
            symbol: symbol.clone(),
            filled_quantity: quantity,
            fill_price: Some(price),
            tag: tag.to_string(),
        };
        account.fills.push(ack.clone());

        tracing::debug!(
            symbol = %symbol,
            quantity,
            %price,
            cash = %account.cash,
            tag,
            "Paper fill"
        );

        Ok(ack)
    }
}

#[async_trait]
impl MarketDataPort for PaperPlatform {
    async fn price_of(&self, symbol: &Symbol) -> Result<Decimal, MarketDataError> {
        self.account
            .read()
            .prices
            .get(symbol)
            .copied()
            .ok_or_else(|| MarketDataError::Unavailable {
                symbol: symbol.clone(),
            })
    }

    async fn chain_for(
        &self,
        underlying: &Symbol,
        _as_of: NaiveDate,
    ) -> Result<Vec<OptionContract>, MarketDataError> {
        self.account
            .read()
            .chains
            .get(underlying)
            .cloned()
            .ok_or_else(|| MarketDataError::Unavailable {
                symbol: underlying.clone(),
            })
    }
}

#[async_trait]
impl PortfolioPort for PaperPlatform {
    async fn snapshot(&self) -> Result<PortfolioSnapshot, PortfolioError> {
        let account = self.account.read();
        let mut total_value = account.cash;

        let holdings = account
            .positions
            .iter()
            .map(|(symbol, position)| {
                let mark = account.mark(symbol).unwrap_or(position.average_price);
                total_value += mark * Decimal::from(position.quantity) * Decimal::from(position.multiplier);

                let pnl_pct = if position.average_price > Decimal::ZERO {
                    (mark - position.average_price) / position.average_price * Decimal::ONE_HUNDRED
                } else {
                    Decimal::ZERO
                };

                Holding {
                    symbol: symbol.clone(),
                    role: position.role,
                    quantity: position.quantity,
                    average_price: position.average_price,
                    market_price: mark,
                    unrealized_pnl_pct: pnl_pct,
                }
            })
            .collect();

        Ok(PortfolioSnapshot {
            holdings,
            cash: account.cash,
            total_value,
        })
    }
}

#[async_trait]
impl BrokerPort for PaperPlatform {
    async fn submit_order(&self, request: SubmitOrderRequest) -> Result<OrderAck, BrokerError> {
        let mut account = self.account.write();
        self.fill(
            &mut account,
            &request.symbol,
            request.role,
            request.quantity,
            &request.tag,
            request.client_order_id,
        )
    }

    async fn liquidate(
        &self,
        target: LiquidationTarget,
        tag: &str,
    ) -> Result<Vec<OrderAck>, BrokerError> {
        let mut account = self.account.write();

        let open: Vec<(Symbol, PositionRole, i64)> = account
            .positions
            .iter()
            .filter(|(symbol, _)| match &target {
                LiquidationTarget::All => true,
                LiquidationTarget::Instrument(wanted) => *symbol == wanted,
            })
            .map(|(symbol, p)| (symbol.clone(), p.role, p.quantity))
            .collect();

        let mut acks = Vec::with_capacity(open.len());
        let mut first_error = None;
        for (symbol, role, quantity) in open {
            let client_order_id = uuid::Uuid::new_v4().to_string();
            match self.fill(&mut account, &symbol, role, -quantity, tag, client_order_id) {
                Ok(ack) => acks.push(ack),
                Err(e) => {
                    tracing::error!(symbol = %symbol, error = %e, "Paper liquidation failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(acks),
        }
    }
}

impl SessionClockPort for PaperPlatform {
    fn context(&self) -> SessionContext {
        let account = self.account.read();
        SessionContext {
            today: account.today,
            warming_up: account.warming_up,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rust_decimal_macros::dec;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
    }

    fn put() -> OptionContract {
        OptionContract::put("QQQ", dec!(395), today() + Duration::days(60))
            .with_quote(dec!(9.40), dec!(-0.48))
    }

    fn platform() -> PaperPlatform {
        let platform = PaperPlatform::new(dec!(100000), dec!(1), today());
        platform.set_price(Symbol::new("QQQ"), dec!(400));
        platform.set_chain(Symbol::new("QQQ"), vec![put()]);
        platform
    }

    #[tokio::test]
    async fn buy_shares_debits_cash_and_fee() {
        let platform = platform();
        let ack = platform
            .submit_order(SubmitOrderRequest::underlying(Symbol::new("QQQ"), 200, "buy"))
            .await
            .unwrap();

        assert_eq!(ack.filled_quantity, 200);
        assert_eq!(ack.fill_price, Some(dec!(400)));
        assert_eq!(platform.cash(), dec!(19999));
        assert_eq!(platform.position_quantity(&Symbol::new("QQQ")), 200);
    }

    #[tokio::test]
    async fn hedge_uses_contract_multiplier() {
        let platform = platform();
        platform
            .submit_order(SubmitOrderRequest::hedge(put().symbol().clone(), 3, "hedge"))
            .await
            .unwrap();

        assert_eq!(platform.cash(), dec!(100000) - dec!(2820) - dec!(1));
    }

    #[tokio::test]
    async fn insufficient_cash_rejected() {
        let platform = platform();
        let result = platform
            .submit_order(SubmitOrderRequest::underlying(Symbol::new("QQQ"), 300, "buy"))
            .await;

        assert!(matches!(result, Err(BrokerError::InsufficientFunds { .. })));
        assert_eq!(platform.cash(), dec!(100000));
        assert!(platform.fills().is_empty());
    }

    #[tokio::test]
    async fn unknown_instrument_rejected() {
        let platform = platform();
        let result = platform
            .submit_order(SubmitOrderRequest::underlying(Symbol::new("SPY"), 1, "buy"))
            .await;
        assert!(matches!(result, Err(BrokerError::OrderRejected { .. })));
    }

    #[tokio::test]
    async fn short_sale_rejected() {
        let platform = platform();
        let result = platform
            .submit_order(SubmitOrderRequest::underlying(Symbol::new("QQQ"), -1, "sell"))
            .await;
        assert!(matches!(result, Err(BrokerError::OrderRejected { .. })));
    }

    #[tokio::test]
    async fn snapshot_marks_positions() {
        let platform = platform();
        platform
            .submit_order(SubmitOrderRequest::underlying(Symbol::new("QQQ"), 200, "buy"))
            .await
            .unwrap();
        platform.set_price(Symbol::new("QQQ"), dec!(420));

        let snapshot = platform.snapshot().await.unwrap();
        let holding = snapshot.holding(&Symbol::new("QQQ")).unwrap();

        assert_eq!(holding.market_price, dec!(420));
        assert_eq!(holding.unrealized_pnl_pct, dec!(5));
        assert_eq!(snapshot.total_value, dec!(19999) + dec!(84000));
    }

    #[tokio::test]
    async fn liquidate_all_closes_every_position() {
        let platform = platform();
        platform
            .submit_order(SubmitOrderRequest::underlying(Symbol::new("QQQ"), 200, "buy"))
            .await
            .unwrap();
        platform
            .submit_order(SubmitOrderRequest::hedge(put().symbol().clone(), 3, "hedge"))
            .await
            .unwrap();

        let acks = platform.liquidate(LiquidationTarget::All, "flatten").await.unwrap();

        assert_eq!(acks.len(), 2);
        assert!(!platform.snapshot().await.unwrap().is_invested());
        // Four fills at $1 each; prices unchanged.
        assert_eq!(platform.cash(), dec!(99996));
    }

    #[tokio::test]
    async fn liquidate_instrument_only_touches_that_symbol() {
        let platform = platform();
        platform
            .submit_order(SubmitOrderRequest::underlying(Symbol::new("QQQ"), 200, "buy"))
            .await
            .unwrap();
        platform
            .submit_order(SubmitOrderRequest::hedge(put().symbol().clone(), 3, "hedge"))
            .await
            .unwrap();

        let acks = platform
            .liquidate(LiquidationTarget::Instrument(put().symbol().clone()), "roll")
            .await
            .unwrap();

        assert_eq!(acks.len(), 1);
        assert_eq!(acks[0].filled_quantity, -3);
        assert_eq!(platform.position_quantity(&Symbol::new("QQQ")), 200);
    }

    #[tokio::test]
    async fn liquidate_all_closes_hedge_dropped_from_chain() {
        let platform = platform();
        platform
            .submit_order(SubmitOrderRequest::underlying(Symbol::new("QQQ"), 200, "buy"))
            .await
            .unwrap();
        platform
            .submit_order(SubmitOrderRequest::hedge(put().symbol().clone(), 3, "hedge"))
            .await
            .unwrap();
        platform.set_chain(Symbol::new("QQQ"), Vec::new());

        let acks = platform.liquidate(LiquidationTarget::All, "flatten").await.unwrap();

        assert_eq!(acks.len(), 2);
        assert_eq!(platform.position_quantity(&Symbol::new("QQQ")), 0);
        assert_eq!(platform.position_quantity(put().symbol()), 0);
        let hedge_fill = acks.iter().find(|a| a.symbol == *put().symbol()).unwrap();
        assert_eq!(hedge_fill.fill_price, Some(dec!(9.40)));
        assert_eq!(platform.fills().len(), 4);
    }

    #[tokio::test]
    async fn missing_mark_refuses_buys_but_closes_at_cost() {
        let platform = platform();
        platform
            .submit_order(SubmitOrderRequest::underlying(Symbol::new("QQQ"), 200, "buy"))
            .await
            .unwrap();
        platform.clear_price(&Symbol::new("QQQ"));

        let buy = platform
            .submit_order(SubmitOrderRequest::underlying(Symbol::new("QQQ"), 100, "buy"))
            .await;
        assert!(matches!(buy, Err(BrokerError::OrderRejected { .. })));

        let acks = platform.liquidate(LiquidationTarget::All, "flatten").await.unwrap();
        assert_eq!(acks.len(), 1);
        assert_eq!(acks[0].fill_price, Some(dec!(400)));
        assert_eq!(platform.position_quantity(&Symbol::new("QQQ")), 0);
    }

    #[tokio::test]
    async fn missing_price_is_unavailable() {
        let platform = platform();
        platform.clear_price(&Symbol::new("QQQ"));
        assert!(matches!(
            platform.price_of(&Symbol::new("QQQ")).await,
            Err(MarketDataError::Unavailable { .. })
        ));
    }

    #[test]
    fn clock_reflects_account() {
        let platform = platform();
        platform.set_warming_up(true);
        platform.set_today(today() + Duration::days(1));

        let context = platform.context();
        assert!(context.warming_up);
        assert_eq!(context.today, today() + Duration::days(1));
    }
}
