//! Trade Execution
//!
//! The buy/sell pipeline: validate input, build a swap through the shared
//! client, submit, then verify. Notifications are fired best-effort on both
//! outcomes and never affect the result.

use std::sync::Arc;

use crate::application::context::SwapContext;
use crate::application::verify::Verifier;
use crate::config::Config;
use crate::domain::{
    validate_mint, TradeAmount, TradeInputError, TradeResult, TradeSide, VerificationStatus,
    WRAPPED_SOL_MINT,
};
use crate::error::AppError;
use crate::ports::notify::{Notification, NotificationSink};
use crate::ports::swap::{FeeMode, OperatorFee, SwapRequest};

/// Wallet that collects the operator fee on every trade
pub const OPERATOR_FEE_WALLET: &str = "4Qr9Fc8nWVYZKMBv7SH2mUJCyGdTt3pXaEuDkbNe6gsA";

/// Operator fee, percent of the trade
pub const OPERATOR_FEE_PERCENT: f64 = 0.5;

pub struct TradeExecutor {
    context: Arc<SwapContext>,
    notifier: Arc<dyn NotificationSink>,
    verifier: Verifier,
}

impl TradeExecutor {
    pub fn new(context: Arc<SwapContext>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            context,
            notifier,
            verifier: Verifier::default(),
        }
    }

    pub fn with_verifier(mut self, verifier: Verifier) -> Self {
        self.verifier = verifier;
        self
    }

    /// Spend SOL, receive `mint`
    pub async fn buy(
        &self,
        config: &Config,
        mint: &str,
        amount: &str,
    ) -> Result<TradeResult, AppError> {
        self.execute(config, TradeSide::Buy, mint, amount).await
    }

    /// Spend `mint`, receive SOL
    pub async fn sell(
        &self,
        config: &Config,
        mint: &str,
        amount: &str,
    ) -> Result<TradeResult, AppError> {
        self.execute(config, TradeSide::Sell, mint, amount).await
    }

    async fn execute(
        &self,
        config: &Config,
        side: TradeSide,
        mint: &str,
        amount: &str,
    ) -> Result<TradeResult, AppError> {
        let mint = validate_mint(mint)?;
        let amount = TradeAmount::parse(amount)?;
        if side == TradeSide::Buy && amount == TradeAmount::Auto {
            return Err(TradeInputError::BuyAutoUnsupported.into());
        }

        let result = self.run(config, side, &mint, &amount).await;
        if config.notifications_enabled {
            self.announce(side, &mint, &result).await;
        }
        result
    }

    async fn run(
        &self,
        config: &Config,
        side: TradeSide,
        mint: &str,
        amount: &TradeAmount,
    ) -> Result<TradeResult, AppError> {
        let service = self.context.get(config).await?;

        let (from_mint, to_mint, fee_mode) = match side {
            TradeSide::Buy => (WRAPPED_SOL_MINT.to_string(), mint.to_string(), FeeMode::Add),
            TradeSide::Sell => (mint.to_string(), WRAPPED_SOL_MINT.to_string(), FeeMode::Deduct),
        };

        let request = SwapRequest {
            from_mint,
            to_mint,
            amount: amount.as_request_param(),
            slippage: config.slippage,
            payer: service.payer(),
            priority_fee: config.priority_fee,
            priority_fee_level: config.priority_fee_level.clone(),
            tx_version: config.tx_version.clone(),
            fee: OperatorFee {
                wallet: OPERATOR_FEE_WALLET.to_string(),
                percent: OPERATOR_FEE_PERCENT,
                mode: fee_mode,
            },
        };

        tracing::info!(side = side.as_str(), mint, amount = %request.amount, "building swap");
        let build = service.swap_instructions(&request).await?;
        let txid = service.submit(&build).await?;

        let verified = self
            .verifier
            .verify(service.as_ref(), &txid)
            .await
            .map_err(|e| AppError::Swap(append_txid(e, &txid)))?;

        let quote = &build.quote;
        let total_fees = quote.fee + quote.platform_fee;
        let fee_pct = if quote.in_amount > 0.0 {
            total_fees / quote.in_amount * 100.0
        } else {
            0.0
        };

        Ok(TradeResult {
            txid,
            received: quote.out_amount,
            total_fees,
            fee_pct,
            price_impact: quote.price_impact,
            quote: quote.raw.clone(),
            verification: if verified {
                VerificationStatus::Confirmed
            } else {
                VerificationStatus::Pending
            },
        })
    }

    async fn announce(&self, side: TradeSide, mint: &str, result: &Result<TradeResult, AppError>) {
        let notification = match result {
            Ok(trade) => Notification::new(
                format!("{} complete", capitalize(side.as_str())),
                format!("Received {} ({})", trade.received, trade.verification),
            )
            .with_subtitle(short_mint(mint)),
            Err(e) => Notification::new(
                format!("{} failed", capitalize(side.as_str())),
                e.to_string(),
            )
            .with_subtitle(short_mint(mint)),
        };
        self.notifier.notify(&notification).await;
    }
}

/// Keep the signature visible in verification failures so the caller can
/// still link to the explorer.
fn append_txid(err: crate::ports::swap::SwapError, txid: &str) -> crate::ports::swap::SwapError {
    use crate::ports::swap::SwapError;
    match err {
        SwapError::OnChain(m) => SwapError::OnChain(format!("{} (txid {})", m, txid)),
        SwapError::Api(m) => SwapError::Api(format!("{} (txid {})", m, txid)),
        other => other,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn short_mint(mint: &str) -> String {
    if mint.len() > 12 {
        format!("{}...{}", &mint[..4], &mint[mint.len() - 4..])
    } else {
        mint.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::{DetailsScript, MockNotifier, MockSwapService};
    use crate::ports::swap::{SwapError, SwapService};
    use serde_json::json;
    use std::time::Duration;

    const MINT: &str = "6p6xgHyF7AeE6TZkSmFsko444wqoP15icUSqi2jfGiPN";

    fn executor_for(
        service: Arc<MockSwapService>,
        notifier: Arc<MockNotifier>,
    ) -> TradeExecutor {
        let shared: Arc<dyn SwapService> = service;
        let context = Arc::new(SwapContext::new(Arc::new(
            move |_config| -> crate::application::context::BuildFuture {
                let shared = Arc::clone(&shared);
                Box::pin(async move { Ok(shared) })
            },
        )));
        TradeExecutor::new(context, notifier)
            .with_verifier(Verifier::new(vec![Duration::ZERO; 6]))
    }

    #[tokio::test]
    async fn test_buy_happy_path() {
        let service = MockSwapService::new().with_details(vec![DetailsScript::Payload(
            json!({"confirmationStatus": "finalized"}),
        )]);
        let notifier = MockNotifier::new();
        let executor = executor_for(Arc::clone(&service), Arc::clone(&notifier));

        let result = executor
            .buy(&Config::default(), MINT, "0.2")
            .await
            .unwrap();

        assert_eq!(result.txid, "tx-123");
        assert_eq!(result.verification, VerificationStatus::Confirmed);
        assert_eq!(result.received, 2.25);
        assert!((result.total_fees - 0.03).abs() < 1e-9);
        assert!((result.fee_pct - 15.0).abs() < 1e-9);

        let requests = service.build_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].from_mint, WRAPPED_SOL_MINT);
        assert_eq!(requests[0].to_mint, MINT);
        assert_eq!(requests[0].fee.mode, FeeMode::Add);
        assert_eq!(
            requests[0].fee.as_request_param(),
            format!("{}:{}", OPERATOR_FEE_WALLET, OPERATOR_FEE_PERCENT)
        );

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].title.contains("Buy complete"));
    }

    #[tokio::test]
    async fn test_sell_reverses_mints_and_deducts_fee() {
        let service = MockSwapService::new().with_details(vec![DetailsScript::Payload(
            json!({"confirmationStatus": "confirmed"}),
        )]);
        let executor = executor_for(Arc::clone(&service), MockNotifier::new());

        executor
            .sell(&Config::default(), MINT, "50%")
            .await
            .unwrap();

        let requests = service.build_requests();
        assert_eq!(requests[0].from_mint, MINT);
        assert_eq!(requests[0].to_mint, WRAPPED_SOL_MINT);
        assert_eq!(requests[0].fee.mode, FeeMode::Deduct);
        assert_eq!(requests[0].amount, "50%");
    }

    #[tokio::test]
    async fn test_buy_auto_rejected_before_any_network_call() {
        let service = MockSwapService::new();
        let executor = executor_for(Arc::clone(&service), MockNotifier::new());

        let result = executor.buy(&Config::default(), MINT, "auto").await;
        assert!(matches!(
            result,
            Err(AppError::Input(TradeInputError::BuyAutoUnsupported))
        ));
        assert!(service.build_requests().is_empty());
    }

    #[tokio::test]
    async fn test_sell_auto_is_allowed() {
        let service = MockSwapService::new().with_details(vec![DetailsScript::Payload(
            json!({"confirmationStatus": "confirmed"}),
        )]);
        let executor = executor_for(Arc::clone(&service), MockNotifier::new());

        executor
            .sell(&Config::default(), MINT, "auto")
            .await
            .unwrap();
        assert_eq!(service.build_requests()[0].amount, "auto");
    }

    #[tokio::test]
    async fn test_unverified_trade_reports_pending() {
        let service = MockSwapService::new().with_details(vec![DetailsScript::Absent]);
        let executor = executor_for(Arc::clone(&service), MockNotifier::new());

        let result = executor
            .buy(&Config::default(), MINT, "0.1")
            .await
            .unwrap();
        assert_eq!(result.verification, VerificationStatus::Pending);
        assert_eq!(service.details_calls(), 7);
    }

    #[tokio::test]
    async fn test_on_chain_failure_carries_txid() {
        let service = MockSwapService::new().with_details(vec![DetailsScript::Payload(
            json!({"meta": {"err": "InsufficientFundsForFee"}}),
        )]);
        let notifier = MockNotifier::new();
        let executor = executor_for(Arc::clone(&service), Arc::clone(&notifier));

        let err = executor
            .buy(&Config::default(), MINT, "0.1")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("tx-123"));

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].title.contains("Buy failed"));
    }

    #[tokio::test]
    async fn test_notifications_respect_config_toggle() {
        let service = MockSwapService::new().with_details(vec![DetailsScript::Payload(
            json!({"confirmationStatus": "confirmed"}),
        )]);
        let notifier = MockNotifier::new();
        let executor = executor_for(Arc::clone(&service), Arc::clone(&notifier));

        let mut config = Config::default();
        config.notifications_enabled = false;
        executor.buy(&config, MINT, "0.2").await.unwrap();
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_build_failure_propagates() {
        let service = MockSwapService::new().with_build_error(SwapError::Build("no route".into()));
        let executor = executor_for(Arc::clone(&service), MockNotifier::new());

        let err = executor
            .buy(&Config::default(), MINT, "0.2")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no route"));
        assert_eq!(service.submit_calls(), 0);
    }
}
