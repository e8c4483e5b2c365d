//! Tracker Swap Client
//!
//! HTTP client for the hosted swap routing service plus the Solana RPC leg
//! used for submission and status lookups. One instance wraps the signing
//! keypair, the finalized RPC URL, and the optional API credential; the
//! process-wide memoization of that instance lives in `application::context`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::StatusCode;
use serde_json::{json, Value};
use solana_client::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::VersionedTransaction;

use crate::config::{Config, ConfigError, PriorityFee};
use crate::ports::swap::{
    DetailsError, SwapBuild, SwapError, SwapRequest, SwapService,
};

use super::types::quote_from_build;

/// Hosted swap routing endpoint
const SWAP_API_URL: &str = "https://swap-v2.solanatracker.io";

/// Builtin API credential sent with every build request
const SWAP_API_KEY: &str = "jduck-d815-4c28-b85d-17e9fc3a21a8";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Ensure the RPC URL requests the advanced-transaction capability exactly
/// once. Already-flagged URLs pass through untouched.
pub fn ensure_advanced_tx(rpc_url: &str) -> Result<String, ConfigError> {
    let trimmed = rpc_url.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "rpcUrl".to_string(),
            value: rpc_url.to_string(),
            reason: "RPC URL is missing or invalid".to_string(),
        });
    }
    if trimmed.contains("advancedTx") {
        return Ok(trimmed.to_string());
    }
    let separator = if trimmed.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}advancedTx=true", trimmed, separator))
}

/// Decode a wallet secret into a keypair. Accepts a JSON numeric array
/// (detected by a leading `[`) or a base58 string.
pub fn keypair_from_secret(raw: &str) -> Result<Keypair, SwapError> {
    let trimmed = raw.trim();
    let bytes: Vec<u8> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
            .map_err(|e| SwapError::Init(format!("invalid JSON secret key: {}", e)))?
    } else {
        bs58::decode(trimmed)
            .into_vec()
            .map_err(|e| SwapError::Init(format!("invalid base58 secret key: {}", e)))?
    };
    Keypair::try_from(bytes.as_slice())
        .map_err(|e| SwapError::Init(format!("invalid secret key bytes: {}", e)))
}

/// Client handle for the remote swap service
pub struct TrackerClient {
    keypair: Keypair,
    rpc_url: String,
    swap_url: String,
    api_key: Option<String>,
    debug: bool,
    http: reqwest::Client,
    rpc: Arc<RpcClient>,
}

impl TrackerClient {
    /// Build a client from a normalized config and a decoded keypair. The
    /// RPC URL is finalized here (advanced-transaction flag guaranteed).
    pub fn from_config(config: &Config, keypair: Keypair) -> Result<Self, SwapError> {
        let rpc_url = ensure_advanced_tx(&config.rpc_url)
            .map_err(|e| SwapError::Init(e.to_string()))?;
        Self::new(keypair, rpc_url, Some(SWAP_API_KEY.to_string()), config.debug_mode)
    }

    pub fn new(
        keypair: Keypair,
        rpc_url: String,
        api_key: Option<String>,
        debug: bool,
    ) -> Result<Self, SwapError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| SwapError::Init(format!("failed to create HTTP client: {}", e)))?;
        let rpc = Arc::new(RpcClient::new_with_commitment(
            rpc_url.clone(),
            CommitmentConfig::confirmed(),
        ));

        Ok(Self {
            keypair,
            rpc_url,
            swap_url: SWAP_API_URL.to_string(),
            api_key,
            debug,
            http,
            rpc,
        })
    }

    /// Finalized RPC URL this client was built against
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    fn build_query(&self, request: &SwapRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("from", request.from_mint.clone()),
            ("to", request.to_mint.clone()),
            ("amount", request.amount.clone()),
            ("slippage", request.slippage.to_string()),
            ("payer", request.payer.clone()),
            ("txVersion", request.tx_version.clone()),
            ("fee", request.fee.as_request_param()),
            ("feeType", request.fee.mode.as_str().to_string()),
        ];
        match request.priority_fee {
            PriorityFee::Auto => {
                query.push(("priorityFeeLevel", request.priority_fee_level.clone()));
            }
            PriorityFee::Sol(amount) => {
                query.push(("priorityFee", amount.to_string()));
            }
        }
        query
    }
}

#[async_trait]
impl SwapService for TrackerClient {
    fn payer(&self) -> String {
        self.keypair.pubkey().to_string()
    }

    async fn swap_instructions(&self, request: &SwapRequest) -> Result<SwapBuild, SwapError> {
        let url = format!("{}/swap", self.swap_url);
        let mut req = self.http.get(&url).query(&self.build_query(request));
        if let Some(ref api_key) = self.api_key {
            req = req.header("x-api-key", api_key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| SwapError::Build(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SwapError::Build(format!("API error {}: {}", status, body)));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| SwapError::Build(format!("failed to parse build response: {}", e)))?;
        if self.debug {
            tracing::debug!(payload = %raw, "swap build response");
        }

        Ok(SwapBuild {
            quote: quote_from_build(&raw),
            raw,
        })
    }

    async fn submit(&self, build: &SwapBuild) -> Result<String, SwapError> {
        let encoded = build
            .raw
            .get("txn")
            .and_then(Value::as_str)
            .ok_or_else(|| SwapError::Submit("build response carried no transaction".into()))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| SwapError::Submit(format!("invalid transaction encoding: {}", e)))?;
        let unsigned: VersionedTransaction = bincode::deserialize(&bytes)
            .map_err(|e| SwapError::Submit(format!("invalid transaction payload: {}", e)))?;
        let signed = VersionedTransaction::try_new(unsigned.message, &[&self.keypair])
            .map_err(|e| SwapError::Submit(format!("signing failed: {}", e)))?;

        // RpcClient is blocking, hop off the async runtime to submit.
        let rpc = Arc::clone(&self.rpc);
        let signature = tokio::task::spawn_blocking(move || {
            rpc.send_transaction(&signed)
                .map(|sig| sig.to_string())
                .map_err(|e| SwapError::Submit(e.to_string()))
        })
        .await
        .map_err(|e| SwapError::Submit(format!("task join error: {}", e)))??;

        tracing::info!(txid = %signature, "swap submitted");
        Ok(signature)
    }

    async fn transaction_details(&self, txid: &str) -> Result<Option<Value>, DetailsError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getTransaction",
            "params": [txid, {"encoding": "json", "maxSupportedTransactionVersion": 0}],
        });

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status, &text));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| DetailsError::Other(format!("failed to parse status response: {}", e)))?;

        if let Some(err) = payload.get("error") {
            let message = err.to_string();
            if is_rate_limit_phrase(&message) {
                return Err(DetailsError::Transient(message));
            }
            return Err(DetailsError::Other(message));
        }

        match payload.get("result") {
            None | Some(Value::Null) => Ok(None),
            Some(result) => Ok(Some(result.clone())),
        }
    }
}

fn classify_transport_error(err: reqwest::Error) -> DetailsError {
    if err.is_timeout() || err.is_connect() {
        DetailsError::Transient(err.to_string())
    } else {
        DetailsError::Other(err.to_string())
    }
}

/// HTTP 408/425/429 and every 5xx are retryable; so is rate-limit phrasing
/// in the body regardless of status.
fn classify_http_failure(status: StatusCode, body: &str) -> DetailsError {
    let message = format!("HTTP {}: {}", status, body);
    if is_transient_status(status) || is_rate_limit_phrase(body) {
        DetailsError::Transient(message)
    } else {
        DetailsError::Other(message)
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error()
        || matches!(
            status,
            StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_EARLY | StatusCode::TOO_MANY_REQUESTS
        )
}

fn is_rate_limit_phrase(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    lowered.contains("rate limit") || lowered.contains("too many requests")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_advanced_tx_appends_once() {
        assert_eq!(
            ensure_advanced_tx("https://rpc.example").unwrap(),
            "https://rpc.example?advancedTx=true"
        );
        assert_eq!(
            ensure_advanced_tx("https://rpc.example?key=abc").unwrap(),
            "https://rpc.example?key=abc&advancedTx=true"
        );
        assert_eq!(
            ensure_advanced_tx("https://rpc.example?advancedTx=true").unwrap(),
            "https://rpc.example?advancedTx=true"
        );
    }

    #[test]
    fn test_ensure_advanced_tx_rejects_empty() {
        assert!(ensure_advanced_tx("").is_err());
        assert!(ensure_advanced_tx("   ").is_err());
    }

    #[test]
    fn test_keypair_from_json_array_secret() {
        let keypair = Keypair::new();
        let json_secret = serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap();
        let decoded = keypair_from_secret(&json_secret).unwrap();
        assert_eq!(decoded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_keypair_from_base58_secret() {
        let keypair = Keypair::new();
        let base58_secret = bs58::encode(keypair.to_bytes()).into_string();
        let decoded = keypair_from_secret(&format!("  {}\n", base58_secret)).unwrap();
        assert_eq!(decoded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_keypair_from_garbage_fails() {
        assert!(keypair_from_secret("not a key").is_err());
        assert!(keypair_from_secret("[1,2,3]").is_err());
    }

    #[test]
    fn test_transient_status_set() {
        assert!(is_transient_status(StatusCode::REQUEST_TIMEOUT));
        assert!(is_transient_status(StatusCode::TOO_EARLY));
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_transient_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_transient_status(StatusCode::BAD_REQUEST));
        assert!(!is_transient_status(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_rate_limit_phrasing() {
        assert!(is_rate_limit_phrase("Rate Limit exceeded"));
        assert!(is_rate_limit_phrase("429 too many requests"));
        assert!(!is_rate_limit_phrase("account not found"));
    }

    #[test]
    fn test_build_query_priority_fee_variants() {
        let keypair = Keypair::new();
        let client = TrackerClient::new(
            keypair,
            "https://rpc.example?advancedTx=true".to_string(),
            None,
            false,
        )
        .unwrap();

        let mut request = SwapRequest {
            from_mint: "So11111111111111111111111111111111111111112".into(),
            to_mint: "6p6xgHyF7AeE6TZkSmFsko444wqoP15icUSqi2jfGiPN".into(),
            amount: "0.2".into(),
            slippage: 10.0,
            payer: client.payer(),
            priority_fee: PriorityFee::Auto,
            priority_fee_level: "medium".into(),
            tx_version: "v0".into(),
            fee: crate::ports::swap::OperatorFee {
                wallet: "4Qr9Fc8nWVYZKMBv7SH2mUJCyGdTt3pXaEuDkbNe6gsA".into(),
                percent: 0.5,
                mode: crate::ports::swap::FeeMode::Add,
            },
        };

        let query = client.build_query(&request);
        assert!(query.contains(&("priorityFeeLevel", "medium".to_string())));
        assert!(query.contains(&("feeType", "add".to_string())));
        assert!(query
            .iter()
            .any(|(k, v)| *k == "fee" && v.ends_with(":0.5")));

        request.priority_fee = PriorityFee::Sol(0.0005);
        let query = client.build_query(&request);
        assert!(query.contains(&("priorityFee", "0.0005".to_string())));
        assert!(!query.iter().any(|(k, _)| *k == "priorityFeeLevel"));
    }
}
