//! Recorded-call mocks for the port traits, used by unit and integration
//! tests to script remote behavior without touching the network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::notify::{Notification, NotificationSink};
use super::secrets::{KeychainError, SecretStore};
use super::swap::{DetailsError, SwapBuild, SwapError, SwapQuote, SwapRequest, SwapService};

/// A plausible build response in the service's wire shape
pub fn sample_build() -> SwapBuild {
    let raw = json!({
        "quote": {
            "amountIn": "0.2",
            "outAmount": "2.25",
            "fee": "0.01",
            "platformFeeUI": "0.02",
            "priceImpact": "0.5",
        },
        "txn": "AAAA",
    });
    SwapBuild {
        quote: SwapQuote {
            in_amount: 0.2,
            out_amount: 2.25,
            fee: 0.01,
            platform_fee: 0.02,
            price_impact: 0.5,
            raw: raw["quote"].clone(),
        },
        raw,
    }
}

/// Scripted response for one `transaction_details` call
pub enum DetailsScript {
    Payload(Value),
    Absent,
    Transient(String),
    Fatal(String),
}

/// Mock swap service that records calls and replays scripted responses
pub struct MockSwapService {
    pub payer: String,
    build_requests: Mutex<Vec<SwapRequest>>,
    build_result: Mutex<Option<SwapError>>,
    submit_result: Mutex<Result<String, SwapError>>,
    submit_calls: AtomicUsize,
    details_script: Mutex<VecDeque<DetailsScript>>,
    details_calls: AtomicUsize,
}

impl Default for MockSwapService {
    fn default() -> Self {
        Self {
            payer: "wa11et11111111111111111111111111111111111111".to_string(),
            build_requests: Mutex::new(Vec::new()),
            build_result: Mutex::new(None),
            submit_result: Mutex::new(Ok("tx-123".to_string())),
            submit_calls: AtomicUsize::new(0),
            details_script: Mutex::new(VecDeque::new()),
            details_calls: AtomicUsize::new(0),
        }
    }
}

impl MockSwapService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script the next `transaction_details` responses, in order. The last
    /// script entry is replayed once the queue is drained.
    pub fn with_details(self: Arc<Self>, script: Vec<DetailsScript>) -> Arc<Self> {
        *self.details_script.lock().unwrap() = script.into();
        self
    }

    pub fn with_build_error(self: Arc<Self>, err: SwapError) -> Arc<Self> {
        *self.build_result.lock().unwrap() = Some(err);
        self
    }

    pub fn with_submit_error(self: Arc<Self>, err: SwapError) -> Arc<Self> {
        *self.submit_result.lock().unwrap() = Err(err);
        self
    }

    pub fn build_requests(&self) -> Vec<SwapRequest> {
        self.build_requests.lock().unwrap().clone()
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }

    fn clone_swap_error(err: &SwapError) -> SwapError {
        match err {
            SwapError::Init(m) => SwapError::Init(m.clone()),
            SwapError::Build(m) => SwapError::Build(m.clone()),
            SwapError::Submit(m) => SwapError::Submit(m.clone()),
            SwapError::OnChain(m) => SwapError::OnChain(m.clone()),
            SwapError::Api(m) => SwapError::Api(m.clone()),
        }
    }
}

#[async_trait]
impl SwapService for MockSwapService {
    fn payer(&self) -> String {
        self.payer.clone()
    }

    async fn swap_instructions(&self, request: &SwapRequest) -> Result<SwapBuild, SwapError> {
        self.build_requests.lock().unwrap().push(request.clone());
        if let Some(err) = self.build_result.lock().unwrap().as_ref() {
            return Err(Self::clone_swap_error(err));
        }
        Ok(sample_build())
    }

    async fn submit(&self, _build: &SwapBuild) -> Result<String, SwapError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        match &*self.submit_result.lock().unwrap() {
            Ok(txid) => Ok(txid.clone()),
            Err(err) => Err(Self::clone_swap_error(err)),
        }
    }

    async fn transaction_details(&self, _txid: &str) -> Result<Option<Value>, DetailsError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.details_script.lock().unwrap();
        let entry = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().map(|e| match e {
                DetailsScript::Payload(v) => DetailsScript::Payload(v.clone()),
                DetailsScript::Absent => DetailsScript::Absent,
                DetailsScript::Transient(m) => DetailsScript::Transient(m.clone()),
                DetailsScript::Fatal(m) => DetailsScript::Fatal(m.clone()),
            })
        };
        match entry {
            Some(DetailsScript::Payload(v)) => Ok(Some(v)),
            Some(DetailsScript::Absent) | None => Ok(None),
            Some(DetailsScript::Transient(m)) => Err(DetailsError::Transient(m)),
            Some(DetailsScript::Fatal(m)) => Err(DetailsError::Other(m)),
        }
    }
}

/// Mock secret store backed by memory
#[derive(Default)]
pub struct MockSecrets {
    secret: Mutex<Option<String>>,
}

impl MockSecrets {
    pub fn with_secret(secret: &str) -> Self {
        Self {
            secret: Mutex::new(Some(secret.to_string())),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl SecretStore for MockSecrets {
    fn get(&self) -> Result<String, KeychainError> {
        self.secret
            .lock()
            .unwrap()
            .clone()
            .ok_or(KeychainError::Missing)
    }

    fn has(&self) -> Result<bool, KeychainError> {
        Ok(self.secret.lock().unwrap().is_some())
    }

    fn store(&self, secret: &str) -> Result<(), KeychainError> {
        *self.secret.lock().unwrap() = Some(secret.trim().to_string());
        Ok(())
    }

    fn delete(&self) -> Result<bool, KeychainError> {
        Ok(self.secret.lock().unwrap().take().is_some())
    }
}

/// Mock notifier recording every notification
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<Notification>>,
    pub deliver: bool,
}

impl MockNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            deliver: true,
        })
    }

    /// A notifier whose delivery always reports failure
    pub fn undeliverable() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            deliver: false,
        })
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for MockNotifier {
    async fn notify(&self, notification: &Notification) -> bool {
        self.sent.lock().unwrap().push(notification.clone());
        self.deliver
    }
}
