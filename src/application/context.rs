//! Swap Client Context
//!
//! Process-wide, lazily built swap client. The first caller pays the
//! construction cost (keychain read, keypair decode, HTTP client setup);
//! concurrent callers await the same in-flight build instead of racing. A
//! failed build leaves the cell empty so the next call retries cleanly.
//!
//! The client is pinned to the RPC URL it was first built against. Config
//! changes after that point do not rebuild it; the mismatch is logged once
//! per process.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use crate::adapters::tracker::{ensure_advanced_tx, keypair_from_secret, TrackerClient};
use crate::config::Config;
use crate::error::AppError;
use crate::ports::secrets::SecretStore;
use crate::ports::swap::SwapService;

pub type BuildFuture =
    Pin<Box<dyn Future<Output = Result<Arc<dyn SwapService>, AppError>> + Send>>;

/// Factory invoked at most once per successful build
pub type SwapFactory = Arc<dyn Fn(Config) -> BuildFuture + Send + Sync>;

pub struct SwapContext {
    cell: OnceCell<Arc<dyn SwapService>>,
    factory: SwapFactory,
    built_rpc: Mutex<Option<String>>,
    mismatch_warned: AtomicBool,
}

impl SwapContext {
    pub fn new(factory: SwapFactory) -> Self {
        Self {
            cell: OnceCell::new(),
            factory,
            built_rpc: Mutex::new(None),
            mismatch_warned: AtomicBool::new(false),
        }
    }

    /// Context wired to the real swap client, reading the wallet secret from
    /// the given store at build time
    pub fn for_secrets(secrets: Arc<dyn SecretStore>) -> Self {
        Self::new(Arc::new(move |config: Config| -> BuildFuture {
            let secrets = Arc::clone(&secrets);
            Box::pin(async move {
                let secret = secrets.get()?;
                let keypair = keypair_from_secret(&secret)?;
                let client = TrackerClient::from_config(&config, keypair)?;
                Ok(Arc::new(client) as Arc<dyn SwapService>)
            })
        }))
    }

    /// Get the shared client, building it on first use
    pub async fn get(&self, config: &Config) -> Result<Arc<dyn SwapService>, AppError> {
        if let Some(existing) = self.cell.get() {
            self.warn_on_rpc_change(config);
            return Ok(Arc::clone(existing));
        }

        let client = self
            .cell
            .get_or_try_init(|| {
                let config = config.clone();
                async move {
                    let client = (self.factory)(config.clone()).await?;
                    *self.built_rpc.lock().unwrap() = Some(config.rpc_url.clone());
                    Ok::<_, AppError>(client)
                }
            })
            .await?;
        Ok(Arc::clone(client))
    }

    /// Compare the hinted RPC URL against the one the client was built with,
    /// both in their finalized form so adding the advanced-transaction flag
    /// by hand does not read as a change. Returns whether a warning was
    /// emitted by this call; at most one fires per process.
    fn warn_on_rpc_change(&self, config: &Config) -> bool {
        let built = self.built_rpc.lock().unwrap();
        let Some(active) = built.as_deref().and_then(|rpc| ensure_advanced_tx(rpc).ok()) else {
            return false;
        };
        let Ok(hinted) = ensure_advanced_tx(&config.rpc_url) else {
            return false;
        };
        if active != hinted && !self.mismatch_warned.swap(true, Ordering::SeqCst) {
            tracing::warn!(
                %active,
                configured = %config.rpc_url,
                "RPC URL changed after the swap client was built; restart to apply"
            );
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::MockSwapService;
    use crate::ports::swap::SwapError;
    use std::sync::atomic::AtomicUsize;

    fn counting_context(builds: Arc<AtomicUsize>, fail_first: bool) -> SwapContext {
        let failed = Arc::new(AtomicBool::new(false));
        SwapContext::new(Arc::new(move |_config: Config| -> BuildFuture {
            let builds = Arc::clone(&builds);
            let failed = Arc::clone(&failed);
            let fail_this = fail_first && !failed.swap(true, Ordering::SeqCst);
            Box::pin(async move {
                builds.fetch_add(1, Ordering::SeqCst);
                if fail_this {
                    return Err(AppError::Swap(SwapError::Init("boom".into())));
                }
                Ok(MockSwapService::new() as Arc<dyn SwapService>)
            })
        }))
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_build() {
        let builds = Arc::new(AtomicUsize::new(0));
        let context = Arc::new(counting_context(Arc::clone(&builds), false));
        let config = Config::default();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let context = Arc::clone(&context);
            let config = config.clone();
            handles.push(tokio::spawn(async move {
                context.get(&config).await.map(|c| Arc::as_ptr(&c) as *const () as usize)
            }));
        }

        let mut pointers = Vec::new();
        for handle in handles {
            pointers.push(handle.await.unwrap().unwrap());
        }
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(pointers.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn test_failed_build_retries_on_next_call() {
        let builds = Arc::new(AtomicUsize::new(0));
        let context = counting_context(Arc::clone(&builds), true);
        let config = Config::default();

        assert!(context.get(&config).await.is_err());
        assert!(context.get(&config).await.is_ok());
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rpc_change_keeps_original_client_and_warns_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let context = counting_context(Arc::clone(&builds), false);
        let config = Config::default();

        let first = context.get(&config).await.unwrap();
        let mut changed = config.clone();
        changed.rpc_url = "https://other.example".to_string();
        let second = context.get(&changed).await.unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(context.mismatch_warned.load(Ordering::SeqCst));

        // Further differing hints serve the same client without re-warning
        let mut changed_again = config.clone();
        changed_again.rpc_url = "https://yet-another.example".to_string();
        assert!(!context.warn_on_rpc_change(&changed_again));
        let third = context.get(&changed_again).await.unwrap();
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_equivalent_rpc_urls_do_not_warn() {
        let builds = Arc::new(AtomicUsize::new(0));
        let context = counting_context(Arc::clone(&builds), false);

        // Built against the bare URL, later hinted with the finalized form
        let mut config = Config::default();
        config.rpc_url = "https://rpc.example".to_string();
        context.get(&config).await.unwrap();

        let mut flagged = config.clone();
        flagged.rpc_url = "https://rpc.example?advancedTx=true".to_string();
        assert!(!context.warn_on_rpc_change(&flagged));
        context.get(&flagged).await.unwrap();
        assert!(!context.mismatch_warned.load(Ordering::SeqCst));
    }
}
