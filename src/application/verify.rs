//! Transaction Verification
//!
//! Bounded polling of a submitted transaction until its status becomes
//! terminal or the schedule runs out. One immediate attempt, then one more
//! after each delay in the schedule.

use std::time::Duration;

use crate::domain::{classify_details, VerificationState};
use crate::ports::swap::{DetailsError, SwapError, SwapService};

/// Poll schedule: fixed delays between attempts, after the first immediate
/// one. Seven attempts total over ~15.5s with the default schedule.
#[derive(Debug, Clone)]
pub struct Verifier {
    schedule: Vec<Duration>,
}

impl Default for Verifier {
    fn default() -> Self {
        Self {
            schedule: vec![
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(3),
                Duration::from_secs(4),
                Duration::from_secs(5),
            ],
        }
    }
}

impl Verifier {
    pub fn new(schedule: Vec<Duration>) -> Self {
        Self { schedule }
    }

    /// Number of attempts this schedule allows
    pub fn attempts(&self) -> usize {
        self.schedule.len() + 1
    }

    /// Poll until the transaction is terminal.
    ///
    /// `Ok(true)` means confirmed, `Ok(false)` means the schedule ran out
    /// without a terminal signal. An on-chain failure or a non-transient
    /// fetch error aborts immediately; transient fetch errors just consume
    /// an attempt.
    pub async fn verify(&self, service: &dyn SwapService, txid: &str) -> Result<bool, SwapError> {
        let attempts = self.attempts();
        for attempt in 0..attempts {
            if attempt > 0 {
                tokio::time::sleep(self.schedule[attempt - 1]).await;
            }

            match service.transaction_details(txid).await {
                Ok(details) => match classify_details(details.as_ref()) {
                    VerificationState::Confirmed => {
                        tracing::debug!(txid, attempt, "transaction confirmed");
                        return Ok(true);
                    }
                    VerificationState::Failed(reason) => {
                        return Err(SwapError::OnChain(reason));
                    }
                    VerificationState::Unknown => {
                        tracing::debug!(txid, attempt, "no terminal status yet");
                    }
                },
                Err(DetailsError::Transient(reason)) => {
                    tracing::warn!(txid, attempt, %reason, "transient error fetching status");
                }
                Err(DetailsError::Other(reason)) => {
                    return Err(SwapError::Api(reason));
                }
            }
        }

        tracing::warn!(txid, attempts, "verification schedule exhausted");
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::{DetailsScript, MockSwapService};
    use serde_json::json;

    fn instant_verifier() -> Verifier {
        Verifier::new(vec![Duration::ZERO; 6])
    }

    #[tokio::test]
    async fn test_immediate_confirmation() {
        let service = MockSwapService::new().with_details(vec![DetailsScript::Payload(
            json!({"confirmationStatus": "finalized"}),
        )]);
        let verified = instant_verifier().verify(&*service, "tx").await.unwrap();
        assert!(verified);
        assert_eq!(service.details_calls(), 1);
    }

    #[tokio::test]
    async fn test_schedule_exhaustion_is_seven_attempts() {
        let service = MockSwapService::new().with_details(vec![DetailsScript::Absent]);
        let verified = instant_verifier().verify(&*service, "tx").await.unwrap();
        assert!(!verified);
        assert_eq!(service.details_calls(), 7);
    }

    #[tokio::test]
    async fn test_on_chain_failure_aborts_immediately() {
        let service = MockSwapService::new().with_details(vec![DetailsScript::Payload(
            json!({"meta": {"err": {"InstructionError": [2, "Custom"]}}}),
        )]);
        let result = instant_verifier().verify(&*service, "tx").await;
        assert!(matches!(result, Err(SwapError::OnChain(_))));
        assert_eq!(service.details_calls(), 1);
    }

    #[tokio::test]
    async fn test_transient_errors_consume_attempts() {
        let service = MockSwapService::new().with_details(vec![
            DetailsScript::Transient("503".into()),
            DetailsScript::Transient("503".into()),
            DetailsScript::Payload(json!({"confirmationStatus": "confirmed"})),
        ]);
        let verified = instant_verifier().verify(&*service, "tx").await.unwrap();
        assert!(verified);
        assert_eq!(service.details_calls(), 3);
    }

    #[tokio::test]
    async fn test_all_transient_exhausts_without_error() {
        let service = MockSwapService::new()
            .with_details(vec![DetailsScript::Transient("rate limit".into())]);
        let verified = instant_verifier().verify(&*service, "tx").await.unwrap();
        assert!(!verified);
        assert_eq!(service.details_calls(), 7);
    }

    #[tokio::test]
    async fn test_fatal_fetch_error_aborts() {
        let service = MockSwapService::new().with_details(vec![
            DetailsScript::Absent,
            DetailsScript::Fatal("invalid request".into()),
        ]);
        let result = instant_verifier().verify(&*service, "tx").await;
        assert!(matches!(result, Err(SwapError::Api(_))));
        assert_eq!(service.details_calls(), 2);
    }

    #[tokio::test]
    async fn test_late_confirmation_within_schedule() {
        let service = MockSwapService::new().with_details(vec![
            DetailsScript::Absent,
            DetailsScript::Absent,
            DetailsScript::Absent,
            DetailsScript::Payload(json!({"meta": {"err": null, "status": {"Ok": null}}})),
        ]);
        let verified = instant_verifier().verify(&*service, "tx").await.unwrap();
        assert!(verified);
        assert_eq!(service.details_calls(), 4);
    }
}
