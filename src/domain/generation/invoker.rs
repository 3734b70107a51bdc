//! Model invocation with bounded exponential backoff

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::classifier::failure_kind;
use crate::domain::llm::LlmProvider;
use crate::domain::DomainError;

/// Retry policy for transient model failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first call
    pub max_attempts: u32,
    /// Base delay, doubled per attempt
    pub base_delay_ms: u64,
    /// Upper bound for a single backoff
    pub max_delay_ms: u64,
    /// Optional bound on the whole retry sequence
    pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 10_000,
            deadline: None,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_base_delay(mut self, ms: u64) -> Self {
        self.base_delay_ms = ms;
        self
    }

    pub fn with_max_delay(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Backoff after the given failed attempt (1-indexed): `base * 2^attempt`, capped
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
        let delay_ms = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);

        Duration::from_millis(delay_ms)
    }
}

/// Calls the model through an injected provider, retrying transient failures
pub struct ModelInvoker {
    provider: Arc<dyn LlmProvider>,
    model: String,
    policy: RetryPolicy,
}

impl std::fmt::Debug for ModelInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelInvoker")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.model)
            .field("policy", &self.policy)
            .finish()
    }
}

impl ModelInvoker {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            model: model.into(),
            policy,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Invoke the model with the configured attempt budget
    pub async fn invoke(&self, prompt: &str) -> Result<String, DomainError> {
        self.invoke_with_attempts(prompt, self.policy.max_attempts).await
    }

    /// Invoke the model with an explicit attempt budget
    pub async fn invoke_with_attempts(
        &self,
        prompt: &str,
        max_attempts: u32,
    ) -> Result<String, DomainError> {
        let sequence = self.retry_sequence(prompt, max_attempts.max(1));

        match self.policy.deadline {
            Some(deadline) => timeout(deadline, sequence).await.unwrap_or_else(|_| {
                warn!(deadline_ms = deadline.as_millis() as u64, "Model call deadline exceeded");
                Err(DomainError::provider(
                    self.provider.provider_name(),
                    format!("Deadline of {}ms exceeded", deadline.as_millis()),
                ))
            }),
            None => sequence.await,
        }
    }

    async fn retry_sequence(&self, prompt: &str, max_attempts: u32) -> Result<String, DomainError> {
        let provider = self.provider.provider_name();
        let mut attempt = 1;

        loop {
            info!(
                provider = provider,
                model = %self.model,
                attempt = attempt,
                max_attempts = max_attempts,
                "Calling model"
            );

            let error = match self.provider.generate(&self.model, prompt).await {
                Ok(text) => {
                    debug!(attempt = attempt, chars = text.len(), "Model call succeeded");
                    return Ok(text);
                }
                Err(e) => e,
            };

            let kind = failure_kind(&error);

            if !kind.is_transient() || attempt >= max_attempts {
                warn!(
                    provider = provider,
                    attempt = attempt,
                    kind = %kind,
                    error = %error,
                    "Model call failed, giving up"
                );
                return Err(error);
            }

            let delay = self.policy.delay_for_attempt(attempt);
            warn!(
                provider = provider,
                attempt = attempt,
                kind = %kind,
                delay_ms = delay.as_millis() as u64,
                "Model unavailable, retrying after backoff"
            );

            sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::time::Instant;

    use super::*;
    use crate::domain::llm::MockLlmProvider;

    fn mock_provider() -> MockLlmProvider {
        let mut provider = MockLlmProvider::new();
        provider.expect_provider_name().return_const("mock");
        provider
    }

    /// Provider that fails `failures` times with `status`, then returns "ok"
    fn flaky_provider(status: u16, failures: usize, expected_calls: usize) -> MockLlmProvider {
        let calls = AtomicUsize::new(0);
        let mut provider = mock_provider();

        provider
            .expect_generate()
            .times(expected_calls)
            .returning(move |_, _| {
                if calls.fetch_add(1, Ordering::SeqCst) < failures {
                    Err(DomainError::provider_status("mock", status, "unavailable"))
                } else {
                    Ok("ok".to_string())
                }
            });

        provider
    }

    fn invoker(provider: MockLlmProvider) -> ModelInvoker {
        ModelInvoker::new(Arc::new(provider), "test-model", RetryPolicy::default())
    }

    #[test]
    fn test_delay_for_attempt() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(4000));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(8000));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(10_000));
        assert_eq!(policy.delay_for_attempt(64), Duration::from_millis(10_000));
    }

    #[test]
    fn test_policy_builder() {
        let policy = RetryPolicy::new(5)
            .with_base_delay(100)
            .with_max_delay(500)
            .with_deadline(Duration::from_secs(20));

        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(500));
        assert_eq!(policy.deadline, Some(Duration::from_secs(20)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_call_success_has_no_delay() {
        let mut provider = mock_provider();
        provider
            .expect_generate()
            .times(1)
            .returning(|model, prompt| {
                assert_eq!(model, "test-model");
                assert_eq!(prompt, "hello");
                Ok("[]".to_string())
            });

        let start = Instant::now();
        let text = invoker(provider).invoke("hello").await.unwrap();

        assert_eq!(text, "[]");
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_overloaded_then_succeeds() {
        let start = Instant::now();
        let text = invoker(flaky_provider(503, 2, 3)).invoke("prompt").await.unwrap();

        assert_eq!(text, "ok");
        assert_eq!(start.elapsed(), Duration::from_millis(6000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_rate_limited() {
        let start = Instant::now();
        let text = invoker(flaky_provider(429, 1, 2)).invoke("prompt").await.unwrap();

        assert_eq!(text, "ok");
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_fails_fast() {
        let start = Instant::now();
        let err = invoker(flaky_provider(401, 1, 1)).invoke("prompt").await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_attempts_propagate_last_error() {
        let calls = AtomicUsize::new(0);
        let mut provider = mock_provider();
        provider.expect_generate().times(3).returning(move |_, _| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::provider_status("mock", 503, format!("failure {}", n)))
        });

        let start = Instant::now();
        let err = invoker(provider).invoke("prompt").await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("failure 2"));
        assert_eq!(start.elapsed(), Duration::from_millis(6000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_attempt_budget() {
        let err = invoker(flaky_provider(503, 5, 1))
            .invoke_with_attempts("prompt", 1)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_provider_output_not_retried() {
        let mut provider = mock_provider();
        provider
            .expect_generate()
            .times(1)
            .returning(|_, _| Err(DomainError::malformed_output("bad")));

        let err = invoker(provider).invoke("prompt").await.unwrap_err();
        assert!(matches!(err, DomainError::MalformedOutput { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_cuts_retry_sequence() {
        let policy = RetryPolicy::default().with_deadline(Duration::from_millis(3000));
        let invoker = ModelInvoker::new(Arc::new(flaky_provider(503, 5, 2)), "m", policy);

        let start = Instant::now();
        let err = invoker.invoke("prompt").await.unwrap_err();

        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("Deadline of 3000ms exceeded"));
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }
}
