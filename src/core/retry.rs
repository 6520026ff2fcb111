use crate::core::interrupt::Interrupt;
use crate::utils::error::{EtlError, Result};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 10;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Fixed pause between two attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

/// Runs `op` until it succeeds, a non-retryable error comes back, the
/// interrupt fires, or `policy.max_attempts` attempts have failed.
///
/// Interrupts win over everything else: the call in flight (or the pause
/// between attempts) is abandoned and `EtlError::Interrupted` is returned
/// without touching the remaining attempts.
pub async fn with_retry<T, F, Fut>(
    label: &str,
    policy: &RetryPolicy,
    interrupt: &Interrupt,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error: Option<EtlError> = None;

    for attempt in 1..=policy.max_attempts {
        if interrupt.is_triggered() {
            tracing::warn!("KeyboardInterrupt during {}", label);
            return Err(EtlError::Interrupted);
        }

        let outcome = tokio::select! {
            biased;
            _ = interrupt.triggered() => Err(EtlError::Interrupted),
            result = op() => result,
        };

        let error = match outcome {
            Ok(value) => return Ok(value),
            Err(e) if e.is_interrupt() => {
                tracing::warn!("KeyboardInterrupt during {}", label);
                return Err(EtlError::Interrupted);
            }
            Err(e) if !e.is_retryable() => {
                tracing::error!("{} failed and will not be retried: {}", label, e.chain());
                return Err(e);
            }
            Err(e) => e,
        };

        tracing::warn!(
            "Failed {} (attempt {}/{}). Sleeping {:?} and will try again: {}",
            label,
            attempt,
            policy.max_attempts,
            policy.delay,
            error.chain()
        );
        last_error = Some(error);

        if attempt < policy.max_attempts {
            tokio::select! {
                biased;
                _ = interrupt.triggered() => {
                    tracing::warn!("KeyboardInterrupt during {}", label);
                    return Err(EtlError::Interrupted);
                }
                _ = tokio::time::sleep(policy.delay) => {}
            }
        }
    }

    match &last_error {
        Some(e) => tracing::error!("Absolutely failed {}: {}", label, e.chain()),
        None => tracing::error!("Absolutely failed {}: no attempts allowed", label),
    }

    Err(EtlError::RetriesExhausted {
        label: label.to_string(),
        attempts: policy.max_attempts,
        source: last_error.map(Box::new),
    })
}
