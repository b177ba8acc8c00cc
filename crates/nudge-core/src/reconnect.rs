// ── Reconnect pass ──
//
// One invocation = one pass: authenticate, list clients, kick the eligible
// ones. A transient failure anywhere restarts the pass from authentication
// after a fixed delay, up to `RetryPolicy::max_attempts` attempts. Kicks
// issued by a failed attempt are not undone.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::controller::ControllerApi;
use crate::error::CoreError;
use crate::filter::should_reconnect;

/// Attempts made before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Pause between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Bounded, fixed-delay retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// At least one attempt is always made.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

/// Where a pass currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Init,
    Authenticating,
    Listing,
    Filtering,
    Reconnecting,
    Retrying,
    Done,
}

/// Outcome of a successful pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Attempt that succeeded (1-based).
    pub attempts: u32,
    /// Clients listed by the successful attempt.
    pub inspected: usize,
    /// MACs kicked by the successful attempt, in listing order.
    pub reconnected: Vec<String>,
}

/// Drives a reconnect pass against one controller session.
pub struct Reconnector<C> {
    session: C,
    config: RunConfig,
    retry: RetryPolicy,
    cancel: CancellationToken,
    state: PassState,
}

impl<C: ControllerApi + Send + Sync> Reconnector<C> {
    /// Take ownership of an opened session, applying the TLS setting.
    pub fn new(mut session: C, config: RunConfig) -> Result<Self, CoreError> {
        if config.insecure_tls {
            info!("Skipping TLS validation.");
            session.disable_certificate_validation()?;
        }

        Ok(Self {
            session,
            config,
            retry: RetryPolicy::default(),
            cancel: CancellationToken::new(),
            state: PassState::Init,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Abort before the next attempt (or during the retry delay) once
    /// `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Where the last run got to. After a failed run, the step that failed.
    pub fn state(&self) -> PassState {
        self.state
    }

    #[cfg(test)]
    fn session(&self) -> &C {
        &self.session
    }

    /// Run the pass to completion, retrying transient failures.
    ///
    /// Non-transient errors are returned as soon as they occur. When every
    /// attempt fails, the result is [`CoreError::RetryExhausted`] carrying
    /// each attempt's error in order.
    pub async fn run(&mut self) -> Result<PassSummary, CoreError> {
        let max_attempts = self.retry.max_attempts;
        let mut failures = Vec::new();

        for attempt in 1..=max_attempts {
            if self.cancel.is_cancelled() {
                return Err(CoreError::Cancelled);
            }

            debug!(attempt, max_attempts, "starting reconnect attempt");

            match self.attempt().await {
                Ok((inspected, reconnected)) => {
                    self.state = PassState::Done;
                    info!(
                        attempt,
                        inspected,
                        reconnected = reconnected.len(),
                        "reconnect pass complete"
                    );
                    return Ok(PassSummary {
                        attempts: attempt,
                        inspected,
                        reconnected,
                    });
                }
                Err(err) if err.is_transient() => {
                    warn!(attempt, error = %err, "reconnect attempt failed");
                    failures.push(err);

                    if attempt < max_attempts {
                        self.state = PassState::Retrying;
                        info!("retrying in {} seconds", self.retry.delay.as_secs());

                        tokio::select! {
                            biased;
                            () = self.cancel.cancelled() => return Err(CoreError::Cancelled),
                            () = tokio::time::sleep(self.retry.delay) => {}
                        }
                    }
                }
                Err(err) => return Err(err),
            }
        }

        Err(CoreError::RetryExhausted {
            attempts: max_attempts,
            errors: failures,
        })
    }

    /// One authenticate + list + reconnect cycle.
    async fn attempt(&mut self) -> Result<(usize, Vec<String>), CoreError> {
        self.state = PassState::Authenticating;
        let authenticated = self
            .session
            .authenticate(&self.config.username, &self.config.password)
            .await?;
        if !authenticated {
            return Err(CoreError::AuthenticationRejected);
        }

        self.state = PassState::Listing;
        let clients = self.session.list_active_clients().await?;
        debug!(count = clients.len(), "listed active clients");

        self.state = PassState::Filtering;
        let targets: Vec<_> = clients
            .iter()
            .filter(|client| should_reconnect(client, &self.config.policy))
            .collect();

        self.state = PassState::Reconnecting;
        let mut reconnected = Vec::with_capacity(targets.len());
        for client in targets {
            info!(mac = %client.mac_address, "Reconnecting {}", client.display_name());
            self.session.reconnect_client(&client.mac_address).await?;
            reconnected.push(client.mac_address.clone());
        }

        Ok((clients.len(), reconnected))
    }
}
