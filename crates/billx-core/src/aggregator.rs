use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::domain::QuoteResult;
use crate::price_service::{QuoteRequest, ServiceError};
use crate::registry::ServiceRegistry;
use crate::source::ServiceId;

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Cooperative cancellation handle shared across in-flight service calls.
///
/// Cancelling is one-way and idempotent; calls that already finished keep
/// their results.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives inside the token, so wait_for cannot see it drop.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// One service's failure, preserved alongside the others' results.
#[derive(Debug)]
pub struct ServiceFailure {
    pub service: ServiceId,
    pub error: ServiceError,
}

/// Every failure from one aggregation pass.
#[derive(Debug)]
pub struct QuoteErrors {
    failures: Vec<ServiceFailure>,
}

impl QuoteErrors {
    pub fn failures(&self) -> &[ServiceFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Display for QuoteErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} service call(s) failed: ", self.failures.len())?;
        for (position, failure) in self.failures.iter().enumerate() {
            if position > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", failure.service, failure.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for QuoteErrors {}

/// Combined outcome of one aggregation pass.
///
/// `results` holds everything that succeeded; `errors` holds every
/// failure. Both can be populated at once, and callers decide how much
/// failure they tolerate.
#[derive(Debug)]
pub struct QuoteOutcome {
    pub results: Vec<QuoteResult>,
    pub errors: Option<QuoteErrors>,
}

impl QuoteOutcome {
    /// True when at least one service failed and none produced results.
    pub fn is_total_failure(&self) -> bool {
        self.results.is_empty() && self.errors.is_some()
    }
}

/// Fans a quote request out to every registered service concurrently.
///
/// Each service call races a per-call deadline and the caller's cancel
/// token; the slowest service bounds the whole pass at that deadline
/// rather than the sum of all calls.
pub struct QuoteAggregator {
    registry: Arc<ServiceRegistry>,
    call_timeout: Duration,
}

impl QuoteAggregator {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self {
            registry,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub async fn quote(&self, request: &QuoteRequest) -> QuoteOutcome {
        self.quote_with_cancel(request, &CancelToken::new()).await
    }

    pub async fn quote_with_cancel(
        &self,
        request: &QuoteRequest,
        cancel: &CancelToken,
    ) -> QuoteOutcome {
        let mut set = JoinSet::new();
        for service in self.registry.services() {
            let service = service.clone();
            let request = *request;
            let cancel = cancel.clone();
            let call_timeout = self.call_timeout;
            set.spawn(async move {
                let id = service.id();
                let outcome = tokio::select! {
                    _ = cancel.cancelled() => Err(ServiceError::Cancelled),
                    quoted = tokio::time::timeout(call_timeout, service.quote(&request)) => {
                        match quoted {
                            Ok(result) => result,
                            Err(_) => Err(ServiceError::Timeout {
                                timeout: call_timeout,
                            }),
                        }
                    }
                };
                (id, outcome)
            });
        }

        let mut results = Vec::new();
        let mut failures = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((service, Ok(quotes))) => {
                    tracing::debug!(service = %service, count = quotes.len(), "service quoted");
                    results.extend(quotes);
                }
                Ok((service, Err(error))) => {
                    tracing::warn!(service = %service, %error, "service quote failed");
                    failures.push(ServiceFailure { service, error });
                }
                Err(join_error) => {
                    tracing::error!(error = %join_error, "service quote task aborted");
                }
            }
        }

        let errors = if failures.is_empty() {
            None
        } else {
            Some(QuoteErrors { failures })
        };
        QuoteOutcome { results, errors }
    }
}
