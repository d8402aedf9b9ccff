//! Order submission backends.
//!
//! [`OrderSubmitter`] is the single seam between the desk and whatever
//! executes an order. The portal ships a simulated backend with a fixed
//! latency and a biased random outcome; tests inject [`MockSubmitter`].

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use portal_core::{Amount, Currency, OrderForm, Price, Quantity};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::SubmissionConfig;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Validated, priced order handed to a submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTicket {
    pub instrument_id: String,
    pub ticker: String,
    /// Instrument currency; `total` is expressed in it.
    pub currency: Currency,
    pub bank_account_id: String,
    pub effective_price: Price,
    /// Entered units, or units derived from the amount.
    pub quantity: Option<Quantity>,
    pub total: Amount,
    /// Draft as it stood when the order was submitted.
    pub form: OrderForm,
}

/// Backend verdict on a submitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected,
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }
}

/// The backend failed before reaching a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("transport error: {0}")]
    Transport(String),
}

/// Executes a single order.
///
/// Implementations always resolve: there is no cancellation path.
pub trait OrderSubmitter: Send + Sync {
    fn submit(&self, ticket: OrderTicket) -> BoxFuture<'_, Result<SubmitOutcome, SubmitError>>;
}

/// Arc wrapper for OrderSubmitter trait objects.
pub type DynOrderSubmitter = Arc<dyn OrderSubmitter>;

/// Demo backend: waits a fixed delay, then accepts when a uniform draw in
/// `[0, 1)` exceeds the failure threshold.
#[derive(Debug)]
pub struct SimulatedSubmitter {
    delay: Duration,
    failure_threshold: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration, failure_threshold: f64, rng: StdRng) -> Self {
        Self {
            delay,
            failure_threshold,
            rng: Mutex::new(rng),
        }
    }

    /// OS-seeded backend from config.
    pub fn from_config(config: &SubmissionConfig) -> Self {
        Self::new(
            config.delay(),
            config.failure_threshold,
            StdRng::from_os_rng(),
        )
    }

    /// Reproducible backend for tests and demos.
    pub fn with_seed(config: &SubmissionConfig, seed: u64) -> Self {
        Self::new(
            config.delay(),
            config.failure_threshold,
            StdRng::seed_from_u64(seed),
        )
    }

    fn draw(&self) -> f64 {
        self.rng.lock().random::<f64>()
    }
}

impl OrderSubmitter for SimulatedSubmitter {
    fn submit(&self, ticket: OrderTicket) -> BoxFuture<'_, Result<SubmitOutcome, SubmitError>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            let draw = self.draw();
            let outcome = if draw > self.failure_threshold {
                SubmitOutcome::Accepted
            } else {
                SubmitOutcome::Rejected
            };
            debug!(
                ticker = %ticket.ticker,
                draw,
                threshold = self.failure_threshold,
                ?outcome,
                "Simulated submission resolved"
            );
            Ok(outcome)
        })
    }
}

/// Mock submitter for testing.
#[derive(Debug)]
pub struct MockSubmitter {
    /// Recorded tickets for verification.
    tickets: Mutex<Vec<OrderTicket>>,
    /// Next result to return.
    next_result: Mutex<Result<SubmitOutcome, SubmitError>>,
    /// Optional latency before resolving.
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
}

impl Default for MockSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSubmitter {
    /// Create a mock that accepts everything immediately.
    pub fn new() -> Self {
        Self {
            tickets: Mutex::new(Vec::new()),
            next_result: Mutex::new(Ok(SubmitOutcome::Accepted)),
            delay: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Set the result every following submission returns.
    pub fn set_next_result(&self, result: Result<SubmitOutcome, SubmitError>) {
        *self.next_result.lock() = result;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Get recorded tickets.
    pub fn tickets(&self) -> Vec<OrderTicket> {
        self.tickets.lock().clone()
    }

    /// Submissions currently waiting on the delay.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl OrderSubmitter for MockSubmitter {
    fn submit(&self, ticket: OrderTicket) -> BoxFuture<'_, Result<SubmitOutcome, SubmitError>> {
        Box::pin(async move {
            self.tickets.lock().push(ticket);
            let delay = *self.delay.lock();
            if let Some(delay) = delay {
                self.in_flight.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
            }
            self.next_result.lock().clone()
        })
    }
}
