//! Order management remote for the banking portal.
//!
//! Holds the order draft, prices it, validates it and submits it through
//! a pluggable [`OrderSubmitter`]. Outcomes are reported through a
//! [`portal_notify::NotificationDispatcher`].
//!
//! # Key Components
//!
//! - [`OrderPricing`]: Pure derivations over a form, instrument, account and FX table
//! - [`OrderDesk`]: The store: search, selection, draft edits and submission
//! - [`SimulatedSubmitter`]: Demo backend with fixed latency and random rejection
//! - [`MockSubmitter`]: Deterministic backend for tests
//!
//! # Submission (in `OrderDesk::submit_order`)
//!
//! ```text
//! idle ──validate──▶ submitting ──submitter──▶ placed   → success, form reset
//!  │ (invalid: error notice)          ├──────▶ rejected → error, form kept
//!  ▼                                  └──────▶ error    → error, form kept
//! idle ◀──────────────────── busy flag always cleared ────────────────┘
//! ```

pub mod config;
pub mod desk;
pub mod error;
pub mod pricing;
pub mod submitter;

pub use config::SubmissionConfig;
pub use desk::OrderDesk;
pub use error::{OmsError, OmsResult, ValidationFailure};
pub use pricing::{OrderPricing, OrderQuote};
pub use submitter::{
    BoxFuture, DynOrderSubmitter, MockSubmitter, OrderSubmitter, OrderTicket, SimulatedSubmitter,
    SubmitError, SubmitOutcome,
};
