//! Order management error types.

use thiserror::Error;

use crate::submitter::SubmitError;

/// Why a draft cannot be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("no instrument selected")]
    NoInstrument,

    #[error("no bank account selected")]
    NoBankAccount,

    #[error("quantity or amount is not a positive number")]
    NoOrderSize,

    #[error("order total is zero")]
    ZeroTotal,
}

#[derive(Debug, Error)]
pub enum OmsError {
    #[error("Order validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    #[error("An order submission is already in flight")]
    SubmissionInFlight,

    #[error("Order for {ticker} was rejected")]
    Rejected { ticker: String },

    #[error("Order submission error: {0}")]
    Submit(#[from] SubmitError),

    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("Unknown bank account: {0}")]
    UnknownBankAccount(String),

    #[error("Invalid submission config: {0}")]
    InvalidConfig(String),
}

pub type OmsResult<T> = Result<T, OmsError>;
