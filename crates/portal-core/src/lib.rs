//! Core domain types for the banking portal.
//!
//! This crate provides the values shared by the host shell and its remotes:
//! - `Price`, `Quantity`, `Amount`: Precision-safe numeric types
//! - `Currency`, `FxRateTable`: Currency codes and USD-relative FX rates
//! - `Instrument`, `BankAccount`: Read-only reference records
//! - `OrderForm`: The order draft as an immutable value
//! - `CustomerPortfolio`: Holdings shown by the dashboard remote

pub mod account;
pub mod decimal;
pub mod error;
pub mod fx;
pub mod instrument;
pub mod order;
pub mod portfolio;
pub mod reference;

pub use account::{BankAccount, BankAccounts};
pub use decimal::{format_grouped, round2, round4, Amount, Price, Quantity};
pub use error::{CoreError, Result};
pub use fx::{Currency, FxRate, FxRateTable};
pub use instrument::{AssetType, Instrument, InstrumentCatalog};
pub use order::{Frequency, Installment, OrderBy, OrderForm, OrderType, TransactionType};
pub use portfolio::{format_percent, CustomerPortfolio, PortfolioHolding};
pub use reference::ReferenceData;
