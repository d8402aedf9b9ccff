//! Reference data: instruments, bank accounts and FX rates.
//!
//! Loaded once at start-up, either from a JSON file or from the built-in
//! demo seed, and read-only afterwards.

use std::path::Path;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::account::{BankAccount, BankAccounts};
use crate::decimal::Price;
use crate::error::{CoreError, Result};
use crate::fx::{Currency, FxRateTable};
use crate::instrument::{AssetType, Instrument, InstrumentCatalog};

/// The three read-only reference tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    pub instruments: InstrumentCatalog,
    pub bank_accounts: BankAccounts,
    #[serde(default)]
    pub fx_rates: FxRateTable,
}

impl ReferenceData {
    /// Load from a JSON file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let data: Self = serde_json::from_str(&content)?;
        data.validate()?;
        Ok(data)
    }

    /// Reject tables that pricing cannot work with.
    ///
    /// Every account and instrument currency must have an FX rate, and
    /// every rate and instrument price must be positive.
    pub fn validate(&self) -> Result<()> {
        for c in self.fx_rates.currencies() {
            if self.fx_rates.rate(c).is_some_and(|r| r <= rust_decimal::Decimal::ZERO) {
                return Err(CoreError::ReferenceData(format!(
                    "non-positive FX rate for {c}"
                )));
            }
        }
        for ins in self.instruments.iter() {
            if !ins.price.is_positive() {
                return Err(CoreError::InvalidPrice(format!("{}: {}", ins.id, ins.price)));
            }
            if self.fx_rates.rate(ins.currency).is_none() {
                return Err(CoreError::ReferenceData(format!(
                    "instrument {} uses {} which has no FX rate",
                    ins.id, ins.currency
                )));
            }
        }
        for acct in self.bank_accounts.iter() {
            if self.fx_rates.rate(acct.currency).is_none() {
                return Err(CoreError::ReferenceData(format!(
                    "account {} uses {} which has no FX rate",
                    acct.id, acct.currency
                )));
            }
        }
        Ok(())
    }

    /// Built-in demo tables.
    pub fn demo() -> Self {
        Self {
            instruments: demo_instruments(),
            bank_accounts: demo_bank_accounts(),
            fx_rates: FxRateTable::default(),
        }
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::demo()
    }
}

fn demo_instruments() -> InstrumentCatalog {
    let ins = |id: &str,
               name: &str,
               ticker: &str,
               asset_type: AssetType,
               sub_asset_type: &str,
               currency: Currency,
               price,
               exchange: &str| Instrument {
        id: id.to_string(),
        name: name.to_string(),
        ticker: ticker.to_string(),
        asset_type,
        sub_asset_type: sub_asset_type.to_string(),
        currency,
        price: Price::new(price),
        exchange: exchange.to_string(),
    };

    use AssetType::*;
    InstrumentCatalog::new(vec![
        ins("INS001", "Apple Inc.", "AAPL", Equity, "Large Cap", Currency::USD, dec!(189.84), "NASDAQ"),
        ins("INS002", "Microsoft Corp.", "MSFT", Equity, "Large Cap", Currency::USD, dec!(415.22), "NASDAQ"),
        ins("INS003", "Alphabet Inc.", "GOOGL", Equity, "Large Cap", Currency::USD, dec!(142.56), "NASDAQ"),
        ins("INS004", "Amazon.com Inc.", "AMZN", Equity, "Large Cap", Currency::USD, dec!(178.92), "NASDAQ"),
        ins("INS005", "NVIDIA Corp.", "NVDA", Equity, "Large Cap", Currency::USD, dec!(138.24), "NASDAQ"),
        ins("INS006", "Vanguard S&P 500 ETF", "VOO", Etf, "Index", Currency::USD, dec!(428.15), "NYSE Arca"),
        ins("INS007", "SAP SE", "SAP", Equity, "Large Cap", Currency::EUR, dec!(182.40), "XETRA"),
        ins("INS008", "Nestle S.A.", "NESN", Equity, "Consumer Staples", Currency::CHF, dec!(96.52), "SIX"),
        ins("INS009", "Toyota Motor Corp.", "7203", Equity, "Large Cap", Currency::JPY, dec!(2845.00), "TSE"),
        ins("INS010", "Reliance Industries Ltd.", "RELIANCE", Equity, "Large Cap", Currency::INR, dec!(2921.35), "NSE"),
        ins("INS011", "US Treasury 10Y Note", "UST10Y", FixedIncome, "Government Bond", Currency::USD, dec!(98.75), "OTC"),
        ins("INS012", "UK Gilt 2034", "GILT34", FixedIncome, "Government Bond", Currency::GBP, dec!(94.10), "LSE"),
        ins("INS013", "Vanguard Total Bond Market Index Fund", "VBTLX", MutualFund, "Bond Fund", Currency::USD, dec!(9.84), "MUTF"),
        ins("INS014", "SPDR Gold Shares", "GLD", Commodity, "Precious Metals", Currency::USD, dec!(214.60), "NYSE Arca"),
    ])
}

fn demo_bank_accounts() -> BankAccounts {
    let acct = |id: &str, label: &str, currency: Currency, balance| BankAccount {
        id: id.to_string(),
        label: label.to_string(),
        currency,
        balance,
    };

    BankAccounts::new(vec![
        acct("BA001", "Primary USD Account", Currency::USD, dec!(150000)),
        acct("BA002", "EUR Savings Account", Currency::EUR, dec!(85000)),
        acct("BA003", "CHF Trading Account", Currency::CHF, dec!(120000)),
        acct("BA004", "JPY Account", Currency::JPY, dec!(5000000)),
        acct("BA005", "INR Account", Currency::INR, dec!(3500000)),
    ])
}
