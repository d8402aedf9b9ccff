//! Currencies and FX rates.
//!
//! Rates are quoted against a common base (USD). The pairwise rate from
//! `A` to `B` is `rate(B) / rate(A)` rounded to 4 decimals, so one unit of
//! `A` is worth `pair_rate(A, B)` units of `B`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{round4, Amount};
use crate::error::CoreError;

/// Three-letter upper-case currency code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    pub const USD: Self = Self(*b"USD");
    pub const EUR: Self = Self(*b"EUR");
    pub const CHF: Self = Self(*b"CHF");
    pub const GBP: Self = Self(*b"GBP");
    pub const JPY: Self = Self(*b"JPY");
    pub const INR: Self = Self(*b"INR");

    pub fn as_str(&self) -> &str {
        // Constructors only admit ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        let bytes: [u8; 3] = code
            .as_bytes()
            .try_into()
            .map_err(|_| CoreError::InvalidCurrency(s.to_string()))?;
        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(CoreError::InvalidCurrency(s.to_string()));
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Currency {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self.as_str())
    }
}

/// Pairwise conversion factor: one unit of the source currency buys
/// `rate` units of the target currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FxRate(pub Decimal);

impl FxRate {
    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Express a target-currency amount in the source currency.
    ///
    /// Returns `None` if the rate is zero.
    pub fn to_source(&self, target_amount: Amount) -> Option<Amount> {
        target_amount.inner().checked_div(self.0).map(Amount::new)
    }
}

impl fmt::Display for FxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Base-relative FX rates, keyed by currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FxRateTable {
    rates: BTreeMap<Currency, Decimal>,
}

impl FxRateTable {
    pub fn new(rates: impl IntoIterator<Item = (Currency, Decimal)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }

    /// Rate of `currency` against the base, if listed.
    pub fn rate(&self, currency: Currency) -> Option<Decimal> {
        self.rates.get(&currency).copied()
    }

    /// Pairwise rate from `from` to `to`.
    ///
    /// Returns `None` for a same-currency pair (no conversion needed),
    /// for unlisted currencies and for a zero source rate.
    pub fn pair_rate(&self, from: Currency, to: Currency) -> Option<FxRate> {
        if from == to {
            return None;
        }
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;
        to_rate.checked_div(from_rate).map(|r| FxRate(round4(r)))
    }

    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.rates.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for FxRateTable {
    /// Demo rates relative to USD.
    fn default() -> Self {
        Self::new([
            (Currency::USD, dec!(1.0)),
            (Currency::EUR, dec!(0.92)),
            (Currency::CHF, dec!(0.88)),
            (Currency::GBP, dec!(0.79)),
            (Currency::JPY, dec!(149.5)),
            (Currency::INR, dec!(83.12)),
        ])
    }
}
