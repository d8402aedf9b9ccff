//! Tradable instruments and catalog search.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::Price;
use crate::fx::Currency;

/// Broad asset class of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    Equity,
    #[serde(rename = "ETF")]
    Etf,
    #[serde(rename = "Fixed Income")]
    FixedIncome,
    #[serde(rename = "Mutual Fund")]
    MutualFund,
    Commodity,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equity => "Equity",
            Self::Etf => "ETF",
            Self::FixedIncome => "Fixed Income",
            Self::MutualFund => "Mutual Fund",
            Self::Commodity => "Commodity",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tradable instrument. Immutable reference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: String,
    pub name: String,
    pub ticker: String,
    pub asset_type: AssetType,
    pub sub_asset_type: String,
    pub currency: Currency,
    pub price: Price,
    pub exchange: String,
}

impl Instrument {
    /// Case-insensitive match against name, ticker, asset type and sub-asset type.
    ///
    /// `needle` must already be lower-cased.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.ticker.to_lowercase().contains(needle)
            || self.asset_type.as_str().to_lowercase().contains(needle)
            || self.sub_asset_type.to_lowercase().contains(needle)
    }
}

/// Read-only list of tradable instruments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentCatalog(Vec<Instrument>);

impl InstrumentCatalog {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self(instruments)
    }

    pub fn find(&self, id: &str) -> Option<&Instrument> {
        self.0.iter().find(|i| i.id == id)
    }

    /// Filter the catalog by a free-text query.
    ///
    /// A blank query returns every instrument in catalog order.
    pub fn search(&self, query: &str) -> Vec<&Instrument> {
        let query = query.trim();
        if query.is_empty() {
            return self.0.iter().collect();
        }
        let needle = query.to_lowercase();
        self.0.iter().filter(|i| i.matches(&needle)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
