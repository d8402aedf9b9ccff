//! Customer portfolio shown by the dashboard remote.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{round2, Amount};

/// A single position in a customer portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHolding {
    pub symbol: String,
    pub name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    /// Reported position value.
    pub value: Decimal,
    pub change_percent: Decimal,
}

impl PortfolioHolding {
    /// Value recomputed from quantity and price, rounded to cents.
    ///
    /// Zero when the product overflows.
    pub fn market_value(&self) -> Amount {
        self.quantity
            .checked_mul(self.price)
            .map(|v| Amount::new(round2(v)))
            .unwrap_or(Amount::ZERO)
    }
}

/// Portfolio snapshot for one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPortfolio {
    pub customer_id: String,
    pub customer_name: String,
    pub total_value: Decimal,
    pub cash_balance: Decimal,
    pub invested_value: Decimal,
    pub day_change_percent: Decimal,
    pub holdings: Vec<PortfolioHolding>,
    pub last_updated: DateTime<Utc>,
}

impl CustomerPortfolio {
    /// Sum of recomputed holding values.
    pub fn holdings_value(&self) -> Amount {
        self.holdings.iter().map(PortfolioHolding::market_value).sum()
    }

    /// Built-in demo portfolio.
    pub fn demo() -> Self {
        let holding = |symbol: &str, name: &str, quantity, price, value, change_percent| {
            PortfolioHolding {
                symbol: symbol.to_string(),
                name: name.to_string(),
                quantity,
                price,
                value,
                change_percent,
            }
        };

        Self {
            customer_id: "CUST-7842".to_string(),
            customer_name: "Alex Morgan".to_string(),
            total_value: dec!(124850.42),
            cash_balance: dec!(15200.00),
            invested_value: dec!(109650.42),
            day_change_percent: dec!(1.24),
            holdings: vec![
                holding("AAPL", "Apple Inc.", dec!(45), dec!(189.84), dec!(8542.8), dec!(0.92)),
                holding("MSFT", "Microsoft Corp.", dec!(30), dec!(415.22), dec!(12456.6), dec!(1.15)),
                holding("GOOGL", "Alphabet Inc.", dec!(25), dec!(142.56), dec!(3564.0), dec!(-0.34)),
                holding("AMZN", "Amazon.com Inc.", dec!(40), dec!(178.92), dec!(7156.8), dec!(2.01)),
                holding("VOO", "Vanguard S&P 500 ETF", dec!(120), dec!(428.15), dec!(51378.0), dec!(0.58)),
                holding("NVDA", "NVIDIA Corp.", dec!(15), dec!(138.24), dec!(2073.6), dec!(3.42)),
            ],
            last_updated: DateTime::parse_from_rfc3339("2025-02-18T10:30:00Z")
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        }
    }
}

/// Signed percentage with two decimals, e.g. `+1.24%`.
pub fn format_percent(value: Decimal) -> String {
    let mut v = round2(value);
    if v.is_zero() {
        v = Decimal::ZERO;
    }
    let sign = if v >= Decimal::ZERO { "+" } else { "" };
    v.rescale(2);
    format!("{sign}{v}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_value_matches_reported_value() {
        let portfolio = CustomerPortfolio::demo();
        for h in &portfolio.holdings {
            assert_eq!(h.market_value().inner(), h.value, "{}", h.symbol);
        }
    }

    #[test]
    fn test_holdings_value_sum() {
        let portfolio = CustomerPortfolio::demo();
        assert_eq!(portfolio.holdings_value().inner(), dec!(85171.80));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(1.24)), "+1.24%");
        assert_eq!(format_percent(dec!(-0.34)), "-0.34%");
        assert_eq!(format_percent(dec!(0)), "+0.00%");
        assert_eq!(format_percent(dec!(3.4)), "+3.40%");
    }

    #[test]
    fn test_format_percent_rounds_before_sign() {
        assert_eq!(format_percent(dec!(-0.004)), "+0.00%");
        assert_eq!(format_percent(dec!(-0.005)), "-0.01%");
    }

    #[test]
    fn test_market_value_overflow_is_zero() {
        let mut holding = CustomerPortfolio::demo().holdings.remove(0);
        holding.quantity = Decimal::MAX;
        assert_eq!(holding.market_value(), Amount::ZERO);
    }
}
