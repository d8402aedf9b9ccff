//! Order draft types.
//!
//! `OrderForm` is the not-yet-submitted trade order as a plain value.
//! Edits produce a new value; derived figures (totals, FX) are computed
//! from it on demand and never stored on it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Transaction type of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Buy,
    Sell,
    /// Systematic investment plan.
    Sip,
    /// Systematic withdrawal plan.
    Swp,
}

impl TransactionType {
    /// Recurring plan variants that carry schedule fields.
    pub fn is_recurring(&self) -> bool {
        matches!(self, Self::Sip | Self::Swp)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Sip => "sip",
            Self::Swp => "swp",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "sip" => Ok(Self::Sip),
            "swp" => Ok(Self::Swp),
            other => Err(CoreError::UnknownVariant {
                field: "transaction type",
                value: other.to_string(),
            }),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderType {
    /// Market order.
    #[default]
    #[serde(rename = "MKT")]
    Market,
    /// Limit order.
    #[serde(rename = "LMT")]
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "MKT",
            Self::Limit => "LMT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MKT" | "MARKET" => Ok(Self::Market),
            "LMT" | "LIMIT" => Ok(Self::Limit),
            other => Err(CoreError::UnknownVariant {
                field: "order type",
                value: other.to_string(),
            }),
        }
    }
}

/// Which input drives the order size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    /// Quantity is entered; the amount is derived.
    #[default]
    Quantity,
    /// Amount is entered; the quantity is derived.
    Amount,
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quantity => write!(f, "quantity"),
            Self::Amount => write!(f, "amount"),
        }
    }
}

/// SIP/SWP installment frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
}

impl Frequency {
    pub const ALL: [Frequency; 7] = [
        Self::Daily,
        Self::Weekly,
        Self::Biweekly,
        Self::Monthly,
        Self::Quarterly,
        Self::SemiAnnually,
        Self::Annually,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::SemiAnnually => "semi-annually",
            Self::Annually => "annually",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or(CoreError::UnknownVariant {
                field: "frequency",
                value: wanted,
            })
    }
}

/// Size of each SIP/SWP installment: a unit count or a cash amount, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Installment {
    Units(Decimal),
    Amount(Decimal),
}

/// The in-progress order draft.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    /// Funding bank account id.
    pub bank_account_id: Option<String>,
    pub transaction_type: TransactionType,
    pub order_type: OrderType,
    pub order_by: OrderBy,
    pub quantity: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub limit_price: Option<Decimal>,
    pub fee_exception_applicable: bool,
    pub exception_fee_percent: Option<Decimal>,

    // SIP/SWP only
    pub place_first_order_today: bool,
    pub start_date: Option<NaiveDate>,
    pub frequency: Option<Frequency>,
    pub tenure: String,
    pub installment: Option<Installment>,
}

impl OrderForm {
    /// The empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch transaction type.
    ///
    /// Recurring types force a market order. Non-recurring types clear every
    /// SIP/SWP field back to its default.
    #[must_use]
    pub fn with_transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        if transaction_type.is_recurring() {
            self.order_type = OrderType::Market;
        } else {
            self.clear_schedule();
        }
        self
    }

    /// Switch order type. Ignored for recurring orders, which are market-only.
    #[must_use]
    pub fn with_order_type(mut self, order_type: OrderType) -> Self {
        if !self.transaction_type.is_recurring() {
            self.order_type = order_type;
        }
        self
    }

    #[must_use]
    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    #[must_use]
    pub fn with_bank_account(mut self, id: impl Into<String>) -> Self {
        self.bank_account_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn with_limit_price(mut self, limit_price: Decimal) -> Self {
        self.limit_price = Some(limit_price);
        self
    }

    /// The input that drives order size under the current `order_by`.
    pub fn driving_input(&self) -> Option<Decimal> {
        match self.order_by {
            OrderBy::Quantity => self.quantity,
            OrderBy::Amount => self.amount,
        }
    }

    /// Whether the quantity input is derived (and so disabled for entry).
    pub fn quantity_is_derived(&self) -> bool {
        self.order_by == OrderBy::Amount
    }

    /// Limit price applies only to non-recurring limit orders.
    pub fn limit_price_applies(&self) -> bool {
        self.order_type == OrderType::Limit && !self.transaction_type.is_recurring()
    }

    fn clear_schedule(&mut self) {
        self.place_first_order_today = false;
        self.start_date = None;
        self.frequency = None;
        self.tenure.clear();
        self.installment = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn recurring_draft() -> OrderForm {
        let mut form = OrderForm::new().with_transaction_type(TransactionType::Sip);
        form.place_first_order_today = true;
        form.start_date = NaiveDate::from_ymd_opt(2026, 11, 1);
        form.frequency = Some(Frequency::Monthly);
        form.tenure = "12 months".to_string();
        form.installment = Some(Installment::Amount(dec!(500)));
        form
    }

    #[test]
    fn test_default_is_empty_buy_market_by_quantity() {
        let form = OrderForm::default();
        assert_eq!(form.bank_account_id, None);
        assert_eq!(form.transaction_type, TransactionType::Buy);
        assert_eq!(form.order_type, OrderType::Market);
        assert_eq!(form.order_by, OrderBy::Quantity);
        assert!(form.quantity.is_none());
        assert!(form.amount.is_none());
        assert!(form.tenure.is_empty());
    }

    #[test]
    fn test_switching_to_recurring_forces_market() {
        let form = OrderForm::new()
            .with_order_type(OrderType::Limit)
            .with_limit_price(dec!(180));
        assert_eq!(form.order_type, OrderType::Limit);

        for tx in [TransactionType::Sip, TransactionType::Swp] {
            let switched = form.clone().with_transaction_type(tx);
            assert_eq!(switched.order_type, OrderType::Market);
            assert!(!switched.limit_price_applies());
        }
    }

    #[test]
    fn test_switching_away_from_recurring_clears_schedule() {
        for from in [TransactionType::Sip, TransactionType::Swp] {
            for to in [TransactionType::Buy, TransactionType::Sell] {
                let mut draft = recurring_draft();
                draft.transaction_type = from;
                let switched = draft.with_transaction_type(to);

                assert!(!switched.place_first_order_today);
                assert!(switched.start_date.is_none());
                assert!(switched.frequency.is_none());
                assert!(switched.tenure.is_empty());
                assert!(switched.installment.is_none());
            }
        }
    }

    #[test]
    fn test_switching_between_recurring_keeps_schedule() {
        let switched = recurring_draft().with_transaction_type(TransactionType::Swp);
        assert_eq!(switched.frequency, Some(Frequency::Monthly));
        assert_eq!(switched.installment, Some(Installment::Amount(dec!(500))));
    }

    #[test]
    fn test_recurring_ignores_limit_order_type() {
        let form = recurring_draft().with_order_type(OrderType::Limit);
        assert_eq!(form.order_type, OrderType::Market);
    }

    #[test]
    fn test_driving_input_follows_order_by() {
        let form = OrderForm::new()
            .with_quantity(dec!(10))
            .with_amount(dec!(2500));
        assert_eq!(form.driving_input(), Some(dec!(10)));
        assert!(!form.quantity_is_derived());

        let form = form.with_order_by(OrderBy::Amount);
        assert_eq!(form.driving_input(), Some(dec!(2500)));
        assert!(form.quantity_is_derived());
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("SIP".parse::<TransactionType>().unwrap(), TransactionType::Sip);
        assert_eq!("lmt".parse::<OrderType>().unwrap(), OrderType::Limit);
        assert_eq!(
            "semi-annually".parse::<Frequency>().unwrap(),
            Frequency::SemiAnnually
        );
        assert!("hourly".parse::<Frequency>().is_err());
        assert!("short".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&OrderType::Market).unwrap(), "\"MKT\"");
        assert_eq!(serde_json::to_string(&TransactionType::Swp).unwrap(), "\"swp\"");
        assert_eq!(
            serde_json::to_string(&Frequency::SemiAnnually).unwrap(),
            "\"semi-annually\""
        );
    }
}
