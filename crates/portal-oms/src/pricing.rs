//! Order pricing engine.
//!
//! Pure derivations over an [`OrderForm`] and its reference records. Nothing
//! here is cached: every figure is recomputed from the inputs on each call.

use portal_core::{
    round2, round4, Amount, BankAccount, Currency, FxRate, FxRateTable, Instrument, OrderBy,
    OrderForm, Price, Quantity,
};
use rust_decimal::Decimal;
use serde::Serialize;

fn positive(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}

/// Borrowed view of everything needed to price a draft.
#[derive(Debug, Clone, Copy)]
pub struct OrderPricing<'a> {
    form: &'a OrderForm,
    instrument: Option<&'a Instrument>,
    account: Option<&'a BankAccount>,
    fx_rates: &'a FxRateTable,
}

impl<'a> OrderPricing<'a> {
    pub fn new(
        form: &'a OrderForm,
        instrument: Option<&'a Instrument>,
        account: Option<&'a BankAccount>,
        fx_rates: &'a FxRateTable,
    ) -> Self {
        Self {
            form,
            instrument,
            account,
            fx_rates,
        }
    }

    /// Price the order executes at.
    ///
    /// A positive limit price wins for limit orders; SIP/SWP orders are
    /// market-only and always use the quoted price. Zero without an instrument.
    pub fn effective_price(&self) -> Price {
        let Some(instrument) = self.instrument else {
            return Price::ZERO;
        };
        if self.form.limit_price_applies() {
            if let Some(limit) = positive(self.form.limit_price) {
                return Price::new(limit);
            }
        }
        instrument.price
    }

    /// Order total in the instrument's currency, rounded to cents.
    ///
    /// Zero when the driving input or the price is not positive, or when
    /// the total does not fit in a decimal.
    pub fn total_amount(&self) -> Amount {
        match self.form.order_by {
            OrderBy::Amount => positive(self.form.amount)
                .map(|a| Amount::new(round2(a)))
                .unwrap_or(Amount::ZERO),
            OrderBy::Quantity => {
                let price = self.effective_price();
                match positive(self.form.quantity) {
                    Some(qty) if price.is_positive() => price
                        .notional(Quantity::new(qty))
                        .map(|a| a.round2())
                        .unwrap_or(Amount::ZERO),
                    _ => Amount::ZERO,
                }
            }
        }
    }

    /// Units bought by the entered amount, to 4 decimals.
    ///
    /// Only defined when ordering by amount.
    pub fn derived_quantity(&self) -> Option<Quantity> {
        if self.form.order_by != OrderBy::Amount {
            return None;
        }
        let amount = Amount::new(positive(self.form.amount)?);
        amount
            .units_at(self.effective_price())
            .map(|q| Quantity::new(round4(q.inner())))
    }

    /// Rate from the funding account's currency to the instrument's currency.
    ///
    /// `None` when either side is missing or both share a currency.
    pub fn fx_rate(&self) -> Option<FxRate> {
        let account = self.account?;
        let instrument = self.instrument?;
        self.fx_rates
            .pair_rate(account.currency, instrument.currency)
    }

    /// Order total expressed in the funding account's currency, rounded to cents.
    pub fn total_in_account_currency(&self) -> Option<Amount> {
        let rate = self.fx_rate()?;
        let total = self.total_amount();
        if total.is_zero() {
            return None;
        }
        rate.to_source(total).map(|a| a.round2())
    }

    /// Units the order is for: entered quantity, or derived from the amount.
    pub fn order_quantity(&self) -> Option<Quantity> {
        match self.form.order_by {
            OrderBy::Quantity => positive(self.form.quantity).map(Quantity::new),
            OrderBy::Amount => self.derived_quantity(),
        }
    }

    /// Snapshot of every derived figure.
    pub fn quote(&self) -> OrderQuote {
        OrderQuote {
            effective_price: self.effective_price(),
            total_amount: self.total_amount(),
            derived_quantity: self.derived_quantity(),
            fx_rate: self.fx_rate(),
            total_in_account_currency: self.total_in_account_currency(),
            instrument_currency: self.instrument.map(|i| i.currency),
            account_currency: self.account.map(|a| a.currency),
        }
    }
}

/// Derived figures for display, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuote {
    pub effective_price: Price,
    pub total_amount: Amount,
    pub derived_quantity: Option<Quantity>,
    pub fx_rate: Option<FxRate>,
    pub total_in_account_currency: Option<Amount>,
    pub instrument_currency: Option<Currency>,
    pub account_currency: Option<Currency>,
}

impl OrderQuote {
    /// Whether an FX line should be shown: account and instrument currencies differ.
    pub fn needs_fx(&self) -> bool {
        matches!(
            (self.account_currency, self.instrument_currency),
            (Some(a), Some(i)) if a != i
        )
    }
}
