//! Command-line surface of the `portal` binary.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use portal_core::{Frequency, Installment, OrderBy, OrderForm, OrderType, TransactionType};
use rust_decimal::Decimal;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List instruments, optionally filtered by a free-text query
    Instruments {
        /// Matches name, ticker, asset type or sub-asset type
        query: Option<String>,
    },
    /// Price an order draft without submitting it
    Quote(OrderArgs),
    /// Submit an order and report its notifications
    Submit(OrderArgs),
    /// Show remote modules and whether they answer
    Modules,
    /// Show the demo customer portfolio
    Portfolio,
    /// Dump Prometheus metrics after the command runs
    Metrics,
}

/// Order draft fields.
#[derive(Args, Debug, Clone)]
pub struct OrderArgs {
    /// Instrument id, e.g. INS001
    #[arg(short, long)]
    pub instrument: String,

    /// Funding bank account id, e.g. BA001
    #[arg(short, long)]
    pub account: Option<String>,

    /// buy, sell, sip or swp
    #[arg(short = 't', long = "type", default_value = "buy")]
    pub transaction_type: TransactionType,

    /// MKT or LMT (ignored for sip/swp)
    #[arg(short, long, default_value = "MKT")]
    pub order_type: OrderType,

    /// Units to trade
    #[arg(short, long, conflicts_with = "amount")]
    pub quantity: Option<Decimal>,

    /// Cash amount to trade; quantity is derived
    #[arg(long)]
    pub amount: Option<Decimal>,

    #[arg(short, long)]
    pub limit_price: Option<Decimal>,

    /// Fee exception percent; marks the order as fee-exception applicable
    #[arg(long)]
    pub fee_exception_percent: Option<Decimal>,

    // SIP/SWP schedule
    #[arg(long)]
    pub first_order_today: bool,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    #[arg(long)]
    pub frequency: Option<Frequency>,

    #[arg(long, default_value = "")]
    pub tenure: String,

    #[arg(long, conflicts_with = "installment_amount")]
    pub installment_units: Option<Decimal>,

    #[arg(long)]
    pub installment_amount: Option<Decimal>,
}

impl OrderArgs {
    /// Apply these arguments on top of `form`.
    ///
    /// Transaction type goes first so that switching to a recurring plan
    /// forces a market order and switching away clears the schedule.
    pub fn apply(&self, form: OrderForm) -> OrderForm {
        let mut form = form
            .with_transaction_type(self.transaction_type)
            .with_order_type(self.order_type);

        if let Some(account) = &self.account {
            form = form.with_bank_account(account.clone());
        }
        match (self.quantity, self.amount) {
            (_, Some(amount)) => form = form.with_order_by(OrderBy::Amount).with_amount(amount),
            (Some(quantity), None) => {
                form = form.with_order_by(OrderBy::Quantity).with_quantity(quantity)
            }
            (None, None) => {}
        }
        if let Some(limit) = self.limit_price {
            form = form.with_limit_price(limit);
        }
        if let Some(percent) = self.fee_exception_percent {
            form.fee_exception_applicable = true;
            form.exception_fee_percent = Some(percent);
        }

        if self.transaction_type.is_recurring() {
            form.place_first_order_today = self.first_order_today;
            form.start_date = self.start_date;
            form.frequency = self.frequency;
            form.tenure = self.tenure.clone();
            form.installment = match (self.installment_units, self.installment_amount) {
                (Some(units), _) => Some(Installment::Units(units)),
                (None, Some(amount)) => Some(Installment::Amount(amount)),
                (None, None) => None,
            };
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rust_decimal_macros::dec;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["portal"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_quote_args_build_limit_order() {
        let Command::Quote(args) = parse(&[
            "quote", "-i", "INS001", "-a", "BA002", "-o", "LMT", "-q", "10", "-l", "185.5",
        ]) else {
            panic!("expected quote");
        };
        let form = args.apply(OrderForm::new());
        assert_eq!(form.order_type, OrderType::Limit);
        assert_eq!(form.quantity, Some(dec!(10)));
        assert_eq!(form.limit_price, Some(dec!(185.5)));
        assert_eq!(form.bank_account_id.as_deref(), Some("BA002"));
    }

    #[test]
    fn test_amount_switches_order_by() {
        let Command::Submit(args) = parse(&["submit", "-i", "INS013", "--amount", "2500"]) else {
            panic!("expected submit");
        };
        let form = args.apply(OrderForm::new());
        assert_eq!(form.order_by, OrderBy::Amount);
        assert_eq!(form.amount, Some(dec!(2500)));
    }

    #[test]
    fn test_sip_schedule_and_forced_market() {
        let Command::Submit(args) = parse(&[
            "submit",
            "-i",
            "INS006",
            "-t",
            "sip",
            "-o",
            "LMT",
            "-q",
            "2",
            "--frequency",
            "monthly",
            "--start-date",
            "2025-03-01",
            "--tenure",
            "12",
            "--installment-amount",
            "500",
        ]) else {
            panic!("expected submit");
        };
        let form = args.apply(OrderForm::new());
        assert_eq!(form.transaction_type, TransactionType::Sip);
        assert_eq!(form.order_type, OrderType::Market);
        assert_eq!(form.frequency, Some(Frequency::Monthly));
        assert_eq!(form.start_date, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(form.installment, Some(Installment::Amount(dec!(500))));
    }

    #[test]
    fn test_schedule_ignored_for_buy() {
        let Command::Submit(args) = parse(&[
            "submit", "-i", "INS001", "-q", "1", "--tenure", "12", "--first-order-today",
        ]) else {
            panic!("expected submit");
        };
        let form = args.apply(OrderForm::new());
        assert!(form.tenure.is_empty());
        assert!(!form.place_first_order_today);
    }

    #[test]
    fn test_quantity_and_amount_conflict() {
        let argv = ["portal", "quote", "-i", "INS001", "-q", "1", "--amount", "5"];
        assert!(TestCli::try_parse_from(argv).is_err());
    }
}
