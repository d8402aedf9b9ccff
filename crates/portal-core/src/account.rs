//! Bank accounts that can fund an order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fx::Currency;

/// A customer bank account. Immutable reference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: String,
    pub label: String,
    pub currency: Currency,
    pub balance: Decimal,
}

/// Read-only list of bank accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankAccounts(Vec<BankAccount>);

impl BankAccounts {
    pub fn new(accounts: Vec<BankAccount>) -> Self {
        Self(accounts)
    }

    pub fn find(&self, id: &str) -> Option<&BankAccount> {
        self.0.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BankAccount> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_find_by_id() {
        let accounts = BankAccounts::new(vec![BankAccount {
            id: "BA002".to_string(),
            label: "EUR Savings Account".to_string(),
            currency: Currency::EUR,
            balance: dec!(85000),
        }]);

        assert_eq!(accounts.find("BA002").unwrap().currency, Currency::EUR);
        assert!(accounts.find("BA999").is_none());
        assert!(accounts.find("").is_none());
    }
}
