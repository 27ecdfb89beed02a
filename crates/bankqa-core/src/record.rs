//! Synthetic bank records.
//!
//! Reference fields (`Account::customer_id`, `Transaction::account_id`) are
//! drawn from fixed ranges and never checked against existing rows.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::frame::{CellValue, TabularRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub const ALL: [AccountType; 2] = [AccountType::Checking, AccountType::Savings];

    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub const ALL: [TransactionType; 2] = [TransactionType::Deposit, TransactionType::Withdrawal];

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl TabularRecord for Customer {
    const COLUMNS: &'static [&'static str] = &["CustomerID", "FirstName", "LastName", "Email"];

    fn to_row(&self) -> Vec<CellValue> {
        vec![
            CellValue::Int(self.customer_id),
            CellValue::Text(self.first_name.clone()),
            CellValue::Text(self.last_name.clone()),
            CellValue::Text(self.email.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: i64,
    pub customer_id: i64,
    pub account_type: AccountType,
    pub balance: f64,
}

impl TabularRecord for Account {
    const COLUMNS: &'static [&'static str] = &["AccountID", "CustomerID", "AccountType", "Balance"];

    fn to_row(&self) -> Vec<CellValue> {
        vec![
            CellValue::Int(self.account_id),
            CellValue::Int(self.customer_id),
            CellValue::Text(self.account_type.to_string()),
            CellValue::Float(self.balance),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: i64,
    pub account_id: i64,
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub transaction_date: NaiveDate,
}

impl TabularRecord for Transaction {
    const COLUMNS: &'static [&'static str] = &[
        "TransactionID",
        "AccountID",
        "TransactionType",
        "Amount",
        "TransactionDate",
    ];

    fn to_row(&self) -> Vec<CellValue> {
        vec![
            CellValue::Int(self.transaction_id),
            CellValue::Int(self.account_id),
            CellValue::Text(self.transaction_type.to_string()),
            CellValue::Float(self.amount),
            CellValue::Date(self.transaction_date),
        ]
    }
}
