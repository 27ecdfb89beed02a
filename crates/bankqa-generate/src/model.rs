use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

/// Options for the generation engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Seed for reproducible datasets. A random seed is drawn when unset.
    pub seed: Option<u64>,
    /// Last day of the transaction date window. Defaults to the local date.
    pub today: Option<NaiveDate>,
}

/// Number of rows requested per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub customers: u64,
    pub accounts: u64,
    pub transactions: u64,
}

impl Default for RowCounts {
    fn default() -> Self {
        Self {
            customers: 20,
            accounts: 20,
            transactions: 20,
        }
    }
}

/// The three tables of a generated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetTable {
    Customers,
    Accounts,
    Transactions,
}

impl DatasetTable {
    pub const ALL: [DatasetTable; 3] = [
        DatasetTable::Customers,
        DatasetTable::Accounts,
        DatasetTable::Transactions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetTable::Customers => "customers",
            DatasetTable::Accounts => "accounts",
            DatasetTable::Transactions => "transactions",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.csv", self.as_str())
    }
}

impl fmt::Display for DatasetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetTable {
    type Err = GenerationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "customers" => Ok(DatasetTable::Customers),
            "accounts" => Ok(DatasetTable::Accounts),
            "transactions" => Ok(DatasetTable::Transactions),
            other => Err(GenerationError::InvalidOptions(format!(
                "unknown dataset table '{other}'"
            ))),
        }
    }
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub rows_requested: u64,
    pub rows_generated: u64,
    pub file: String,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub window_end: NaiveDate,
    pub tables: Vec<TableReport>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64, window_end: NaiveDate) -> Self {
        Self {
            run_id,
            seed,
            window_end,
            tables: Vec::new(),
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn rows_generated(&self) -> u64 {
        self.tables.iter().map(|table| table.rows_generated).sum()
    }
}
