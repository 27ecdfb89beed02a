use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Duration, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use bankqa_core::{
    Account, AccountType, Customer, Frame, Transaction, TransactionType,
};

use crate::errors::GenerationError;
use crate::faker::FakePerson;
use crate::model::{DatasetTable, GenerateOptions, GenerationReport, RowCounts, TableReport};
use crate::output::csv::write_dataset_csv;

const FIRST_CUSTOMER_ID: i64 = 1;
const FIRST_ACCOUNT_ID: i64 = 101;
const FIRST_TRANSACTION_ID: i64 = 1001;

const OWNER_ID_RANGE: (i64, i64) = (1, 100);
const ACCOUNT_REF_RANGE: (i64, i64) = (101, 200);
const BALANCE_RANGE: (f64, f64) = (1000.0, 20000.0);
const AMOUNT_RANGE: (f64, f64) = (100.0, 2000.0);
const DATE_WINDOW_DAYS: i64 = 30;

/// Three generated tables held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct BankDataset {
    pub customers: Vec<Customer>,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

impl BankDataset {
    pub fn frame(&self, table: DatasetTable) -> Frame {
        match table {
            DatasetTable::Customers => Frame::from_records(&self.customers),
            DatasetTable::Accounts => Frame::from_records(&self.accounts),
            DatasetTable::Transactions => Frame::from_records(&self.transactions),
        }
    }

    pub fn rows(&self, table: DatasetTable) -> usize {
        match table {
            DatasetTable::Customers => self.customers.len(),
            DatasetTable::Accounts => self.accounts.len(),
            DatasetTable::Transactions => self.transactions.len(),
        }
    }
}

/// Result of a generation run written to disk.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub out_dir: PathBuf,
    pub dataset: BankDataset,
    pub report: GenerationReport,
}

/// Entry point for fabricating bank data.
#[derive(Debug, Clone)]
pub struct BankDataGenerator {
    seed: u64,
    today: NaiveDate,
}

impl BankDataGenerator {
    pub fn new(options: GenerateOptions) -> Self {
        let seed = options.seed.unwrap_or_else(rand::random);
        let today = options
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        Self { seed, today }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Last day of the transaction date window.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn generate_customers(&self, rows: u64) -> Result<Vec<Customer>, GenerationError> {
        let mut rng = self.table_rng(DatasetTable::Customers);
        Ok(id_range(FIRST_CUSTOMER_ID, rows, DatasetTable::Customers)?
            .map(|customer_id| Customer {
                customer_id,
                first_name: FakePerson::first_name(&mut rng),
                last_name: FakePerson::last_name(&mut rng),
                email: FakePerson::email(&mut rng),
            })
            .collect())
    }

    pub fn generate_accounts(&self, rows: u64) -> Result<Vec<Account>, GenerationError> {
        let mut rng = self.table_rng(DatasetTable::Accounts);
        Ok(id_range(FIRST_ACCOUNT_ID, rows, DatasetTable::Accounts)?
            .map(|account_id| Account {
                account_id,
                customer_id: rng.random_range(OWNER_ID_RANGE.0..=OWNER_ID_RANGE.1),
                account_type: pick(&AccountType::ALL, &mut rng),
                balance: round_cents(rng.random_range(BALANCE_RANGE.0..=BALANCE_RANGE.1)),
            })
            .collect())
    }

    pub fn generate_transactions(&self, rows: u64) -> Result<Vec<Transaction>, GenerationError> {
        let mut rng = self.table_rng(DatasetTable::Transactions);
        Ok(id_range(FIRST_TRANSACTION_ID, rows, DatasetTable::Transactions)?
            .map(|transaction_id| Transaction {
                transaction_id,
                account_id: rng.random_range(ACCOUNT_REF_RANGE.0..=ACCOUNT_REF_RANGE.1),
                transaction_type: pick(&TransactionType::ALL, &mut rng),
                amount: round_cents(rng.random_range(AMOUNT_RANGE.0..=AMOUNT_RANGE.1)),
                transaction_date: self.today
                    - Duration::days(rng.random_range(0..=DATE_WINDOW_DAYS)),
            })
            .collect())
    }

    pub fn generate(&self, counts: RowCounts) -> Result<BankDataset, GenerationError> {
        Ok(BankDataset {
            customers: self.generate_customers(counts.customers)?,
            accounts: self.generate_accounts(counts.accounts)?,
            transactions: self.generate_transactions(counts.transactions)?,
        })
    }

    /// Generate a dataset and write one CSV per table plus
    /// `generation_report.json` into `out_dir`.
    pub fn run(
        &self,
        counts: RowCounts,
        out_dir: &Path,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();

        info!(
            run_id = %run_id,
            seed = self.seed,
            customers = counts.customers,
            accounts = counts.accounts,
            transactions = counts.transactions,
            "generation started"
        );

        let dataset = self.generate(counts)?;
        let mut report = GenerationReport::new(run_id.clone(), self.seed, self.today);

        for written in write_dataset_csv(out_dir, &dataset)? {
            let rows_requested = match written.table {
                DatasetTable::Customers => counts.customers,
                DatasetTable::Accounts => counts.accounts,
                DatasetTable::Transactions => counts.transactions,
            };
            info!(table = %written.table, rows = written.rows, "table written");
            report.bytes_written += written.bytes;
            report.tables.push(TableReport {
                table: written.table.to_string(),
                rows_requested,
                rows_generated: written.rows,
                file: written.file,
            });
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        let report_path = out_dir.join("generation_report.json");
        std::fs::write(&report_path, serde_json::to_vec_pretty(&report)?)?;

        info!(
            run_id = %run_id,
            rows = report.rows_generated(),
            bytes_written = report.bytes_written,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult {
            out_dir: out_dir.to_path_buf(),
            dataset,
            report,
        })
    }

    fn table_rng(&self, table: DatasetTable) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(hash_seed(self.seed, table.as_str()))
    }
}

/// Ids `first..first + rows`, rejecting counts whose last id overflows `i64`.
fn id_range(
    first: i64,
    rows: u64,
    table: DatasetTable,
) -> Result<std::ops::Range<i64>, GenerationError> {
    i64::try_from(rows)
        .ok()
        .and_then(|rows| first.checked_add(rows))
        .map(|end| first..end)
        .ok_or_else(|| {
            GenerationError::InvalidOptions(format!("{rows} {table} rows exceed the id range"))
        })
}

fn pick<T: Copy, R: Rng + ?Sized>(values: &[T], rng: &mut R) -> T {
    values[rng.random_range(0..values.len())]
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
