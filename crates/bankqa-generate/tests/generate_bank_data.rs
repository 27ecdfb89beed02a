use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use chrono::{Duration, NaiveDate};

use bankqa_core::{AccountType, TransactionType};
use bankqa_generate::{
    write_dataset_csv, BankDataGenerator, DatasetTable, GenerateOptions, GenerationError,
    RowCounts,
};

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap_or_default()
}

fn seeded(seed: u64) -> BankDataGenerator {
    BankDataGenerator::new(GenerateOptions {
        seed: Some(seed),
        today: Some(fixed_today()),
    })
}

#[test]
fn customers_are_sequential_with_names_and_email() {
    let customers = seeded(1)
        .generate_customers(50)
        .expect("generate customers");

    assert_eq!(customers.len(), 50);
    for (idx, customer) in customers.iter().enumerate() {
        assert_eq!(customer.customer_id, idx as i64 + 1);
        assert!(!customer.first_name.is_empty());
        assert!(!customer.last_name.is_empty());
        assert!(customer.email.contains('@'), "email {}", customer.email);
    }
}

#[test]
fn accounts_start_at_101_with_bounded_balance() {
    let accounts = seeded(2)
        .generate_accounts(200)
        .expect("generate accounts");

    assert_eq!(accounts.len(), 200);
    let kinds: HashSet<AccountType> =
        accounts.iter().map(|account| account.account_type).collect();
    assert_eq!(kinds.len(), 2, "both account types should appear");
    for (idx, account) in accounts.iter().enumerate() {
        assert_eq!(account.account_id, 101 + idx as i64);
        assert!((1..=100).contains(&account.customer_id));
        assert!(AccountType::ALL.contains(&account.account_type));
        assert!(
            (1000.0..=20000.0).contains(&account.balance),
            "balance {}",
            account.balance
        );
    }
}

#[test]
fn transactions_fall_inside_trailing_window() {
    let transactions = seeded(3)
        .generate_transactions(300)
        .expect("generate transactions");
    let today = fixed_today();
    let window_start = today - Duration::days(30);

    assert_eq!(transactions.len(), 300);
    let mut kinds = HashSet::new();
    for (idx, transaction) in transactions.iter().enumerate() {
        assert_eq!(transaction.transaction_id, 1001 + idx as i64);
        assert!((101..=200).contains(&transaction.account_id));
        assert!(TransactionType::ALL.contains(&transaction.transaction_type));
        assert!((100.0..=2000.0).contains(&transaction.amount));
        assert!(transaction.transaction_date >= window_start);
        assert!(transaction.transaction_date <= today);
        kinds.insert(transaction.transaction_type);
    }
    assert_eq!(kinds.len(), 2, "both transaction types should appear");
}

#[test]
fn zero_rows_yield_empty_tables() {
    let dataset = seeded(4).generate(RowCounts {
        customers: 0,
        accounts: 0,
        transactions: 0,
    })
    .expect("generate empty dataset");

    for table in DatasetTable::ALL {
        assert_eq!(dataset.rows(table), 0);
        assert!(dataset.frame(table).is_empty());
    }
}

#[test]
fn counts_beyond_the_id_range_are_rejected() {
    let generator = seeded(5);

    assert!(matches!(
        generator.generate_transactions(u64::MAX),
        Err(GenerationError::InvalidOptions(_))
    ));
    assert!(matches!(
        generator.generate(RowCounts {
            customers: 1,
            accounts: i64::MAX as u64,
            transactions: 1,
        }),
        Err(GenerationError::InvalidOptions(_))
    ));
}

#[test]
fn same_seed_produces_same_dataset() {
    let counts = RowCounts::default();
    let left = seeded(42).generate(counts).expect("generate left");
    let right = seeded(42).generate(counts).expect("generate right");

    assert_eq!(left, right);
}

#[test]
fn run_writes_csv_files_and_report() {
    let out_dir = temp_out_dir("run");
    let counts = RowCounts {
        customers: 5,
        accounts: 7,
        transactions: 9,
    };

    let result = seeded(9).run(counts, &out_dir).expect("run generation");

    let customers_csv =
        fs::read_to_string(out_dir.join("customers.csv")).expect("read customers.csv");
    let mut lines = customers_csv.lines();
    assert_eq!(lines.next(), Some("CustomerID,FirstName,LastName,Email"));
    assert_eq!(lines.count(), 5);

    let transactions_csv =
        fs::read_to_string(out_dir.join("transactions.csv")).expect("read transactions.csv");
    assert!(transactions_csv.starts_with(
        "TransactionID,AccountID,TransactionType,Amount,TransactionDate"
    ));

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out_dir.join("generation_report.json"))
            .expect("read generation_report.json"),
    )
    .expect("parse report");
    assert_eq!(report["seed"], serde_json::json!(9));
    assert_eq!(result.report.rows_generated(), 21);
    assert!(result.report.bytes_written > 0);
}

#[test]
fn dataset_csv_writer_reports_each_table() {
    let out_dir = temp_out_dir("writer").join("nested");
    let dataset = seeded(11).generate(RowCounts {
        customers: 3,
        accounts: 0,
        transactions: 2,
    })
    .expect("generate dataset");

    let written = write_dataset_csv(&out_dir, &dataset).expect("write dataset");

    let files: Vec<&str> = written.iter().map(|table| table.file.as_str()).collect();
    assert_eq!(files, vec!["customers.csv", "accounts.csv", "transactions.csv"]);
    assert_eq!(written[1].rows, 0);
    let accounts_csv =
        fs::read_to_string(out_dir.join("accounts.csv")).expect("read accounts.csv");
    assert_eq!(accounts_csv.trim_end(), "AccountID,CustomerID,AccountType,Balance");
    assert_eq!(written[1].bytes, accounts_csv.len() as u64);
}

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("bankqa_generate_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}
