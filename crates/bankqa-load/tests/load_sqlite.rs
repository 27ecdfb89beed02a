use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, Row, SqliteConnection};

use bankqa_core::{CellValue, Frame};
use bankqa_generate::{BankDataGenerator, DatasetTable, GenerateOptions, RowCounts};
use bankqa_load::{create_sqlite_db_from_csv, Affinity, LoadError, TableSource};

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("bankqa_load_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

async fn open(path: &PathBuf) -> Result<SqliteConnection> {
    let options = SqliteConnectOptions::new().filename(path);
    SqliteConnection::connect_with(&options)
        .await
        .context("opening sqlite database")
}

async fn count_rows(path: &PathBuf, table: &str) -> Result<i64> {
    let mut conn = open(path).await?;
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{table}\""))
        .fetch_one(&mut conn)
        .await?;
    conn.close().await?;
    Ok(count)
}

fn dataset_frame(table: DatasetTable, rows: u64) -> Frame {
    let generator = BankDataGenerator::new(GenerateOptions {
        seed: Some(11),
        today: NaiveDate::from_ymd_opt(2024, 6, 1),
    });
    let counts = RowCounts {
        customers: rows,
        accounts: rows,
        transactions: rows,
    };
    generator
        .generate(counts)
        .expect("generate dataset")
        .frame(table)
}

#[tokio::test]
async fn second_load_replaces_previous_rows() -> Result<()> {
    let dir = temp_dir("replace");
    let db_path = dir.join("bank.db");

    create_sqlite_db_from_csv(
        &db_path,
        "accounts",
        TableSource::Frame(dataset_frame(DatasetTable::Accounts, 12)),
    )
    .await?;
    assert_eq!(count_rows(&db_path, "accounts").await?, 12);

    let report = create_sqlite_db_from_csv(
        &db_path,
        "accounts",
        TableSource::Frame(dataset_frame(DatasetTable::Accounts, 5)),
    )
    .await?;
    assert_eq!(report.rows, 5);
    assert_eq!(count_rows(&db_path, "accounts").await?, 5);

    Ok(())
}

#[tokio::test]
async fn generated_csv_round_trips_through_loader() -> Result<()> {
    let dir = temp_dir("csv");
    let generator = BankDataGenerator::new(GenerateOptions {
        seed: Some(5),
        today: None,
    });
    generator.run(RowCounts::default(), &dir)?;
    let db_path = dir.join("bank.db");

    let location = format!("file://{}", dir.join("transactions.csv").display());
    let report =
        create_sqlite_db_from_csv(&db_path, "transactions", TableSource::Csv(location)).await?;

    assert_eq!(report.rows, 20);
    let affinities: Vec<Affinity> = report.columns.iter().map(|(_, kind)| *kind).collect();
    assert_eq!(
        affinities,
        vec![
            Affinity::Integer,
            Affinity::Integer,
            Affinity::Text,
            Affinity::Real,
            Affinity::Text
        ]
    );

    let mut conn = open(&db_path).await?;
    let first_id: i64 = sqlx::query_scalar(
        "SELECT TransactionID FROM transactions ORDER BY TransactionID LIMIT 1",
    )
    .fetch_one(&mut conn)
    .await?;
    conn.close().await?;
    assert_eq!(first_id, 1001);

    Ok(())
}

#[tokio::test]
async fn missing_values_are_stored_as_empty_strings() -> Result<()> {
    let dir = temp_dir("fill");
    let csv_path = dir.join("people.csv");
    fs::write(&csv_path, "id,name,score\n1,ana,3.5\n2,,\n3,bia\n")?;
    let db_path = dir.join("people.db");

    create_sqlite_db_from_csv(
        &db_path,
        "people",
        TableSource::Csv(csv_path.display().to_string()),
    )
    .await?;

    let mut conn = open(&db_path).await?;
    let rows = sqlx::query("SELECT id, name, score FROM people ORDER BY id")
        .fetch_all(&mut conn)
        .await?;
    conn.close().await?;

    assert_eq!(rows.len(), 3);
    let name: String = rows[1].try_get("name")?;
    let score: String = rows[1].try_get("score")?;
    assert_eq!(name, "");
    assert_eq!(score, "");
    let missing_score: String = rows[2].try_get("score")?;
    assert_eq!(missing_score, "");

    Ok(())
}

#[tokio::test]
async fn empty_table_name_is_rejected() {
    let dir = temp_dir("invalid");
    let mut frame = Frame::new(vec!["id".to_string()]);
    frame.push_row(vec![CellValue::Int(1)]).expect("push row");

    let result =
        create_sqlite_db_from_csv(&dir.join("x.db"), "  ", TableSource::Frame(frame)).await;

    assert!(matches!(result, Err(LoadError::InvalidTable(_))));
}

#[tokio::test]
async fn short_frame_rows_are_padded_with_empty_strings() -> Result<()> {
    let dir = temp_dir("short");
    let db_path = dir.join("short.db");
    let frame = Frame {
        columns: vec!["a".to_string(), "b".to_string()],
        rows: vec![vec![CellValue::Int(1)]],
    };

    let report = create_sqlite_db_from_csv(&db_path, "t", TableSource::Frame(frame)).await?;
    assert_eq!(report.rows, 1);

    let mut conn = open(&db_path).await?;
    let (kind, value): (String, String) = sqlx::query_as("SELECT typeof(b), b FROM t")
        .fetch_one(&mut conn)
        .await?;
    conn.close().await?;
    assert_eq!(kind, "text");
    assert_eq!(value, "");

    Ok(())
}

#[tokio::test]
async fn frame_rows_wider_than_header_are_rejected() -> Result<()> {
    let dir = temp_dir("wide");
    let db_path = dir.join("wide.db");
    let frame = Frame {
        columns: vec!["a".to_string()],
        rows: vec![
            vec![CellValue::Int(1)],
            vec![CellValue::Int(2), "extra".into()],
        ],
    };

    let result = create_sqlite_db_from_csv(&db_path, "t", TableSource::Frame(frame)).await;

    assert!(matches!(result, Err(LoadError::InvalidSource(_))));
    Ok(())
}

#[tokio::test]
async fn failed_load_keeps_previous_table_and_releases_database() -> Result<()> {
    let dir = temp_dir("rollback");
    let db_path = dir.join("rollback.db");

    let mut good = Frame::new(vec!["a".to_string(), "b".to_string()]);
    good.push_row(vec![CellValue::Int(1), "x".into()])?;
    good.push_row(vec![CellValue::Int(2), "y".into()])?;
    create_sqlite_db_from_csv(&db_path, "t", TableSource::Frame(good.clone())).await?;

    let mut duplicate = Frame::new(vec!["a".to_string(), "a".to_string()]);
    duplicate.push_row(vec![CellValue::Int(9), CellValue::Int(9)])?;
    let failed = create_sqlite_db_from_csv(&db_path, "t", TableSource::Frame(duplicate)).await;
    assert!(matches!(failed, Err(LoadError::Db(_))), "got {failed:?}");

    assert_eq!(count_rows(&db_path, "t").await?, 2);

    let reloaded = create_sqlite_db_from_csv(&db_path, "t", TableSource::Frame(good)).await?;
    assert_eq!(reloaded.rows, 2);
    assert_eq!(count_rows(&db_path, "t").await?, 2);

    Ok(())
}
