use std::fmt;
use std::path::Path;

use serde::Serialize;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use tracing::{info, warn};

use bankqa_core::{CellValue, Frame};

use crate::errors::LoadError;
use crate::source::TableSource;

/// Table name used when the caller does not pick one.
pub const DEFAULT_TABLE_NAME: &str = "employee_data";

/// Declared SQLite column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Affinity {
    Integer,
    Real,
    Text,
}

impl Affinity {
    pub fn as_sql(self) -> &'static str {
        match self {
            Affinity::Integer => "INTEGER",
            Affinity::Real => "REAL",
            Affinity::Text => "TEXT",
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Summary of a completed load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub database: String,
    pub table: String,
    pub rows: u64,
    pub columns: Vec<(String, Affinity)>,
}

/// Create (or open) the SQLite database at `db_path` and replace
/// `table_name` with the rows from `source`.
///
/// Missing values are stored as empty strings. The connection is closed on
/// every exit path; a failed write is rolled back.
pub async fn create_sqlite_db_from_csv(
    db_path: &Path,
    table_name: &str,
    source: TableSource,
) -> Result<LoadReport, LoadError> {
    if table_name.trim().is_empty() {
        return Err(LoadError::InvalidTable("table name must not be empty".to_string()));
    }

    let frame = source.into_frame()?;
    if frame.columns.is_empty() {
        return Err(LoadError::InvalidSource("source has no columns".to_string()));
    }
    if let Some((line, row)) = frame
        .rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() > frame.columns.len())
    {
        return Err(LoadError::InvalidSource(format!(
            "row {} has {} values but there are {} columns",
            line + 1,
            row.len(),
            frame.columns.len()
        )));
    }
    let affinities = infer_affinities(&frame);

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options).await?;

    let written = replace_table(&mut conn, table_name, &frame, &affinities).await;
    let closed = conn.close().await;

    if let Err(err) = &written {
        warn!(table = %table_name, error = %err, "table load failed");
    }
    let rows = written?;
    closed?;

    info!(
        database = %db_path.display(),
        table = %table_name,
        rows,
        "table loaded"
    );

    Ok(LoadReport {
        database: db_path.display().to_string(),
        table: table_name.to_string(),
        rows,
        columns: frame.columns.iter().cloned().zip(affinities).collect(),
    })
}

/// Declared type per column: INTEGER when every value is an integer, REAL when
/// every value is numeric, TEXT otherwise. Columns with any missing value
/// (null or absent from a short row) are TEXT since those cells are stored as
/// `''`, and so are columns of a frame without rows.
pub fn infer_affinities(frame: &Frame) -> Vec<Affinity> {
    (0..frame.columns.len())
        .map(|idx| {
            let mut affinity = None;
            for row in &frame.rows {
                affinity = Some(match (affinity, row.get(idx)) {
                    (Some(Affinity::Text), _) => Affinity::Text,
                    (current, Some(CellValue::Int(_))) => current.unwrap_or(Affinity::Integer),
                    (_, Some(CellValue::Float(_))) => Affinity::Real,
                    _ => Affinity::Text,
                });
            }
            affinity.unwrap_or(Affinity::Text)
        })
        .collect()
}

/// Quote an identifier for SQLite, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

async fn replace_table(
    conn: &mut SqliteConnection,
    table_name: &str,
    frame: &Frame,
    affinities: &[Affinity],
) -> Result<u64, LoadError> {
    let table = quote_identifier(table_name);
    let column_defs: Vec<String> = frame
        .columns
        .iter()
        .zip(affinities)
        .map(|(name, affinity)| format!("{} {}", quote_identifier(name), affinity))
        .collect();
    let column_names: Vec<String> = frame.columns.iter().map(|name| quote_identifier(name)).collect();
    let placeholders = vec!["?"; frame.columns.len()].join(", ");

    let drop_sql = format!("DROP TABLE IF EXISTS {table}");
    let create_sql = format!("CREATE TABLE {table} ({})", column_defs.join(", "));
    let insert_sql = format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        column_names.join(", ")
    );

    let mut tx = conn.begin().await?;
    sqlx::query(&drop_sql).execute(&mut *tx).await?;
    sqlx::query(&create_sql).execute(&mut *tx).await?;

    let mut rows = 0_u64;
    for row in &frame.rows {
        let mut query = sqlx::query(&insert_sql);
        for (idx, affinity) in affinities.iter().enumerate() {
            query = match (affinity, row.get(idx)) {
                (_, None | Some(CellValue::Null)) => query.bind(String::new()),
                (Affinity::Integer, Some(CellValue::Int(value))) => query.bind(*value),
                (Affinity::Real, Some(value)) => match value.as_f64() {
                    Some(number) => query.bind(number),
                    None => query.bind(value.to_csv()),
                },
                (_, Some(value)) => query.bind(value.to_csv()),
            };
        }
        query.execute(&mut *tx).await?;
        rows += 1;
    }

    tx.commit().await?;
    Ok(rows)
}
