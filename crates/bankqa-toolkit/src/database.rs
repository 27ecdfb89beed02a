use std::fmt;
use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, TypeInfo, ValueRef};
use tracing::debug;

use crate::errors::ToolkitError;

const MAX_SAMPLE_VALUE_LEN: usize = 100;
const MAX_RESULT_VALUE_LEN: usize = 300;

/// Options that control how the database is presented to tools.
#[derive(Debug, Clone)]
pub struct SqlDatabaseOptions {
    /// Rows appended to each table description.
    pub sample_rows_in_table_info: usize,
    /// Restrict the usable tables to this list.
    pub include_tables: Option<Vec<String>>,
    /// Tables hidden from the tools.
    pub ignore_tables: Vec<String>,
}

impl Default for SqlDatabaseOptions {
    fn default() -> Self {
        Self {
            sample_rows_in_table_info: 3,
            include_tables: None,
            ignore_tables: Vec::new(),
        }
    }
}

impl SqlDatabaseOptions {
    pub fn with_sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows_in_table_info = rows;
        self
    }
}

/// A single value returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    fn truncated(self, max_len: usize) -> Self {
        match self {
            SqlValue::Text(text) if text.chars().count() > max_len => {
                SqlValue::Text(text.chars().take(max_len).collect())
            }
            other => other,
        }
    }

    /// Plain rendering used in sample rows.
    fn to_plain(&self) -> String {
        match self {
            SqlValue::Null => "None".to_string(),
            SqlValue::Integer(value) => value.to_string(),
            SqlValue::Real(value) => format_real(*value),
            SqlValue::Text(value) => value.clone(),
            SqlValue::Blob(value) => format!("<{} bytes>", value.len()),
        }
    }
}

impl fmt::Display for SqlValue {
    /// Literal rendering used in query results (`'text'`, `None`, `1.5`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Text(value) => {
                if value.contains('\'') && !value.contains('"') {
                    write!(f, "\"{}\"", value.replace('\\', "\\\\"))
                } else {
                    write!(f, "'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
                }
            }
            SqlValue::Blob(value) => write!(f, "b'<{} bytes>'", value.len()),
            other => f.write_str(&other.to_plain()),
        }
    }
}

fn format_real(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// SQLite database handle shared by the SQL tools.
#[derive(Debug, Clone)]
pub struct SqlDatabase {
    pool: SqlitePool,
    options: SqlDatabaseOptions,
}

impl SqlDatabase {
    /// Connect using a URI such as `sqlite://bank.db` or `sqlite:bank.db`.
    pub async fn from_uri(uri: &str, options: SqlDatabaseOptions) -> Result<Self, ToolkitError> {
        let connect = SqliteConnectOptions::from_str(uri)?;
        Self::connect(connect, options).await
    }

    /// Open an existing database file.
    pub async fn from_path(path: &Path, options: SqlDatabaseOptions) -> Result<Self, ToolkitError> {
        let connect = SqliteConnectOptions::new().filename(path);
        Self::connect(connect, options).await
    }

    async fn connect(
        connect: SqliteConnectOptions,
        options: SqlDatabaseOptions,
    ) -> Result<Self, ToolkitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect)
            .await?;
        Ok(Self { pool, options })
    }

    pub fn dialect(&self) -> &'static str {
        "sqlite"
    }

    pub fn options(&self) -> &SqlDatabaseOptions {
        &self.options
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Names of the tables the tools may see, sorted.
    pub async fn usable_table_names(&self) -> Result<Vec<String>, ToolkitError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names
            .into_iter()
            .filter(|name| {
                self.options
                    .include_tables
                    .as_ref()
                    .is_none_or(|include| include.contains(name))
            })
            .filter(|name| !self.options.ignore_tables.contains(name))
            .collect())
    }

    /// CREATE statement and sample rows for each requested table (all usable
    /// tables when `tables` is `None`).
    pub async fn table_info(&self, tables: Option<&[String]>) -> Result<String, ToolkitError> {
        let usable = self.usable_table_names().await?;
        let selected: Vec<String> = match tables {
            Some(requested) => {
                let mut missing: Vec<&str> = requested
                    .iter()
                    .filter(|name| !usable.contains(name))
                    .map(String::as_str)
                    .collect();
                if !missing.is_empty() {
                    missing.sort_unstable();
                    missing.dedup();
                    let rendered: Vec<String> =
                        missing.iter().map(|name| format!("'{name}'")).collect();
                    return Err(ToolkitError::TableNotFound(format!(
                        "{{{}}}",
                        rendered.join(", ")
                    )));
                }
                let mut requested = requested.to_vec();
                requested.sort();
                requested.dedup();
                requested
            }
            None => usable,
        };

        let mut blocks = Vec::with_capacity(selected.len());
        for table in &selected {
            let create: String = sqlx::query_scalar(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&self.pool)
            .await?;

            let mut block = create.trim().to_string();
            if self.options.sample_rows_in_table_info > 0 {
                block.push_str("\n\n");
                block.push_str(&self.sample_rows(table).await?);
            }
            blocks.push(block);
        }

        Ok(blocks.join("\n\n"))
    }

    /// Same as [`table_info`](Self::table_info) but errors are rendered as text.
    pub async fn table_info_no_throw(&self, tables: Option<&[String]>) -> String {
        match self.table_info(tables).await {
            Ok(info) => info,
            Err(err) => format!("Error: {}", error_text(&err)),
        }
    }

    /// Execute `query` and render the rows as a list of tuples. Statements
    /// that return no rows render as an empty string.
    pub async fn run(&self, query: &str) -> Result<String, ToolkitError> {
        debug!(query = %query, "running query");
        let rows = self.fetch(query).await?;
        if rows.is_empty() {
            return Ok(String::new());
        }

        let rendered: Vec<String> = rows
            .into_iter()
            .map(|row| {
                let values: Vec<String> = row
                    .into_iter()
                    .map(|value| value.truncated(MAX_RESULT_VALUE_LEN).to_string())
                    .collect();
                if values.len() == 1 {
                    format!("({},)", values[0])
                } else {
                    format!("({})", values.join(", "))
                }
            })
            .collect();
        Ok(format!("[{}]", rendered.join(", ")))
    }

    /// Same as [`run`](Self::run) but errors are rendered as text.
    pub async fn run_no_throw(&self, query: &str) -> String {
        match self.run(query).await {
            Ok(result) => result,
            Err(err) => format!("Error: {}", error_text(&err)),
        }
    }

    /// Execute `query` and decode every row.
    pub async fn fetch(&self, query: &str) -> Result<Vec<Vec<SqlValue>>, ToolkitError> {
        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn sample_rows(&self, table: &str) -> Result<String, ToolkitError> {
        let limit = self.options.sample_rows_in_table_info;
        let sql = format!("SELECT * FROM {} LIMIT {limit}", quote_identifier(table));
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let columns: Vec<String> = match rows.first() {
            Some(row) => row
                .columns()
                .iter()
                .map(|column| sqlx::Column::name(column).to_string())
                .collect(),
            None => self.column_names(table).await?,
        };

        let mut lines = vec![format!("{} rows from {table} table:", limit), columns.join("\t")];
        for row in &rows {
            let values: Vec<String> = decode_row(row)?
                .into_iter()
                .map(|value| value.truncated(MAX_SAMPLE_VALUE_LEN).to_plain())
                .collect();
            lines.push(values.join("\t"));
        }

        Ok(format!("/*\n{}\n*/", lines.join("\n")))
    }

    async fn column_names(&self, table: &str) -> Result<Vec<String>, ToolkitError> {
        let sql = format!("PRAGMA table_info({})", quote_identifier(table));
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(ToolkitError::from))
            .collect()
    }
}

fn decode_row(row: &SqliteRow) -> Result<Vec<SqlValue>, ToolkitError> {
    (0..row.len())
        .map(|idx| {
            let raw = row.try_get_raw(idx)?;
            if raw.is_null() {
                return Ok(SqlValue::Null);
            }
            let kind = raw.type_info().name().to_string();
            let value = match kind.as_str() {
                "INTEGER" | "BIGINT" | "BOOLEAN" => SqlValue::Integer(row.try_get_unchecked(idx)?),
                "REAL" | "NUMERIC" => SqlValue::Real(row.try_get_unchecked(idx)?),
                "BLOB" => SqlValue::Blob(row.try_get_unchecked(idx)?),
                _ => SqlValue::Text(row.try_get_unchecked(idx)?),
            };
            Ok(value)
        })
        .collect()
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn error_text(err: &ToolkitError) -> String {
    match err {
        ToolkitError::Db(sqlx::Error::Database(db)) => db.message().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_literals_use_single_quotes() {
        assert_eq!(SqlValue::Text("Savings".to_string()).to_string(), "'Savings'");
        assert_eq!(SqlValue::Text("O'Neil".to_string()).to_string(), "\"O'Neil\"");
        assert_eq!(SqlValue::Null.to_string(), "None");
        assert_eq!(SqlValue::Real(1500.0).to_string(), "1500.0");
        assert_eq!(SqlValue::Real(12.34).to_string(), "12.34");
    }

    #[test]
    fn long_text_is_truncated_by_chars() {
        let value = SqlValue::Text("é".repeat(10)).truncated(4);
        assert_eq!(value, SqlValue::Text("éééé".to_string()));
    }
}
