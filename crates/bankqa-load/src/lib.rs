//! Load tabular data into SQLite.
//!
//! A table is either an in-memory [`Frame`](bankqa_core::Frame) or a CSV
//! location; writing always replaces any existing table of the same name.

pub mod errors;
pub mod source;
pub mod sqlite;

pub use errors::LoadError;
pub use source::{read_csv_frame, TableSource};
pub use sqlite::{
    create_sqlite_db_from_csv, infer_affinities, quote_identifier, Affinity, LoadReport,
    DEFAULT_TABLE_NAME,
};
