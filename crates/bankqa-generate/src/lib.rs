//! Synthetic bank data generation for bankqa.
//!
//! Produces customers, accounts and transactions with random values and
//! convention-only references between them, and writes them out as CSV.

pub mod engine;
pub mod errors;
pub mod faker;
pub mod model;
pub mod output;

pub use engine::{BankDataGenerator, BankDataset, GenerationResult};
pub use errors::GenerationError;
pub use model::{DatasetTable, GenerateOptions, GenerationReport, RowCounts, TableReport};
pub use output::csv::{write_dataset_csv, WrittenTable};
