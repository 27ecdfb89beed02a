//! Core contracts and helpers for bankqa.
//!
//! This crate defines the synthetic bank records, the in-memory tabular frame
//! that generators and loaders exchange, and small text utilities shared by
//! the other crates.

pub mod error;
pub mod frame;
pub mod record;
pub mod text;

pub use error::{Error, Result};
pub use frame::{CellValue, Frame, TabularRecord};
pub use record::{Account, AccountType, Customer, Transaction, TransactionType};
pub use text::{split_text, DEFAULT_CHUNK_LENGTH};
