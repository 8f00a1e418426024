// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tabular database adapters

mod catalog;
mod json;

pub use json::JsonDatabase;

pub(crate) use catalog::Catalog;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod memory;
#[cfg(any(test, feature = "test-support"))]
pub use memory::{DbCall, MemoryDatabase};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors from database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("database is not open")]
    NotOpen,
    #[error("database is already open")]
    AlreadyOpen,
    #[error("database is read-only")]
    ReadOnly,
    #[error("table already exists: {0}")]
    TableExists(String),
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("column not found: {table}.{column}")]
    ColumnNotFound { table: String, column: String },
    #[error("row has {actual} values, expected {expected}")]
    RowWidth { expected: usize, actual: usize },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Contents of one table: column names in column order, then rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Value at `row` in the named column
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }
}

/// Connection to a tabular store.
///
/// Table and column names are case-sensitive. Values are JSON values; there
/// is no query language, `query` returns a whole table.
pub trait DatabaseConnection: Send {
    /// Open (or create, unless `read_only`) the database at `path`
    fn open(&mut self, path: &Path, read_only: bool) -> Result<(), DatabaseError>;

    /// Close the database, persisting changes. Closing twice is harmless.
    fn close(&mut self) -> Result<(), DatabaseError>;

    fn is_open(&self) -> bool;

    fn is_read_only(&self) -> bool;

    /// Table names in sorted order
    fn table_names(&self) -> Result<Vec<String>, DatabaseError>;

    fn table_exists(&self, table: &str) -> Result<bool, DatabaseError>;

    /// Column names in column order
    fn column_names(&self, table: &str) -> Result<Vec<String>, DatabaseError>;

    fn create_table(&mut self, table: &str, columns: &[String]) -> Result<(), DatabaseError>;

    /// Append rows. `columns` may name any subset of the table's columns in
    /// any order; the rest are filled with null. Returns the number of rows
    /// inserted.
    fn insert_rows(
        &mut self,
        table: &str,
        columns: &[String],
        rows: &[Vec<Value>],
    ) -> Result<usize, DatabaseError>;

    fn drop_columns(&mut self, table: &str, columns: &[String]) -> Result<(), DatabaseError>;

    /// Snapshot of a whole table
    fn query(&self, table: &str) -> Result<Table, DatabaseError>;
}
