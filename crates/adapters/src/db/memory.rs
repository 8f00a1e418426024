// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory database for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Catalog, DatabaseConnection, DatabaseError, Table};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Recorded mutating call
#[derive(Debug, Clone, PartialEq)]
pub enum DbCall {
    Open { path: PathBuf, read_only: bool },
    Close,
    CreateTable { table: String },
    InsertRows { table: String, rows: usize },
    DropColumns { table: String, columns: Vec<String> },
}

#[derive(Default)]
struct MemoryState {
    open: Option<bool>,
    catalog: Catalog,
    calls: Vec<DbCall>,
}

/// In-memory database. Clones share state, so a test can keep one handle
/// and inspect what code under test wrote through another.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<DbCall> {
        self.lock().calls.clone()
    }

    /// Table contents regardless of open state
    pub fn table(&self, table: &str) -> Option<Table> {
        self.lock().catalog.table(table).ok().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read<T>(&self, f: impl FnOnce(&Catalog) -> Result<T, DatabaseError>) -> Result<T, DatabaseError> {
        let state = self.lock();
        if state.open.is_none() {
            return Err(DatabaseError::NotOpen);
        }
        f(&state.catalog)
    }

    fn write<T>(
        &self,
        call: DbCall,
        f: impl FnOnce(&mut Catalog) -> Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        let mut state = self.lock();
        match state.open {
            None => return Err(DatabaseError::NotOpen),
            Some(true) => return Err(DatabaseError::ReadOnly),
            Some(false) => {}
        }
        state.calls.push(call);
        f(&mut state.catalog)
    }
}

impl DatabaseConnection for MemoryDatabase {
    fn open(&mut self, path: &Path, read_only: bool) -> Result<(), DatabaseError> {
        let mut state = self.lock();
        state.calls.push(DbCall::Open {
            path: path.to_path_buf(),
            read_only,
        });
        if state.open.is_some() {
            return Err(DatabaseError::AlreadyOpen);
        }
        state.open = Some(read_only);
        Ok(())
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        let mut state = self.lock();
        state.calls.push(DbCall::Close);
        state.open = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.lock().open.is_some()
    }

    fn is_read_only(&self) -> bool {
        self.lock().open.unwrap_or(false)
    }

    fn table_names(&self) -> Result<Vec<String>, DatabaseError> {
        self.read(|c| Ok(c.table_names()))
    }

    fn table_exists(&self, table: &str) -> Result<bool, DatabaseError> {
        self.read(|c| Ok(c.contains(table)))
    }

    fn column_names(&self, table: &str) -> Result<Vec<String>, DatabaseError> {
        self.read(|c| Ok(c.table(table)?.columns.clone()))
    }

    fn create_table(&mut self, table: &str, columns: &[String]) -> Result<(), DatabaseError> {
        let call = DbCall::CreateTable {
            table: table.to_string(),
        };
        self.write(call, |c| c.create_table(table, columns))
    }

    fn insert_rows(
        &mut self,
        table: &str,
        columns: &[String],
        rows: &[Vec<Value>],
    ) -> Result<usize, DatabaseError> {
        let call = DbCall::InsertRows {
            table: table.to_string(),
            rows: rows.len(),
        };
        self.write(call, |c| c.insert_rows(table, columns, rows))
    }

    fn drop_columns(&mut self, table: &str, columns: &[String]) -> Result<(), DatabaseError> {
        let call = DbCall::DropColumns {
            table: table.to_string(),
            columns: columns.to_vec(),
        };
        self.write(call, |c| c.drop_columns(table, columns))
    }

    fn query(&self, table: &str) -> Result<Table, DatabaseError> {
        self.read(|c| Ok(c.table(table)?.clone()))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
