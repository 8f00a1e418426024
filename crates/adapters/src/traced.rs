// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::db::{DatabaseConnection, DatabaseError, Table};
use serde_json::Value;
use std::path::Path;

/// Wrapper that adds tracing to any DatabaseConnection
#[derive(Clone)]
pub struct TracedDatabase<D> {
    inner: D,
}

impl<D> TracedDatabase<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: DatabaseConnection> DatabaseConnection for TracedDatabase<D> {
    fn open(&mut self, path: &Path, read_only: bool) -> Result<(), DatabaseError> {
        let span = tracing::info_span!("db.open", path = %path.display(), read_only);
        let _guard = span.enter();

        tracing::info!("opening");

        // Precondition: a writable database needs a directory to live in
        if !read_only {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if !parent.exists() {
                    tracing::error!(parent = %parent.display(), "parent directory does not exist");
                    return Err(DatabaseError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("parent directory does not exist: {}", parent.display()),
                    )));
                }
            }
        }

        let start = std::time::Instant::now();
        let result = self.inner.open(path, read_only);
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "opened"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "open failed"
            ),
        }

        result
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        let span = tracing::info_span!("db.close");
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.close();
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "closed"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "close failed"
            ),
        }

        result
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    fn is_read_only(&self) -> bool {
        self.inner.is_read_only()
    }

    fn table_names(&self) -> Result<Vec<String>, DatabaseError> {
        let result = self.inner.table_names();
        tracing::trace!(count = result.as_ref().map(|v| v.len()).ok(), "listed tables");
        result
    }

    fn table_exists(&self, table: &str) -> Result<bool, DatabaseError> {
        let result = self.inner.table_exists(table);
        tracing::trace!(table, exists = ?result.as_ref().ok(), "checked");
        result
    }

    fn column_names(&self, table: &str) -> Result<Vec<String>, DatabaseError> {
        self.inner.column_names(table)
    }

    fn create_table(&mut self, table: &str, columns: &[String]) -> Result<(), DatabaseError> {
        let span = tracing::info_span!("db.create_table", table);
        let _guard = span.enter();

        let result = self.inner.create_table(table, columns);
        match &result {
            Ok(()) => tracing::info!(columns = columns.len(), "table created"),
            Err(e) => tracing::error!(error = %e, "create failed"),
        }

        result
    }

    fn insert_rows(
        &mut self,
        table: &str,
        columns: &[String],
        rows: &[Vec<Value>],
    ) -> Result<usize, DatabaseError> {
        let span = tracing::info_span!("db.insert_rows", table);
        let _guard = span.enter();

        tracing::debug!(rows = rows.len(), "inserting");
        let result = self.inner.insert_rows(table, columns, rows);

        match &result {
            Ok(inserted) => tracing::debug!(inserted, "inserted"),
            Err(e) => tracing::error!(error = %e, "insert failed"),
        }

        result
    }

    fn drop_columns(&mut self, table: &str, columns: &[String]) -> Result<(), DatabaseError> {
        let span = tracing::info_span!("db.drop_columns", table);
        let _guard = span.enter();

        let result = self.inner.drop_columns(table, columns);
        match &result {
            Ok(()) => tracing::info!(?columns, "columns dropped"),
            Err(e) => tracing::warn!(error = %e, "drop failed"),
        }

        result
    }

    fn query(&self, table: &str) -> Result<Table, DatabaseError> {
        let span = tracing::info_span!("db.query", table);
        let _guard = span.enter();

        let result = self.inner.query(table);
        tracing::debug!(rows = result.as_ref().map(|t| t.len()).ok(), "queried");
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
