// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database stored as a single JSON document

use super::{Catalog, DatabaseConnection, DatabaseError, Table};
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

struct OpenFile {
    path: PathBuf,
    read_only: bool,
    dirty: bool,
}

/// Database kept in memory while open and written back to disk on `close`.
///
/// The file is replaced atomically (write to a sibling temp file, then
/// rename). A writable open of a missing file starts empty and creates the
/// file on close.
#[derive(Default)]
pub struct JsonDatabase {
    file: Option<OpenFile>,
    catalog: Catalog,
}

impl JsonDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the open database, if any
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.path.as_path())
    }

    fn opened(&self) -> Result<&OpenFile, DatabaseError> {
        self.file.as_ref().ok_or(DatabaseError::NotOpen)
    }

    /// Catalog for a mutation; marks the database dirty
    fn writable(&mut self) -> Result<&mut Catalog, DatabaseError> {
        let file = self.file.as_mut().ok_or(DatabaseError::NotOpen)?;
        if file.read_only {
            return Err(DatabaseError::ReadOnly);
        }
        file.dirty = true;
        Ok(&mut self.catalog)
    }

    fn write(path: &Path, catalog: &Catalog) -> Result<(), DatabaseError> {
        let json = serde_json::to_string_pretty(catalog)?;
        let tmp = temp_path(path);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// Sibling of `path` with `.tmp` appended to the full file name
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl DatabaseConnection for JsonDatabase {
    fn open(&mut self, path: &Path, read_only: bool) -> Result<(), DatabaseError> {
        if self.file.is_some() {
            return Err(DatabaseError::AlreadyOpen);
        }

        let (catalog, dirty) = match fs::read_to_string(path) {
            Ok(content) => (serde_json::from_str(&content)?, false),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !read_only => {
                (Catalog::default(), true)
            }
            Err(e) => return Err(e.into()),
        };

        self.catalog = catalog;
        self.file = Some(OpenFile {
            path: path.to_path_buf(),
            read_only,
            dirty,
        });
        Ok(())
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };
        let catalog = std::mem::take(&mut self.catalog);
        if file.dirty && !file.read_only {
            Self::write(&file.path, &catalog)?;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn is_read_only(&self) -> bool {
        self.file.as_ref().is_some_and(|f| f.read_only)
    }

    fn table_names(&self) -> Result<Vec<String>, DatabaseError> {
        self.opened()?;
        Ok(self.catalog.table_names())
    }

    fn table_exists(&self, table: &str) -> Result<bool, DatabaseError> {
        self.opened()?;
        Ok(self.catalog.contains(table))
    }

    fn column_names(&self, table: &str) -> Result<Vec<String>, DatabaseError> {
        self.opened()?;
        Ok(self.catalog.table(table)?.columns.clone())
    }

    fn create_table(&mut self, table: &str, columns: &[String]) -> Result<(), DatabaseError> {
        self.writable()?.create_table(table, columns)
    }

    fn insert_rows(
        &mut self,
        table: &str,
        columns: &[String],
        rows: &[Vec<Value>],
    ) -> Result<usize, DatabaseError> {
        self.writable()?.insert_rows(table, columns, rows)
    }

    fn drop_columns(&mut self, table: &str, columns: &[String]) -> Result<(), DatabaseError> {
        self.writable()?.drop_columns(table, columns)
    }

    fn query(&self, table: &str) -> Result<Table, DatabaseError> {
        self.opened()?;
        Ok(self.catalog.table(table)?.clone())
    }
}

impl Drop for JsonDatabase {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::error!(error = %e, "failed to write database on drop");
        }
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
