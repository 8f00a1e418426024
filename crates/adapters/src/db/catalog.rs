// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Table storage shared by the database implementations

use super::{DatabaseError, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// All tables of one database, keyed (and therefore sorted) by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Catalog {
    tables: BTreeMap<String, Table>,
}

impl Catalog {
    pub(crate) fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub(crate) fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub(crate) fn table(&self, table: &str) -> Result<&Table, DatabaseError> {
        self.tables
            .get(table)
            .ok_or_else(|| DatabaseError::TableNotFound(table.to_string()))
    }

    fn table_mut(&mut self, table: &str) -> Result<&mut Table, DatabaseError> {
        self.tables
            .get_mut(table)
            .ok_or_else(|| DatabaseError::TableNotFound(table.to_string()))
    }

    pub(crate) fn create_table(
        &mut self,
        table: &str,
        columns: &[String],
    ) -> Result<(), DatabaseError> {
        if self.contains(table) {
            return Err(DatabaseError::TableExists(table.to_string()));
        }
        self.tables
            .insert(table.to_string(), Table::new(table, columns.to_vec()));
        Ok(())
    }

    pub(crate) fn insert_rows(
        &mut self,
        table: &str,
        columns: &[String],
        rows: &[Vec<Value>],
    ) -> Result<usize, DatabaseError> {
        let target = self.table_mut(table)?;

        // Resolve every column and validate every row before touching the table
        let indices = columns
            .iter()
            .map(|c| {
                target
                    .column_index(c)
                    .ok_or_else(|| DatabaseError::ColumnNotFound {
                        table: table.to_string(),
                        column: c.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(bad) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(DatabaseError::RowWidth {
                expected: columns.len(),
                actual: bad.len(),
            });
        }

        let width = target.columns.len();
        for row in rows {
            let mut full = vec![Value::Null; width];
            for (index, value) in indices.iter().zip(row) {
                full[*index] = value.clone();
            }
            target.rows.push(full);
        }
        Ok(rows.len())
    }

    pub(crate) fn drop_columns(
        &mut self,
        table: &str,
        columns: &[String],
    ) -> Result<(), DatabaseError> {
        let target = self.table_mut(table)?;
        if let Some(missing) = columns.iter().find(|c| target.column_index(c).is_none()) {
            return Err(DatabaseError::ColumnNotFound {
                table: table.to_string(),
                column: missing.clone(),
            });
        }

        let keep: Vec<bool> = target
            .columns
            .iter()
            .map(|c| !columns.contains(c))
            .collect();
        target.columns.retain(|c| !columns.contains(c));
        for row in &mut target.rows {
            let mut flags = keep.iter();
            row.retain(|_| flags.next().copied().unwrap_or(false));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
