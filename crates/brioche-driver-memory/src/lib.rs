use brioche_core::{async_trait, driver::Driver, schema::Model, stmt::Value, Error, Result};

use indexmap::IndexMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Driver keeping every table in process memory.
///
/// Nothing is persisted; dropping the driver drops the data.
#[derive(Debug, Default)]
pub struct Memory {
    tables: Mutex<IndexMap<String, Table>>,
}

#[derive(Debug, Default)]
struct Table {
    /// `(key, row)` pairs in insertion order
    rows: Vec<(Value, Value)>,
}

/// Raised when an operation names a table that was never registered.
#[derive(Debug)]
pub struct UnknownTable(pub String);

impl std::error::Error for UnknownTable {}

impl std::fmt::Display for UnknownTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "memory: table `{}` is not registered", self.0)
    }
}

impl Memory {
    pub fn new() -> Memory {
        Memory::default()
    }

    fn tables(&self) -> MutexGuard<'_, IndexMap<String, Table>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Driver for Memory {
    async fn register_table(&mut self, table: &str, model: &Model) -> Result<()> {
        tracing::debug!(table, model = %model.name, "memory: register table");
        self.tables().entry(table.to_string()).or_default();
        Ok(())
    }

    async fn scan(&self, table: &str) -> Result<Vec<Value>> {
        let tables = self.tables();
        let Some(rows) = tables.get(table) else {
            return Err(Error::driver(UnknownTable(table.to_string())));
        };
        Ok(rows.rows.iter().map(|(_, row)| row.clone()).collect())
    }

    async fn get(&self, table: &str, key: &Value) -> Result<Option<Value>> {
        let tables = self.tables();
        let Some(rows) = tables.get(table) else {
            return Err(Error::driver(UnknownTable(table.to_string())));
        };
        Ok(rows
            .rows
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, row)| row.clone()))
    }

    async fn put(&self, table: &str, key: Value, row: Value) -> Result<()> {
        let mut tables = self.tables();
        let Some(rows) = tables.get_mut(table) else {
            return Err(Error::driver(UnknownTable(table.to_string())));
        };

        match rows.rows.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = row,
            None => rows.rows.push((key, row)),
        }

        Ok(())
    }
}
