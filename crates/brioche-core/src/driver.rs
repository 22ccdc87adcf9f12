use crate::{async_trait, schema::Model, stmt::Value};

use std::fmt::Debug;

/// Storage backend records are persisted into and loaded from.
///
/// Tables are addressed by name; rows are serialized records (`Value::Map`)
/// and keys are the values computed by a model's primary key. Drivers never
/// see instantiated records.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Register a model's table with the driver.
    async fn register_table(&mut self, table: &str, model: &Model) -> crate::Result<()> {
        let _ = (table, model);
        Ok(())
    }

    /// Every row stored in `table`, in insertion order.
    async fn scan(&self, table: &str) -> crate::Result<Vec<Value>>;

    /// The row stored under `key`, if any.
    async fn get(&self, table: &str, key: &Value) -> crate::Result<Option<Value>>;

    /// Stores `row` under `key`, replacing any existing row with that key.
    async fn put(&self, table: &str, key: Value, row: Value) -> crate::Result<()>;
}
