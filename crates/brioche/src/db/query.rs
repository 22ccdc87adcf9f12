use super::{Db, Item};
use crate::{Error, Model, Result};

use brioche_core::stmt::Value;
use std::marker::PhantomData;

/// Query over the stored records of one model.
///
/// Filters are equality tests against the stored (serialized) fields.
#[derive(Debug)]
pub struct Query<'a, M> {
    db: &'a Db,
    wrap: bool,
    filters: Vec<(String, Value)>,
    limit: Option<usize>,
    _p: PhantomData<fn() -> M>,
}

impl<'a, M: Model> Query<'a, M> {
    pub(super) fn new(db: &'a Db, wrap: bool) -> Query<'a, M> {
        Query {
            db,
            wrap,
            filters: vec![],
            limit: None,
            _p: PhantomData,
        }
    }

    /// Keeps only records whose `field` equals `value`.
    pub fn filter(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    /// Returns at most `limit` records.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, row: &Value) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| row.get(field).unwrap_or(&Value::Null) == expected)
    }

    pub async fn all(self) -> Result<Vec<Item>> {
        let table = self.db.table::<M>()?;
        let rows = self.db.driver().scan(&table.name).await?;

        tracing::trace!(table = %table.name, rows = rows.len(), filters = self.filters.len(), "scan");

        rows.into_iter()
            .filter(|row| self.matches(row))
            .take(self.limit.unwrap_or(usize::MAX))
            .map(|row| Item::load(&table.schema, row, self.wrap))
            .collect()
    }

    pub async fn first(self) -> Result<Option<Item>> {
        Ok(self.limit(1).all().await?.into_iter().next())
    }

    /// Like [`first`](Query::first), but an empty result is an error.
    pub async fn get(self) -> Result<Item> {
        let context = format!("table={} filters={:?}", M::NAME, self.filters);
        self.first()
            .await?
            .ok_or_else(|| Error::record_not_found(context))
    }
}
