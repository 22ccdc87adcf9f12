mod builder;
pub use builder::Builder;

mod item;
pub use item::Item;

mod query;
pub use query::Query;

use crate::{Error, Model, Result};

use brioche_core::{driver::Driver, schema, stmt::Value, Record};
use indexmap::IndexMap;
use std::sync::Arc;

/// A handle to a storage driver and the models registered with it.
///
/// Cloning is cheap; clones share the driver.
#[derive(Clone, Debug)]
pub struct Db {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    driver: Box<dyn Driver>,

    /// Registered models, keyed by entity name
    tables: IndexMap<&'static str, Table>,
}

#[derive(Debug)]
pub(crate) struct Table {
    /// Table name, including any configured prefix
    pub(crate) name: String,

    pub(crate) schema: Arc<schema::Model>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn table<M: Model>(&self) -> Result<&Table> {
        self.shared
            .tables
            .get(M::NAME)
            .ok_or_else(|| Error::invalid_schema(format!("model `{}` is not registered", M::NAME)))
    }

    pub(crate) fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    /// Name of the table `M` is stored in.
    pub fn table_name<M: Model>(&self) -> Result<&str> {
        Ok(&self.table::<M>()?.name)
    }

    /// Starts a query over every record of `M`.
    ///
    /// With `wrap`, results are instantiated records; otherwise they are the
    /// plain serialized rows.
    pub fn query<M: Model>(&self, wrap: bool) -> Query<'_, M> {
        Query::new(self, wrap)
    }

    /// Every stored record of `M`, in storage order.
    pub async fn all<M: Model>(&self, wrap: bool) -> Result<Vec<Item>> {
        self.query::<M>(wrap).all().await
    }

    /// The record of `M` whose primary key value is `id`.
    pub async fn find<M: Model>(&self, id: impl Into<Value>, wrap: bool) -> Result<Option<Item>> {
        let table = self.table::<M>()?;
        let id = id.into();

        tracing::trace!(table = %table.name, ?id, "find");

        match self.driver().get(&table.name, &id).await? {
            Some(row) => Ok(Some(Item::load(&table.schema, row, wrap)?)),
            None => Ok(None),
        }
    }

    /// Instantiates `input` as an `M` and stores it under its primary key.
    pub async fn insert<M: Model>(&self, input: impl Into<Value>) -> Result<Record> {
        let table = self.table::<M>()?;
        let record = Record::instantiate(table.schema.clone(), Some(&input.into()))?;
        self.put(table, &record).await?;
        Ok(record)
    }

    /// Stores an existing record, replacing any row with the same key.
    pub async fn save(&self, record: &Record) -> Result<()> {
        let Some(table) = self.shared.tables.get(record.name()) else {
            return Err(Error::invalid_schema(format!(
                "model `{}` is not registered",
                record.name()
            )));
        };
        self.put(table, record).await
    }

    async fn put(&self, table: &Table, record: &Record) -> Result<()> {
        let key = record.id();
        tracing::trace!(table = %table.name, ?key, "put");
        self.driver()
            .put(&table.name, key, record.serialize())
            .await
    }
}
