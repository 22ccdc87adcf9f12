use super::{Db, Shared, Table};
use crate::{Error, Model, Result};

use brioche_core::{driver::Driver, schema::ModelRef};
use indexmap::IndexMap;
use std::{any::TypeId, sync::Arc};

/// Configures a [`Db`].
#[derive(Debug, Default)]
pub struct Builder {
    /// Registered models, in registration order
    models: Vec<(TypeId, ModelRef)>,

    /// Prepended to every table name
    table_name_prefix: Option<String>,
}

impl Builder {
    pub fn register<M: Model>(&mut self) -> &mut Self {
        let type_id = TypeId::of::<M>();
        if !self.models.iter().any(|(id, _)| *id == type_id) {
            self.models.push((type_id, M::model_ref()));
        }
        self
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    fn table_name(&self, model: &ModelRef) -> String {
        match &self.table_name_prefix {
            Some(prefix) => format!("{prefix}{}", model.name()),
            None => model.name().to_string(),
        }
    }

    /// Builds every registered schema and registers its table with `driver`.
    ///
    /// Schema construction errors, such as an unknown attribute kind, surface
    /// here rather than at first use.
    pub async fn build(&mut self, mut driver: impl Driver) -> Result<Db> {
        let mut tables = IndexMap::with_capacity(self.models.len());

        for (_, model_ref) in &self.models {
            if tables.contains_key(model_ref.name()) {
                return Err(Error::invalid_schema(format!(
                    "two registered models share the entity name `{}`",
                    model_ref.name()
                )));
            }

            let schema = model_ref.load()?;
            let name = self.table_name(model_ref);

            driver.register_table(&name, &schema).await?;
            tracing::debug!(model = model_ref.name(), table = %name, "registered table");

            tables.insert(model_ref.name(), Table { name, schema });
        }

        Ok(Db {
            shared: Arc::new(Shared {
                driver: Box::new(driver),
                tables,
            }),
        })
    }
}
