use super::{Field, KeySource, Mutator, PrimaryKey};
use crate::stmt::Value;

use indexmap::IndexMap;

/// Name of the single-field identity used to wire foreign keys between
/// models. Independent of any model's declared primary key.
pub const LOCAL_KEY: &str = "id";

/// Schema of one entity type.
///
/// Built once per type and shared, read-only, by every record of that type.
#[derive(Debug, Clone)]
pub struct Model {
    /// Entity name
    pub name: String,

    /// Field(s) identifying a record
    pub primary_key: PrimaryKey,

    /// Declared fields, in declaration order
    pub fields: IndexMap<String, Field>,

    /// Entity-level mutators, keyed by field name. Only used for plain fields
    /// that carry no mutator of their own.
    pub mutators: IndexMap<String, Mutator>,
}

impl Model {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> &PrimaryKey {
        &self.primary_key
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl ExactSizeIterator<Item = &Field> + '_ {
        self.fields.values()
    }

    /// The mutator applied to `field`: the field's own mutator if it has one,
    /// otherwise the entity-level mutator registered under its name.
    pub fn mutator_for(&self, field: &str) -> Option<&Mutator> {
        self.fields
            .get(field)
            .and_then(|field| field.mutator.as_ref())
            .or_else(|| self.mutators.get(field))
    }

    /// Computes the primary key value of `data`.
    pub fn compute_id(&self, data: &(impl KeySource + ?Sized)) -> Value {
        self.primary_key.compute(data)
    }

    pub fn local_key(&self) -> &'static str {
        LOCAL_KEY
    }
}
