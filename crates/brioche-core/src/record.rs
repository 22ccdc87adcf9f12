mod instantiate;

mod serialize;

use crate::{
    bail,
    schema::{FieldTy, KeySource, Model},
    stmt::Value,
    Error, Result,
};

use indexmap::IndexMap;
use std::sync::Arc;

/// An instance of a model.
///
/// Holds exactly the fields its model declares, no more and no fewer. The
/// schema is shared with every other record of the same model.
#[derive(Debug, Clone)]
pub struct Record {
    model: Arc<Model>,
    fields: IndexMap<String, FieldValue>,
}

/// The current value of one record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Value of a plain attribute
    Value(Value),

    /// Related record of a to-one relation, if any
    One(Option<Box<Record>>),

    /// Related records of a to-many relation, in order
    Many(Vec<Record>),
}

impl Record {
    /// The model this record is an instance of.
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Entity name of the record's model.
    pub fn name(&self) -> &str {
        &self.model.name
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Mutable access to a declared field. The set of fields cannot change.
    pub fn get_mut(&mut self, field: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(field)
    }

    /// Value of a plain attribute.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.get(field).and_then(FieldValue::as_value)
    }

    /// Related record of a to-one relation.
    pub fn one(&self, field: &str) -> Option<&Record> {
        self.get(field).and_then(FieldValue::as_one)
    }

    /// Related records of a to-many relation.
    pub fn many(&self, field: &str) -> Option<&[Record]> {
        self.get(field).and_then(FieldValue::as_many)
    }

    /// Iterate over `(name, value)` pairs in declared order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> + '_ {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Reassigns a declared field.
    ///
    /// Fails, leaving the record untouched, when `field` is not declared by
    /// the model or when `value` does not fit the field's kind.
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<()> {
        let value = value.into();

        let Some(declared) = self.model.field(field) else {
            return Err(Error::unknown_field(&self.model.name, field));
        };

        match (&declared.ty, &value) {
            (FieldTy::Plain(_), FieldValue::Value(_)) => {}
            (FieldTy::ToOne(to_one), FieldValue::One(related)) => {
                if let Some(related) = related {
                    check_target(field, to_one.target.name(), related)?;
                }
            }
            (FieldTy::ToMany(to_many), FieldValue::Many(related)) => {
                for related in related {
                    check_target(field, to_many.target.name(), related)?;
                }
            }
            (ty, value) => bail!(
                "cannot assign {} to field `{}` of `{}` ({:?})",
                value.kind_name(),
                field,
                self.model.name,
                ty
            ),
        }

        self.fields.insert(field.to_string(), value);
        Ok(())
    }

    /// Primary key value computed from this record's fields.
    pub fn id(&self) -> Value {
        self.model.compute_id(self)
    }
}

fn check_target(field: &str, expected: &str, related: &Record) -> Result<()> {
    if related.name() != expected {
        bail!(
            "field `{}` relates to `{}`, not `{}`",
            field,
            expected,
            related.name()
        );
    }
    Ok(())
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.model.name == other.model.name && self.fields == other.fields
    }
}

impl KeySource for Record {
    fn key_value(&self, field: &str) -> Option<&Value> {
        self.value(field)
    }
}

impl FieldValue {
    fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Value(_) => "a plain value",
            FieldValue::One(_) => "a related record",
            FieldValue::Many(_) => "a list of related records",
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_one(&self) -> Option<&Record> {
        match self {
            FieldValue::One(related) => related.as_deref(),
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&[Record]> {
        match self {
            FieldValue::Many(related) => Some(related),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_value(&self) -> &Value {
        match self {
            FieldValue::Value(value) => value,
            _ => panic!("expected plain value, but was {self:?}"),
        }
    }

    #[track_caller]
    pub fn expect_many(&self) -> &[Record] {
        match self {
            FieldValue::Many(related) => related,
            _ => panic!("expected related records, but was {self:?}"),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Value(value)
    }
}

impl From<Record> for FieldValue {
    fn from(record: Record) -> Self {
        FieldValue::One(Some(Box::new(record)))
    }
}

impl From<Option<Record>> for FieldValue {
    fn from(record: Option<Record>) -> Self {
        FieldValue::One(record.map(Box::new))
    }
}

impl From<Vec<Record>> for FieldValue {
    fn from(records: Vec<Record>) -> Self {
        FieldValue::Many(records)
    }
}
