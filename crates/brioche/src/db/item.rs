use crate::{Record, Result};

use brioche_core::{schema, stmt::Value};
use std::sync::Arc;

/// One result of a lookup: an instantiated record when the lookup wrapped
/// its results, the stored plain data otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Record(Record),
    Value(Value),
}

impl Item {
    pub(crate) fn load(schema: &Arc<schema::Model>, row: Value, wrap: bool) -> Result<Item> {
        if wrap {
            Ok(Item::Record(Record::load(schema.clone(), &row)?))
        } else {
            Ok(Item::Value(row))
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Item::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Item::Value(value) => Some(value),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_record(&self) -> &Record {
        match self {
            Item::Record(record) => record,
            _ => panic!("expected record, but was {self:?}"),
        }
    }

    #[track_caller]
    pub fn expect_value(&self) -> &Value {
        match self {
            Item::Value(value) => value,
            _ => panic!("expected plain value, but was {self:?}"),
        }
    }

    /// The plain form of this item, serializing a record if necessary.
    pub fn to_value(&self) -> Value {
        match self {
            Item::Record(record) => record.serialize(),
            Item::Value(value) => value.clone(),
        }
    }
}
