use super::{FieldValue, Record};
use crate::{
    schema::{FieldTy, Model},
    stmt::{Value, ValueMap},
    Result,
};

use indexmap::IndexMap;
use std::sync::Arc;

impl Record {
    /// Instantiates a record of `model` from raw, possibly partial, input.
    ///
    /// Every declared field is populated, in declared order:
    ///
    /// * plain fields take the input value when the key is present and the
    ///   declared default otherwise, then pass through the field's mutator
    ///   (or, lacking one, the entity-level mutator of the same name);
    /// * to-one fields recursively instantiate the nested map, or stay empty;
    /// * to-many fields recursively instantiate every element in order, or
    ///   hold an empty list.
    ///
    /// Input keys the model does not declare are dropped. Input that is not a
    /// map is treated as absent, so a non-map list element becomes a record of
    /// defaults. The only failures are those returned by mutators and by
    /// loading a related model's schema.
    pub fn instantiate(model: Arc<Model>, input: Option<&Value>) -> Result<Record> {
        Record::build(model, input, Mutation::Apply)
    }

    /// Rebuilds a record from a stored row.
    ///
    /// Rows hold serializer output, which has already been through the
    /// mutators, so none are applied here. Otherwise identical to
    /// [`Record::instantiate`].
    pub fn load(model: Arc<Model>, row: &Value) -> Result<Record> {
        Record::build(model, Some(row), Mutation::Skip)
    }

    fn build(model: Arc<Model>, input: Option<&Value>, mutation: Mutation) -> Result<Record> {
        let input = input.and_then(Value::as_map);

        tracing::trace!(model = %model.name, present = input.is_some(), ?mutation, "building record");

        let mut fields = IndexMap::with_capacity(model.fields.len());

        for (name, field) in &model.fields {
            let raw = input.and_then(|input| input.get(name));

            let value = match &field.ty {
                FieldTy::Plain(plain) => {
                    let value = raw.cloned().unwrap_or_else(|| plain.default.clone());
                    let value = match (mutation, model.mutator_for(name)) {
                        (Mutation::Apply, Some(mutator)) => mutator.apply(value)?,
                        _ => value,
                    };
                    FieldValue::Value(value)
                }
                FieldTy::ToOne(to_one) => match raw {
                    Some(nested @ Value::Map(_)) => {
                        let target = to_one.target.load()?;
                        let related = Record::build(target, Some(nested), mutation)?;
                        FieldValue::One(Some(Box::new(related)))
                    }
                    _ => FieldValue::One(None),
                },
                FieldTy::ToMany(to_many) => match raw.and_then(Value::as_list) {
                    Some(items) => {
                        let target = to_many.target.load()?;
                        let records = items
                            .iter()
                            .map(|item| Record::build(target.clone(), Some(item), mutation))
                            .collect::<Result<Vec<_>>>()?;
                        FieldValue::Many(records)
                    }
                    None => FieldValue::Many(vec![]),
                },
            };

            fields.insert(name.clone(), value);
        }

        Ok(Record { model, fields })
    }

    /// Instantiates a record from a map of raw values.
    pub fn from_map(model: Arc<Model>, input: ValueMap) -> Result<Record> {
        Record::instantiate(model, Some(&Value::Map(input)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Apply,
    Skip,
}
