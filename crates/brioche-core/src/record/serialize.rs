use super::{FieldValue, Record};
use crate::{
    schema::FieldTy,
    stmt::{Value, ValueMap},
};

impl Record {
    /// Serializes the record back into plain nested data.
    ///
    /// Walks the fields declared by the model, in declared order. Plain
    /// values are copied, a missing to-one relation becomes `Null`, and
    /// related records are serialized recursively. An empty to-many relation
    /// serializes as an empty list.
    pub fn serialize(&self) -> Value {
        let mut out = ValueMap::with_capacity(self.model.fields.len());

        for (name, field) in &self.model.fields {
            let value = match (&field.ty, self.fields.get(name)) {
                (FieldTy::Plain(_), Some(FieldValue::Value(value))) => value.clone(),
                (FieldTy::ToOne(_), Some(FieldValue::One(Some(related)))) => related.serialize(),
                (FieldTy::ToMany(_), Some(FieldValue::Many(related))) => {
                    Value::List(related.iter().map(Record::serialize).collect())
                }
                (FieldTy::ToMany(_), _) => Value::List(vec![]),
                _ => Value::Null,
            };

            out.insert(name.clone(), value);
        }

        Value::Map(out)
    }

    /// Serializes the record as a `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        self.serialize().into()
    }
}
