use brioche_core::{
    schema::{AttributeKinds, Builder, Model, PrimaryKey},
    stmt::Value,
    Record,
};
use serde_json::json;
use std::sync::Arc;

fn model(primary_key: impl Into<PrimaryKey>, fields: &[&str]) -> Arc<Model> {
    let mut builder = Builder::new("votes");
    for field in fields {
        builder.attr(*field, Value::Null);
    }
    builder.primary_key(primary_key);
    Arc::new(builder.build(&AttributeKinds::builtin()).unwrap())
}

#[test]
fn scalar_key() {
    let model = model("id", &["id", "name"]);
    let data = Value::from(json!({"id": 1}));

    assert_eq!(model.compute_id(&data), Value::I64(1));

    let record = Record::instantiate(model, Some(&data)).unwrap();
    assert_eq!(record.id(), Value::I64(1));
}

#[test]
fn scalar_key_is_not_coerced() {
    let model = model("id", &["id"]);
    let data = Value::from(json!({"id": "abc-1"}));
    assert_eq!(model.compute_id(&data), Value::from("abc-1"));
}

#[test]
fn composite_key_uses_declared_order() {
    let model = model(["vote_id", "user_id"], &["user_id", "vote_id"]);
    let data = Value::from(json!({"user_id": 1, "vote_id": 2}));

    assert_eq!(model.compute_id(&data), Value::from("2_1"));

    let record = Record::instantiate(model.clone(), Some(&data)).unwrap();
    assert_eq!(record.id(), Value::from("2_1"));
    assert_eq!(model.compute_id(&record), record.id());
}

#[test]
fn composite_key_from_map() {
    let model = model(["a", "b"], &["a", "b"]);
    let data = Value::from(json!({"a": "x", "b": true})).to_map().unwrap();
    assert_eq!(model.compute_id(&data), Value::from("x_true"));
}

#[test]
fn local_key_is_fixed() {
    let model = model(["vote_id", "user_id"], &["user_id", "vote_id"]);
    assert_eq!(model.local_key(), "id");
}
