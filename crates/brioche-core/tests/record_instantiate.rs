use brioche_core::{
    err,
    record::FieldValue,
    schema::{AttributeKinds, Builder, Model, ModelRef, Mutator},
    stmt::Value,
    Record, Result,
};
use serde_json::json;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, OnceLock,
};

fn user() -> Result<Arc<Model>> {
    static MODEL: OnceLock<Arc<Model>> = OnceLock::new();
    let model = MODEL.get_or_init(|| {
        let mut builder = Builder::new("users");
        builder.attr("id", Value::Null);
        builder.attr("name", "John Doe");
        builder.attr("email", "john@example.com");
        Arc::new(builder.build(&AttributeKinds::builtin()).unwrap())
    });
    Ok(model.clone())
}

fn comment() -> Result<Arc<Model>> {
    static MODEL: OnceLock<Arc<Model>> = OnceLock::new();
    let model = MODEL.get_or_init(|| {
        let mut builder = Builder::new("comments");
        builder.attr("id", Value::Null);
        builder.attr("post_id", Value::Null);
        builder.attr("body", "");
        Arc::new(builder.build(&AttributeKinds::builtin()).unwrap())
    });
    Ok(model.clone())
}

static OWNER_LOADS: AtomicUsize = AtomicUsize::new(0);

/// `users`, counting how often the schema is asked for.
fn owner() -> Result<Arc<Model>> {
    OWNER_LOADS.fetch_add(1, Ordering::SeqCst);
    user()
}

fn post() -> Arc<Model> {
    let mut builder = Builder::new("posts");
    builder.attr("id", Value::Null);
    builder.attr("title", "");
    builder.has_many("comments", ModelRef::new("comments", comment), "post_id");
    Arc::new(builder.build(&AttributeKinds::builtin()).unwrap())
}

fn category() -> Result<Arc<Model>> {
    static MODEL: OnceLock<Arc<Model>> = OnceLock::new();
    let model = MODEL.get_or_init(|| {
        let mut builder = Builder::new("categories");
        builder.attr("id", Value::Null);
        builder.attr("parent_id", Value::Null);
        builder.belongs_to("parent", ModelRef::new("categories", category), "parent_id");
        builder.has_many("children", ModelRef::new("categories", category), "parent_id");
        Arc::new(builder.build(&AttributeKinds::builtin()).unwrap())
    });
    Ok(model.clone())
}

fn instantiate(model: Arc<Model>, input: serde_json::Value) -> Record {
    Record::instantiate(model, Some(&Value::from(input))).unwrap()
}

#[test]
fn absent_input_uses_defaults() {
    let mut builder = Builder::new("profiles");
    builder.attr("id", Value::Null);
    builder.attr("bio", "none");
    builder.has_one("owner", ModelRef::new("users", user), "profile_id");
    builder.has_many("comments", ModelRef::new("comments", comment), "profile_id");
    let model = Arc::new(builder.build(&AttributeKinds::builtin()).unwrap());

    let record = Record::instantiate(model, None).unwrap();

    assert_eq!(record.value("id"), Some(&Value::Null));
    assert_eq!(record.value("bio"), Some(&Value::from("none")));
    assert_eq!(record.get("owner"), Some(&FieldValue::One(None)));
    assert_eq!(record.many("comments"), Some(&[][..]));
}

#[test]
fn partial_input_keeps_defaults_and_drops_extra_keys() {
    let record = instantiate(user().unwrap(), json!({"name": "Jane Doe", "age": 32}));

    assert_eq!(record.value("name"), Some(&Value::from("Jane Doe")));
    assert_eq!(record.value("email"), Some(&Value::from("john@example.com")));
    assert!(record.get("age").is_none());

    let names: Vec<_> = record.fields().map(|(name, _)| name).collect();
    assert_eq!(names, ["id", "name", "email"]);
}

#[test]
fn explicit_null_is_kept() {
    let record = instantiate(user().unwrap(), json!({"name": null}));
    assert_eq!(record.value("name"), Some(&Value::Null));
}

#[test]
fn non_map_input_is_treated_as_absent() {
    let record = Record::instantiate(user().unwrap(), Some(&Value::from(42))).unwrap();
    assert_eq!(record.value("name"), Some(&Value::from("John Doe")));
}

#[test]
fn field_mutator_wins_over_entity_mutator() {
    let mut builder = Builder::new("users");
    builder.attr("id", Value::Null);
    builder
        .attr("name", "")
        .mutate(|value| match value {
            Value::String(name) => Value::String(name.to_uppercase()),
            other => other,
        });
    builder.mutator("name", Mutator::map(|_| Value::from("Constant")));
    let model = Arc::new(builder.build(&AttributeKinds::builtin()).unwrap());

    let record = instantiate(model, json!({"name": "john doe"}));
    assert_eq!(record.value("name"), Some(&Value::from("JOHN DOE")));
}

#[test]
fn entity_mutator_applies_to_defaults() {
    let mut builder = Builder::new("users");
    builder.attr("id", Value::Null);
    builder.attr("name", "john");
    builder.mutator("name", Mutator::map(|v| Value::from(format!("{}!", v.expect_str()))));
    let model = Arc::new(builder.build(&AttributeKinds::builtin()).unwrap());

    let record = Record::instantiate(model, None).unwrap();
    assert_eq!(record.value("name"), Some(&Value::from("john!")));
}

#[test]
fn mutators_skip_relation_fields() {
    let mut builder = Builder::new("posts");
    builder.attr("id", Value::Null);
    builder
        .has_many("comments", ModelRef::new("comments", comment), "post_id")
        .mutate(|_| Value::from("mutated"));
    builder.mutator("comments", Mutator::map(|_| Value::from("mutated")));
    let model = Arc::new(builder.build(&AttributeKinds::builtin()).unwrap());

    let record = instantiate(model, json!({"id": 1, "comments": [{"id": 1}]}));
    assert_eq!(record.many("comments").unwrap().len(), 1);
}

#[test]
fn mutator_failure_propagates() {
    let mut builder = Builder::new("users");
    builder.attr("id", Value::Null);
    builder.attr("age", 0);
    builder.mutator(
        "age",
        Mutator::new(|value| match value.as_i64() {
            Some(age) if age >= 0 => Ok(value),
            _ => Err(err!("age must be a non-negative integer")),
        }),
    );
    let model = Arc::new(builder.build(&AttributeKinds::builtin()).unwrap());

    let err = Record::instantiate(model, Some(&Value::from(json!({"age": -1})))).unwrap_err();
    assert_eq!(err.to_string(), "age must be a non-negative integer");
}

#[test]
fn to_many_instantiates_every_element_in_order() {
    let record = instantiate(
        post(),
        json!({
            "id": 1,
            "comments": [{"id": 2, "body": "C2"}, 7, {"id": 1, "body": "C1"}, null],
        }),
    );

    let comments = record.many("comments").unwrap();
    assert_eq!(comments.len(), 4);
    assert_eq!(comments[0].value("body"), Some(&Value::from("C2")));
    assert_eq!(comments[2].value("body"), Some(&Value::from("C1")));
    assert_eq!(comments[2].value("post_id"), Some(&Value::Null));

    // Elements that are not maps become records of defaults
    for comment in [&comments[1], &comments[3]] {
        assert_eq!(comment.id(), Value::Null);
        assert_eq!(comment.value("body"), Some(&Value::from("")));
    }
}

#[test]
fn to_many_non_list_is_empty() {
    let record = instantiate(post(), json!({"id": 1, "comments": {"id": 1}}));
    assert_eq!(record.many("comments"), Some(&[][..]));
}

#[test]
fn to_one_null_is_absent() {
    let record = instantiate(category().unwrap(), json!({"id": 2, "parent": null}));
    assert!(record.one("parent").is_none());
}

#[test]
fn related_schema_is_loaded_only_for_nested_data() {
    let mut builder = Builder::new("profiles");
    builder.attr("id", Value::Null);
    builder.has_one("owner", ModelRef::new("users", owner), "profile_id");
    let model = Arc::new(builder.build(&AttributeKinds::builtin()).unwrap());

    Record::instantiate(model.clone(), Some(&Value::from(json!({"id": 1})))).unwrap();
    assert_eq!(OWNER_LOADS.load(Ordering::SeqCst), 0);

    let record = instantiate(model, json!({"id": 1, "owner": {"id": 5, "name": "Ann"}}));
    assert_eq!(OWNER_LOADS.load(Ordering::SeqCst), 1);
    assert_eq!(record.one("owner").unwrap().value("name"), Some(&Value::from("Ann")));
}

#[test]
fn self_referential_model() {
    let record = instantiate(
        category().unwrap(),
        json!({
            "id": 2,
            "parent_id": 1,
            "parent": {"id": 1, "parent_id": null},
            "children": [
                {"id": 3, "parent_id": 2, "children": [{"id": 4, "parent_id": 3}]},
            ],
        }),
    );

    assert_eq!(record.one("parent").unwrap().value("id"), Some(&Value::I64(1)));
    let child = &record.many("children").unwrap()[0];
    let grandchild = &child.many("children").unwrap()[0];
    assert_eq!(grandchild.value("id"), Some(&Value::I64(4)));
    assert_eq!(grandchild.name(), "categories");
}

#[test]
fn set_rejects_undeclared_fields() {
    let mut record = instantiate(user().unwrap(), json!({"id": 1}));

    let err = record.set("age", Value::from(3)).unwrap_err();
    assert!(err.is_unknown_field());
    assert!(record.get("age").is_none());

    record.set("name", Value::from("Renamed")).unwrap();
    assert_eq!(record.value("name"), Some(&Value::from("Renamed")));
}

#[test]
fn set_rejects_mismatched_kinds() {
    let mut record = instantiate(post(), json!({"id": 1}));
    let user = instantiate(user().unwrap(), json!({"id": 1}));

    assert!(record.set("title", vec![user.clone()]).is_err());
    assert!(record.set("comments", vec![user]).is_err());
    assert!(record.set("comments", Value::from("x")).is_err());
    assert_eq!(record.many("comments"), Some(&[][..]));
}

#[test]
fn load_skips_mutators() {
    let mut builder = Builder::new("tags");
    builder.attr("id", Value::Null);
    builder
        .attr("label", "")
        .mutate(|value| Value::from(format!("#{}", value.as_str().unwrap_or_default())));
    let model = Arc::new(builder.build(&AttributeKinds::builtin()).unwrap());

    let record = instantiate(model.clone(), json!({"id": 1, "label": "rust"}));
    assert_eq!(record.value("label"), Some(&Value::from("#rust")));

    let loaded = Record::load(model, &record.serialize()).unwrap();
    assert_eq!(loaded, record);
}
