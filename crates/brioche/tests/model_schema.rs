use brioche::{
    schema::{AttributeArgs, AttributeKinds, FieldTy, Plain},
    Fields, Model, Result, Value,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Barrier,
};

#[test]
fn schema_is_declared_once() {
    static DECLARATIONS: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl Model for Counted {
        const NAME: &'static str = "counted";

        fn fields(fields: &mut Fields<'_>) {
            DECLARATIONS.fetch_add(1, Ordering::SeqCst);
            fields.attr("id", Value::Null);
        }
    }

    let first = Counted::schema().unwrap();
    let second = Counted::schema().unwrap();
    Counted::instantiate(None).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(DECLARATIONS.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_first_access_declares_once() {
    static DECLARATIONS: AtomicUsize = AtomicUsize::new(0);

    struct Contended;

    impl Model for Contended {
        const NAME: &'static str = "contended";

        fn fields(fields: &mut Fields<'_>) {
            DECLARATIONS.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(5));
            fields.attr("id", Value::Null);
        }
    }

    let barrier = Barrier::new(16);
    let schemas: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    Contended::schema().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(DECLARATIONS.load(Ordering::SeqCst), 1);
    for schema in &schemas[1..] {
        assert!(Arc::ptr_eq(&schemas[0], schema));
    }
}

static BROKEN_DECLARATIONS: AtomicUsize = AtomicUsize::new(0);

struct Broken;

impl Model for Broken {
    const NAME: &'static str = "broken";

    fn fields(fields: &mut Fields<'_>) {
        BROKEN_DECLARATIONS.fetch_add(1, Ordering::SeqCst);
        fields.attr("id", Value::Null);
        fields.kind("meta", "json", AttributeArgs::default());
    }
}

#[test]
fn unknown_attribute_kind_fails_schema_construction() {
    let err = Broken::schema().unwrap_err();
    assert!(err.is_unknown_attribute_kind());
    assert!(err.to_string().contains("json"));

    // The failure is cached: later requests fail without declaring again
    assert!(Broken::schema().unwrap_err().is_unknown_attribute_kind());
    assert!(Broken::instantiate(None).unwrap_err().is_unknown_attribute_kind());
    assert_eq!(BROKEN_DECLARATIONS.load(Ordering::SeqCst), 1);
}

#[test]
fn attribute_kind_lookup() {
    assert!(Broken::attribute_kind("attr").is_ok());
    assert!(Broken::attribute_kind("has_many").is_ok());
    assert!(Broken::attribute_kind("json")
        .unwrap_err()
        .is_unknown_attribute_kind());
}

#[test]
fn custom_attribute_kind() {
    fn string(args: &AttributeArgs) -> Result<FieldTy> {
        let default = match &args.default {
            Value::Null => Value::from(""),
            other => other.clone(),
        };
        Ok(Plain { default }.into())
    }

    struct Account;

    impl Model for Account {
        const NAME: &'static str = "accounts";

        fn attribute_kinds() -> AttributeKinds {
            let mut kinds = AttributeKinds::builtin();
            kinds.register("string", string);
            kinds
        }

        fn fields(fields: &mut Fields<'_>) {
            fields.attr("id", Value::Null);
            fields.kind("handle", "string", AttributeArgs::default());
        }
    }

    let account = Account::instantiate(None).unwrap();
    assert_eq!(account.value("handle"), Some(&Value::from("")));
    assert!(Account::attribute_kind("string").is_ok());
}

#[test]
fn model_without_fields() {
    struct Empty;

    impl Model for Empty {
        const NAME: &'static str = "empty";
    }

    let schema = Empty::schema().unwrap();
    assert_eq!(schema.fields().len(), 0);

    let record = Empty::from_json(serde_json::json!({"id": 1, "x": 2})).unwrap();
    assert_eq!(record.to_json(), serde_json::json!({}));
    assert!(record.id().is_null());
}

#[test]
fn undeclared_primary_key_is_invalid() {
    struct Orphan;

    impl Model for Orphan {
        const NAME: &'static str = "orphans";

        fn primary_key() -> brioche::schema::PrimaryKey {
            "uuid".into()
        }

        fn fields(fields: &mut Fields<'_>) {
            fields.attr("id", Value::Null);
        }
    }

    let err = Orphan::schema().unwrap_err();
    assert!(err.is_invalid_schema());
}

#[test]
fn relation_targets_resolve_lazily() {
    struct Node;

    impl Model for Node {
        const NAME: &'static str = "nodes";

        fn fields(fields: &mut Fields<'_>) {
            fields.attr("id", Value::Null);
            fields.attr("parent_id", Value::Null);
            fields.belongs_to::<Node>("parent", "parent_id");
            fields.has_many::<Node>("children", "parent_id");
        }
    }

    let schema = Node::schema().unwrap();
    let parent = schema.field("parent").unwrap();
    assert!(parent.ty().is_to_one());
    assert_eq!(parent.relation_target().unwrap().name(), "nodes");
    assert_eq!(parent.ty().expect_to_one().foreign_key, "parent_id");

    let target = schema.field("children").unwrap().relation_target().unwrap().load().unwrap();
    assert!(Arc::ptr_eq(&schema, &target));
}
