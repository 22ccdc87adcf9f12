use crate::{registry, Fields, Mutators, Result};

use brioche_core::{
    schema::{self, AttributeCtor, AttributeKinds, KeySource, ModelRef, PrimaryKey, LOCAL_KEY},
    stmt::Value,
    Record,
};
use std::sync::Arc;

/// An entity type.
///
/// Implementors describe the entity through the declaration hooks
/// ([`fields`](Model::fields), [`mutators`](Model::mutators),
/// [`primary_key`](Model::primary_key)). The hooks run exactly once per
/// process, the first time the schema is needed; everything else reads the
/// cached [`schema::Model`].
///
/// ```
/// use brioche::{Fields, Model, Value};
///
/// struct User;
///
/// impl Model for User {
///     const NAME: &'static str = "users";
///
///     fn fields(fields: &mut Fields<'_>) {
///         fields.attr("id", Value::Null);
///         fields.attr("name", "John Doe");
///     }
/// }
///
/// let user = User::instantiate(None).unwrap();
/// assert_eq!(user.value("name"), Some(&Value::from("John Doe")));
/// ```
pub trait Model: Sized + 'static {
    /// Entity name, also the default table name.
    const NAME: &'static str;

    /// Declares the entity's fields. Declaring nothing is valid.
    fn fields(fields: &mut Fields<'_>) {
        let _ = fields;
    }

    /// Declares entity-level mutators.
    fn mutators(mutators: &mut Mutators<'_>) {
        let _ = mutators;
    }

    /// The field(s) identifying a record. Defaults to `id`.
    fn primary_key() -> PrimaryKey {
        PrimaryKey::default()
    }

    /// Attribute kinds the field declarations may reference.
    fn attribute_kinds() -> AttributeKinds {
        AttributeKinds::builtin()
    }

    /// The cached schema, constructed on first call.
    fn schema() -> Result<Arc<schema::Model>> {
        registry::schema::<Self>()
    }

    /// Lazy reference used by other models to relate to this one.
    fn model_ref() -> ModelRef {
        ModelRef::new(Self::NAME, Self::schema)
    }

    /// Resolves an attribute-kind identifier to its constructor.
    fn attribute_kind(kind: &str) -> Result<AttributeCtor> {
        Self::attribute_kinds().resolve(Self::NAME, kind)
    }

    /// Name of the conventional single-field identity, `id`.
    fn local_key() -> &'static str {
        LOCAL_KEY
    }

    /// Instantiates a record from raw input.
    fn instantiate(input: Option<&Value>) -> Result<Record> {
        Record::instantiate(Self::schema()?, input)
    }

    /// Instantiates a record from JSON input.
    fn from_json(input: serde_json::Value) -> Result<Record> {
        Self::instantiate(Some(&Value::from(input)))
    }

    /// Computes the primary key value of raw or instantiated data.
    fn compute_id(data: &(impl KeySource + ?Sized)) -> Result<Value> {
        Ok(Self::schema()?.compute_id(data))
    }
}
