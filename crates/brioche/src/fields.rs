use crate::Model;

use brioche_core::{
    schema::{AttributeArgs, Builder, FieldDecl, Mutator},
    stmt::Value,
    Result,
};

/// Field declarations of a model, handed to [`Model::fields`].
pub struct Fields<'a> {
    builder: &'a mut Builder,
}

/// Entity-level mutators of a model, handed to [`Model::mutators`].
pub struct Mutators<'a> {
    builder: &'a mut Builder,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(builder: &'a mut Builder) -> Fields<'a> {
        Fields { builder }
    }

    /// Declares a plain attribute with a default value.
    pub fn attr(&mut self, name: &str, default: impl Into<Value>) -> &mut FieldDecl {
        self.builder.attr(name, default)
    }

    /// Declares a to-one relation to `T`, keyed by `foreign_key` on `T`.
    pub fn has_one<T: Model>(&mut self, name: &str, foreign_key: &str) -> &mut FieldDecl {
        self.builder.has_one(name, T::model_ref(), foreign_key)
    }

    /// Declares a to-one relation to `T`, keyed by `foreign_key` on this model.
    pub fn belongs_to<T: Model>(&mut self, name: &str, foreign_key: &str) -> &mut FieldDecl {
        self.builder.belongs_to(name, T::model_ref(), foreign_key)
    }

    /// Declares a to-many relation to `T`, keyed by `foreign_key` on `T`.
    pub fn has_many<T: Model>(&mut self, name: &str, foreign_key: &str) -> &mut FieldDecl {
        self.builder.has_many(name, T::model_ref(), foreign_key)
    }

    /// Declares a field by attribute-kind identifier.
    ///
    /// The identifier is resolved when the schema is built; an identifier
    /// missing from [`Model::attribute_kinds`] fails schema construction.
    pub fn kind(&mut self, name: &str, kind: &str, args: AttributeArgs) -> &mut FieldDecl {
        self.builder.field(name, kind, args)
    }
}

impl<'a> Mutators<'a> {
    pub(crate) fn new(builder: &'a mut Builder) -> Mutators<'a> {
        Mutators { builder }
    }

    /// Registers a mutator for `field`.
    pub fn mutate(
        &mut self,
        field: &str,
        f: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> &mut Self {
        self.builder.mutator(field, Mutator::map(f));
        self
    }

    /// Registers a mutator for `field` that may fail.
    pub fn try_mutate(
        &mut self,
        field: &str,
        f: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
    ) -> &mut Self {
        self.builder.mutator(field, Mutator::new(f));
        self
    }
}
