use super::{AttributeArgs, AttributeKinds, Field, Model, ModelRef, Mutator, PrimaryKey};
use crate::{stmt::Value, Error, Result};

use indexmap::IndexMap;

/// Collects a model's declarations and turns them into a [`Model`].
///
/// Field kinds are recorded by identifier and only resolved against an
/// [`AttributeKinds`] registry in [`Builder::build`].
#[derive(Debug)]
pub struct Builder {
    name: String,
    primary_key: PrimaryKey,
    fields: Vec<FieldDecl>,
    mutators: IndexMap<String, Mutator>,
}

/// One field declaration, prior to kind resolution.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub kind: String,
    pub args: AttributeArgs,
    pub mutator: Option<Mutator>,
}

impl Builder {
    pub fn new(name: impl Into<String>) -> Builder {
        Builder {
            name: name.into(),
            primary_key: PrimaryKey::default(),
            fields: vec![],
            mutators: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&mut self, primary_key: impl Into<PrimaryKey>) -> &mut Self {
        self.primary_key = primary_key.into();
        self
    }

    /// Declares a field of an arbitrary kind.
    pub fn field(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        args: AttributeArgs,
    ) -> &mut FieldDecl {
        self.fields.push(FieldDecl {
            name: name.into(),
            kind: kind.into(),
            args,
            mutator: None,
        });
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }

    /// Declares a plain attribute.
    pub fn attr(&mut self, name: impl Into<String>, default: impl Into<Value>) -> &mut FieldDecl {
        self.field(
            name,
            AttributeKinds::ATTR,
            AttributeArgs {
                default: default.into(),
                ..Default::default()
            },
        )
    }

    /// Declares a to-one relation owned by the related model.
    pub fn has_one(
        &mut self,
        name: impl Into<String>,
        target: ModelRef,
        foreign_key: impl Into<String>,
    ) -> &mut FieldDecl {
        self.relation(name, AttributeKinds::HAS_ONE, target, foreign_key)
    }

    /// Declares a to-one relation owned by this model.
    pub fn belongs_to(
        &mut self,
        name: impl Into<String>,
        target: ModelRef,
        foreign_key: impl Into<String>,
    ) -> &mut FieldDecl {
        self.relation(name, AttributeKinds::BELONGS_TO, target, foreign_key)
    }

    /// Declares a to-many relation.
    pub fn has_many(
        &mut self,
        name: impl Into<String>,
        target: ModelRef,
        foreign_key: impl Into<String>,
    ) -> &mut FieldDecl {
        self.relation(name, AttributeKinds::HAS_MANY, target, foreign_key)
    }

    fn relation(
        &mut self,
        name: impl Into<String>,
        kind: &str,
        target: ModelRef,
        foreign_key: impl Into<String>,
    ) -> &mut FieldDecl {
        self.field(
            name,
            kind,
            AttributeArgs {
                target: Some(target),
                foreign_key: Some(foreign_key.into()),
                ..Default::default()
            },
        )
    }

    /// Registers an entity-level mutator for `field`.
    pub fn mutator(&mut self, field: impl Into<String>, mutator: Mutator) -> &mut Self {
        self.mutators.insert(field.into(), mutator);
        self
    }

    /// Resolves every declaration against `kinds` and verifies the result.
    pub fn build(self, kinds: &AttributeKinds) -> Result<Model> {
        let mut fields = IndexMap::with_capacity(self.fields.len());

        for decl in self.fields {
            let ctor = kinds.resolve(&self.name, &decl.kind)?;
            let ty = ctor(&decl.args).map_err(|err| {
                err.context(Error::invalid_schema(format!(
                    "field `{}` on `{}`",
                    decl.name, self.name
                )))
            })?;

            if fields.contains_key(&decl.name) {
                return Err(Error::invalid_schema(format!(
                    "field `{}` is declared more than once on `{}`",
                    decl.name, self.name
                )));
            }

            fields.insert(
                decl.name.clone(),
                Field {
                    name: decl.name,
                    ty,
                    mutator: decl.mutator,
                },
            );
        }

        // A model with nothing declared has nothing to identify
        if !fields.is_empty() {
            for pk_field in self.primary_key.fields() {
                if !fields.contains_key(pk_field) {
                    return Err(Error::invalid_schema(format!(
                        "primary key field `{}` is not declared on `{}`",
                        pk_field, self.name
                    )));
                }
            }
        }

        for field in self.mutators.keys() {
            if !fields.contains_key(field) {
                tracing::debug!(model = %self.name, field = %field, "mutator registered for undeclared field");
            }
        }

        Ok(Model {
            name: self.name,
            primary_key: self.primary_key,
            fields,
            mutators: self.mutators,
        })
    }
}

impl FieldDecl {
    /// Attaches a mutator to this field declaration.
    pub fn mutator(&mut self, mutator: Mutator) -> &mut Self {
        self.mutator = Some(mutator);
        self
    }

    /// Attaches an infallible mutation function to this field declaration.
    pub fn mutate(&mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> &mut Self {
        self.mutator(Mutator::map(f))
    }
}
