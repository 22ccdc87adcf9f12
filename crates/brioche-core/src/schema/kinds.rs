use super::{FieldTy, ModelRef, Plain, ToMany, ToOne};
use crate::{stmt::Value, Error, Result};

use indexmap::IndexMap;
use std::fmt;

/// Builds a field type from the arguments given at declaration time.
pub type AttributeCtor = fn(&AttributeArgs) -> Result<FieldTy>;

/// Arguments passed to an [`AttributeCtor`].
#[derive(Debug, Clone, Default)]
pub struct AttributeArgs {
    /// Default for plain attributes.
    pub default: Value,

    /// Related model, required by relation kinds.
    pub target: Option<ModelRef>,

    /// Foreign key field, required by relation kinds.
    pub foreign_key: Option<String>,
}

/// Maps attribute-kind identifiers to their constructors.
///
/// The built-in kinds are always registered:
///
/// | kind         | field type |
/// |--------------|------------|
/// | `attr`       | plain      |
/// | `has_one`    | to-one     |
/// | `belongs_to` | to-one     |
/// | `has_many`   | to-many    |
#[derive(Clone)]
pub struct AttributeKinds {
    ctors: IndexMap<String, AttributeCtor>,
}

impl AttributeKinds {
    pub const ATTR: &'static str = "attr";
    pub const HAS_ONE: &'static str = "has_one";
    pub const BELONGS_TO: &'static str = "belongs_to";
    pub const HAS_MANY: &'static str = "has_many";

    /// Registry holding only the built-in kinds.
    pub fn builtin() -> AttributeKinds {
        let mut kinds = AttributeKinds {
            ctors: IndexMap::new(),
        };
        kinds
            .register(Self::ATTR, attr)
            .register(Self::HAS_ONE, to_one)
            .register(Self::BELONGS_TO, to_one)
            .register(Self::HAS_MANY, to_many);
        kinds
    }

    /// Registers `ctor` under `kind`, replacing any previous constructor.
    pub fn register(&mut self, kind: impl Into<String>, ctor: AttributeCtor) -> &mut Self {
        self.ctors.insert(kind.into(), ctor);
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.ctors.contains_key(kind)
    }

    pub fn lookup(&self, kind: &str) -> Option<AttributeCtor> {
        self.ctors.get(kind).copied()
    }

    /// Resolves `kind` for a field of `model`.
    pub fn resolve(&self, model: &str, kind: &str) -> Result<AttributeCtor> {
        self.lookup(kind)
            .ok_or_else(|| Error::unknown_attribute_kind(model, kind))
    }

    /// Registered identifiers, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> + '_ {
        self.ctors.keys().map(String::as_str)
    }
}

impl Default for AttributeKinds {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for AttributeKinds {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_set().entries(self.kinds()).finish()
    }
}

fn attr(args: &AttributeArgs) -> Result<FieldTy> {
    Ok(Plain {
        default: args.default.clone(),
    }
    .into())
}

fn relation_args(args: &AttributeArgs) -> Result<(ModelRef, String)> {
    let Some(target) = args.target else {
        return Err(Error::invalid_schema("relation declared without a related model"));
    };
    let Some(foreign_key) = args.foreign_key.clone() else {
        return Err(Error::invalid_schema(format!(
            "relation to `{}` declared without a foreign key",
            target.name()
        )));
    };
    Ok((target, foreign_key))
}

fn to_one(args: &AttributeArgs) -> Result<FieldTy> {
    let (target, foreign_key) = relation_args(args)?;
    Ok(ToOne {
        target,
        foreign_key,
    }
    .into())
}

fn to_many(args: &AttributeArgs) -> Result<FieldTy> {
    let (target, foreign_key) = relation_args(args)?;
    Ok(ToMany {
        target,
        foreign_key,
    }
    .into())
}
