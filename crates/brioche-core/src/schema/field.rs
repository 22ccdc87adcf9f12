use super::ModelRef;
use crate::{stmt::Value, Result};

use std::{fmt, sync::Arc};

/// Attribute descriptor for one declared field.
#[derive(Debug, Clone)]
pub struct Field {
    /// The field name, unique within the containing model.
    pub name: String,

    /// Plain value, to-one relation or to-many relation.
    pub ty: FieldTy,

    /// Mutator attached directly to the field declaration.
    ///
    /// Only consulted for [`FieldTy::Plain`] fields, and always takes
    /// precedence over an entity-level mutator registered for the same name.
    pub mutator: Option<Mutator>,
}

#[derive(Clone)]
pub enum FieldTy {
    Plain(Plain),
    ToOne(ToOne),
    ToMany(ToMany),
}

/// A plain attribute holding primitive or opaque data.
#[derive(Debug, Clone, Default)]
pub struct Plain {
    /// Value used when the raw input has no entry for the field.
    pub default: Value,
}

/// A relation to at most one record of another model.
#[derive(Debug, Clone)]
pub struct ToOne {
    /// Model of the related record.
    pub target: ModelRef,

    /// Field wiring the two models together.
    pub foreign_key: String,
}

/// A relation to an ordered sequence of records of another model.
#[derive(Debug, Clone)]
pub struct ToMany {
    /// Model of the related records.
    pub target: ModelRef,

    /// Field on the related model pointing back at the owner.
    pub foreign_key: String,
}

/// A function from a raw value to the value stored on a record.
///
/// Mutator failures are returned to the caller of instantiation unchanged.
#[derive(Clone)]
pub struct Mutator(Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>);

impl Field {
    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the type.
    pub fn ty(&self) -> &FieldTy {
        &self.ty
    }

    pub fn is_relation(&self) -> bool {
        self.ty.is_relation()
    }

    /// If the field is a relation, return the relation's target model.
    pub fn relation_target(&self) -> Option<&ModelRef> {
        match &self.ty {
            FieldTy::Plain(_) => None,
            FieldTy::ToOne(to_one) => Some(&to_one.target),
            FieldTy::ToMany(to_many) => Some(&to_many.target),
        }
    }
}

impl FieldTy {
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain(..))
    }

    pub fn as_plain(&self) -> Option<&Plain> {
        match self {
            Self::Plain(plain) => Some(plain),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_plain(&self) -> &Plain {
        match self {
            Self::Plain(plain) => plain,
            _ => panic!("expected plain field, but was {self:?}"),
        }
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Self::ToOne(..) | Self::ToMany(..))
    }

    pub fn is_to_one(&self) -> bool {
        matches!(self, Self::ToOne(..))
    }

    pub fn as_to_one(&self) -> Option<&ToOne> {
        match self {
            Self::ToOne(to_one) => Some(to_one),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_to_one(&self) -> &ToOne {
        match self {
            Self::ToOne(to_one) => to_one,
            _ => panic!("expected field to be `ToOne`, but was {self:?}"),
        }
    }

    pub fn is_to_many(&self) -> bool {
        matches!(self, Self::ToMany(..))
    }

    pub fn as_to_many(&self) -> Option<&ToMany> {
        match self {
            Self::ToMany(to_many) => Some(to_many),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_to_many(&self) -> &ToMany {
        match self {
            Self::ToMany(to_many) => to_many,
            _ => panic!("expected field to be `ToMany`, but was {self:?}"),
        }
    }
}

impl fmt::Debug for FieldTy {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(ty) => ty.fmt(fmt),
            Self::ToOne(ty) => ty.fmt(fmt),
            Self::ToMany(ty) => ty.fmt(fmt),
        }
    }
}

impl From<Plain> for FieldTy {
    fn from(value: Plain) -> Self {
        Self::Plain(value)
    }
}

impl From<ToOne> for FieldTy {
    fn from(value: ToOne) -> Self {
        Self::ToOne(value)
    }
}

impl From<ToMany> for FieldTy {
    fn from(value: ToMany) -> Self {
        Self::ToMany(value)
    }
}

impl Mutator {
    /// Wraps a fallible mutation function.
    pub fn new(f: impl Fn(Value) -> Result<Value> + Send + Sync + 'static) -> Mutator {
        Mutator(Arc::new(f))
    }

    /// Wraps a mutation function that cannot fail.
    pub fn map(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Mutator {
        Mutator(Arc::new(move |value| Ok(f(value))))
    }

    pub fn apply(&self, value: Value) -> Result<Value> {
        (self.0)(value)
    }
}

impl fmt::Debug for Mutator {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str("Mutator(..)")
    }
}
