use super::Model;
use crate::Result;

use std::{fmt, sync::Arc};

/// A lazy handle to another model's schema.
///
/// Relations hold a `ModelRef` instead of the related schema itself, so a
/// model can relate to itself (or to a model that relates back) without
/// constructing schemas recursively. The target is only loaded when nested
/// data actually needs instantiating.
#[derive(Clone, Copy)]
pub struct ModelRef {
    name: &'static str,
    load: fn() -> Result<Arc<Model>>,
}

impl ModelRef {
    pub const fn new(name: &'static str, load: fn() -> Result<Arc<Model>>) -> ModelRef {
        ModelRef { name, load }
    }

    /// Entity name of the target model.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the target's schema, constructing it on first use.
    pub fn load(&self) -> Result<Arc<Model>> {
        (self.load)()
    }
}

impl PartialEq for ModelRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelRef({})", self.name)
    }
}
