use crate::{Fields, Model, Mutators, Result};

use brioche_core::schema;
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

/// Process-wide schema cache, keyed by model type.
static SCHEMAS: OnceLock<RwLock<HashMap<TypeId, Arc<Slot>>>> = OnceLock::new();

/// Write-once cache entry for a single model type: the schema, or the error
/// its declaration produced.
#[derive(Default)]
struct Slot {
    model: OnceLock<Result<Arc<schema::Model>>>,
}

/// Returns the schema for `M`, running its declaration hooks on first use.
///
/// The hooks run at most once per process, even when many threads ask at the
/// same time. A failed declaration is cached too: every later call returns
/// the same error without declaring again.
pub(crate) fn schema<M: Model>() -> Result<Arc<schema::Model>> {
    slot::<M>()
        .model
        .get_or_init(|| {
            let model = declare::<M>().map(Arc::new);
            match &model {
                Ok(model) => {
                    tracing::debug!(model = M::NAME, fields = model.fields.len(), "schema cached")
                }
                Err(err) => tracing::warn!(model = M::NAME, %err, "schema declaration failed"),
            }
            model
        })
        .clone()
}

fn slot<M: Model>() -> Arc<Slot> {
    let schemas = SCHEMAS.get_or_init(Default::default);
    let type_id = TypeId::of::<M>();

    if let Some(slot) = schemas
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&type_id)
    {
        return slot.clone();
    }

    schemas
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(type_id)
        .or_default()
        .clone()
}

fn declare<M: Model>() -> Result<schema::Model> {
    tracing::debug!(model = M::NAME, "declaring schema");

    let mut builder = schema::Builder::new(M::NAME);
    builder.primary_key(M::primary_key());
    M::fields(&mut Fields::new(&mut builder));
    M::mutators(&mut Mutators::new(&mut builder));
    builder.build(&M::attribute_kinds())
}
