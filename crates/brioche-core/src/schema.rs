mod builder;
pub use builder::{Builder, FieldDecl};

mod field;
pub use field::{Field, FieldTy, Mutator, Plain, ToMany, ToOne};

mod kinds;
pub use kinds::{AttributeArgs, AttributeCtor, AttributeKinds};

mod model;
pub use model::{Model, LOCAL_KEY};

mod model_ref;
pub use model_ref::ModelRef;

mod pk;
pub use pk::{KeySource, PrimaryKey};
