pub mod db;
pub use db::Db;

mod fields;
pub use fields::{Fields, Mutators};

mod model;
pub use model::Model;

mod registry;

pub mod driver {
    pub use brioche_core::driver::*;
}

pub mod schema {
    pub use brioche_core::schema::*;
}

pub mod stmt {
    pub use brioche_core::stmt::*;
}

pub use brioche_core::{
    bail, err,
    record::{FieldValue, Record},
    stmt::{Value, ValueMap},
    Error, Result,
};
