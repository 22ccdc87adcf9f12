pub mod driver;
pub use driver::Driver;

mod error;
pub use error::Error;

pub mod record;
pub use record::Record;

pub mod schema;

pub mod stmt;

/// A Result type alias that uses Brioche's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
