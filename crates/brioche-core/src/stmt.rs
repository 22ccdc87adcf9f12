mod value;
pub use value::Value;

mod value_json;

mod value_map;
pub use value_map::ValueMap;
