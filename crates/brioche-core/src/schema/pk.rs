use crate::stmt::{Value, ValueMap};

/// Separator placed between the segments of a composite key.
const COMPOSITE_SEPARATOR: &str = "_";

/// The field(s) identifying a record of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryKey {
    /// One field; its value is the key, unconverted.
    Single(String),

    /// Several fields; the key is their values joined with `_`, in the order
    /// listed here.
    Composite(Vec<String>),
}

/// Read access to the fields a primary key is computed from.
///
/// Implemented for raw data as well as instantiated records, so keys can be
/// computed before anything is instantiated.
pub trait KeySource {
    fn key_value(&self, field: &str) -> Option<&Value>;
}

impl PrimaryKey {
    pub fn single(field: impl Into<String>) -> PrimaryKey {
        PrimaryKey::Single(field.into())
    }

    pub fn composite<I, S>(fields: I) -> PrimaryKey
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PrimaryKey::Composite(fields.into_iter().map(Into::into).collect())
    }

    /// Iterate over the key's field names in declared order.
    pub fn fields(&self) -> impl Iterator<Item = &str> + '_ {
        let fields: &[String] = match self {
            PrimaryKey::Single(field) => std::slice::from_ref(field),
            PrimaryKey::Composite(fields) => fields,
        };
        fields.iter().map(String::as_str)
    }

    /// Computes the key value from `data`.
    ///
    /// Missing fields read as `Null`.
    pub fn compute(&self, data: &(impl KeySource + ?Sized)) -> Value {
        match self {
            PrimaryKey::Single(field) => data.key_value(field).cloned().unwrap_or_default(),
            PrimaryKey::Composite(fields) => {
                let segments: Vec<String> = fields
                    .iter()
                    .map(|field| key_segment(data.key_value(field)))
                    .collect();
                Value::String(segments.join(COMPOSITE_SEPARATOR))
            }
        }
    }
}

impl Default for PrimaryKey {
    fn default() -> Self {
        PrimaryKey::single(super::LOCAL_KEY)
    }
}

impl From<&str> for PrimaryKey {
    fn from(field: &str) -> Self {
        PrimaryKey::single(field)
    }
}

impl From<String> for PrimaryKey {
    fn from(field: String) -> Self {
        PrimaryKey::single(field)
    }
}

impl<const N: usize> From<[&str; N]> for PrimaryKey {
    fn from(fields: [&str; N]) -> Self {
        PrimaryKey::composite(fields)
    }
}

impl From<Vec<String>> for PrimaryKey {
    fn from(fields: Vec<String>) -> Self {
        PrimaryKey::Composite(fields)
    }
}

fn key_segment(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(v)) => v.clone(),
        Some(Value::I64(v)) => v.to_string(),
        Some(Value::U64(v)) => v.to_string(),
        Some(Value::F64(v)) => v.to_string(),
        Some(Value::Bool(v)) => v.to_string(),
        Some(value @ (Value::List(_) | Value::Map(_))) => value.to_json().to_string(),
    }
}

impl KeySource for ValueMap {
    fn key_value(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

impl KeySource for Value {
    fn key_value(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

impl<T: KeySource + ?Sized> KeySource for &T {
    fn key_value(&self, field: &str) -> Option<&Value> {
        (**self).key_value(field)
    }
}
