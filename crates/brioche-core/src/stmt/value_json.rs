//! Bridge between [`Value`] and `serde_json`.

use super::{Value, ValueMap};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl From<serde_json::Value> for Value {
    fn from(src: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match src {
            Json::Null => Self::Null,
            Json::Bool(v) => Self::Bool(v),
            Json::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(v), _) => Self::I64(v),
                (None, Some(v)) => Self::U64(v),
                (None, None) => Self::F64(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(v) => Self::String(v),
            Json::Array(items) => Self::List(items.into_iter().map(Value::from).collect()),
            Json::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect::<ValueMap>(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(src: Value) -> Self {
        use serde_json::Value as Json;

        match src {
            Value::Null => Json::Null,
            Value::Bool(v) => Json::Bool(v),
            Value::I64(v) => Json::from(v),
            Value::U64(v) => Json::from(v),
            // Non-finite floats have no JSON form
            Value::F64(v) => serde_json::Number::from_f64(v)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(v) => Json::String(v),
            Value::List(items) => Json::Array(items.into_iter().map(Json::from).collect()),
            Value::Map(map) => Json::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Json::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Renders this value as a `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        self.clone().into()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(map) => serializer.collect_map(map.iter()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_bridge_preserves_shape() {
        let json = json!({
            "id": 1,
            "title": "Post Title",
            "score": 1.5,
            "draft": false,
            "tags": ["a", "b"],
            "author": null,
        });

        let value = Value::from(json.clone());
        assert_eq!(value.get("id"), Some(&Value::I64(1)));
        assert_eq!(value.get("score"), Some(&Value::F64(1.5)));
        assert_eq!(value.get("author"), Some(&Value::Null));
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn integers_beyond_i64_stay_exact() {
        let json = json!({"big": u64::MAX, "small": i64::MIN});

        let value = Value::from(json.clone());
        assert_eq!(value.get("big"), Some(&Value::U64(u64::MAX)));
        assert_eq!(value.get("small"), Some(&Value::I64(i64::MIN)));
        assert_eq!(value.to_json(), json);

        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"big":18446744073709551615,"small":-9223372036854775808}"#);
    }

    #[test]
    fn serde_through_json_text() {
        let value = Value::from(json!({"name": "Jane", "age": 32}));
        let text = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, value);
    }
}
