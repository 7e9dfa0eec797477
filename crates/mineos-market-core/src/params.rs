//! Form parameter flattening.
//!
//! Request parameters are built as serde structs, serialized into a JSON
//! object and then flattened into the bracketed key convention the service
//! reads from `application/x-www-form-urlencoded` bodies:
//!
//! ```text
//! { "dependencies": [{ "path": "A.lua" }] }  ->  dependencies[0][path]=A.lua
//! ```
//!
//! `null` leaves are dropped at every depth and every retained leaf is
//! rendered as a string.

use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered flat key/value pairs ready for form encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams(Vec<(String, String)>);

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair, replacing an earlier value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Percent-encoded `key=value&...` body.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.insert(key, value);
        }
        params
    }
}

/// Flatten a parameter object into bracket-keyed string pairs.
pub fn flatten(params: &Map<String, Value>) -> FormParams {
    let mut flat = FormParams::new();
    for (key, value) in params {
        flatten_into(&mut flat, key.clone(), value);
    }
    flat
}

/// Serialize `params` and flatten the resulting object.
///
/// Unit-like parameter sets (`()` or `None`) yield no pairs; anything that
/// does not serialize into an object is rejected.
pub fn flatten_serialize<T: Serialize + ?Sized>(
    params: &T,
) -> Result<FormParams, serde_json::Error> {
    match serde_json::to_value(params)? {
        Value::Object(object) => Ok(flatten(&object)),
        Value::Null => Ok(FormParams::new()),
        other => Err(serde::ser::Error::custom(format!(
            "request parameters must serialize to an object, got {}",
            json_kind(&other)
        ))),
    }
}

fn flatten_into(flat: &mut FormParams, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => flat.insert(key, flag.to_string()),
        Value::Number(number) => flat.insert(key, number.to_string()),
        Value::String(text) => flat.insert(key, text.as_str()),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(flat, format!("{key}[{index}]"), item);
            }
        }
        Value::Object(entries) => {
            for (child, item) in entries {
                flatten_into(flat, format!("{key}[{child}]"), item);
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(object) => object,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn flattens_sequences_of_objects_with_zero_based_indices() {
        let flat = flatten(&object(json!({
            "dependencies": [{ "path": "A.lua" }, { "path": "B.lua" }]
        })));

        assert_eq!(flat.len(), 2);
        assert_eq!(flat.get("dependencies[0][path]"), Some("A.lua"));
        assert_eq!(flat.get("dependencies[1][path]"), Some("B.lua"));
    }

    #[test]
    fn drops_null_leaves_at_any_depth() {
        let flat = flatten(&object(json!({
            "search": null,
            "count": 10,
            "filter": { "user_name": null, "category_id": 2 },
            "file_ids": [1, null, 3]
        })));

        let mut pairs = flat.iter().collect::<Vec<_>>();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("count", "10"),
                ("file_ids[0]", "1"),
                ("file_ids[2]", "3"),
                ("filter[category_id]", "2"),
            ]
        );
        assert!(!flat.contains_key("search"));
        assert!(!flat.contains_key("filter[user_name]"));
    }

    #[test]
    fn stringifies_scalars() {
        let flat = flatten(&object(json!({
            "flag": true,
            "ratio": 0.5,
            "name": "x y"
        })));

        assert_eq!(flat.get("flag"), Some("true"));
        assert_eq!(flat.get("ratio"), Some("0.5"));
        assert_eq!(flat.get("name"), Some("x y"));
    }

    #[test]
    fn empty_containers_emit_nothing() {
        let flat = flatten(&object(json!({ "a": [], "b": {} })));
        assert!(flat.is_empty());
    }

    #[test]
    fn encodes_brackets_and_spaces() {
        let flat: FormParams = [("dependencies[0][path]", "Main file.lua"), ("token", "a&b")]
            .into_iter()
            .collect();

        assert_eq!(
            flat.encode(),
            "dependencies%5B0%5D%5Bpath%5D=Main%20file.lua&token=a%26b"
        );
    }

    #[test]
    fn serializes_structs_and_skips_absent_options() {
        #[derive(Serialize)]
        struct Params<'a> {
            file_id: u64,
            search: Option<&'a str>,
        }

        let flat = flatten_serialize(&Params {
            file_id: 7,
            search: None,
        })
        .expect("object params");
        assert_eq!(flat.iter().collect::<Vec<_>>(), vec![("file_id", "7")]);

        assert!(flatten_serialize(&()).expect("unit params").is_empty());
        assert!(flatten_serialize(&5).is_err());
    }

    #[test]
    fn insert_replaces_existing_key() {
        let mut flat = FormParams::new();
        flat.insert("token", "old");
        flat.insert("token", "new");
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.get("token"), Some("new"));
    }
}
