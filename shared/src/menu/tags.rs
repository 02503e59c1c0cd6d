//! Allergen tag normalization
//!
//! Tag lists reach us in every shape the old data ever took: canonical JSON
//! arrays, arrays that were stringified twice, bare strings, array-like
//! objects and nulls. They are decoded once into [`RawTags`] at the storage or
//! request boundary and [`RawTags::normalize`] turns any of them into an
//! ordered, deduplicated `Vec<String>`. Normalization never fails; input that
//! cannot be parsed is kept as a single literal tag.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// A tag list as found in storage or in a request body, before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum RawTags {
    /// Null, absent column or absent field
    Missing,
    /// A native sequence
    List(Vec<Value>),
    /// A string that may hold JSON, double-encoded JSON or a bare literal
    Text(String),
    /// A map, either array-like (numeric `length`) or a plain object
    Object(Map<String, Value>),
}

impl RawTags {
    /// Decode an arbitrary JSON value
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Missing,
            Value::Array(items) => Self::List(items),
            Value::String(text) => Self::Text(text),
            Value::Object(map) => Self::Object(map),
            scalar @ (Value::Bool(_) | Value::Number(_)) => Self::List(vec![scalar]),
        }
    }

    /// Decode a TEXT column
    pub fn from_column(raw: Option<&str>) -> Self {
        match raw {
            Some(text) => Self::Text(text.to_string()),
            None => Self::Missing,
        }
    }

    /// Produce the canonical tag list
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Self::Missing => Vec::new(),
            Self::List(items) => collect_items(items),
            Self::Text(text) => normalize_text(text),
            Self::Object(map) => object_items(map),
        }
    }

    /// Like [`normalize`](Self::normalize), but only for input that really
    /// is a sequence (a native list, text that parses to a JSON array, or an
    /// array-like object). Everything else yields `None`.
    pub fn strict_sequence(&self) -> Option<Vec<String>> {
        match self {
            Self::List(items) => Some(collect_items(items)),
            Self::Text(text) => {
                let trimmed = text.trim();
                match parse_json(&unwrap_double_encoded(trimmed))? {
                    Value::Array(items) => Some(collect_items(&items)),
                    Value::Object(map) if array_length(&map).is_some() => {
                        Some(object_items(&map))
                    }
                    _ => None,
                }
            }
            Self::Object(map) if array_length(map).is_some() => Some(object_items(map)),
            Self::Object(_) | Self::Missing => None,
        }
    }
}

impl From<Vec<String>> for RawTags {
    fn from(tags: Vec<String>) -> Self {
        Self::List(tags.into_iter().map(Value::String).collect())
    }
}

impl<'de> Deserialize<'de> for RawTags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Normalize a TEXT column straight to tags
pub fn normalize_column(raw: Option<&str>) -> Vec<String> {
    RawTags::from_column(raw).normalize()
}

/// Serialize tags to the canonical stored form, a JSON array
pub fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

/// Merge `extra` into `tags`, keeping first-seen order
pub fn union_tags(tags: &mut Vec<String>, extra: &[String]) {
    for tag in extra {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
}

/// `deserialize_with` helpers that normalize tag fields in request bodies
pub mod tag_list {
    use super::RawTags;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawTags::deserialize(deserializer).map(|raw| raw.normalize())
    }

    /// For partial updates: absent stays `None` (pair with `#[serde(default)]`),
    /// an explicit null clears the list
    pub mod optional {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            RawTags::deserialize(deserializer).map(|raw| Some(raw.normalize()))
        }
    }
}

fn normalize_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    match parse_json(&unwrap_double_encoded(trimmed)) {
        Some(Value::Array(items)) => collect_items(&items),
        Some(Value::Object(map)) => object_items(&map),
        Some(Value::Null) => Vec::new(),
        Some(scalar) => collect_items(std::slice::from_ref(&scalar)),
        None => vec![text.to_string()],
    }
}

/// Strip one layer of quoting from text like `"[\"fish\"]"`
fn unwrap_double_encoded(trimmed: &str) -> Cow<'_, str> {
    let quoted = trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"');
    if !quoted || !trimmed.contains('[') {
        return Cow::Borrowed(trimmed);
    }

    match serde_json::from_str::<String>(trimmed) {
        Ok(inner) => Cow::Owned(inner),
        Err(_) => Cow::Owned(trimmed[1..trimmed.len() - 1].replace("\\\"", "\"")),
    }
}

fn parse_json(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

fn array_length(map: &Map<String, Value>) -> Option<usize> {
    map.get("length")
        .and_then(Value::as_u64)
        .map(|len| (len as usize).min(map.len()))
}

fn object_items(map: &Map<String, Value>) -> Vec<String> {
    match array_length(map) {
        Some(len) => {
            let items: Vec<Value> = (0..len)
                .filter_map(|index| map.get(&index.to_string()).cloned())
                .collect();
            collect_items(&items)
        }
        None => {
            let strings: Vec<Value> = map
                .values()
                .filter(|value| value.is_string())
                .cloned()
                .collect();
            collect_items(&strings)
        }
    }
}

fn collect_items(items: &[Value]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let tag = match item {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => continue,
        };
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(raw: &str) -> Vec<String> {
        RawTags::Text(raw.to_string()).normalize()
    }

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn canonical_json_array_is_parsed() {
        assert_eq!(text(r#"["dairy","gluten"]"#), tags(&["dairy", "gluten"]));
        assert_eq!(text(r#"  ["dairy", "gluten"]  "#), tags(&["dairy", "gluten"]));
    }

    #[test]
    fn valid_json_arrays_match_serde() {
        let samples = [
            r#"[]"#,
            r#"["fish"]"#,
            r#"["nuts","peanuts","sesame"]"#,
            r#"["mozzarella-käse","ost"]"#,
            r#"[""]"#,
            r#"[" "]"#,
            r#"["", " x"]"#,
        ];
        for sample in samples {
            let expected: Vec<String> = serde_json::from_str(sample).unwrap();
            assert_eq!(text(sample), expected, "sample {sample}");
        }
    }

    #[test]
    fn double_encoded_array_is_unwrapped() {
        assert_eq!(text(r#""[\"fish\"]""#), tags(&["fish"]));
        assert_eq!(
            text(r#""[\"dairy\",\"eggs\"]""#),
            tags(&["dairy", "eggs"])
        );
    }

    #[test]
    fn double_encoded_with_unescaped_inner_quotes() {
        assert_eq!(text(r#""["fish","soy"]""#), tags(&["fish", "soy"]));
    }

    #[test]
    fn empty_inputs_give_empty_list() {
        assert!(RawTags::Missing.normalize().is_empty());
        assert!(RawTags::from_column(None).normalize().is_empty());
        assert!(text("").is_empty());
        assert!(text("   ").is_empty());
        assert!(text("null").is_empty());
        assert!(RawTags::from_value(Value::Null).normalize().is_empty());
    }

    #[test]
    fn non_json_text_is_kept_literally() {
        assert_eq!(text("not json"), tags(&["not json"]));
        assert_eq!(text("  not json  "), tags(&["  not json  "]));
        assert_eq!(text("[broken"), tags(&["[broken"]));
    }

    #[test]
    fn json_scalars_are_wrapped() {
        assert_eq!(text(r#""fish""#), tags(&["fish"]));
        assert_eq!(text("42"), tags(&["42"]));
    }

    #[test]
    fn native_list_is_kept_in_order_and_deduplicated() {
        let raw = RawTags::from_value(json!(["soy", "fish", "soy", null, ["x"], 7]));
        assert_eq!(raw.normalize(), tags(&["soy", "fish", "7"]));
    }

    #[test]
    fn array_like_object_is_read_positionally() {
        let raw = RawTags::from_value(json!({"1": "gluten", "0": "dairy", "length": 2}));
        assert_eq!(raw.normalize(), tags(&["dairy", "gluten"]));
    }

    #[test]
    fn array_like_object_length_is_clamped() {
        let raw = RawTags::from_value(json!({"0": "dairy", "length": 1_000_000_000u64}));
        assert_eq!(raw.normalize(), tags(&["dairy"]));
    }

    #[test]
    fn plain_object_keeps_only_string_values() {
        let raw = RawTags::from_value(json!({"a": "fish", "b": 3, "c": null, "d": "soy"}));
        let mut out = raw.normalize();
        out.sort();
        assert_eq!(out, tags(&["fish", "soy"]));
    }

    #[test]
    fn object_inside_text_uses_object_rules() {
        assert_eq!(text(r#"{"0":"eggs","length":1}"#), tags(&["eggs"]));
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = vec![
            RawTags::Missing,
            RawTags::Text(r#"["dairy","gluten","dairy"]"#.into()),
            RawTags::Text(r#""[\"fish\"]""#.into()),
            RawTags::Text("not json".into()),
            RawTags::Text("  padded literal ".into()),
            RawTags::Text(r#"["", " "]"#.into()),
            RawTags::Text(String::new()),
            RawTags::from_value(json!({"0": "soy", "length": 1})),
            RawTags::from_value(json!({"x": "nuts"})),
            RawTags::from_value(json!(["a", "b", "a"])),
        ];
        for input in inputs {
            let once = input.normalize();
            let twice = RawTags::from(once.clone()).normalize();
            assert_eq!(once, twice, "input {input:?}");
        }
    }

    #[test]
    fn strict_sequence_rejects_non_sequences() {
        assert_eq!(RawTags::Missing.strict_sequence(), None);
        assert_eq!(RawTags::Text("not json".into()).strict_sequence(), None);
        assert_eq!(RawTags::Text("\"en\"".into()).strict_sequence(), None);
        assert_eq!(
            RawTags::from_value(json!({"en": "yes"})).strict_sequence(),
            None
        );
        assert_eq!(
            RawTags::Text(r#""[\"sv\"]""#.into()).strict_sequence(),
            Some(tags(&["sv"]))
        );
        assert_eq!(RawTags::Text("[]".into()).strict_sequence(), Some(vec![]));
    }

    #[test]
    fn encode_tags_writes_json_array() {
        assert_eq!(encode_tags(&tags(&["dairy", "eggs"])), r#"["dairy","eggs"]"#);
        assert_eq!(encode_tags(&[]), "[]");
        assert_eq!(normalize_column(Some(&encode_tags(&tags(&["x"])))), tags(&["x"]));
    }

    #[test]
    fn union_keeps_first_seen_order() {
        let mut current = tags(&["fish", "dairy"]);
        union_tags(&mut current, &tags(&["gluten", "fish"]));
        assert_eq!(current, tags(&["fish", "dairy", "gluten"]));
    }

    #[derive(Deserialize)]
    struct Payload {
        #[serde(deserialize_with = "tag_list::deserialize")]
        allergen_tags: Vec<String>,
        #[serde(default, deserialize_with = "tag_list::optional::deserialize")]
        patch: Option<Vec<String>>,
    }

    #[test]
    fn tag_list_normalizes_request_fields() {
        let p: Payload =
            serde_json::from_str(r#"{"allergen_tags":"[\"fish\",\"fish\"]"}"#).unwrap();
        assert_eq!(p.allergen_tags, tags(&["fish"]));
        assert_eq!(p.patch, None);

        let p: Payload =
            serde_json::from_str(r#"{"allergen_tags":["soy"],"patch":null}"#).unwrap();
        assert_eq!(p.allergen_tags, tags(&["soy"]));
        assert_eq!(p.patch, Some(vec![]));
    }
}
