use super::{FieldDescriptor, TypeDescriptor};
use crate::error::MappingError;
use crate::types::WireType;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::BTreeMap;

// ─── TypeSpec ───────────────────────────────────────────────────────────────

/// Serializable description of a record type, for types registered from
/// configuration instead of code.
///
/// ```json
/// {
///   "name": "Tweet",
///   "annotations": { "cf": "Timeline", "key": "user", "cols": "ts" },
///   "fields": [
///     { "name": "user", "type": "UTF8Type" },
///     { "name": "ts",   "type": "LongType" },
///     { "name": "body", "type": "UTF8Type", "column": "b" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: SmolStr,
    #[serde(default)]
    pub annotations: BTreeMap<SmolStr, SmolStr>,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: SmolStr,
    /// Wire column name; the field name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<SmolStr>,
    #[serde(rename = "type")]
    pub wire_type: WireType,
}

impl TypeSpec {
    pub fn from_json(json: &str) -> Result<Self, MappingError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ─── DynRecord ──────────────────────────────────────────────────────────────

/// A record held as a name → value map, for types known only at runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynRecord {
    fields: BTreeMap<SmolStr, Value>,
}

impl DynRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Assign a field. Null removes the entry, so an absent field and a null
    /// one are the same record.
    pub fn set(&mut self, name: impl Into<SmolStr>, value: impl Into<Value>) {
        let name = name.into();
        match value.into() {
            Value::Null => {
                self.fields.remove(&name);
            }
            value => {
                self.fields.insert(name, value);
            }
        }
    }

    pub fn with(mut self, name: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build from a JSON object. Returns `None` for any other JSON value.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Object(map) => Some(
                map.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), Value::from(v)))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone().into()))
                .collect(),
        )
    }
}

impl<K: Into<SmolStr>, V: Into<Value>> FromIterator<(K, V)> for DynRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.set(name, value);
        }
        record
    }
}

impl TypeDescriptor<DynRecord> {
    /// Descriptor whose accessors read and write the map entry named after each field.
    ///
    /// A field missing from the record reads as null.
    pub fn from_spec(spec: &TypeSpec) -> Result<Self, MappingError> {
        let mut builder = Self::builder(spec.name.clone());
        for (key, value) in &spec.annotations {
            builder = builder.annotate(key.clone(), value.clone());
        }
        for field in &spec.fields {
            let read_name = field.name.clone();
            let write_name = field.name.clone();
            let mut descriptor = FieldDescriptor::new(
                field.name.clone(),
                field.wire_type,
                move |record: &DynRecord| record.get(&read_name).cloned().unwrap_or_default(),
                move |record: &mut DynRecord, value| {
                    record.set(write_name.clone(), value);
                    Ok(())
                },
            );
            if let Some(column) = &field.column {
                descriptor = descriptor.with_column(column.clone());
            }
            builder = builder.field(descriptor);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWEET: &str = r#"{
        "name": "Tweet",
        "annotations": { "cf": "Timeline", "key": "user", "cols": "ts" },
        "fields": [
            { "name": "user", "type": "UTF8Type" },
            { "name": "ts", "type": "org.apache.cassandra.db.marshal.LongType" },
            { "name": "body", "type": "UTF8Type", "column": "b" }
        ]
    }"#;

    #[test]
    fn test_spec_from_json() {
        let spec = TypeSpec::from_json(TWEET).unwrap();
        assert_eq!(spec.name, "Tweet");
        assert_eq!(spec.fields.len(), 3);
        assert_eq!(spec.fields[1].wire_type, WireType::Long);
        assert_eq!(spec.fields[2].column.as_deref(), Some("b"));
        assert_eq!(spec.annotations.get("cols").map(SmolStr::as_str), Some("ts"));
    }

    #[test]
    fn test_spec_rejects_unknown_wire_type() {
        let err = TypeSpec::from_json(
            r#"{ "name": "T", "fields": [ { "name": "a", "type": "Nope" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, MappingError::InvalidSpec(_)));
    }

    #[test]
    fn test_descriptor_from_spec() {
        let spec = TypeSpec::from_json(TWEET).unwrap();
        let desc = TypeDescriptor::<DynRecord>::from_spec(&spec).unwrap();
        assert_eq!(desc.annotation("key"), Some("user"));
        let body = desc.field_by_column("b").unwrap();
        assert_eq!(body.name(), "body");

        let mut rec = DynRecord::new();
        body.write_bytes(&mut rec, b"hi").unwrap();
        assert_eq!(rec.get("body"), Some(&Value::from("hi")));
        assert_eq!(body.read_bytes(&rec).unwrap(), b"hi");
        assert_eq!(desc.field_by_name("ts").unwrap().read(&rec), Value::Null);
    }

    #[test]
    fn test_dyn_record_json() {
        let rec = DynRecord::from_json(serde_json::json!({"a": 1, "b": "x"})).unwrap();
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.get("a"), Some(&Value::from(1i64)));
        assert_eq!(rec.to_json(), serde_json::json!({"a": 1, "b": "x"}));
        assert!(DynRecord::from_json(serde_json::json!([1])).is_none());
    }

    #[test]
    fn test_null_clears_a_field() {
        let mut rec = DynRecord::new().with("a", 1i64).with("b", Value::Null);
        assert_eq!(rec.len(), 1);
        assert!(rec.get("b").is_none());
        let parsed = DynRecord::from_json(serde_json::json!({"a": 1, "b": null})).unwrap();
        assert_eq!(parsed, rec);
        rec.set("a", None::<i64>);
        assert!(rec.is_empty());
        assert_eq!(rec, DynRecord::new());
    }
}
