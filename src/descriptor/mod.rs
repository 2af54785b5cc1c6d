pub mod field;
pub mod spec;

pub use field::FieldDescriptor;
pub use spec::{DynRecord, FieldSpec, TypeSpec};

use crate::error::MappingError;
use crate::types::FastMap;
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;

// ─── Annotation Keys ────────────────────────────────────────────────────────

pub const ANNOTATION_CF: &str = "cf";
pub const ANNOTATION_KEY: &str = "key";
pub const ANNOTATION_COLS: &str = "cols";
pub const ANNOTATION_VALUE: &str = "value";
pub const ANNOTATION_MAPPING: &str = "mapping";

// ─── TypeDescriptor ─────────────────────────────────────────────────────────

/// Field metadata of one record type, indexed by record field name and by
/// wire column name, plus the type's global annotations.
///
/// Built once per record type and never mutated afterwards.
pub struct TypeDescriptor<R> {
    name: SmolStr,
    fields: Vec<FieldDescriptor<R>>,
    by_name: FastMap<SmolStr, usize>,
    by_column: FastMap<SmolStr, usize>,
    annotations: BTreeMap<SmolStr, SmolStr>,
}

impl<R> TypeDescriptor<R> {
    pub fn builder(name: impl Into<SmolStr>) -> TypeDescriptorBuilder<R> {
        TypeDescriptorBuilder {
            name: name.into(),
            fields: Vec::new(),
            annotations: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    #[inline]
    pub fn field(&self, index: usize) -> &FieldDescriptor<R> {
        &self.fields[index]
    }

    /// Declaration index of the field called `name`.
    #[inline]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor<R>> {
        self.position(name).map(|i| &self.fields[i])
    }

    pub fn field_by_column(&self, column: &str) -> Option<&FieldDescriptor<R>> {
        self.by_column.get(column).map(|&i| &self.fields[i])
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(SmolStr::as_str)
    }

    pub fn annotations(&self) -> &BTreeMap<SmolStr, SmolStr> {
        &self.annotations
    }
}

impl<R> fmt::Debug for TypeDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("annotations", &self.annotations)
            .finish()
    }
}

// ─── Builder ────────────────────────────────────────────────────────────────

pub struct TypeDescriptorBuilder<R> {
    name: SmolStr,
    fields: Vec<FieldDescriptor<R>>,
    annotations: BTreeMap<SmolStr, SmolStr>,
}

impl<R> TypeDescriptorBuilder<R> {
    /// Set a global annotation. A repeated key replaces the earlier value.
    pub fn annotate(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    pub fn field(mut self, field: FieldDescriptor<R>) -> Self {
        self.fields.push(field);
        self
    }

    /// Index the fields. Record field names and wire column names must each be unique.
    pub fn build(self) -> Result<TypeDescriptor<R>, MappingError> {
        let mut by_name = FastMap::default();
        let mut by_column = FastMap::default();
        for (i, field) in self.fields.iter().enumerate() {
            let duplicate = |name: &str| MappingError::DuplicateField {
                type_name: self.name.clone(),
                name: SmolStr::from(name),
            };
            if by_name.insert(SmolStr::from(field.name()), i).is_some() {
                return Err(duplicate(field.name()));
            }
            if by_column.insert(SmolStr::from(field.column()), i).is_some() {
                return Err(duplicate(field.column()));
            }
        }
        Ok(TypeDescriptor {
            name: self.name,
            fields: self.fields,
            by_name,
            by_column,
            annotations: self.annotations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WireType;
    use crate::value::Value;

    #[derive(Debug, Default)]
    struct Point {
        id: String,
        x: i32,
    }

    fn point_type() -> TypeDescriptorBuilder<Point> {
        TypeDescriptor::builder("Point")
            .annotate("cf", "Points")
            .annotate("key", "id")
            .field(FieldDescriptor::typed(
                "id",
                WireType::Utf8,
                |p: &Point| p.id.clone(),
                |p: &mut Point, v| p.id = v,
            ))
            .field(
                FieldDescriptor::typed(
                    "x",
                    WireType::Int32,
                    |p: &Point| p.x,
                    |p: &mut Point, v| p.x = v,
                )
                .with_column("X"),
            )
    }

    #[test]
    fn test_indexes_by_name_and_column() {
        let desc = point_type().build().unwrap();
        assert_eq!(desc.name(), "Point");
        assert_eq!(desc.fields().len(), 2);
        assert_eq!(desc.position("x"), Some(1));
        assert_eq!(desc.field_by_column("X").map(|f| f.name()), Some("x"));
        assert!(desc.field_by_column("x").is_none());
        assert_eq!(desc.annotation("cf"), Some("Points"));
        assert_eq!(desc.annotation("mapping"), None);
    }

    #[test]
    fn test_accessors_round_trip_through_bytes() {
        let desc = point_type().build().unwrap();
        let x = desc.field_by_name("x").unwrap();
        let mut p = Point::default();
        x.write_bytes(&mut p, &[0, 0, 0, 42]).unwrap();
        assert_eq!(p.x, 42);
        assert_eq!(x.read_bytes(&p).unwrap(), vec![0, 0, 0, 42]);
        assert_eq!(x.read(&p), Value::from(42i64));
    }

    #[test]
    fn test_write_bytes_names_the_field_on_failure() {
        let desc = point_type().build().unwrap();
        let mut p = Point::default();
        let err = desc
            .field_by_name("x")
            .unwrap()
            .write_bytes(&mut p, &[1, 2])
            .unwrap_err();
        assert!(matches!(err, MappingError::Unmarshal { ref field, .. } if field == "x"));
        assert!(err.to_string().contains("field x"));
    }

    #[test]
    fn test_duplicate_column_is_rejected() {
        let err = point_type()
            .field(FieldDescriptor::typed(
                "other",
                WireType::Int32,
                |p: &Point| p.x,
                |p: &mut Point, v| p.x = v,
            ).with_column("X"))
            .build()
            .unwrap_err();
        assert!(matches!(err, MappingError::DuplicateField { ref name, .. } if name == "X"));
    }
}
