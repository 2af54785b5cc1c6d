use crate::composite::{Eoc, pack_component};
use crate::descriptor::{
    ANNOTATION_CF, ANNOTATION_COLS, ANNOTATION_KEY, FieldDescriptor, TypeDescriptor,
};
use crate::error::MappingError;
use crate::serialization::{ScalarSerialize, encode};
use smol_str::SmolStr;
use std::fmt;

/// Key and component-prefix logic shared by the sparse and compact mappings.
pub(crate) struct MappingBase<R> {
    pub(crate) descriptor: TypeDescriptor<R>,
    cf: SmolStr,
    key: usize,
    /// Field indexes of `cols`, in annotation order.
    components: Vec<usize>,
}

impl<R> MappingBase<R> {
    pub(crate) fn new(descriptor: TypeDescriptor<R>) -> Result<Self, MappingError> {
        let cf = SmolStr::from(require(&descriptor, ANNOTATION_CF)?);
        let key = resolve(&descriptor, ANNOTATION_KEY, require(&descriptor, ANNOTATION_KEY)?)?;

        // Split on ',' as written; names are not trimmed.
        let components = match descriptor.annotation(ANNOTATION_COLS) {
            None | Some("") => Vec::new(),
            Some(cols) => cols
                .split(',')
                .map(|name| resolve(&descriptor, ANNOTATION_COLS, name))
                .collect::<Result<_, _>>()?,
        };

        Ok(Self {
            descriptor,
            cf,
            key,
            components,
        })
    }

    #[inline]
    pub(crate) fn cf(&self) -> &str {
        &self.cf
    }

    #[inline]
    pub(crate) fn type_name(&self) -> SmolStr {
        SmolStr::from(self.descriptor.name())
    }

    #[inline]
    pub(crate) fn key_field(&self) -> &FieldDescriptor<R> {
        self.descriptor.field(self.key)
    }

    #[inline]
    pub(crate) fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Whether the field at `index` is the key or part of the composite prefix.
    pub(crate) fn is_reserved(&self, index: usize) -> bool {
        index == self.key || self.components.contains(&index)
    }

    pub(crate) fn marshal_key<V: ScalarSerialize + ?Sized>(
        &self,
        value: &V,
    ) -> Result<Vec<u8>, MappingError> {
        let field = self.key_field();
        encode(value, field.wire_type()).map_err(|source| field.marshal_error(source))
    }

    pub(crate) fn marshal_component<V: ScalarSerialize + ?Sized>(
        &self,
        value: &V,
        position: usize,
    ) -> Result<Vec<u8>, MappingError> {
        let index = *self
            .components
            .get(position)
            .ok_or(MappingError::OutOfRange {
                position,
                len: self.components.len(),
            })?;
        let field = self.descriptor.field(index);
        encode(value, field.wire_type()).map_err(|source| field.marshal_error(source))
    }

    // ════════════════════════════════════════════════════════════════════════
    // Outbound
    // ════════════════════════════════════════════════════════════════════════

    /// Encoded row key of `record`. Never empty.
    pub(crate) fn map_key(&self, record: &R) -> Result<Vec<u8>, MappingError> {
        let field = self.key_field();
        let key = field.read_bytes(record)?;
        if key.is_empty() {
            return Err(MappingError::EmptyKey {
                type_name: self.type_name(),
                field: SmolStr::from(field.name()),
            });
        }
        Ok(key)
    }

    /// Every component field of `record`, packed with [`Eoc::Equal`].
    /// Empty when the type has no components.
    pub(crate) fn map_prefix(&self, record: &R) -> Result<Vec<u8>, MappingError> {
        let mut prefix = Vec::new();
        for &index in &self.components {
            let bytes = self.descriptor.field(index).read_bytes(record)?;
            pack_component(&mut prefix, &bytes, Eoc::Equal)?;
        }
        Ok(prefix)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Inbound
    // ════════════════════════════════════════════════════════════════════════

    pub(crate) fn unmap_key(&self, record: &mut R, key: &[u8]) -> Result<(), MappingError> {
        self.key_field().write_bytes(record, key)
    }

    /// Write the leading composite components into the component fields.
    pub(crate) fn unmap_components(
        &self,
        record: &mut R,
        components: &[&[u8]],
    ) -> Result<(), MappingError> {
        debug_assert_eq!(components.len(), self.components.len());
        for (&index, bytes) in self.components.iter().zip(components) {
            self.descriptor.field(index).write_bytes(record, bytes)?;
        }
        Ok(())
    }

    pub(crate) fn row_shape_error(&self, expected: usize, actual: usize) -> MappingError {
        MappingError::RowShape {
            type_name: self.type_name(),
            expected,
            actual,
        }
    }
}

impl<R> fmt::Debug for MappingBase<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingBase")
            .field("type_name", &self.descriptor.name())
            .field("cf", &self.cf)
            .field("key", &self.key_field().name())
            .field(
                "components",
                &self
                    .components
                    .iter()
                    .map(|&i| self.descriptor.field(i).name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Value of a required annotation.
pub(crate) fn require<'a, R>(
    descriptor: &'a TypeDescriptor<R>,
    annotation: &'static str,
) -> Result<&'a str, MappingError> {
    descriptor
        .annotation(annotation)
        .ok_or_else(|| MappingError::MissingAnnotation {
            type_name: SmolStr::from(descriptor.name()),
            annotation,
        })
}

/// Declaration index of the field an annotation names.
pub(crate) fn resolve<R>(
    descriptor: &TypeDescriptor<R>,
    annotation: &'static str,
    field: &str,
) -> Result<usize, MappingError> {
    descriptor
        .position(field)
        .ok_or_else(|| MappingError::UnknownField {
            type_name: SmolStr::from(descriptor.name()),
            annotation,
            field: SmolStr::from(field),
        })
}
