use super::base::{MappingBase, require, resolve};
use super::{RecordMapping, Unmapped};
use crate::composite;
use crate::descriptor::{ANNOTATION_VALUE, FieldDescriptor, TypeDescriptor};
use crate::error::{MappingError, ProviderError};
use crate::provider::RowProvider;
use crate::serialization::ScalarSerialize;
use crate::types::{Column, Row};
use std::fmt;

/// One record ↔ one cell: the packed components are the cell name and the
/// `value` field is the cell value.
pub struct CompactMapping<R> {
    base: MappingBase<R>,
    value: usize,
}

impl<R> CompactMapping<R> {
    pub fn new(descriptor: TypeDescriptor<R>) -> Result<Self, MappingError> {
        let base = MappingBase::new(descriptor)?;
        let value = resolve(
            &base.descriptor,
            ANNOTATION_VALUE,
            require(&base.descriptor, ANNOTATION_VALUE)?,
        )?;
        Ok(Self { base, value })
    }

    pub fn descriptor(&self) -> &TypeDescriptor<R> {
        &self.base.descriptor
    }

    pub fn component_count(&self) -> usize {
        self.base.component_count()
    }

    #[inline]
    fn value_field(&self) -> &FieldDescriptor<R> {
        self.base.descriptor.field(self.value)
    }
}

impl<R> RecordMapping<R> for CompactMapping<R> {
    #[inline]
    fn cf(&self) -> &str {
        self.base.cf()
    }

    fn marshal_key<V: ScalarSerialize + ?Sized>(&self, value: &V) -> Result<Vec<u8>, MappingError> {
        self.base.marshal_key(value)
    }

    fn marshal_component<V: ScalarSerialize + ?Sized>(
        &self,
        value: &V,
        position: usize,
    ) -> Result<Vec<u8>, MappingError> {
        self.base.marshal_component(value, position)
    }

    fn map(&self, record: &R) -> Result<Row, MappingError> {
        let key = self.base.map_key(record)?;
        let name = self.base.map_prefix(record)?;
        let value = self.value_field().read_bytes(record)?;
        Ok(Row {
            key,
            columns: vec![Column::new(name, value)],
        })
    }

    /// Consumes exactly one cell. The record is left untouched when the
    /// provider has no cell to give.
    fn unmap<P: RowProvider + ?Sized>(
        &self,
        record: &mut R,
        provider: &mut P,
    ) -> Result<Unmapped, MappingError> {
        let column = match provider.next_column() {
            Ok(column) => column,
            Err(err @ ProviderError::Transport(_)) => return Err(err.into()),
            Err(_) => return Ok(Unmapped::Done),
        };

        self.base.unmap_key(record, provider.key())?;

        let parts = composite::unpack(&column.name)?;
        let expected = self.base.component_count();
        if parts.len() != expected {
            return Err(self.base.row_shape_error(expected, parts.len()));
        }
        self.base.unmap_components(record, &parts)?;
        self.value_field().write_bytes(record, &column.value)?;
        Ok(Unmapped::Record)
    }
}

impl<R> fmt::Debug for CompactMapping<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompactMapping")
            .field("base", &self.base)
            .field("value", &self.value_field().name())
            .finish()
    }
}
