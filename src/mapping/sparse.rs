use super::base::MappingBase;
use super::{RecordMapping, Unmapped};
use crate::composite::{self, Eoc, pack_component};
use crate::descriptor::TypeDescriptor;
use crate::error::{CodecError, MappingError, ProviderError};
use crate::logging::LOG_TARGET;
use crate::provider::RowProvider;
use crate::serialization::ScalarSerialize;
use crate::types::{Column, Row, WireType};
use std::fmt;

/// One record ↔ many cells.
///
/// Every field other than the key and the components becomes its own cell.
/// With components the cell name is the packed component prefix followed by
/// the field's wire column name as one more component; without them the cell
/// name is the bare wire column name.
pub struct SparseMapping<R> {
    base: MappingBase<R>,
    /// Field indexes that become cells, in declaration order.
    cells: Vec<usize>,
}

impl<R> SparseMapping<R> {
    pub fn new(descriptor: TypeDescriptor<R>) -> Result<Self, MappingError> {
        let base = MappingBase::new(descriptor)?;
        let cells = (0..base.descriptor.fields().len())
            .filter(|&i| !base.is_reserved(i))
            .collect();
        Ok(Self { base, cells })
    }

    pub fn descriptor(&self) -> &TypeDescriptor<R> {
        &self.base.descriptor
    }

    pub fn component_count(&self) -> usize {
        self.base.component_count()
    }

    /// Cell name for the field `column` under an already packed `prefix`.
    fn cell_name(&self, prefix: &[u8], column: &str) -> Result<Vec<u8>, MappingError> {
        if self.base.component_count() == 0 {
            return Ok(column.as_bytes().to_vec());
        }
        let mut name = Vec::with_capacity(prefix.len() + column.len() + 3);
        name.extend_from_slice(prefix);
        pack_component(&mut name, column.as_bytes(), Eoc::Equal)?;
        Ok(name)
    }

    /// Translate the end of the stream into an outcome. `read_any` is set once
    /// a cell of the current record has been consumed.
    fn finish(&self, end: ProviderError, read_any: bool) -> Result<Unmapped, MappingError> {
        match end {
            ProviderError::Transport(_) => Err(end.into()),
            _ if !read_any => Ok(Unmapped::Done),
            ProviderError::Done => Ok(Unmapped::Last),
            ProviderError::EndAtLimit => Ok(Unmapped::Truncated),
            // The window reached past this record's last cell.
            ProviderError::EndBeforeLimit => Ok(Unmapped::Record),
        }
    }
}

impl<R> RecordMapping<R> for SparseMapping<R> {
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
        let prefix = self.base.map_prefix(record)?;

        let mut columns = Vec::with_capacity(self.cells.len());
        for &index in &self.cells {
            let field = self.base.descriptor.field(index);
            let name = self.cell_name(&prefix, field.column())?;
            let value = field.read_bytes(record)?;
            columns.push(Column::new(name, value));
        }
        Ok(Row { key, columns })
    }

    /// Reads cells until one carries a different component prefix, then
    /// rewinds the provider so that cell starts the next record.
    fn unmap<P: RowProvider + ?Sized>(
        &self,
        record: &mut R,
        provider: &mut P,
    ) -> Result<Unmapped, MappingError> {
        self.base.unmap_key(record, provider.key())?;

        let width = self.base.component_count();
        let expected = width + 1;
        // Component prefix of the record being decoded, once its first cell is read.
        let mut current: Option<Vec<Vec<u8>>> = None;

        loop {
            let column = match provider.next_column() {
                Ok(column) => column,
                Err(end) => return self.finish(end, current.is_some()),
            };

            let parts = if width == 0 {
                vec![column.name.as_slice()]
            } else {
                composite::unpack(&column.name)?
            };
            if parts.len() != expected {
                return Err(self.base.row_shape_error(expected, parts.len()));
            }
            let (prefix, name) = parts.split_at(width);

            match &current {
                None => {
                    self.base.unmap_components(record, prefix)?;
                    current = Some(prefix.iter().map(|c| c.to_vec()).collect());
                }
                Some(seen) => {
                    if !seen.iter().map(Vec::as_slice).eq(prefix.iter().copied()) {
                        provider.rewind();
                        tracing::trace!(
                            target: LOG_TARGET,
                            type_name = self.base.descriptor.name(),
                            "record boundary, rewound one column"
                        );
                        return Ok(Unmapped::Record);
                    }
                }
            }

            let column_name = std::str::from_utf8(name[0])
                .map_err(|_| MappingError::ColumnName(CodecError::InvalidUtf8(WireType::Utf8)))?;
            match self.base.descriptor.field_by_column(column_name) {
                Some(field) => field.write_bytes(record, &column.value)?,
                None => tracing::trace!(
                    target: LOG_TARGET,
                    type_name = self.base.descriptor.name(),
                    column = column_name,
                    "skipping unknown column"
                ),
            }
        }
    }
}

impl<R> fmt::Debug for SparseMapping<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseMapping")
            .field("base", &self.base)
            .field("cells", &self.cells.len())
            .finish()
    }
}
