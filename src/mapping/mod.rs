mod base;
pub mod compact;
pub mod sparse;

pub use compact::CompactMapping;
pub use sparse::SparseMapping;

use crate::descriptor::{ANNOTATION_MAPPING, TypeDescriptor};
use crate::error::MappingError;
use crate::logging::LOG_TARGET;
use crate::provider::RowProvider;
use crate::serialization::ScalarSerialize;
use crate::types::Row;
use smol_str::SmolStr;
use std::fmt;

// ─── Contract ───────────────────────────────────────────────────────────────

/// How a record type is laid out as one logical row.
pub trait RecordMapping<R> {
    /// Column family the rows live in.
    fn cf(&self) -> &str;

    /// Encode `value` with the key field's wire type.
    fn marshal_key<V: ScalarSerialize + ?Sized>(&self, value: &V) -> Result<Vec<u8>, MappingError>;

    /// Encode `value` with the wire type of the component at `position`.
    fn marshal_component<V: ScalarSerialize + ?Sized>(
        &self,
        value: &V,
        position: usize,
    ) -> Result<Vec<u8>, MappingError>;

    /// Convert a record into its row.
    fn map(&self, record: &R) -> Result<Row, MappingError>;

    /// Fill `record` from the cells of one logical record read off `provider`.
    ///
    /// On error the record may be partially written.
    fn unmap<P: RowProvider + ?Sized>(
        &self,
        record: &mut R,
        provider: &mut P,
    ) -> Result<Unmapped, MappingError>;
}

/// Outcome of a successful [`RecordMapping::unmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unmapped {
    /// A record was decoded; the provider may hold more.
    Record,
    /// A record was decoded and the provider reached the end of its stream.
    Last,
    /// A record was decoded but the provider hit its column limit, so the
    /// record may be missing cells. Fetch the rest and unmap again.
    Truncated,
    /// The provider held no record.
    Done,
}

impl Unmapped {
    /// True when the destination record was populated.
    pub fn is_record(self) -> bool {
        !matches!(self, Unmapped::Done)
    }
}

// ─── Mapping Kind ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingKind {
    /// One record ↔ one cell per non-key, non-component field.
    #[default]
    Sparse,
    /// One record ↔ one cell holding the `value` field.
    Compact,
}

impl MappingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MappingKind::Sparse => "sparse",
            MappingKind::Compact => "compact",
        }
    }

    fn from_descriptor<R>(descriptor: &TypeDescriptor<R>) -> Result<Self, MappingError> {
        match descriptor.annotation(ANNOTATION_MAPPING) {
            None | Some("sparse") => Ok(MappingKind::Sparse),
            Some("compact") => Ok(MappingKind::Compact),
            Some(other) => Err(MappingError::UnknownMappingKind {
                type_name: SmolStr::from(descriptor.name()),
                mapping: SmolStr::from(other),
            }),
        }
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Mapping ────────────────────────────────────────────────────────────────

/// A validated mapping of the kind selected by the type's `mapping` annotation.
///
/// Immutable after construction and free of per-call state, so one instance
/// can serve concurrent callers that each bring their own record and provider.
pub enum Mapping<R> {
    Sparse(SparseMapping<R>),
    Compact(CompactMapping<R>),
}

impl<R> Mapping<R> {
    /// Validate the descriptor's annotations and build the mapping they select.
    pub fn new(descriptor: TypeDescriptor<R>) -> Result<Self, MappingError> {
        let mapping = match MappingKind::from_descriptor(&descriptor)? {
            MappingKind::Sparse => Mapping::Sparse(SparseMapping::new(descriptor)?),
            MappingKind::Compact => Mapping::Compact(CompactMapping::new(descriptor)?),
        };
        tracing::debug!(
            target: LOG_TARGET,
            type_name = mapping.descriptor().name(),
            kind = %mapping.kind(),
            cf = mapping.cf(),
            components = mapping.component_count(),
            "mapping built"
        );
        Ok(mapping)
    }

    pub fn kind(&self) -> MappingKind {
        match self {
            Mapping::Sparse(_) => MappingKind::Sparse,
            Mapping::Compact(_) => MappingKind::Compact,
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor<R> {
        match self {
            Mapping::Sparse(m) => m.descriptor(),
            Mapping::Compact(m) => m.descriptor(),
        }
    }

    /// Number of fields forming the composite prefix.
    pub fn component_count(&self) -> usize {
        match self {
            Mapping::Sparse(m) => m.component_count(),
            Mapping::Compact(m) => m.component_count(),
        }
    }

    /// Unmap every record the provider yields, until it reports the end of
    /// its stream or its window.
    pub fn unmap_all<P: RowProvider + ?Sized>(&self, provider: &mut P) -> Result<Vec<R>, MappingError>
    where
        R: Default,
    {
        let mut records = Vec::new();
        loop {
            let mut record = R::default();
            match self.unmap(&mut record, provider)? {
                Unmapped::Record => records.push(record),
                Unmapped::Last | Unmapped::Truncated => {
                    records.push(record);
                    break;
                }
                Unmapped::Done => break,
            }
        }
        Ok(records)
    }
}

impl<R> fmt::Debug for Mapping<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mapping::Sparse(m) => f.debug_tuple("Sparse").field(m).finish(),
            Mapping::Compact(m) => f.debug_tuple("Compact").field(m).finish(),
        }
    }
}

impl<R> RecordMapping<R> for Mapping<R> {
    #[inline]
    fn cf(&self) -> &str {
        match self {
            Mapping::Sparse(m) => m.cf(),
            Mapping::Compact(m) => m.cf(),
        }
    }

    fn marshal_key<V: ScalarSerialize + ?Sized>(&self, value: &V) -> Result<Vec<u8>, MappingError> {
        match self {
            Mapping::Sparse(m) => m.marshal_key(value),
            Mapping::Compact(m) => m.marshal_key(value),
        }
    }

    fn marshal_component<V: ScalarSerialize + ?Sized>(
        &self,
        value: &V,
        position: usize,
    ) -> Result<Vec<u8>, MappingError> {
        match self {
            Mapping::Sparse(m) => m.marshal_component(value, position),
            Mapping::Compact(m) => m.marshal_component(value, position),
        }
    }

    fn map(&self, record: &R) -> Result<Row, MappingError> {
        match self {
            Mapping::Sparse(m) => m.map(record),
            Mapping::Compact(m) => m.map(record),
        }
    }

    fn unmap<P: RowProvider + ?Sized>(
        &self,
        record: &mut R,
        provider: &mut P,
    ) -> Result<Unmapped, MappingError> {
        match self {
            Mapping::Sparse(m) => m.unmap(record, provider),
            Mapping::Compact(m) => m.unmap(record, provider),
        }
    }
}
