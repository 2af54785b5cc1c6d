//! Record ↔ wide-column row mapping.
//!
//! A [`TypeDescriptor`] describes a record type's fields and annotations; a
//! [`Mapping`] built from it converts records into [`Row`]s and decodes them
//! back from a [`RowProvider`], using either the sparse layout (one cell per
//! field) or the compact layout (one cell per record).

pub mod composite;
pub mod descriptor;
pub mod deserialization;
pub mod error;
mod logging;
pub mod mapping;
pub mod provider;
pub mod serialization;
pub mod types;
pub mod value;

pub use descriptor::{DynRecord, FieldDescriptor, TypeDescriptor, TypeSpec};
pub use error::{CodecError, CompositeError, MappingError, ProviderError};
pub use mapping::{Mapping, MappingKind, RecordMapping, Unmapped};
pub use provider::{MemoryProvider, RowProvider};
pub use types::{Column, Row, WireType};
pub use value::Value;
