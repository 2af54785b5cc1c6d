use crate::deserialization::decode;
use crate::error::{CodecError, MappingError};
use crate::serialization::encode;
use crate::types::WireType;
use crate::value::Value;
use smol_str::SmolStr;
use std::fmt;

pub type ReadFn<R> = Box<dyn Fn(&R) -> Value + Send + Sync>;
pub type WriteFn<R> = Box<dyn Fn(&mut R, Value) -> Result<(), CodecError> + Send + Sync>;

/// One field of a record type: its names, its wire type and how to reach it
/// on an instance.
pub struct FieldDescriptor<R> {
    name: SmolStr,
    column: SmolStr,
    wire_type: WireType,
    read: ReadFn<R>,
    write: WriteFn<R>,
}

impl<R> FieldDescriptor<R> {
    /// Field with raw [`Value`] accessors. The wire column name defaults to `name`.
    pub fn new<G, S>(name: impl Into<SmolStr>, wire_type: WireType, read: G, write: S) -> Self
    where
        G: Fn(&R) -> Value + Send + Sync + 'static,
        S: Fn(&mut R, Value) -> Result<(), CodecError> + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            wire_type,
            read: Box::new(read),
            write: Box::new(write),
        }
    }

    /// Field with a typed getter and setter; conversion to and from [`Value`]
    /// happens here.
    pub fn typed<T, G, S>(name: impl Into<SmolStr>, wire_type: WireType, get: G, set: S) -> Self
    where
        T: Into<Value> + TryFrom<Value, Error = CodecError>,
        G: Fn(&R) -> T + Send + Sync + 'static,
        S: Fn(&mut R, T) + Send + Sync + 'static,
    {
        Self::new(
            name,
            wire_type,
            move |record| get(record).into(),
            move |record, value| {
                set(record, T::try_from(value)?);
                Ok(())
            },
        )
    }

    /// Override the wire column name.
    pub fn with_column(mut self, column: impl Into<SmolStr>) -> Self {
        self.column = column.into();
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[inline]
    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    #[inline]
    pub fn read(&self, record: &R) -> Value {
        (self.read)(record)
    }

    #[inline]
    pub fn write(&self, record: &mut R, value: Value) -> Result<(), CodecError> {
        (self.write)(record, value)
    }

    /// Read the field and encode it with its wire type.
    pub fn read_bytes(&self, record: &R) -> Result<Vec<u8>, MappingError> {
        encode(&self.read(record), self.wire_type).map_err(|source| self.marshal_error(source))
    }

    /// Decode `bytes` with the field's wire type and assign the result.
    pub fn write_bytes(&self, record: &mut R, bytes: &[u8]) -> Result<(), MappingError> {
        let value = decode::<Value>(bytes, self.wire_type)
            .map_err(|source| self.unmarshal_error(source))?;
        self.write(record, value)
            .map_err(|source| self.unmarshal_error(source))
    }

    pub(crate) fn marshal_error(&self, source: CodecError) -> MappingError {
        MappingError::Marshal {
            field: self.name.clone(),
            source,
        }
    }

    fn unmarshal_error(&self, source: CodecError) -> MappingError {
        MappingError::Unmarshal {
            field: self.name.clone(),
            source,
        }
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("wire_type", &self.wire_type)
            .finish_non_exhaustive()
    }
}
