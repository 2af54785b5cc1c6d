use crate::error::CodecError;
use rustc_hash::FxHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasherDefault;
use std::str::FromStr;

pub type FastMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;

// ─── Wire Types ─────────────────────────────────────────────────────────────

/// Package prefix the store uses for its fully qualified type names.
pub const MARSHAL_PACKAGE: &str = "org.apache.cassandra.db.marshal.";

/// Declared wire type of a field. Selects the scalar codec for its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Bytes,
    Ascii,
    Utf8,
    Long,
    Int32,
    Integer,
    Boolean,
    Float,
    Double,
    Date,
    Counter,
    Uuid,
    TimeUuid,
    LexicalUuid,
}

impl WireType {
    pub const ALL: [WireType; 14] = [
        WireType::Bytes,
        WireType::Ascii,
        WireType::Utf8,
        WireType::Long,
        WireType::Int32,
        WireType::Integer,
        WireType::Boolean,
        WireType::Float,
        WireType::Double,
        WireType::Date,
        WireType::Counter,
        WireType::Uuid,
        WireType::TimeUuid,
        WireType::LexicalUuid,
    ];

    /// Short store-side name, e.g. `UTF8Type`.
    pub fn name(self) -> &'static str {
        match self {
            WireType::Bytes => "BytesType",
            WireType::Ascii => "AsciiType",
            WireType::Utf8 => "UTF8Type",
            WireType::Long => "LongType",
            WireType::Int32 => "Int32Type",
            WireType::Integer => "IntegerType",
            WireType::Boolean => "BooleanType",
            WireType::Float => "FloatType",
            WireType::Double => "DoubleType",
            WireType::Date => "DateType",
            WireType::Counter => "CounterColumnType",
            WireType::Uuid => "UUIDType",
            WireType::TimeUuid => "TimeUUIDType",
            WireType::LexicalUuid => "LexicalUUIDType",
        }
    }

    /// Encoded width for fixed-width types, `None` for variable-length ones.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            WireType::Long | WireType::Date | WireType::Counter | WireType::Double => Some(8),
            WireType::Int32 | WireType::Float => Some(4),
            WireType::Boolean => Some(1),
            WireType::Uuid | WireType::TimeUuid | WireType::LexicalUuid => Some(16),
            WireType::Bytes | WireType::Ascii | WireType::Utf8 | WireType::Integer => None,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WireType {
    type Err = CodecError;

    /// Accepts both `UTF8Type` and `org.apache.cassandra.db.marshal.UTF8Type`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = s.strip_prefix(MARSHAL_PACKAGE).unwrap_or(s);
        WireType::ALL
            .into_iter()
            .find(|t| t.name() == short)
            .ok_or_else(|| CodecError::UnknownWireType(s.to_string()))
    }
}

impl serde::Serialize for WireType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> serde::Deserialize<'de> for WireType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Row Model ──────────────────────────────────────────────────────────────

/// One cell of a row.
///
/// `ttl` and `timestamp` are left at zero by the mapping engine; the mutation
/// layer stamps them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
    pub ttl: i32,
    pub timestamp: i64,
}

impl Column {
    pub fn new(name: Vec<u8>, value: Vec<u8>) -> Self {
        Self {
            name,
            value,
            ttl: 0,
            timestamp: 0,
        }
    }
}

/// A row key and its ordered cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub key: Vec<u8>,
    pub columns: Vec<Column>,
}
