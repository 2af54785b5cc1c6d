// ─── Error ──────────────────────────────────────────────────────────────────
use smol_str::SmolStr;
use thiserror::Error;

use crate::types::WireType;

/// Failures of the scalar codec.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    #[error("{wire_type}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        wire_type: WireType,
        expected: usize,
        actual: usize,
    },
    #[error("{wire_type} can't hold a {actual} value")]
    ValueMismatch {
        wire_type: WireType,
        actual: &'static str,
    },
    #[error("expected a {expected} value, got {actual}")]
    Conversion {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("value out of range for {0}")]
    OutOfRange(WireType),
    #[error("invalid UTF-8 in {0} value")]
    InvalidUtf8(WireType),
    #[error("non-ASCII byte in AsciiType value")]
    NotAscii,
    #[error("Unknown wire type: {0}")]
    UnknownWireType(String),
}

/// Failures of the composite packer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompositeError {
    #[error("truncated composite at byte {offset}")]
    Truncated { offset: usize },
    #[error("composite component of {len} bytes exceeds the 65535 byte limit")]
    ComponentTooLarge { len: usize },
}

/// What a [`RowProvider`](crate::provider::RowProvider) returns instead of a column.
///
/// The three end-of-stream conditions are kept apart so the unmapper can tell
/// a finished row from a paged window that ran dry.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no more columns")]
    Done,
    #[error("provider ran out of columns before reaching its limit")]
    EndBeforeLimit,
    #[error("provider reached its column limit")]
    EndAtLimit,
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// True for the three end-of-stream sentinels.
    pub fn is_end(&self) -> bool {
        !matches!(self, ProviderError::Transport(_))
    }
}

#[derive(Debug, Error)]
pub enum MappingError {
    // Configuration, raised while building descriptors and mappings only.
    #[error("type {type_name}: missing required annotation `{annotation}`")]
    MissingAnnotation {
        type_name: SmolStr,
        annotation: &'static str,
    },
    #[error("type {type_name}: annotation `{annotation}` names unknown field `{field}`")]
    UnknownField {
        type_name: SmolStr,
        annotation: &'static str,
        field: SmolStr,
    },
    #[error("type {type_name}: unrecognized mapping `{mapping}`")]
    UnknownMappingKind { type_name: SmolStr, mapping: SmolStr },
    #[error("type {type_name}: duplicate field or column name `{name}`")]
    DuplicateField { type_name: SmolStr, name: SmolStr },
    #[error("invalid type spec: {0}")]
    InvalidSpec(#[from] serde_json::Error),

    // Per-operation failures.
    #[error("error marshaling field {field}: {source}")]
    Marshal {
        field: SmolStr,
        #[source]
        source: CodecError,
    },
    #[error("error unmarshaling field {field}: {source}")]
    Unmarshal {
        field: SmolStr,
        #[source]
        source: CodecError,
    },
    #[error("type {type_name}: key field {field} encoded to an empty row key")]
    EmptyKey { type_name: SmolStr, field: SmolStr },
    #[error("component position {position} out of range, mapping has {len} components")]
    OutOfRange { position: usize, len: usize },
    #[error("composite format error: {0}")]
    Composite(#[from] CompositeError),
    #[error("type {type_name}: column name has {actual} components, expected {expected}")]
    RowShape {
        type_name: SmolStr,
        expected: usize,
        actual: usize,
    },
    #[error("column name is not valid UTF8Type: {0}")]
    ColumnName(#[source] CodecError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
