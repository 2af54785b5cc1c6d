use super::error::CodecError;
use super::types::WireType;
use super::value::{Number, Value};

// ─── ScalarSerialize Trait ──────────────────────────────────────────────────

/// Trait for value types that can be encoded by the scalar codec.
///
/// This trait abstracts over different value representations (Value and
/// serde_json::Value) so both can be marshaled as keys, components and cells.
pub trait ScalarSerialize {
    /// Check if this value is null.
    fn is_null(&self) -> bool;

    /// Extract a boolean value, if this is a boolean.
    fn as_bool(&self) -> Option<bool>;

    /// Extract an integer, if this is an integer that fits an i64.
    fn as_i64(&self) -> Option<i64>;

    /// Extract a float, if this is a number.
    fn as_f64(&self) -> Option<f64>;

    /// Extract a string slice, if this is a string.
    fn as_str(&self) -> Option<&str>;

    /// Extract raw bytes, if this is a byte value.
    fn as_bytes(&self) -> Option<&[u8]>;

    /// Short name of the value's kind for error messages.
    fn kind(&self) -> &'static str;
}

// ─── ScalarSerialize for Value ──────────────────────────────────────────────

impl ScalarSerialize for Value {
    #[inline]
    fn is_null(&self) -> bool {
        Value::is_null(self)
    }

    #[inline]
    fn as_bool(&self) -> Option<bool> {
        Value::as_bool(self)
    }

    #[inline]
    fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n @ (Number::I64(_) | Number::U64(_))) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    fn as_f64(&self) -> Option<f64> {
        Value::as_f64(self)
    }

    #[inline]
    fn as_str(&self) -> Option<&str> {
        Value::as_str(self)
    }

    #[inline]
    fn as_bytes(&self) -> Option<&[u8]> {
        Value::as_bytes(self)
    }

    #[inline]
    fn kind(&self) -> &'static str {
        Value::kind(self)
    }
}

// ─── ScalarSerialize for serde_json::Value ──────────────────────────────────

impl ScalarSerialize for serde_json::Value {
    #[inline]
    fn is_null(&self) -> bool {
        self.is_null()
    }

    #[inline]
    fn as_bool(&self) -> Option<bool> {
        self.as_bool()
    }

    #[inline]
    fn as_i64(&self) -> Option<i64> {
        self.as_i64()
    }

    #[inline]
    fn as_f64(&self) -> Option<f64> {
        self.as_f64()
    }

    #[inline]
    fn as_str(&self) -> Option<&str> {
        self.as_str()
    }

    #[inline]
    fn as_bytes(&self) -> Option<&[u8]> {
        None
    }

    fn kind(&self) -> &'static str {
        match self {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "bool",
            serde_json::Value::Number(n) if n.is_f64() => "float",
            serde_json::Value::Number(_) => "integer",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }
}

// ─── ScalarSerialize for &T ─────────────────────────────────────────────────

/// Lets `&Value` and friends be passed where a scalar is expected.
impl<T: ScalarSerialize + ?Sized> ScalarSerialize for &T {
    #[inline]
    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    #[inline]
    fn as_bool(&self) -> Option<bool> {
        (**self).as_bool()
    }

    #[inline]
    fn as_i64(&self) -> Option<i64> {
        (**self).as_i64()
    }

    #[inline]
    fn as_f64(&self) -> Option<f64> {
        (**self).as_f64()
    }

    #[inline]
    fn as_str(&self) -> Option<&str> {
        (**self).as_str()
    }

    #[inline]
    fn as_bytes(&self) -> Option<&[u8]> {
        (**self).as_bytes()
    }

    #[inline]
    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}

// ─── Writer ─────────────────────────────────────────────────────────────────

/// Encode a value as `wire_type`, appending to `buf`.
///
/// Null appends nothing for every wire type.
pub fn encode_into<V: ScalarSerialize + ?Sized>(
    buf: &mut Vec<u8>,
    value: &V,
    wire_type: WireType,
) -> Result<(), CodecError> {
    if value.is_null() {
        return Ok(());
    }
    let mismatch = || CodecError::ValueMismatch {
        wire_type,
        actual: value.kind(),
    };

    match wire_type {
        WireType::Bytes => {
            let bytes = value
                .as_bytes()
                .or_else(|| value.as_str().map(str::as_bytes))
                .ok_or_else(mismatch)?;
            buf.extend_from_slice(bytes);
        }
        WireType::Ascii => {
            let s = value.as_str().ok_or_else(mismatch)?;
            if !s.is_ascii() {
                return Err(CodecError::NotAscii);
            }
            buf.extend_from_slice(s.as_bytes());
        }
        WireType::Utf8 => {
            let s = value.as_str().ok_or_else(mismatch)?;
            buf.extend_from_slice(s.as_bytes());
        }
        WireType::Long | WireType::Date | WireType::Counter => {
            let i = integer(value, wire_type)?;
            buf.extend_from_slice(&i.to_be_bytes());
        }
        WireType::Int32 => {
            let i = integer(value, wire_type)?;
            let i = i32::try_from(i).map_err(|_| CodecError::OutOfRange(wire_type))?;
            buf.extend_from_slice(&i.to_be_bytes());
        }
        WireType::Integer => {
            let i = integer(value, wire_type)?;
            write_varint(buf, i);
        }
        WireType::Boolean => {
            let b = value.as_bool().ok_or_else(mismatch)?;
            buf.push(b as u8);
        }
        WireType::Float => {
            let f = value.as_f64().ok_or_else(mismatch)?;
            buf.extend_from_slice(&(f as f32).to_be_bytes());
        }
        WireType::Double => {
            let f = value.as_f64().ok_or_else(mismatch)?;
            buf.extend_from_slice(&f.to_be_bytes());
        }
        WireType::Uuid | WireType::TimeUuid | WireType::LexicalUuid => {
            let bytes = value.as_bytes().ok_or_else(mismatch)?;
            if bytes.len() != 16 {
                return Err(CodecError::InvalidLength {
                    wire_type,
                    expected: 16,
                    actual: bytes.len(),
                });
            }
            buf.extend_from_slice(bytes);
        }
    }
    Ok(())
}

/// Encode a value as `wire_type` into a fresh buffer.
#[inline]
pub fn encode<V: ScalarSerialize + ?Sized>(
    value: &V,
    wire_type: WireType,
) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(wire_type.fixed_width().unwrap_or(16));
    encode_into(&mut buf, value, wire_type)?;
    Ok(buf)
}

fn integer<V: ScalarSerialize + ?Sized>(value: &V, wire_type: WireType) -> Result<i64, CodecError> {
    if let Some(i) = value.as_i64() {
        return Ok(i);
    }
    // Whole floats are accepted; JSON numbers often arrive that way.
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        Some(_) => Err(CodecError::OutOfRange(wire_type)),
        None => Err(CodecError::ValueMismatch {
            wire_type,
            actual: value.kind(),
        }),
    }
}

/// Minimal two's-complement big-endian encoding.
fn write_varint(buf: &mut Vec<u8>, i: i64) {
    let bytes = i.to_be_bytes();
    let mut start = 0;
    while start < 7 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    buf.extend_from_slice(&bytes[start..]);
}
