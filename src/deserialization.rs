use super::error::CodecError;
use super::types::WireType;
use super::value::{Number, Value};
use smol_str::SmolStr;

// ─── ScalarDeserialize Trait ────────────────────────────────────────────────

/// Trait for value types that can be rebuilt by the scalar codec.
///
/// Mirrors [`ScalarSerialize`](crate::serialization::ScalarSerialize): Value
/// and serde_json::Value both decode from the same wire bytes.
pub trait ScalarDeserialize: Sized {
    /// Construct a null value.
    fn from_null() -> Self;

    /// Construct a boolean value.
    fn from_bool(b: bool) -> Self;

    /// Construct an i64 value.
    fn from_i64(v: i64) -> Self;

    /// Construct an f64 value.
    fn from_f64(v: f64) -> Self;

    /// Construct a string value.
    fn from_str(s: &str) -> Self;

    /// Construct a bytes value.
    fn from_bytes(b: &[u8]) -> Self;

    /// Construct a 16 byte identifier.
    fn from_uuid(u: [u8; 16]) -> Self;
}

// ─── ScalarDeserialize for Value ────────────────────────────────────────────

impl ScalarDeserialize for Value {
    #[inline]
    fn from_null() -> Self {
        Value::Null
    }

    #[inline]
    fn from_bool(b: bool) -> Self {
        Value::Bool(b)
    }

    #[inline]
    fn from_i64(v: i64) -> Self {
        Value::Number(Number::I64(v))
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        Value::Number(Number::F64(v))
    }

    #[inline]
    fn from_str(s: &str) -> Self {
        Value::Str(SmolStr::from(s))
    }

    #[inline]
    fn from_bytes(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }

    #[inline]
    fn from_uuid(u: [u8; 16]) -> Self {
        Value::Uuid(u)
    }
}

// ─── ScalarDeserialize for serde_json::Value ────────────────────────────────

impl ScalarDeserialize for serde_json::Value {
    #[inline]
    fn from_null() -> Self {
        serde_json::Value::Null
    }

    #[inline]
    fn from_bool(b: bool) -> Self {
        serde_json::Value::Bool(b)
    }

    #[inline]
    fn from_i64(v: i64) -> Self {
        serde_json::Value::Number(v.into())
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        serde_json::Number::from_f64(v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }

    #[inline]
    fn from_str(s: &str) -> Self {
        serde_json::Value::String(s.to_string())
    }

    #[inline]
    fn from_bytes(b: &[u8]) -> Self {
        serde_json::Value::Array(b.iter().map(|&x| x.into()).collect())
    }

    #[inline]
    fn from_uuid(u: [u8; 16]) -> Self {
        Self::from_bytes(&u)
    }
}

// ─── Decode ─────────────────────────────────────────────────────────────────

#[inline]
fn fixed<const N: usize>(data: &[u8], wire_type: WireType) -> Result<[u8; N], CodecError> {
    data.try_into().map_err(|_| CodecError::InvalidLength {
        wire_type,
        expected: N,
        actual: data.len(),
    })
}

/// Decode `data` as `wire_type` into any value type that implements ScalarDeserialize.
///
/// Empty input decodes to null, except for the string and bytes types where
/// it is the empty value.
pub fn decode<V: ScalarDeserialize>(data: &[u8], wire_type: WireType) -> Result<V, CodecError> {
    if data.is_empty() {
        return Ok(match wire_type {
            WireType::Bytes => V::from_bytes(data),
            WireType::Ascii | WireType::Utf8 => V::from_str(""),
            _ => V::from_null(),
        });
    }

    Ok(match wire_type {
        WireType::Bytes => V::from_bytes(data),
        WireType::Ascii => {
            if !data.is_ascii() {
                return Err(CodecError::NotAscii);
            }
            // ASCII is always valid UTF-8
            V::from_str(std::str::from_utf8(data).map_err(|_| CodecError::NotAscii)?)
        }
        WireType::Utf8 => {
            V::from_str(std::str::from_utf8(data).map_err(|_| CodecError::InvalidUtf8(wire_type))?)
        }
        WireType::Long | WireType::Date | WireType::Counter => {
            V::from_i64(i64::from_be_bytes(fixed(data, wire_type)?))
        }
        WireType::Int32 => V::from_i64(i32::from_be_bytes(fixed(data, wire_type)?) as i64),
        WireType::Integer => V::from_i64(read_varint(data)?),
        WireType::Boolean => {
            let [b] = fixed::<1>(data, wire_type)?;
            V::from_bool(b != 0)
        }
        WireType::Float => V::from_f64(f32::from_be_bytes(fixed(data, wire_type)?) as f64),
        WireType::Double => V::from_f64(f64::from_be_bytes(fixed(data, wire_type)?)),
        WireType::Uuid | WireType::TimeUuid | WireType::LexicalUuid => {
            V::from_uuid(fixed(data, wire_type)?)
        }
    })
}

fn read_varint(data: &[u8]) -> Result<i64, CodecError> {
    if data.len() > 8 {
        return Err(CodecError::OutOfRange(WireType::Integer));
    }
    // Sign-extend from the first byte.
    let fill = if data[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut bytes = [fill; 8];
    bytes[8 - data.len()..].copy_from_slice(data);
    Ok(i64::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::encode;

    #[test]
    fn test_decode_fixed_width() {
        assert_eq!(
            decode::<Value>(&[0, 0, 0, 0, 0, 0, 0, 5], WireType::Long).unwrap(),
            Value::from(5i64)
        );
        assert_eq!(
            decode::<Value>(&[0xFF, 0xFF, 0xFF, 0xFE], WireType::Int32).unwrap(),
            Value::from(-2i64)
        );
        assert_eq!(
            decode::<Value>(&[2], WireType::Boolean).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_decode_rejects_wrong_width() {
        assert_eq!(
            decode::<Value>(&[0, 1], WireType::Int32),
            Err(CodecError::InvalidLength {
                wire_type: WireType::Int32,
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn test_decode_varint() {
        for i in [0i64, 1, -1, 127, 128, -128, -129, i64::MAX, i64::MIN] {
            let bytes = encode(&Value::from(i), WireType::Integer).unwrap();
            assert_eq!(decode::<Value>(&bytes, WireType::Integer).unwrap(), Value::from(i));
        }
        assert!(decode::<Value>(&[1; 9], WireType::Integer).is_err());
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode::<Value>(&[], WireType::Long).unwrap(), Value::Null);
        assert_eq!(decode::<Value>(&[], WireType::Utf8).unwrap(), Value::from(""));
        assert_eq!(
            decode::<Value>(&[], WireType::Bytes).unwrap(),
            Value::Bytes(vec![])
        );
    }

    #[test]
    fn test_decode_strings() {
        assert_eq!(
            decode::<Value>(b"hello", WireType::Utf8).unwrap(),
            Value::from("hello")
        );
        assert_eq!(
            decode::<Value>(&[0xC3], WireType::Utf8),
            Err(CodecError::InvalidUtf8(WireType::Utf8))
        );
        assert_eq!(
            decode::<Value>(&[0xC3, 0xA9], WireType::Ascii),
            Err(CodecError::NotAscii)
        );
    }

    #[test]
    fn test_decode_into_json() {
        let v: serde_json::Value = decode(&[0, 0, 0, 9], WireType::Int32).unwrap();
        assert_eq!(v, serde_json::json!(9));
        let s: serde_json::Value = decode(b"x", WireType::Utf8).unwrap();
        assert_eq!(s, serde_json::json!("x"));
    }
}
