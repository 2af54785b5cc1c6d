use crate::error::CodecError;
use smol_str::SmolStr;
use std::convert::TryFrom;

// ─── Number ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

/// Integers compare by value across `I64` and `U64`; floats only equal floats.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::F64(a), Number::F64(b)) => a == b,
            (Number::F64(_), _) | (_, Number::F64(_)) => false,
            (a, b) => a.as_i64() == b.as_i64() && a.as_u64() == b.as_u64(),
        }
    }
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::I64(i) => i as f64,
            Number::U64(u) => u as f64,
            Number::F64(f) => f,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::I64(i) => Some(i),
            Number::U64(u) => i64::try_from(u).ok(),
            Number::F64(f) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }

    pub fn as_u64(self) -> Option<u64> {
        match self {
            Number::U64(u) => Some(u),
            Number::I64(i) => u64::try_from(i).ok(),
            Number::F64(f) => {
                if f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64 {
                    Some(f as u64)
                } else {
                    None
                }
            }
        }
    }

    fn is_integer(self) -> bool {
        !matches!(self, Number::F64(_))
    }
}

// ─── Value ──────────────────────────────────────────────────────────────────

/// A record field's value as it travels between accessors and the scalar codec.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Str(SmolStr),
    Bytes(Vec<u8>),
    Uuid([u8; 16]),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(n) if n.is_integer() => "integer",
            Value::Number(_) => "float",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Uuid(_) => "uuid",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            Value::Uuid(u) => Some(u),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(Number::F64(n))
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(Number::F64(n as f64))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::I64(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::I64(n as i64))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(Number::U64(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<SmolStr> for Value {
    fn from(s: SmolStr) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<[u8; 16]> for Value {
    fn from(u: [u8; 16]) -> Self {
        Value::Uuid(u)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ─── TryFrom<Value> (field setters) ─────────────────────────────────────────

fn conversion(expected: &'static str, actual: &Value) -> CodecError {
    CodecError::Conversion {
        expected,
        actual: actual.kind(),
    }
}

impl TryFrom<Value> for i64 {
    type Error = CodecError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        v.as_i64().ok_or_else(|| conversion("i64", &v))
    }
}

impl TryFrom<Value> for i32 {
    type Error = CodecError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        v.as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .ok_or_else(|| conversion("i32", &v))
    }
}

impl TryFrom<Value> for u64 {
    type Error = CodecError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        v.as_u64().ok_or_else(|| conversion("u64", &v))
    }
}

impl TryFrom<Value> for f64 {
    type Error = CodecError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        v.as_f64().ok_or_else(|| conversion("f64", &v))
    }
}

impl TryFrom<Value> for f32 {
    type Error = CodecError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        v.as_f64()
            .map(|f| f as f32)
            .ok_or_else(|| conversion("f32", &v))
    }
}

impl TryFrom<Value> for bool {
    type Error = CodecError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        v.as_bool().ok_or_else(|| conversion("bool", &v))
    }
}

impl TryFrom<Value> for SmolStr {
    type Error = CodecError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Str(s) => Ok(s),
            other => Err(conversion("string", &other)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = CodecError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        SmolStr::try_from(v).map(|s| s.to_string())
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = CodecError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Bytes(b) => Ok(b),
            Value::Uuid(u) => Ok(u.to_vec()),
            Value::Str(s) => Ok(s.as_bytes().to_vec()),
            other => Err(conversion("bytes", &other)),
        }
    }
}

impl TryFrom<Value> for [u8; 16] {
    type Error = CodecError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Uuid(u) => Ok(u),
            Value::Bytes(ref b) => b
                .as_slice()
                .try_into()
                .map_err(|_| conversion("uuid", &v)),
            other => Err(conversion("uuid", &other)),
        }
    }
}

// ─── From/Into serde_json::Value ────────────────────────────────────────────

/// Arrays and objects have no scalar counterpart; they are kept as their JSON text.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Number(Number::U64(u))
                } else {
                    Value::Number(Number::F64(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => Value::Str(SmolStr::from(s)),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::Str(SmolStr::from(nested.to_string()))
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(val: Value) -> Self {
        match val {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => match n {
                Number::I64(i) => serde_json::json!(i),
                Number::U64(u) => serde_json::json!(u),
                Number::F64(f) => serde_json::json!(f),
            },
            Value::Str(s) => serde_json::Value::String(s.to_string()),
            Value::Bytes(b) => serde_json::Value::Array(b.into_iter().map(Into::into).collect()),
            Value::Uuid(u) => serde_json::Value::Array(u.into_iter().map(Into::into).collect()),
        }
    }
}
