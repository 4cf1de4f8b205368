//! Stored Value Module
//!
//! Scalar values accepted by the object cache and the byte coercions used to
//! read them back.

use crate::error::{CacheError, Result};
use crate::instrument::Repr;

// == Stored Value ==
/// A scalar written verbatim into the backing store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Text(String),
    Bytes(Vec<u8>),
    Integer(i64),
    Float(f64),
}

impl StoredValue {
    /// Encodes the value the way it is written to the store.
    ///
    /// Integers and floats are stored as their decimal text so the store can
    /// treat them like any other string value.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            StoredValue::Text(text) => text.as_bytes().to_vec(),
            StoredValue::Bytes(bytes) => bytes.clone(),
            StoredValue::Integer(value) => value.to_string().into_bytes(),
            StoredValue::Float(value) => value.to_string().into_bytes(),
        }
    }
}

impl Repr for StoredValue {
    fn repr(&self) -> String {
        match self {
            StoredValue::Text(text) => text.repr(),
            StoredValue::Bytes(bytes) => bytes.repr(),
            StoredValue::Integer(value) => value.repr(),
            StoredValue::Float(value) => value.repr(),
        }
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::Text(value.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::Text(value)
    }
}

impl From<&[u8]> for StoredValue {
    fn from(value: &[u8]) -> Self {
        StoredValue::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for StoredValue {
    fn from(value: Vec<u8>) -> Self {
        StoredValue::Bytes(value)
    }
}

impl From<i64> for StoredValue {
    fn from(value: i64) -> Self {
        StoredValue::Integer(value)
    }
}

impl From<i32> for StoredValue {
    fn from(value: i32) -> Self {
        StoredValue::Integer(value.into())
    }
}

impl From<f64> for StoredValue {
    fn from(value: f64) -> Self {
        StoredValue::Float(value)
    }
}

// == Coercions ==
/// Decodes raw bytes as UTF-8 text.
pub fn decode_str(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw)
        .map_err(|err| CacheError::ValueConversion(format!("invalid UTF-8: {}", err)))
}

/// Parses raw bytes as a base-10 integer.
pub fn decode_int(raw: Vec<u8>) -> Result<i64> {
    let text = decode_str(raw)?;
    text.parse()
        .map_err(|_| CacheError::ValueConversion(format!("'{}' is not a base-10 integer", text)))
}

/// Parses raw bytes as a floating-point number.
pub fn decode_float(raw: Vec<u8>) -> Result<f64> {
    let text = decode_str(raw)?;
    text.parse()
        .map_err(|_| CacheError::ValueConversion(format!("'{}' is not a number", text)))
}
