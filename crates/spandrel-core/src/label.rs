//! Span Labels
//!
//! Labels are named annotations accumulated on a traced context while its
//! span is in flight and handed to the backend when the span finishes.
//! The value domain is a closed sum so every backend can translate the
//! full set to its own wire representation.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Label set carried by a traced context. Later writes to the same key
/// overwrite earlier ones.
pub type Labels = HashMap<String, LabelValue>;

/// A single label value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LabelValue {
    /// UTF-8 text
    Str(String),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// Boolean flag
    Bool(bool),
    /// Opaque binary payload
    Bytes(Vec<u8>),
}

impl LabelValue {
    /// Borrow the text value, if this is `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LabelValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value, if this is `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            LabelValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float value, if this is `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            LabelValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Boolean value, if this is `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LabelValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow the binary payload, if this is `Bytes`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            LabelValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Variant name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            LabelValue::Str(_) => "str",
            LabelValue::Int(_) => "int",
            LabelValue::Float(_) => "float",
            LabelValue::Bool(_) => "bool",
            LabelValue::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Str(s) => write!(f, "{}", s),
            LabelValue::Int(i) => write!(f, "{}", i),
            LabelValue::Float(x) => write!(f, "{}", x),
            LabelValue::Bool(b) => write!(f, "{}", b),
            LabelValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<&str> for LabelValue {
    fn from(s: &str) -> Self {
        LabelValue::Str(s.to_string())
    }
}

impl From<String> for LabelValue {
    fn from(s: String) -> Self {
        LabelValue::Str(s)
    }
}

impl From<i64> for LabelValue {
    fn from(i: i64) -> Self {
        LabelValue::Int(i)
    }
}

impl From<i32> for LabelValue {
    fn from(i: i32) -> Self {
        LabelValue::Int(i64::from(i))
    }
}

impl From<u32> for LabelValue {
    fn from(i: u32) -> Self {
        LabelValue::Int(i64::from(i))
    }
}

impl From<f64> for LabelValue {
    fn from(x: f64) -> Self {
        LabelValue::Float(x)
    }
}

impl From<f32> for LabelValue {
    fn from(x: f32) -> Self {
        LabelValue::Float(f64::from(x))
    }
}

impl From<bool> for LabelValue {
    fn from(b: bool) -> Self {
        LabelValue::Bool(b)
    }
}

impl From<Vec<u8>> for LabelValue {
    fn from(b: Vec<u8>) -> Self {
        LabelValue::Bytes(b)
    }
}

impl From<&[u8]> for LabelValue {
    fn from(b: &[u8]) -> Self {
        LabelValue::Bytes(b.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_pick_variant() {
        assert_eq!(LabelValue::from("query"), LabelValue::Str("query".into()));
        assert_eq!(LabelValue::from(42i64), LabelValue::Int(42));
        assert_eq!(LabelValue::from(7i32), LabelValue::Int(7));
        assert_eq!(LabelValue::from(1.5f64), LabelValue::Float(1.5));
        assert_eq!(LabelValue::from(true), LabelValue::Bool(true));
        assert_eq!(
            LabelValue::from(vec![0xde, 0xad]),
            LabelValue::Bytes(vec![0xde, 0xad])
        );
    }

    #[test]
    fn test_accessors_reject_other_variants() {
        let v = LabelValue::Int(9);
        assert_eq!(v.as_int(), Some(9));
        assert_eq!(v.as_str(), None);
        assert_eq!(v.as_bool(), None);
        assert_eq!(v.kind(), "int");
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(LabelValue::Str("hi".into()).to_string(), "hi");
        assert_eq!(LabelValue::Int(-3).to_string(), "-3");
        assert_eq!(LabelValue::Bool(false).to_string(), "false");
        assert_eq!(LabelValue::Bytes(vec![1, 2, 3]).to_string(), "<3 bytes>");
    }

    #[test]
    fn test_label_map_overwrite() {
        let mut labels = Labels::new();
        labels.insert("attempt".to_string(), LabelValue::from(1i64));
        labels.insert("attempt".to_string(), LabelValue::from(2i64));
        assert_eq!(labels.len(), 1);
        assert_eq!(labels["attempt"].as_int(), Some(2));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut labels = Labels::new();
        labels.insert("peer".to_string(), LabelValue::from("10.0.0.7"));
        labels.insert("retries".to_string(), LabelValue::from(3i64));
        let json = serde_json::to_string(&labels).expect("should serialize");
        let back: Labels = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(back, labels);
    }
}
