//! Core data types for frc-filter-tool
//!
//! # Main Types
//!
//! - [`EntryType`] - Declared type of a log entry (boolean, int64, float, double, ...)
//! - [`DataPoint`] - A single timestamped sample
//! - [`Channel`] - Named, ordered sequence of samples derived from one log entry
//!
//! Only the numeric types produce samples; everything else the log may
//! declare (strings, raw blobs, arrays, structs) is carried as
//! [`EntryType::Other`] and skipped when channels are built.

use serde::{Deserialize, Serialize};

/// Declared type of a log entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    /// One byte, nonzero is true
    Boolean,
    /// 8-byte little-endian signed integer
    Int64,
    /// 4-byte IEEE float
    Float,
    /// 8-byte IEEE double
    Double,
    /// Any type without a numeric interpretation
    Other(String),
}

impl EntryType {
    /// Parse the type string carried by a start record.
    pub fn parse(type_name: &str) -> Self {
        match type_name {
            "boolean" => EntryType::Boolean,
            "int64" | "integer" | "int" => EntryType::Int64,
            "float" => EntryType::Float,
            "double" => EntryType::Double,
            other => EntryType::Other(other.to_string()),
        }
    }

    /// Returns the payload size in bytes, if numeric
    pub fn size_bytes(&self) -> Option<usize> {
        match self {
            EntryType::Boolean => Some(1),
            EntryType::Float => Some(4),
            EntryType::Int64 | EntryType::Double => Some(8),
            EntryType::Other(_) => None,
        }
    }

    /// Whether samples of this type become channel values
    pub fn is_numeric(&self) -> bool {
        self.size_bytes().is_some()
    }

    /// Interpret a data payload as a sample value.
    ///
    /// Returns `None` for non-numeric types and short payloads.
    pub fn decode(&self, bytes: &[u8]) -> Option<f64> {
        let size = self.size_bytes()?;
        if bytes.len() < size {
            return None;
        }

        Some(match self {
            EntryType::Boolean => {
                if bytes[0] != 0 {
                    1.0
                } else {
                    0.0
                }
            }
            EntryType::Int64 => i64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]) as f64,
            EntryType::Float => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
            EntryType::Double => f64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
            EntryType::Other(_) => return None,
        })
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::Boolean => write!(f, "boolean"),
            EntryType::Int64 => write!(f, "int64"),
            EntryType::Float => write!(f, "float"),
            EntryType::Double => write!(f, "double"),
            EntryType::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A single timestamped sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Microseconds, as recorded in the log
    pub timestamp: i64,
    pub value: f64,
}

impl DataPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl From<(i64, f64)> for DataPoint {
    fn from((timestamp, value): (i64, f64)) -> Self {
        Self { timestamp, value }
    }
}

/// Named sequence of samples reconstructed from a log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub points: Vec<DataPoint>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, timestamp: i64, value: f64) {
        self.points.push(DataPoint::new(timestamp, value));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values only, in order. This is the form the pipeline consumes.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Timestamps only, in order.
    pub fn timestamps(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Samples whose timestamp lies in `[start, end]`.
    pub fn range(&self, start: i64, end: i64) -> Vec<DataPoint> {
        self.points
            .iter()
            .filter(|p| p.timestamp >= start && p.timestamp <= end)
            .copied()
            .collect()
    }

    /// `(timestamp, value)` pairs, in order.
    pub fn as_pairs(&self) -> Vec<(i64, f64)> {
        self.points.iter().map(|p| (p.timestamp, p.value)).collect()
    }
}
