//! Record types produced by the decoder.
//!
//! A [`LogRecord`] borrows its payload from the scanned buffer and is only
//! valid for the duration of the scan. Control payloads (entry id 0) are
//! parsed on demand into a [`ControlRecord`].

use crate::wpilog::error::{DecodeError, WriteError};

/// Entry id reserved for control records.
pub const CONTROL_ENTRY: u32 = 0;

const CONTROL_START: u8 = 0;
const CONTROL_FINISH: u8 = 1;
const CONTROL_SET_METADATA: u8 = 2;

/// One decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord<'a> {
    /// Entry this record belongs to (0 = control).
    pub entry_id: u32,
    /// Timestamp in microseconds.
    pub timestamp: i64,
    /// Raw payload bytes.
    pub payload: &'a [u8],
}

impl<'a> LogRecord<'a> {
    pub fn new(entry_id: u32, timestamp: i64, payload: &'a [u8]) -> Self {
        Self {
            entry_id,
            timestamp,
            payload,
        }
    }

    /// Whether this is a control record.
    #[inline]
    pub fn is_control(&self) -> bool {
        self.entry_id == CONTROL_ENTRY
    }

    /// Parse the control payload. Fails for data records and malformed payloads.
    pub fn control(&self) -> Result<ControlRecord<'a>, DecodeError> {
        if !self.is_control() {
            return Err(DecodeError::MalformedControl(format!(
                "entry {} is not a control record",
                self.entry_id
            )));
        }
        ControlRecord::parse(self.payload)
    }
}

/// Declaration of a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartRecord<'a> {
    pub entry_id: u32,
    pub name: &'a str,
    pub type_name: &'a str,
    pub metadata: &'a str,
}

/// Parsed control payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRecord<'a> {
    Start(StartRecord<'a>),
    Finish { entry_id: u32 },
    SetMetadata { entry_id: u32, metadata: &'a str },
}

impl<'a> ControlRecord<'a> {
    /// Parse a control payload: kind byte, target entry id, then the
    /// length-prefixed strings of the kind.
    pub fn parse(payload: &'a [u8]) -> Result<Self, DecodeError> {
        let mut reader = PayloadReader::new(payload);
        let kind = reader.u8()?;
        let entry_id = reader.u32()?;

        match kind {
            CONTROL_START => {
                let name = reader.string()?;
                let type_name = reader.string()?;
                // Metadata is optional on start records.
                let metadata = if reader.is_empty() {
                    ""
                } else {
                    reader.string()?
                };
                Ok(ControlRecord::Start(StartRecord {
                    entry_id,
                    name,
                    type_name,
                    metadata,
                }))
            }
            CONTROL_FINISH => Ok(ControlRecord::Finish { entry_id }),
            CONTROL_SET_METADATA => Ok(ControlRecord::SetMetadata {
                entry_id,
                metadata: reader.string()?,
            }),
            other => Err(DecodeError::UnknownControlKind(other)),
        }
    }

    /// Entry the control record targets.
    pub fn entry_id(&self) -> u32 {
        match self {
            ControlRecord::Start(start) => start.entry_id,
            ControlRecord::Finish { entry_id } => *entry_id,
            ControlRecord::SetMetadata { entry_id, .. } => *entry_id,
        }
    }

    /// Encode into a control payload. Fails if a string is too long for its
    /// length prefix.
    pub fn encode(&self) -> Result<Vec<u8>, WriteError> {
        let mut out = Vec::new();
        match self {
            ControlRecord::Start(start) => {
                out.push(CONTROL_START);
                out.extend_from_slice(&start.entry_id.to_le_bytes());
                push_string(&mut out, start.name)?;
                push_string(&mut out, start.type_name)?;
                push_string(&mut out, start.metadata)?;
            }
            ControlRecord::Finish { entry_id } => {
                out.push(CONTROL_FINISH);
                out.extend_from_slice(&entry_id.to_le_bytes());
            }
            ControlRecord::SetMetadata { entry_id, metadata } => {
                out.push(CONTROL_SET_METADATA);
                out.extend_from_slice(&entry_id.to_le_bytes());
                push_string(&mut out, metadata)?;
            }
        }
        Ok(out)
    }
}

/// `len` as a 32-bit length field.
pub(crate) fn length_field(what: &'static str, len: usize) -> Result<u32, WriteError> {
    u32::try_from(len).map_err(|_| WriteError::TooLong { what, len })
}

fn push_string(out: &mut Vec<u8>, s: &str) -> Result<(), WriteError> {
    let len = length_field("string", s.len())?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Little-endian cursor over a control payload.
struct PayloadReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                DecodeError::MalformedControl(format!(
                    "need {} bytes at offset {}, payload is {} bytes",
                    len,
                    self.pos,
                    self.data.len()
                ))
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn string(&mut self) -> Result<&'a str, DecodeError> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map_err(|e| DecodeError::MalformedControl(format!("invalid UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_with_metadata() {
        let payload = ControlRecord::Start(StartRecord {
            entry_id: 7,
            name: "/drive/left",
            type_name: "double",
            metadata: "{\"unit\":\"m\"}",
        })
        .encode()
        .unwrap();

        match ControlRecord::parse(&payload).unwrap() {
            ControlRecord::Start(start) => {
                assert_eq!(start.entry_id, 7);
                assert_eq!(start.name, "/drive/left");
                assert_eq!(start.type_name, "double");
                assert_eq!(start.metadata, "{\"unit\":\"m\"}");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_start_without_metadata() {
        let mut payload = vec![CONTROL_START];
        payload.extend_from_slice(&3u32.to_le_bytes());
        push_string(&mut payload, "temp").unwrap();
        push_string(&mut payload, "double").unwrap();

        let record = ControlRecord::parse(&payload).unwrap();
        assert_eq!(
            record,
            ControlRecord::Start(StartRecord {
                entry_id: 3,
                name: "temp",
                type_name: "double",
                metadata: "",
            })
        );
    }

    #[test]
    fn test_parse_finish() {
        let payload = [CONTROL_FINISH, 9, 0, 0, 0];
        assert_eq!(
            ControlRecord::parse(&payload).unwrap(),
            ControlRecord::Finish { entry_id: 9 }
        );
    }

    #[test]
    fn test_truncated_name_is_malformed() {
        let mut payload = vec![CONTROL_START, 1, 0, 0, 0];
        payload.extend_from_slice(&10u32.to_le_bytes());
        payload.extend_from_slice(b"abc");
        assert!(matches!(
            ControlRecord::parse(&payload),
            Err(DecodeError::MalformedControl(_))
        ));
    }

    #[test]
    fn test_unknown_kind() {
        let payload = [5, 1, 0, 0, 0];
        assert_eq!(
            ControlRecord::parse(&payload),
            Err(DecodeError::UnknownControlKind(5))
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_length_field_rejects_oversize() {
        assert_eq!(length_field("string", 5), Ok(5));
        assert_eq!(length_field("string", u32::MAX as usize), Ok(u32::MAX));
        assert_eq!(
            length_field("payload", u32::MAX as usize + 1),
            Err(WriteError::TooLong {
                what: "payload",
                len: u32::MAX as usize + 1
            })
        );
    }

    #[test]
    fn test_control_entry_detection() {
        let bytes = 23.5f64.to_le_bytes();
        let record = LogRecord::new(1, 100, &bytes);
        assert!(!record.is_control());
        assert!(record.control().is_err());
        assert!(LogRecord::new(CONTROL_ENTRY, 0, &[CONTROL_FINISH, 1, 0, 0, 0]).is_control());
    }
}
