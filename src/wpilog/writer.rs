//! Minimal-width WPILOG encoder.
//!
//! Produces buffers the decoder reads back. Entry ids, sizes and timestamps
//! use the fewest bytes that hold them; negative timestamps always use the
//! full 8 bytes since only that width carries a sign.

use crate::wpilog::decoder::{MAGIC, VERSION};
use crate::wpilog::error::WriteError;
use crate::wpilog::record::{length_field, ControlRecord, StartRecord, CONTROL_ENTRY};

/// In-memory log writer.
#[derive(Debug, Clone)]
pub struct LogWriter {
    buf: Vec<u8>,
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogWriter {
    /// New buffer holding just the header.
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(1024);
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&VERSION.to_le_bytes());
        Self { buf }
    }

    /// Declare an entry.
    pub fn start(
        &mut self,
        entry_id: u32,
        name: &str,
        type_name: &str,
        metadata: &str,
        timestamp: i64,
    ) -> Result<&mut Self, WriteError> {
        let payload = ControlRecord::Start(StartRecord {
            entry_id,
            name,
            type_name,
            metadata,
        })
        .encode()?;
        self.append_raw(CONTROL_ENTRY, timestamp, &payload)
    }

    pub fn finish(&mut self, entry_id: u32, timestamp: i64) -> Result<&mut Self, WriteError> {
        let payload = ControlRecord::Finish { entry_id }.encode()?;
        self.append_raw(CONTROL_ENTRY, timestamp, &payload)
    }

    pub fn set_metadata(
        &mut self,
        entry_id: u32,
        metadata: &str,
        timestamp: i64,
    ) -> Result<&mut Self, WriteError> {
        let payload = ControlRecord::SetMetadata { entry_id, metadata }.encode()?;
        self.append_raw(CONTROL_ENTRY, timestamp, &payload)
    }

    pub fn append_bool(&mut self, entry_id: u32, timestamp: i64, value: bool) -> &mut Self {
        self.push_record(entry_id, timestamp, 1, &[u8::from(value)])
    }

    pub fn append_int64(&mut self, entry_id: u32, timestamp: i64, value: i64) -> &mut Self {
        self.push_record(entry_id, timestamp, 8, &value.to_le_bytes())
    }

    pub fn append_float(&mut self, entry_id: u32, timestamp: i64, value: f32) -> &mut Self {
        self.push_record(entry_id, timestamp, 4, &value.to_le_bytes())
    }

    pub fn append_double(&mut self, entry_id: u32, timestamp: i64, value: f64) -> &mut Self {
        self.push_record(entry_id, timestamp, 8, &value.to_le_bytes())
    }

    /// Append a record with an arbitrary payload. Fails if the payload is
    /// too long for the 32-bit size field.
    pub fn append_raw(
        &mut self,
        entry_id: u32,
        timestamp: i64,
        payload: &[u8],
    ) -> Result<&mut Self, WriteError> {
        let size = length_field("payload", payload.len())?;
        Ok(self.push_record(entry_id, timestamp, size, payload))
    }

    fn push_record(&mut self, entry_id: u32, timestamp: i64, size: u32, payload: &[u8]) -> &mut Self {
        let entry_len = byte_width(u64::from(entry_id));
        let size_len = byte_width(u64::from(size));
        let ts_len = if timestamp < 0 {
            8
        } else {
            byte_width(timestamp as u64)
        };

        let control = (entry_len - 1) as u8
            | (((size_len - 1) as u8) << 2)
            | (((ts_len - 1) as u8) << 4);
        self.buf.push(control);
        self.buf
            .extend_from_slice(&entry_id.to_le_bytes()[..entry_len]);
        self.buf.extend_from_slice(&size.to_le_bytes()[..size_len]);
        self.buf.extend_from_slice(&timestamp.to_le_bytes()[..ts_len]);
        self.buf.extend_from_slice(payload);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when only the header has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.len() <= MAGIC.len() + 2
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Write the buffer to disk.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.buf)
    }
}

/// Bytes needed to hold `value`, at least one.
fn byte_width(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(8).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wpilog::decoder::LogDecoder;

    #[test]
    fn test_byte_width() {
        assert_eq!(byte_width(0), 1);
        assert_eq!(byte_width(0xFF), 1);
        assert_eq!(byte_width(0x100), 2);
        assert_eq!(byte_width(u32::MAX as u64), 4);
        assert_eq!(byte_width(u64::MAX), 8);
    }

    #[test]
    fn test_control_byte_layout() {
        let mut writer = LogWriter::new();
        writer.append_raw(0x1234, 0x0001_0000, &[1, 2, 3]).unwrap();
        let bytes = writer.as_bytes();
        // entry 2 bytes, size 1 byte, timestamp 3 bytes
        assert_eq!(bytes[8], 0b0010_0001);
        assert_eq!(bytes.len(), 8 + 1 + 2 + 1 + 3 + 3);
    }

    #[test]
    fn test_negative_timestamp_uses_full_width() {
        let mut writer = LogWriter::new();
        writer.append_double(1, -1_000, 2.0);
        let bytes = writer.into_bytes();
        assert_eq!((bytes[8] >> 4) & 0x07, 7);

        let records = LogDecoder::new(&bytes).decode_all().unwrap();
        assert_eq!(records[0].timestamp, -1_000);
        assert_eq!(records[0].payload, &2.0f64.to_le_bytes());
    }

    #[test]
    fn test_empty() {
        let mut writer = LogWriter::new();
        assert!(writer.is_empty());
        writer.finish(1, 0).unwrap();
        assert!(!writer.is_empty());
    }
}
