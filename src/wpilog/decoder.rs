//! Lazy record decoder over an in-memory WPILOG buffer.

use crate::wpilog::error::DecodeError;
use crate::wpilog::record::LogRecord;

/// Magic bytes at the start of every log.
pub const MAGIC: &[u8; 6] = b"WPILOG";

/// Supported format version (stored little-endian).
pub const VERSION: u16 = 0x0100;

/// Magic + version.
pub const HEADER_SIZE: usize = 8;

/// True iff `data` starts with the expected magic and version.
pub fn is_valid(data: &[u8]) -> bool {
    data.len() >= HEADER_SIZE
        && &data[..MAGIC.len()] == MAGIC
        && u16::from_le_bytes([data[6], data[7]]) == VERSION
}

/// Decoder over a borrowed log buffer.
///
/// Decoding never allocates: records borrow their payload from the buffer.
#[derive(Debug, Clone, Copy)]
pub struct LogDecoder<'a> {
    data: &'a [u8],
}

impl<'a> LogDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// See [`is_valid`].
    pub fn is_valid(&self) -> bool {
        is_valid(self.data)
    }

    /// Header version, if the buffer is long enough to carry one.
    pub fn version(&self) -> Option<u16> {
        (self.data.len() >= HEADER_SIZE).then(|| u16::from_le_bytes([self.data[6], self.data[7]]))
    }

    /// Lazily iterate over all complete records.
    pub fn records(&self) -> Result<Records<'a>, DecodeError> {
        if !self.is_valid() {
            return Err(DecodeError::InvalidHeader);
        }
        Ok(Records {
            data: self.data,
            pos: HEADER_SIZE,
        })
    }

    /// Visit every complete record in order. Returns the number visited.
    ///
    /// Nothing is visited when the header is invalid.
    pub fn for_each<F>(&self, mut visitor: F) -> Result<usize, DecodeError>
    where
        F: FnMut(&LogRecord<'a>),
    {
        let mut count = 0;
        for record in self.records()? {
            visitor(&record);
            count += 1;
        }
        Ok(count)
    }

    /// Collect every record. Mostly useful in tests and tools.
    pub fn decode_all(&self) -> Result<Vec<LogRecord<'a>>, DecodeError> {
        Ok(self.records()?.collect())
    }
}

/// Iterator returned by [`LogDecoder::records`].
///
/// Stops at the end of the buffer or at the first truncated record.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Records<'a> {
    /// Byte offset of the next record.
    pub fn offset(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = LogRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        match decode_at(self.data, self.pos) {
            Some((record, len)) => {
                self.pos += len;
                Some(record)
            }
            None => {
                tracing::debug!(
                    offset = self.pos,
                    len = self.data.len(),
                    "Truncated trailing record, ending scan"
                );
                self.pos = self.data.len();
                None
            }
        }
    }
}

impl std::iter::FusedIterator for Records<'_> {}

/// Decode one record at `pos`. Returns the record and its total length, or
/// `None` if the buffer ends before the record does.
fn decode_at(data: &[u8], pos: usize) -> Option<(LogRecord<'_>, usize)> {
    let control = *data.get(pos)?;
    let entry_len = (control & 0x03) as usize + 1;
    let size_len = ((control >> 2) & 0x03) as usize + 1;
    let ts_len = ((control >> 4) & 0x07) as usize + 1;
    let header_len = 1 + entry_len + size_len + ts_len;

    let header = data.get(pos..pos.checked_add(header_len)?)?;
    let (entry_bytes, rest) = header[1..].split_at(entry_len);
    let (size_bytes, ts_bytes) = rest.split_at(size_len);

    let entry_id = read_uint(entry_bytes) as u32;
    let size = read_uint(size_bytes) as usize;
    let timestamp = read_timestamp(ts_bytes);

    let start = pos + header_len;
    let payload = data.get(start..start.checked_add(size)?)?;

    Some((LogRecord::new(entry_id, timestamp, payload), header_len + size))
}

fn read_uint(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .rev()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Only a full 8-byte timestamp carries a sign bit; narrower encodings are
/// zero-extended.
fn read_timestamp(bytes: &[u8]) -> i64 {
    match <[u8; 8]>::try_from(bytes) {
        Ok(full) => i64::from_le_bytes(full),
        Err(_) => read_uint(bytes) as i64,
    }
}
