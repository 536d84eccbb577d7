//! Entry catalog and channel reconstruction.
//!
//! [`EntryCatalog`] tracks `entry id → {name, type}` as control records are
//! observed. [`ChannelBuilder`] drives a catalog over a record stream and
//! appends every numeric data sample to the channel named by its entry.

use std::collections::{BTreeMap, HashMap};

use crate::types::{Channel, DataPoint, EntryType};
use crate::wpilog::decoder::LogDecoder;
use crate::wpilog::error::DecodeError;
use crate::wpilog::record::{ControlRecord, LogRecord};

/// One declared entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInfo {
    pub entry_id: u32,
    pub name: String,
    pub entry_type: EntryType,
    pub metadata: String,
    /// A finish record was seen. The entry stays in the catalog.
    pub finished: bool,
}

/// Mapping from entry id to its declaration.
///
/// Entries are only ever added or updated during a scan.
#[derive(Debug, Clone, Default)]
pub struct EntryCatalog {
    entries: BTreeMap<u32, EntryInfo>,
}

impl EntryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a record if it is a control record. Returns `true` when the
    /// catalog consumed it (malformed control payloads are consumed and ignored).
    pub fn observe(&mut self, record: &LogRecord<'_>) -> bool {
        if !record.is_control() {
            return false;
        }
        match record.control() {
            Ok(control) => self.apply(&control),
            Err(e) => {
                tracing::debug!(timestamp = record.timestamp, "Skipping control record: {}", e);
            }
        }
        true
    }

    /// Apply a parsed control record.
    pub fn apply(&mut self, control: &ControlRecord<'_>) {
        match control {
            ControlRecord::Start(start) => {
                let info = EntryInfo {
                    entry_id: start.entry_id,
                    name: start.name.to_string(),
                    entry_type: EntryType::parse(start.type_name),
                    metadata: start.metadata.to_string(),
                    finished: false,
                };
                if let Some(prev) = self.entries.insert(start.entry_id, info) {
                    tracing::debug!(
                        entry_id = start.entry_id,
                        "Entry redeclared (was '{}')",
                        prev.name
                    );
                }
            }
            ControlRecord::Finish { entry_id } => {
                if let Some(entry) = self.entries.get_mut(entry_id) {
                    entry.finished = true;
                }
            }
            ControlRecord::SetMetadata { entry_id, metadata } => {
                if let Some(entry) = self.entries.get_mut(entry_id) {
                    entry.metadata = metadata.to_string();
                }
            }
        }
    }

    pub fn get(&self, entry_id: u32) -> Option<&EntryInfo> {
        self.entries.get(&entry_id)
    }

    pub fn name_of(&self, entry_id: u32) -> Option<&str> {
        self.entries.get(&entry_id).map(|e| e.name.as_str())
    }

    /// Entry id of the first entry declared under `name`.
    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.entries
            .values()
            .find(|e| e.name == name)
            .map(|e| e.entry_id)
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &EntryInfo> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Folds a record stream into named channels.
#[derive(Debug, Default)]
pub struct ChannelBuilder {
    catalog: EntryCatalog,
    channels: Vec<Channel>,
    index: HashMap<String, usize>,
    skipped: usize,
}

impl ChannelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one record in stream order.
    pub fn consume(&mut self, record: &LogRecord<'_>) {
        if record.is_control() {
            match record.control() {
                Ok(control) => {
                    self.catalog.apply(&control);
                    if let ControlRecord::Start(start) = control {
                        if EntryType::parse(start.type_name).is_numeric() {
                            self.channel_index(start.name);
                        }
                    }
                }
                Err(e) => {
                    tracing::debug!(timestamp = record.timestamp, "Skipping control record: {}", e);
                }
            }
            return;
        }

        let Some(entry) = self.catalog.get(record.entry_id) else {
            self.skipped += 1;
            return;
        };
        let Some(value) = entry.entry_type.decode(record.payload) else {
            self.skipped += 1;
            return;
        };
        let name = entry.name.clone();
        let idx = self.channel_index(&name);
        self.channels[idx].push(record.timestamp, value);
    }

    fn channel_index(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.channels.len();
        self.channels.push(Channel::new(name));
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn catalog(&self) -> &EntryCatalog {
        &self.catalog
    }

    /// Data records that produced no sample so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn finish(self) -> LogChannels {
        LogChannels {
            catalog: self.catalog,
            channels: self.channels,
            index: self.index,
            skipped: self.skipped,
        }
    }
}

/// Result of one full decode pass.
#[derive(Debug, Clone, Default)]
pub struct LogChannels {
    catalog: EntryCatalog,
    channels: Vec<Channel>,
    index: HashMap<String, usize>,
    skipped: usize,
}

impl LogChannels {
    /// Decode a whole buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        let mut builder = ChannelBuilder::new();
        let records = LogDecoder::new(data).for_each(|record| builder.consume(record))?;
        let channels = builder.finish();
        tracing::debug!(
            records,
            entries = channels.catalog.len(),
            channels = channels.channels.len(),
            skipped = channels.skipped,
            "Decoded log"
        );
        Ok(channels)
    }

    pub fn catalog(&self) -> &EntryCatalog {
        &self.catalog
    }

    /// Channels in first-declaration order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.index.get(name).map(|&idx| &self.channels[idx])
    }

    /// Names of all numeric channels, in first-declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name.as_str()).collect()
    }

    /// Values of a channel, for feeding a pipeline.
    pub fn values(&self, name: &str) -> Option<Vec<f64>> {
        self.channel(name).map(Channel::values)
    }

    /// Samples of `name` with timestamps in `[start_us, end_us]`.
    /// Unknown channels yield an empty vector.
    pub fn range(&self, name: &str, start_us: i64, end_us: i64) -> Vec<DataPoint> {
        self.channel(name)
            .map(|c| c.range(start_us, end_us))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Data records that produced no sample (unknown entry or type, short payload).
    pub fn skipped_records(&self) -> usize {
        self.skipped
    }
}
