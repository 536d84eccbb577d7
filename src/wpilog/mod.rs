//! WPILOG binary log decoding.
//!
//! A WPILOG buffer is an 8-byte header (`WPILOG` magic + little-endian
//! version `0x0100`) followed by a stream of variable-width records:
//!
//! ```text
//! ┌─────────┬──────────┬──────────┬───────────────┬─────────────┐
//! │ control │ entry id │   size   │   timestamp   │   payload   │
//! │  1 byte │  1..=4 B │  1..=4 B │    1..=8 B    │  size bytes │
//! └─────────┴──────────┴──────────┴───────────────┴─────────────┘
//! ```
//!
//! Records with entry id 0 are control records that declare, finish, or
//! annotate entries; all other records carry one sample of a declared
//! entry. [`LogDecoder`] yields borrowed [`LogRecord`]s lazily,
//! [`ChannelBuilder`] folds them into named numeric [`Channel`]s.
//!
//! [`Channel`]: crate::types::Channel

pub mod catalog;
pub mod decoder;
pub mod error;
pub mod record;
pub mod writer;

pub use catalog::{ChannelBuilder, EntryCatalog, EntryInfo, LogChannels};
pub use decoder::{is_valid, LogDecoder, Records, HEADER_SIZE, MAGIC, VERSION};
pub use error::{DecodeError, WriteError};
pub use record::{ControlRecord, LogRecord, StartRecord, CONTROL_ENTRY};
pub use writer::LogWriter;
