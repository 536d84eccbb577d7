//! Sample sources feeding the pipeline
//!
//! A source runs one background acquisition thread that fills a bounded
//! [`SampleQueue`]; the pipeline drains it through [`SampleSource::get_data`]
//! on its own thread without blocking.
//!
//! # Sources
//!
//! - [`LogFileSource`] - replays one channel of a WPILOG or text column log in batches
//! - [`LiveSource`] - forwards samples pushed by an external telemetry client
//!
//! [`InputSource`] is the closed set of sources a pipeline node can be bound to.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use frc_filter_tool::source::{InputSource, LiveSource, SampleSource};
//!
//! let (live, sender) = LiveSource::channel(&Default::default());
//! let source = Arc::new(InputSource::from(live));
//! source.start()?;
//! sender.send(1.0)?;
//! let samples = source.get_data();
//! source.stop();
//! ```

pub mod live;
pub mod log_file;
pub mod queue;
pub mod text_log;
pub mod worker;

pub use live::{LiveEndpoint, LiveSource};
pub use log_file::LogFileSource;
pub use queue::SampleQueue;
pub use text_log::TextLog;
pub use worker::Acquisition;

use crate::error::Result;

/// Capability shared by all sample sources.
///
/// Methods take `&self` so a source can be shared behind an `Arc` between the
/// owner and the pipeline nodes bound to it.
pub trait SampleSource: Send + Sync {
    /// Short human-readable description
    fn describe(&self) -> String;

    /// The source is acquiring, or still holds undelivered samples
    fn is_connected(&self) -> bool;

    /// Take every sample buffered so far; empty if none
    fn get_data(&self) -> Vec<f64>;

    /// Start acquisition. Starting a running source is a no-op that returns
    /// `Ok(false)`.
    fn start(&self) -> Result<bool>;

    /// Stop acquisition and join the worker thread
    fn stop(&self);

    /// Samples lost to queue eviction
    fn dropped_samples(&self) -> u64 {
        0
    }
}

/// Sources a pipeline node can be bound to
#[derive(Debug)]
pub enum InputSource {
    LogFile(LogFileSource),
    Live(LiveSource),
}

impl InputSource {
    fn inner(&self) -> &dyn SampleSource {
        match self {
            InputSource::LogFile(source) => source,
            InputSource::Live(source) => source,
        }
    }
}

impl SampleSource for InputSource {
    fn describe(&self) -> String {
        self.inner().describe()
    }

    fn is_connected(&self) -> bool {
        self.inner().is_connected()
    }

    fn get_data(&self) -> Vec<f64> {
        self.inner().get_data()
    }

    fn start(&self) -> Result<bool> {
        self.inner().start()
    }

    fn stop(&self) {
        self.inner().stop()
    }

    fn dropped_samples(&self) -> u64 {
        self.inner().dropped_samples()
    }
}

impl From<LogFileSource> for InputSource {
    fn from(source: LogFileSource) -> Self {
        InputSource::LogFile(source)
    }
}

impl From<LiveSource> for InputSource {
    fn from(source: LiveSource) -> Self {
        InputSource::Live(source)
    }
}
