//! # frc-filter-tool: WPILOG decoder and filter pipeline
//!
//! Decodes WPILOG telemetry buffers into named numeric channels and runs them
//! through a directed graph of causal digital filters.
//!
//! ## Architecture
//!
//! - **wpilog**: Lazy record decoder, entry catalog and channel reconstruction
//! - **filter**: Butterworth and LowPass designs behind the [`FilterModel`] trait
//! - **pipeline**: [`PipelineGraph`] of filter nodes, breadth-first batch propagation
//! - **source**: Log replay and live sample sources feeding the graph through bounded queues
//! - **analysis**: FFT spectra and measured filter responses
//!
//! ## Configuration
//!
//! Tool settings (filter defaults, source tuning, logging) are stored under
//! `frc-filter-tool` in the platform config directory:
//!
//! - **Linux**: `~/.config/frc-filter-tool/config.toml`
//! - **macOS**: `~/Library/Application Support/frc-filter-tool/config.toml`
//! - **Windows**: `%APPDATA%\frc-filter-tool\config.toml`
//!
//! ## Example
//!
//! ```ignore
//! use frc_filter_tool::{LogChannels, NodeKind, ParameterMap, PipelineGraph};
//!
//! let bytes = std::fs::read("robot.wpilog")?;
//! let log = LogChannels::from_bytes(&bytes)?;
//! let input = log.values("/drive/left/velocity").unwrap_or_default();
//!
//! let mut graph = PipelineGraph::new();
//! let mut params = ParameterMap::new();
//! params.insert("cutoffFreq".to_string(), 5.0);
//! params.insert("sampleRate".to_string(), 50.0);
//! graph.add_filter_node(NodeKind::LowPass, params)?;
//!
//! let smoothed = graph.process_data(input);
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod source;
pub mod types;
pub mod wpilog;

// Re-export commonly used types
pub use config::ToolConfig;
pub use error::{FilterToolError, Result, ResultExt};
pub use filter::{DesignParams, FilterError, FilterKind, FilterModel, ParameterMap};
pub use pipeline::{NodeId, NodeKind, PipelineGraph};
pub use source::{InputSource, LiveSource, LogFileSource, SampleSource};
pub use types::{Channel, DataPoint, EntryType};
pub use wpilog::{DecodeError, LogChannels, LogDecoder, LogRecord};
