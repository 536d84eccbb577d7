//! Replays one channel of a log file as a sample stream.
//!
//! WPILOG files select a channel by entry name; text logs (CSV or whitespace
//! columns) select a column by header name.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::{Acquisition, SampleQueue, SampleSource, TextLog};
use crate::config::{LogFileType, SourceSettings};
use crate::error::{FilterToolError, Result, ResultExt};
use crate::wpilog::LogChannels;

/// File-backed source. The file is decoded once on open; each
/// [`start`](SampleSource::start) replays the channel from the beginning.
#[derive(Debug)]
pub struct LogFileSource {
    path: PathBuf,
    file_type: LogFileType,
    channel: String,
    fields: Vec<String>,
    samples: Arc<Vec<f64>>,
    queue: Arc<SampleQueue>,
    settings: SourceSettings,
    acquisition: Acquisition,
}

impl LogFileSource {
    /// Decode `path` and select `channel`. The file type comes from
    /// `settings.file_type`, else from the extension.
    pub fn open(path: impl AsRef<Path>, channel: &str, settings: &SourceSettings) -> Result<Self> {
        let path = path.as_ref();
        let file_type = settings.file_type_for(path);
        let (fields, samples) = load_channel(path, file_type, channel)?;
        tracing::debug!(?path, ?file_type, channel, samples = samples.len(), "Opened log source");
        Ok(Self::new(path.to_path_buf(), file_type, channel, fields, samples, settings))
    }

    /// Select `channel` from an already decoded WPILOG.
    pub fn from_channels(
        path: impl Into<PathBuf>,
        log: &LogChannels,
        channel: &str,
        settings: &SourceSettings,
    ) -> Result<Self> {
        let samples = log
            .values(channel)
            .ok_or_else(|| FilterToolError::UnknownChannel(channel.to_string()))?;
        let fields = log.field_names().into_iter().map(str::to_string).collect();
        Ok(Self::new(
            path.into(),
            LogFileType::Wpilog,
            channel,
            fields,
            samples,
            settings,
        ))
    }

    fn new(
        path: PathBuf,
        file_type: LogFileType,
        channel: &str,
        fields: Vec<String>,
        samples: Vec<f64>,
        settings: &SourceSettings,
    ) -> Self {
        Self {
            path,
            file_type,
            channel: channel.to_string(),
            fields,
            samples: Arc::new(samples),
            queue: Arc::new(SampleQueue::new(settings.queue_capacity)),
            settings: settings.clone(),
            acquisition: Acquisition::new(),
        }
    }

    /// Switch to another channel of the same file. Stops a running replay
    /// and discards buffered samples. On error the current channel is kept.
    pub fn select_channel(&mut self, channel: &str) -> Result<()> {
        let (fields, samples) = load_channel(&self.path, self.file_type, channel)?;
        self.acquisition.stop();
        self.queue.clear();
        self.channel = channel.to_string();
        self.fields = fields;
        self.samples = Arc::new(samples);
        tracing::debug!(channel, samples = self.samples.len(), "Selected channel");
        Ok(())
    }

    pub fn file_type(&self) -> LogFileType {
        self.file_type
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Numeric channels (or text columns) present in the file
    pub fn available_fields(&self) -> &[String] {
        &self.fields
    }

    /// Total samples in the selected channel
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Samples replayed but not yet taken
    pub fn buffered(&self) -> usize {
        self.queue.len()
    }
}

impl SampleSource for LogFileSource {
    fn describe(&self) -> String {
        format!("{}:{}", self.path.display(), self.channel)
    }

    fn is_connected(&self) -> bool {
        self.acquisition.is_running() || !self.queue.is_empty()
    }

    fn get_data(&self) -> Vec<f64> {
        self.queue.drain()
    }

    fn start(&self) -> Result<bool> {
        let samples = self.samples.clone();
        let queue = self.queue.clone();
        let batch_size = self.settings.batch_size.max(1);
        let interval = self.settings.poll_interval();

        self.acquisition.start("log-replay", move |running| {
            let mut position = 0;
            while running.load(Ordering::SeqCst) && position < samples.len() {
                let end = (position + batch_size).min(samples.len());
                let taken = queue.try_extend(&samples[position..end]);
                if taken == 0 {
                    tracing::trace!(position, "Replay waiting for reader");
                }
                position += taken;
                std::thread::sleep(interval);
            }
            running.store(false, Ordering::SeqCst);
            tracing::debug!(replayed = position, total = samples.len(), "Log replay ended");
        })
    }

    fn stop(&self) {
        self.acquisition.stop();
        self.queue.clear();
    }
}

/// Read `path` and return its field names plus the samples of `channel`.
fn load_channel(
    path: &Path,
    file_type: LogFileType,
    channel: &str,
) -> Result<(Vec<String>, Vec<f64>)> {
    match file_type {
        LogFileType::Wpilog => {
            let bytes =
                std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
            let log = LogChannels::from_bytes(&bytes)
                .with_context(|| format!("Failed to decode {:?}", path))?;
            let samples = log
                .values(channel)
                .ok_or_else(|| FilterToolError::UnknownChannel(channel.to_string()))?;
            let fields = log.field_names().into_iter().map(str::to_string).collect();
            Ok((fields, samples))
        }
        LogFileType::Csv => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let log = TextLog::parse(&content);
            if log.fields().is_empty() {
                return Err(FilterToolError::Source(format!(
                    "{:?} has no header row",
                    path
                )));
            }
            let samples = log
                .column(channel)
                .ok_or_else(|| FilterToolError::UnknownChannel(channel.to_string()))?
                .to_vec();
            Ok((log.fields().to_vec(), samples))
        }
    }
}

impl Drop for LogFileSource {
    fn drop(&mut self) {
        self.acquisition.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wpilog::LogWriter;
    use std::time::{Duration, Instant};

    fn write_log(dir: &Path, count: usize) -> PathBuf {
        let mut writer = LogWriter::new();
        writer.start(1, "/drive/velocity", "double", "", 0).unwrap();
        writer.start(2, "/drive/enabled", "boolean", "", 0).unwrap();
        for i in 0..count {
            writer.append_double(1, i as i64 * 20_000, i as f64);
        }
        let path = dir.join("match.wpilog");
        writer.save(&path).unwrap();
        path
    }

    fn settings(capacity: usize, batch: usize) -> SourceSettings {
        SourceSettings {
            queue_capacity: capacity,
            batch_size: batch,
            poll_interval_ms: 1,
            file_type: None,
        }
    }

    fn write_csv(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "time,left,right\n0.00,1.0,10.0\n0.02,2.0,\n0.04,3.0,30.0\n")
            .unwrap();
        path
    }

    fn collect(source: &LogFileSource, expected: usize) -> Vec<f64> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut received = Vec::new();
        while received.len() < expected {
            assert!(Instant::now() < deadline, "timed out");
            received.extend(source.get_data());
            std::thread::sleep(Duration::from_millis(1));
        }
        received
    }

    #[test]
    fn test_open_lists_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(dir.path(), 3);
        let source = LogFileSource::open(&path, "/drive/velocity", &settings(16, 4)).unwrap();

        assert_eq!(source.sample_count(), 3);
        assert_eq!(source.available_fields(), &["/drive/velocity", "/drive/enabled"]);
        assert!(source.describe().ends_with("match.wpilog:/drive/velocity"));
        assert!(!source.is_connected());
    }

    #[test]
    fn test_unknown_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(dir.path(), 1);
        let err = LogFileSource::open(&path, "/arm/angle", &settings(16, 4)).unwrap_err();
        assert!(matches!(err, FilterToolError::UnknownChannel(name) if name == "/arm/angle"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LogFileSource::open(dir.path().join("nope.wpilog"), "x", &settings(16, 4))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_not_a_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.wpilog");
        std::fs::write(&path, b"hello world").unwrap();
        let err = LogFileSource::open(&path, "x", &settings(16, 4)).unwrap_err();
        assert!(err.to_string().contains("Failed to decode"));
    }

    #[test]
    fn test_replay_with_back_pressure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(dir.path(), 100);
        // queue smaller than the channel forces the replay to wait on the reader
        let source = LogFileSource::open(&path, "/drive/velocity", &settings(8, 5)).unwrap();
        source.start().unwrap();

        let received = collect(&source, 100);
        assert_eq!(received, (0..100).map(|i| i as f64).collect::<Vec<_>>());
        assert_eq!(source.dropped_samples(), 0);
        source.stop();
        assert!(!source.is_connected());
    }

    #[test]
    fn test_restart_replays_from_beginning() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(dir.path(), 4);
        let source = LogFileSource::open(&path, "/drive/velocity", &settings(16, 16)).unwrap();

        source.start().unwrap();
        assert_eq!(collect(&source, 4), vec![0.0, 1.0, 2.0, 3.0]);
        source.stop();

        source.start().unwrap();
        assert_eq!(collect(&source, 4), vec![0.0, 1.0, 2.0, 3.0]);
        source.stop();
    }

    #[test]
    fn test_csv_column_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "drive.csv");
        let source = LogFileSource::open(&path, "right", &settings(16, 16)).unwrap();

        assert_eq!(source.file_type(), LogFileType::Csv);
        assert_eq!(source.available_fields(), &["left", "right"]);
        source.start().unwrap();
        assert_eq!(collect(&source, 3), vec![10.0, 10.0, 30.0]);
        source.stop();
    }

    #[test]
    fn test_configured_file_type_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "drive.log");
        let mut csv = settings(16, 16);

        let err = LogFileSource::open(&path, "left", &csv).unwrap_err();
        assert!(err.to_string().contains("Failed to decode"));

        csv.file_type = Some(LogFileType::Csv);
        let source = LogFileSource::open(&path, "left", &csv).unwrap();
        assert_eq!(source.sample_count(), 3);
    }

    #[test]
    fn test_csv_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "drive.csv");
        let err = LogFileSource::open(&path, "time", &settings(16, 4)).unwrap_err();
        assert!(matches!(err, FilterToolError::UnknownChannel(name) if name == "time"));

        let empty = dir.path().join("empty.csv");
        std::fs::write(&empty, "just-one-cell\n").unwrap();
        let err = LogFileSource::open(&empty, "x", &settings(16, 4)).unwrap_err();
        assert!(matches!(err, FilterToolError::Source(msg) if msg.contains("no header")));
    }

    #[test]
    fn test_select_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "drive.csv");
        let mut source = LogFileSource::open(&path, "left", &settings(16, 16)).unwrap();
        source.start().unwrap();
        assert_eq!(collect(&source, 3), vec![1.0, 2.0, 3.0]);

        assert!(source.select_channel("missing").is_err());
        assert_eq!(source.channel(), "left");

        source.select_channel("right").unwrap();
        assert_eq!(source.channel(), "right");
        assert!(!source.is_connected());
        source.start().unwrap();
        assert_eq!(collect(&source, 3), vec![10.0, 10.0, 30.0]);
        source.stop();
    }
}
