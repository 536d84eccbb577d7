//! Test data builders for creating WPILOG buffers

use frc_filter_tool::wpilog::LogWriter;

/// Builder for a log holding one or more double channels
pub struct LogBuilder {
    writer: LogWriter,
    next_id: u32,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self {
            writer: LogWriter::new(),
            next_id: 1,
        }
    }

    /// Declare a double channel and append `values` at `period_us` spacing
    pub fn double_channel(mut self, name: &str, values: &[f64], period_us: i64) -> Self {
        let id = self.next_id;
        self.next_id += 1;
        self.writer.start(id, name, "double", "", 0).unwrap();
        for (i, value) in values.iter().enumerate() {
            self.writer.append_double(id, i as i64 * period_us, *value);
        }
        self
    }

    /// Declare a string entry with one sample, which decodes to no channel
    pub fn string_entry(mut self, name: &str, value: &str) -> Self {
        let id = self.next_id;
        self.next_id += 1;
        self.writer
            .start(id, name, "string", "", 0)
            .unwrap()
            .append_raw(id, 0, value.as_bytes())
            .unwrap();
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.writer.into_bytes()
    }
}

impl Default for LogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frc_filter_tool::wpilog::LogChannels;

    #[test]
    fn test_log_builder() {
        let bytes = LogBuilder::new()
            .double_channel("temp", &[1.0, 2.0], 100)
            .build();
        let log = LogChannels::from_bytes(&bytes).unwrap();
        assert_eq!(log.values("temp"), Some(vec![1.0, 2.0]));
    }
}
