//! Column-oriented text logs (CSV or whitespace separated).
//!
//! The first line with at least one column after the timestamp is the
//! header. Every later line whose first cell parses as a number is a row;
//! a missing or unparsable cell repeats the previous row's value for that
//! column, or 0.0 on the first row.

use std::collections::HashMap;

/// Parsed text log, stored column-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLog {
    fields: Vec<String>,
    index: HashMap<String, usize>,
    timestamps: Vec<f64>,
    columns: Vec<Vec<f64>>,
}

impl TextLog {
    pub fn parse(content: &str) -> Self {
        let mut log = Self::default();
        let mut lines = content.lines();

        for line in lines.by_ref() {
            if log.parse_header(line) {
                break;
            }
        }
        if log.fields.is_empty() {
            return log;
        }

        for line in lines {
            log.parse_row(line);
        }
        log
    }

    fn parse_header(&mut self, line: &str) -> bool {
        let names: Vec<String> = cells(line)
            .skip(1)
            .map(|cell| cell.replace('"', ""))
            .collect();
        if names.is_empty() {
            return false;
        }
        for (i, name) in names.iter().enumerate() {
            self.index.insert(name.clone(), i);
        }
        self.columns = vec![Vec::new(); names.len()];
        self.fields = names;
        true
    }

    fn parse_row(&mut self, line: &str) {
        let mut cells = cells(line);
        let Some(timestamp) = cells.next().and_then(|c| c.parse::<f64>().ok()) else {
            return;
        };
        self.timestamps.push(timestamp);

        for column in self.columns.iter_mut() {
            let value = cells
                .next()
                .and_then(|c| c.parse::<f64>().ok())
                .or_else(|| column.last().copied())
                .unwrap_or(0.0);
            column.push(value);
        }
    }

    /// Column names in header order, timestamp column excluded
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.index.get(name).map(|&i| self.columns[i].as_slice())
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Comma separated when the line has a comma, whitespace separated otherwise.
fn cells(line: &str) -> Box<dyn Iterator<Item = &str> + '_> {
    if line.contains(',') {
        Box::new(line.split(',').map(str::trim))
    } else {
        Box::new(line.split_whitespace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_columns() {
        let log = TextLog::parse("time,\"left\",right\n0.0,1.5,2\n0.02,1.75,3\n");
        assert_eq!(log.fields(), &["left", "right"]);
        assert_eq!(log.timestamps(), &[0.0, 0.02]);
        assert_eq!(log.column("left"), Some(&[1.5, 1.75][..]));
        assert_eq!(log.column("right"), Some(&[2.0, 3.0][..]));
        assert!(log.column("time").is_none());
    }

    #[test]
    fn test_whitespace_columns() {
        let log = TextLog::parse("t  voltage\n1 12.5\n2 12.25\n");
        assert_eq!(log.column("voltage"), Some(&[12.5, 12.25][..]));
    }

    #[test]
    fn test_missing_cells_carry_forward() {
        let log = TextLog::parse("t,a,b\n0,,1\n1,5,\n2,x,7\n");
        assert_eq!(log.column("a"), Some(&[0.0, 5.0, 5.0][..]));
        assert_eq!(log.column("b"), Some(&[1.0, 1.0, 7.0][..]));
    }

    #[test]
    fn test_rows_without_timestamp_skipped() {
        let log = TextLog::parse("\ntime,a\nnan-ish,1\n\n3,4\n");
        assert_eq!(log.fields(), &["a"]);
        assert_eq!(log.len(), 1);
        assert_eq!(log.column("a"), Some(&[4.0][..]));
    }

    #[test]
    fn test_no_header() {
        let log = TextLog::parse("single\n\n");
        assert!(log.fields().is_empty());
        assert!(log.is_empty());
    }
}
