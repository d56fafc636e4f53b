use crate::error::PipelineError;
use crate::pipeline::types::LogRecord;
use anyhow::Result;
use std::fs::File;
use std::path::Path;

/// Append-only CSV position log. The `frame,ID,x,y` header row is written at
/// creation, before any detection exists; rows are never rewritten.
pub struct PositionLog {
    writer: csv::Writer<File>,
    rows: usize,
}

impl PositionLog {
    pub fn create(path: &Path) -> Result<Self, PipelineError> {
        Self::try_create(path).map_err(|e| PipelineError::SinkUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn try_create(path: &Path) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(["frame", "ID", "x", "y"])?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn append(&mut self, record: &LogRecord) -> Result<()> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    /// Flush buffered rows to disk.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("staff_watch_{}_{}.csv", name, std::process::id()))
    }

    #[test]
    fn header_is_present_even_with_no_rows() {
        let path = temp_log_path("empty");
        let log = PositionLog::create(&path).unwrap();
        assert_eq!(log.finish().unwrap(), 0);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "frame,ID,x,y\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn rows_follow_the_header_in_append_order() {
        let path = temp_log_path("rows");
        let mut log = PositionLog::create(&path).unwrap();
        log.append(&LogRecord {
            frame: 0,
            id: 7,
            x: 12,
            y: 34,
        })
        .unwrap();
        log.append(&LogRecord {
            frame: 1,
            id: 7,
            x: 13,
            y: 35,
        })
        .unwrap();
        assert_eq!(log.finish().unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "frame,ID,x,y\n0,7,12,34\n1,7,13,35\n");
        std::fs::remove_file(&path).unwrap();
    }
}
