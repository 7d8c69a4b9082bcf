//! JSON-lines recording source.
//!
//! One `BodyFrameRecord` per line. Blank lines are skipped; a malformed line
//! is an error naming the file and line number.

use anyhow::{anyhow, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::SourceStats;
use crate::snapshot::{BodyFrame, BodyFrameRecord};

pub(super) struct ReplaySource {
    path: PathBuf,
    lines: Option<Lines<BufReader<File>>>,
    line_number: usize,
    frame_count: u64,
    last_timestamp: Option<Duration>,
    failed: bool,
}

impl ReplaySource {
    pub(super) fn new(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(anyhow!("replay file {} does not exist", path.display()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            lines: None,
            line_number: 0,
            frame_count: 0,
            last_timestamp: None,
            failed: false,
        })
    }

    pub(super) fn connect(&mut self) -> Result<()> {
        let file = File::open(&self.path)
            .map_err(|e| anyhow!("failed to open replay file {}: {}", self.path.display(), e))?;
        self.lines = Some(BufReader::new(file).lines());
        self.line_number = 0;
        log::info!("FrameSource: connected to {} (replay)", self.path.display());
        Ok(())
    }

    pub(super) fn next_frame(&mut self) -> Result<Option<BodyFrame>> {
        if self.lines.is_none() {
            self.connect()?;
        }
        let Some(lines) = self.lines.as_mut() else {
            return Ok(None);
        };

        for line in lines.by_ref() {
            self.line_number += 1;
            let line = line.map_err(|e| {
                self.failed = true;
                anyhow!("{}:{}: read error: {}", self.path.display(), self.line_number, e)
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let frame = serde_json::from_str::<BodyFrameRecord>(&line)
                .map_err(anyhow::Error::from)
                .and_then(BodyFrame::try_from)
                .map_err(|e| {
                    self.failed = true;
                    anyhow!(
                        "{}:{}: invalid frame record: {}",
                        self.path.display(),
                        self.line_number,
                        e
                    )
                })?;
            if self.last_timestamp.is_some_and(|last| frame.timestamp < last) {
                log::warn!(
                    "{}:{}: timestamp goes backwards",
                    self.path.display(),
                    self.line_number
                );
            }
            self.last_timestamp = Some(frame.timestamp);
            self.frame_count += 1;
            return Ok(Some(frame));
        }
        Ok(None)
    }

    pub(super) fn is_healthy(&self) -> bool {
        !self.failed
    }

    pub(super) fn stats(&self) -> SourceStats {
        SourceStats {
            frames_delivered: self.frame_count,
            uri: self.path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn recording(contents: &str) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(contents.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn reads_frames_and_skips_blank_lines() -> Result<()> {
        let file = recording(concat!(
            r#"{"timestamp_ms": 0, "bodies": [null, {"tracking_id": 4, "joints": {"hand_right": [0.3, 0.4, 1.8]}}]}"#,
            "\n\n",
            r#"{"timestamp_ms": 33, "bodies": []}"#,
            "\n",
        ))?;
        let mut source = ReplaySource::new(file.path())?;
        source.connect()?;

        let Some(first) = source.next_frame()? else {
            panic!("expected a first frame");
        };
        assert_eq!(first.bodies.len(), 2);
        assert_eq!(first.present().map(|s| s.tracking_id()).collect::<Vec<_>>(), vec![4]);

        let second = source.next_frame()?;
        assert_eq!(second.map(|f| f.timestamp), Some(Duration::from_millis(33)));
        assert!(source.next_frame()?.is_none());
        assert_eq!(source.stats().frames_delivered, 2);
        assert!(source.is_healthy());
        Ok(())
    }

    #[test]
    fn malformed_line_names_its_number() -> Result<()> {
        let file = recording("{\"timestamp_ms\": 0}\n\nnot json\n")?;
        let mut source = ReplaySource::new(file.path())?;
        assert!(source.next_frame()?.is_some());
        let err = source.next_frame().err().map(|e| e.to_string());
        assert!(err.is_some_and(|msg| msg.contains(":3:")));
        assert!(!source.is_healthy());
        Ok(())
    }

    #[test]
    fn duplicate_tracking_ids_are_rejected() -> Result<()> {
        let file = recording(
            r#"{"timestamp_ms": 0, "bodies": [{"tracking_id": 2, "joints": {}}, {"tracking_id": 2, "joints": {}}]}"#,
        )?;
        let mut source = ReplaySource::new(file.path())?;
        assert!(source.next_frame().is_err());
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ReplaySource::new(Path::new("/nonexistent/recording.jsonl")).is_err());
    }
}
