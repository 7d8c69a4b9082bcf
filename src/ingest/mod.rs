//! Body frame sources.
//!
//! `FrameSource` hides where frames come from:
//! - `stub://<script>`: a synthetic body performing a scripted gesture loop
//! - anything else: a local JSON-lines recording, one frame per line
//!
//! Sources only produce `BodyFrame`s. Recognition happens downstream in
//! `PersonTable`.

mod replay;
pub mod synthetic;

use anyhow::{anyhow, Result};
use std::path::Path;

use crate::config::SourceSettings;
use crate::snapshot::BodyFrame;
use replay::ReplaySource;
use synthetic::SyntheticSource;

pub use synthetic::{SyntheticScript, SYNTHETIC_TRACKING_ID};

const STUB_SCHEME: &str = "stub://";

pub struct FrameSource {
    backend: SourceBackend,
}

enum SourceBackend {
    Synthetic(SyntheticSource),
    Replay(ReplaySource),
}

impl FrameSource {
    pub fn open(settings: &SourceSettings) -> Result<Self> {
        settings.validate()?;
        let uri = settings.uri.trim();
        let backend = if let Some(script) = uri.strip_prefix(STUB_SCHEME) {
            SourceBackend::Synthetic(SyntheticSource::new(settings, script)?)
        } else if uri.contains("://") {
            return Err(anyhow!(
                "unsupported source {}: expected stub://<script> or a local file path",
                uri
            ));
        } else {
            SourceBackend::Replay(ReplaySource::new(Path::new(uri))?)
        };
        Ok(Self { backend })
    }

    pub fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            SourceBackend::Synthetic(source) => source.connect(),
            SourceBackend::Replay(source) => source.connect(),
        }
    }

    /// Next frame, or `None` once a recording is exhausted.
    pub fn next_frame(&mut self) -> Result<Option<BodyFrame>> {
        match &mut self.backend {
            SourceBackend::Synthetic(source) => source.next_frame(),
            SourceBackend::Replay(source) => source.next_frame(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        match &self.backend {
            SourceBackend::Synthetic(source) => source.is_healthy(),
            SourceBackend::Replay(source) => source.is_healthy(),
        }
    }

    pub fn stats(&self) -> SourceStats {
        match &self.backend {
            SourceBackend::Synthetic(source) => source.stats(),
            SourceBackend::Replay(source) => source.stats(),
        }
    }

    /// Synthetic sources never run out of frames.
    pub fn is_endless(&self) -> bool {
        matches!(self.backend, SourceBackend::Synthetic(_))
    }
}

#[derive(Clone, Debug)]
pub struct SourceStats {
    pub frames_delivered: u64,
    pub uri: String,
}
