//! Frame traces: what the engine produced for every frame of a replay.
//!
//! Traces are JSONL. The first line is a `# {header}` comment, then one
//! [`FrameTrace`] per line.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use folio_common::error::{FolioError, FolioResult};
use folio_input_model::geometry::ViewportSize;

use crate::cursor::CursorFrame;
use crate::intro::IntroFrame;
use crate::transform::Transform;

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

/// Buffered frames are flushed at least this often.
const FLUSH_EVERY: u64 = 1000;

/// Describes the replay that produced a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHeader {
    pub schema_version: String,
    pub frame_interval_ms: f64,
    pub viewport: ViewportSize,
    pub should_animate: bool,
    pub cursor_enabled: bool,
}

/// Engine output for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameTrace {
    pub frame: u64,
    #[serde(rename = "t")]
    pub timestamp_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<CursorFrame>,
    pub parallax: Transform,
    pub marquees: Vec<Transform>,
    pub scroll_velocity_factor: f64,
    pub intro: IntroFrame,
}

/// Writes a trace file line by line.
pub struct TraceWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    frames_written: u64,
}

impl TraceWriter {
    /// Create (or truncate) `path` and write the header line.
    pub fn new(path: PathBuf, header: &TraceHeader) -> FolioResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);

        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| FolioError::motion(format!("Failed to write trace header: {e}")))?;

        Ok(Self {
            writer,
            path,
            frames_written: 0,
        })
    }

    pub fn write_frame(&mut self, frame: &FrameTrace) -> FolioResult<()> {
        let json = serde_json::to_string(frame)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| FolioError::motion(format!("Failed to write trace frame: {e}")))?;
        self.frames_written += 1;

        if self.frames_written % FLUSH_EVERY == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> FolioResult<()> {
        self.writer
            .flush()
            .map_err(|e| FolioError::motion(format!("Failed to flush trace: {e}")))
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TraceWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Read a trace written by [`TraceWriter`].
pub fn read_trace(path: &Path) -> FolioResult<(TraceHeader, Vec<FrameTrace>)> {
    if !path.exists() {
        return Err(FolioError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .and_then(|line| line.strip_prefix('#'))
        .ok_or_else(|| FolioError::input(format!("{} has no trace header", path.display())))?;
    let header: TraceHeader = serde_json::from_str(header.trim())?;

    let frames = lines
        .map(serde_json::from_str)
        .collect::<Result<Vec<FrameTrace>, _>>()?;
    Ok((header, frames))
}
