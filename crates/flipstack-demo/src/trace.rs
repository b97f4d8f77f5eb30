//! JSONL pointer traces.
//!
//! One sample per line:
//!
//! ```text
//! {"event":"down","t_ms":0,"x":160,"y":120}
//! {"event":"move","t_ms":16,"x":160,"y":150}
//! {"event":"up","t_ms":40,"x":160,"y":190}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Timestamps are
//! milliseconds from the start of the trace and must not decrease.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use flipstack_core::{Point, PointerPhase};
use serde::{Deserialize, Serialize};

use crate::error::{DemoError, Result};

/// One raw pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    #[serde(rename = "event")]
    pub phase: PointerPhase,
    pub t_ms: u64,
    #[serde(default)]
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    #[must_use]
    pub fn new(phase: PointerPhase, t_ms: u64, x: f64, y: f64) -> Self {
        Self { phase, t_ms, x, y }
    }

    #[inline]
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Read a trace file.
pub fn read_trace(path: &Path) -> Result<Vec<PointerSample>> {
    let file = std::fs::File::open(path)?;
    parse_trace(std::io::BufReader::new(file), path)
}

/// Parse trace lines from `reader`. `origin` is only used in error messages.
pub fn parse_trace(reader: impl BufRead, origin: &Path) -> Result<Vec<PointerSample>> {
    let mut samples: Vec<PointerSample> = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let error = |message: String| DemoError::Trace {
            path: PathBuf::from(origin),
            line: index + 1,
            message,
        };
        let sample: PointerSample =
            serde_json::from_str(trimmed).map_err(|e| error(e.to_string()))?;
        if !sample.x.is_finite() || !sample.y.is_finite() {
            return Err(error("coordinates must be finite".to_string()));
        }
        if let Some(previous) = samples.last()
            && sample.t_ms < previous.t_ms
        {
            return Err(error(format!(
                "timestamp {} is earlier than previous {}",
                sample.t_ms, previous.t_ms
            )));
        }
        samples.push(sample);
    }
    Ok(samples)
}
