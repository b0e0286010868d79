//! Render requests handed to a session.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Visual style applied by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// CSS background colour.
    pub background: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: "black".to_string(),
        }
    }
}

/// Per-run size overrides. `None` leaves sizing to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl RenderOptions {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self { width, height }
    }

    /// Layer `self` on top of `defaults`; values set here win.
    pub fn merged_over(self, defaults: RenderOptions) -> Self {
        Self {
            width: self.width.or(defaults.width),
            height: self.height.or(defaults.height),
        }
    }
}

/// Everything the renderer needs for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Plain Lottie JSON document.
    pub animation: PathBuf,

    /// Output path; its extension selects the output format.
    pub output: PathBuf,

    pub style: RenderStyle,

    pub options: RenderOptions,
}
