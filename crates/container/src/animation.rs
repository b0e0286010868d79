//! Lottie header probing.
//!
//! Only the top-level fields needed for logging and validation are read;
//! layers and assets are left to the renderer.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tgsrender_common::error::{TgsError, TgsResult};

/// Canvas size Telegram requires for animated stickers.
pub const TELEGRAM_STICKER_SIZE: f64 = 512.0;

/// Maximum sticker duration accepted by Telegram.
pub const TELEGRAM_MAX_DURATION_SECS: f64 = 3.0;

/// Top-level Lottie fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationInfo {
    /// Canvas width.
    #[serde(rename = "w")]
    pub width: f64,

    /// Canvas height.
    #[serde(rename = "h")]
    pub height: f64,

    /// Frame rate.
    #[serde(rename = "fr")]
    pub frame_rate: f64,

    /// In point (first frame).
    #[serde(rename = "ip")]
    pub in_point: f64,

    /// Out point (frame after the last).
    #[serde(rename = "op")]
    pub out_point: f64,

    /// Bodymovin version that exported the file.
    #[serde(rename = "v", default)]
    pub version: Option<String>,

    /// Animation name.
    #[serde(rename = "nm", default)]
    pub name: Option<String>,

    /// Telegram marker; `1` for stickers produced by the official exporter.
    #[serde(default)]
    pub tgs: Option<u8>,
}

impl AnimationInfo {
    /// Parse header fields from a JSON document.
    pub fn from_slice(bytes: &[u8]) -> TgsResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| TgsError::invalid_animation(e.to_string()))
    }

    /// Number of frames between in and out point.
    pub fn frame_count(&self) -> f64 {
        (self.out_point - self.in_point).max(0.0)
    }

    /// Playback duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.frame_rate <= 0.0 {
            return 0.0;
        }
        self.frame_count() / self.frame_rate
    }

    /// Reasons this animation would be rejected as a Telegram sticker.
    pub fn telegram_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.width != TELEGRAM_STICKER_SIZE || self.height != TELEGRAM_STICKER_SIZE {
            violations.push(format!(
                "canvas is {}x{}, expected 512x512",
                self.width, self.height
            ));
        }
        if self.frame_rate != 60.0 && self.frame_rate != 30.0 {
            violations.push(format!("frame rate {} is not 30 or 60", self.frame_rate));
        }
        if self.duration_secs() > TELEGRAM_MAX_DURATION_SECS {
            violations.push(format!(
                "duration {:.2}s exceeds {TELEGRAM_MAX_DURATION_SECS}s",
                self.duration_secs()
            ));
        }
        if self.tgs != Some(1) {
            violations.push("missing `tgs: 1` marker".to_string());
        }
        violations
    }

    pub fn is_telegram_compliant(&self) -> bool {
        self.telegram_violations().is_empty()
    }
}

/// Read the header of the JSON document at `path`.
pub fn probe(path: &Path) -> TgsResult<AnimationInfo> {
    let file = File::open(path).map_err(|e| TgsError::from_io_at(e, path))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        TgsError::invalid_animation(format!("{}: {e}", path.display()))
    })
}
