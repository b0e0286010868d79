//! tgsrender Container
//!
//! A Telegram animated sticker (`.tgs`) is a gzip-compressed Lottie JSON
//! document. This crate turns one into a plain JSON file the renderer can
//! consume:
//!
//! ```text
//! sticker.tgs ──gunzip──▶ tgsrender-XXXX.json (scoped temp file)
//!                                │
//!                                └── probe ──▶ AnimationInfo (w, h, fr, ip, op)
//! ```

pub mod animation;
pub mod decompress;

pub use animation::*;
pub use decompress::*;

/// File extension of Telegram animated stickers.
pub const STICKER_EXTENSION: &str = "tgs";

/// Whether `path` names a `.tgs` sticker (case-sensitive).
pub fn is_sticker_path(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == STICKER_EXTENSION)
}
