//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{TgsError, TgsResult};

/// Environment variable controlling the browser sandbox (`"true"`/`"false"`).
pub const ENV_USE_SANDBOX: &str = "USE_SANDBOX";

/// Environment variable overriding the browser executable.
pub const ENV_BROWSER: &str = "TGSRENDER_BROWSER";

/// Environment variable overriding the renderer command.
pub const ENV_RENDERER: &str = "TGSRENDER_RENDERER";

/// Renderer adapter shipped in `tools/lottie-renderer`. It attaches to the
/// session's browser through `--browser-ws-endpoint`.
pub const DEFAULT_RENDERER: &str = "tgsrender-lottie";

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rendering session and renderer invocation settings.
    pub renderer: RendererConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Settings for the browser-backed rendering session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Headless browser executable.
    pub browser_path: PathBuf,

    /// Extra arguments appended to the browser launch command.
    pub browser_args: Vec<String>,

    /// Whether the browser runs with OS-level sandboxing.
    pub use_sandbox: bool,

    /// Command that renders one Lottie document through the browser.
    pub renderer_command: PathBuf,

    /// CSS background colour applied behind the animation.
    pub background: String,

    /// Default output width (None = renderer auto-sizing).
    pub width: Option<u32>,

    /// Default output height (None = renderer auto-sizing).
    pub height: Option<u32>,

    /// Output template used when `--out_path` is not given.
    pub output_template: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tgsrender=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            browser_path: PathBuf::from("/usr/bin/chromium-browser"),
            browser_args: Vec::new(),
            use_sandbox: true,
            renderer_command: PathBuf::from(DEFAULT_RENDERER),
            background: "black".to_string(),
            width: None,
            height: None,
            output_template: "{dir}/{stem}.gif".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, or defaults when there is none.
    pub fn load_or_default() -> TgsResult<Self> {
        let config_path = config_file_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from an explicit path. Errors are reported, not swallowed.
    pub fn load_from(path: &Path) -> TgsResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| TgsError::from_io_at(e, path))?;
        serde_json::from_str(&content)
            .map_err(|e| TgsError::config(format!("invalid config {}: {e}", path.display())))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> TgsResult<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> TgsResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_USE_SANDBOX) {
            self.renderer.use_sandbox = parse_bool_flag(ENV_USE_SANDBOX, &raw)?;
        }
        if let Some(browser) = lookup(ENV_BROWSER).filter(|v| !v.is_empty()) {
            self.renderer.browser_path = PathBuf::from(browser);
        }
        if let Some(renderer) = lookup(ENV_RENDERER).filter(|v| !v.is_empty()) {
            self.renderer.renderer_command = PathBuf::from(renderer);
        }
        Ok(())
    }
}

/// Parse a JSON boolean literal (`true` / `false`) from an environment value.
fn parse_bool_flag(name: &str, raw: &str) -> TgsResult<bool> {
    serde_json::from_str::<bool>(raw.trim())
        .map_err(|_| TgsError::config(format!("{name} must be `true` or `false`, got {raw:?}")))
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("tgsrender").join("config.json")
}
