//! Headless browser sessions.

use std::path::PathBuf;
use std::process::Stdio;

use tgsrender_common::config::RendererConfig;
use tgsrender_common::error::{TgsError, TgsResult};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use crate::renderer::{renderer_args, run_renderer};
use crate::request::RenderRequest;
use crate::session::{RenderSession, SessionLauncher};

/// Line prefix Chromium prints on stderr once remote debugging is up.
const DEVTOOLS_PREFIX: &str = "DevTools listening on ";

/// Launches headless browser sessions from renderer configuration.
#[derive(Debug, Clone)]
pub struct BrowserLauncher {
    browser_path: PathBuf,
    browser_args: Vec<String>,
    use_sandbox: bool,
    renderer_command: PathBuf,
}

impl BrowserLauncher {
    pub fn from_config(config: &RendererConfig) -> Self {
        Self {
            browser_path: config.browser_path.clone(),
            browser_args: config.browser_args.clone(),
            use_sandbox: config.use_sandbox,
            renderer_command: config.renderer_command.clone(),
        }
    }

    /// Browser command-line arguments.
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = vec![
            "--headless".to_string(),
            "--remote-debugging-port=0".to_string(),
        ];
        if !self.use_sandbox {
            args.push("--no-sandbox".to_string());
        }
        args.extend(self.browser_args.iter().cloned());
        args.push("about:blank".to_string());
        args
    }
}

impl SessionLauncher for BrowserLauncher {
    type Session = BrowserSession;

    async fn launch(&self) -> TgsResult<BrowserSession> {
        let args = self.launch_args();
        tracing::debug!(browser = %self.browser_path.display(), ?args, "Launching browser");

        let mut child = Command::new(&self.browser_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                TgsError::session(format!(
                    "Failed to start browser {}: {e}",
                    self.browser_path.display()
                ))
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| TgsError::session("Failed to capture browser stderr"))?;
        let mut segments = BufReader::new(stderr).split(b'\n');

        let mut transcript = Vec::new();
        let endpoint = loop {
            match segments.next_segment().await? {
                Some(raw) => {
                    let line = String::from_utf8_lossy(&raw);
                    if let Some(endpoint) = parse_devtools_endpoint(&line) {
                        break endpoint;
                    }
                    transcript.push(line.into_owned());
                }
                None => {
                    let status = child
                        .wait()
                        .await
                        .map(|s| s.to_string())
                        .unwrap_or_else(|e| format!("unknown: {e}"));
                    return Err(TgsError::session(format!(
                        "browser exited before announcing a DevTools endpoint (status {status}): {}",
                        transcript.join("\n").trim()
                    )));
                }
            }
        };

        // Keep draining stderr so the browser never blocks on a full pipe.
        // Lines are raw bytes; Chromium does not promise UTF-8 here.
        let stderr_task = tokio::spawn(async move {
            loop {
                match segments.next_segment().await {
                    Ok(Some(raw)) => {
                        let line = String::from_utf8_lossy(&raw);
                        tracing::trace!(line = %line.trim_end(), "browser stderr");
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::debug!(error = %e, "Stopped reading browser stderr");
                        break;
                    }
                }
            }
        });

        let name = format!(
            "{} (pid {})",
            self.browser_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.browser_path.display().to_string()),
            child.id().unwrap_or_default()
        );
        tracing::info!(session = %name, endpoint = %endpoint, "Browser session started");

        Ok(BrowserSession {
            name,
            child,
            endpoint,
            renderer_command: self.renderer_command.clone(),
            stderr_task,
        })
    }
}

/// A running headless browser plus the renderer command that drives it.
///
/// Dropping the session kills the browser.
#[derive(Debug)]
pub struct BrowserSession {
    name: String,
    child: Child,
    endpoint: String,
    renderer_command: PathBuf,
    stderr_task: JoinHandle<()>,
}

impl BrowserSession {
    /// DevTools WebSocket URL of the browser.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RenderSession for BrowserSession {
    fn name(&self) -> &str {
        &self.name
    }

    async fn render(&mut self, request: &RenderRequest) -> TgsResult<()> {
        if let Some(status) = self.child.try_wait()? {
            return Err(TgsError::session(format!(
                "browser exited unexpectedly (status {status})"
            )));
        }
        let args = renderer_args(request, &self.endpoint);
        run_renderer(&self.renderer_command, &args).await
    }

    async fn close(mut self) -> TgsResult<()> {
        let status = match self.child.try_wait()? {
            Some(status) => status,
            None => {
                self.child.start_kill()?;
                self.child.wait().await?
            }
        };
        self.stderr_task.abort();
        tracing::info!(session = %self.name, %status, "Browser session closed");
        Ok(())
    }
}

/// Extract the WebSocket URL from a Chromium stderr line.
pub fn parse_devtools_endpoint(line: &str) -> Option<String> {
    let endpoint = line.trim().strip_prefix(DEVTOOLS_PREFIX)?.trim();
    if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
        Some(endpoint.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_devtools_endpoint() {
        assert_eq!(
            parse_devtools_endpoint(
                "DevTools listening on ws://127.0.0.1:41233/devtools/browser/3f1c-9a\n"
            )
            .as_deref(),
            Some("ws://127.0.0.1:41233/devtools/browser/3f1c-9a")
        );
        assert!(parse_devtools_endpoint("[0101/000000.000:ERROR:gpu_init.cc] oops").is_none());
        assert!(parse_devtools_endpoint("DevTools listening on http://x").is_none());
    }

    #[test]
    fn test_sandbox_enabled_by_default() {
        let launcher = BrowserLauncher::from_config(&RendererConfig::default());
        let args = launcher.launch_args();
        assert!(!args.iter().any(|a| a == "--no-sandbox"));
        assert_eq!(args.first().map(String::as_str), Some("--headless"));
        assert_eq!(args.last().map(String::as_str), Some("about:blank"));
    }

    #[test]
    fn test_disabled_sandbox_adds_flag() {
        let config = RendererConfig {
            use_sandbox: false,
            browser_args: vec!["--disable-gpu".to_string()],
            ..RendererConfig::default()
        };
        let args = BrowserLauncher::from_config(&config).launch_args();
        assert_eq!(
            args,
            vec![
                "--headless",
                "--remote-debugging-port=0",
                "--no-sandbox",
                "--disable-gpu",
                "about:blank",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_browser_is_session_error() {
        let config = RendererConfig {
            browser_path: PathBuf::from("/nonexistent/chromium"),
            ..RendererConfig::default()
        };
        let err = BrowserLauncher::from_config(&config)
            .launch()
            .await
            .unwrap_err();
        assert!(matches!(err, TgsError::Session { .. }));
    }
}
