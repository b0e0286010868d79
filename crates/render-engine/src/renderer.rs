//! Invocation of the external Lottie renderer command.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;

use tgsrender_common::error::{TgsError, TgsResult};
use tokio::process::Command;

use crate::request::RenderRequest;

/// Build the renderer command line for one request.
pub fn renderer_args(request: &RenderRequest, endpoint: &str) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--browser-ws-endpoint".into(),
        endpoint.into(),
        "--input".into(),
        request.animation.clone().into(),
        "--output".into(),
        request.output.clone().into(),
        "--background".into(),
        request.style.background.clone().into(),
    ];
    if let Some(width) = request.options.width {
        args.push("--width".into());
        args.push(width.to_string().into());
    }
    if let Some(height) = request.options.height {
        args.push("--height".into());
        args.push(height.to_string().into());
    }
    args
}

/// Run the renderer to completion. A non-zero exit is a render error
/// carrying the renderer's stderr.
pub async fn run_renderer(command: &Path, args: &[OsString]) -> TgsResult<()> {
    tracing::debug!(command = %command.display(), ?args, "Running renderer");

    let output = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| start_error(command, &e))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        tracing::debug!(output = %stdout.trim(), "Renderer output");
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TgsError::render(format!(
            "renderer failed (status {}): {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}

fn start_error(command: &Path, err: &std::io::Error) -> TgsError {
    let hint = if err.kind() == ErrorKind::NotFound {
        " (install the adapter from tools/lottie-renderer with `npm install -g`, \
         or point TGSRENDER_RENDERER at a command that accepts --browser-ws-endpoint)"
    } else {
        ""
    };
    TgsError::render(format!(
        "Failed to start renderer {}: {err}{hint}",
        command.display()
    ))
}
