//! End-to-end session test against stand-in browser and renderer scripts.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tgsrender_common::config::RendererConfig;
use tgsrender_common::error::TgsError;
use tgsrender_render_engine::{
    BrowserLauncher, RenderOptions, RenderRequest, RenderSession, RenderStyle, SessionLauncher,
};

// Chatters non-UTF-8 bytes around the endpoint line, then writes more stderr
// than a pipe buffer holds before leaving a marker file.
const FAKE_BROWSER: &str = r#"#!/bin/sh
printf '\377\376 [0101/000000.000:WARNING:headless_shell.cc] starting\n' >&2
echo "DevTools listening on ws://127.0.0.1:9222/devtools/browser/fake-session" >&2
printf 'font cache \377 rebuilt\n' >&2
i=0
while [ $i -lt 4096 ]; do
  echo "[0101/000000.000:VERBOSE1:gpu_process_host.cc] keeping the pipe busy" >&2
  i=$((i + 1))
done
touch "$(dirname "$0")/stderr-drained"
exec sleep 30
"#;

const DEAD_BROWSER: &str = r#"#!/bin/sh
echo "Failed to move to new namespace: sandbox unavailable" >&2
exit 1
"#;

// Writes its arguments to the --output path, fails when the input is named bad.json.
const FAKE_RENDERER: &str = r#"#!/bin/sh
out=""
input=""
while [ $# -gt 0 ]; do
  case "$1" in
    --output) out="$2"; shift ;;
    --input) input="$2"; shift ;;
  esac
  shift
done
case "$input" in
  *bad.json) echo "Error: Evaluation failed: invalid animation" >&2; exit 3 ;;
esac
printf 'rendered %s' "$input" > "$out"
"#;

fn install_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn request(animation: PathBuf, output: PathBuf) -> RenderRequest {
    RenderRequest {
        animation,
        output,
        style: RenderStyle::default(),
        options: RenderOptions::new(Some(100), Some(200)),
    }
}

#[tokio::test]
async fn browser_session_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let browser = install_script(dir.path(), "fake-browser", FAKE_BROWSER);
    let dead_browser = install_script(dir.path(), "dead-browser", DEAD_BROWSER);
    let renderer = install_script(dir.path(), "fake-renderer", FAKE_RENDERER);

    // A browser that dies before announcing its endpoint cannot host a session.
    let config = RendererConfig {
        browser_path: dead_browser,
        renderer_command: renderer.clone(),
        ..RendererConfig::default()
    };
    let err = BrowserLauncher::from_config(&config)
        .launch()
        .await
        .unwrap_err();
    match err {
        TgsError::Session { message } => assert!(message.contains("sandbox unavailable")),
        other => panic!("unexpected error: {other}"),
    }

    let config = RendererConfig {
        browser_path: browser,
        renderer_command: renderer,
        ..RendererConfig::default()
    };
    let mut session = BrowserLauncher::from_config(&config)
        .launch()
        .await
        .unwrap();
    assert_eq!(
        session.endpoint(),
        "ws://127.0.0.1:9222/devtools/browser/fake-session"
    );
    assert!(session.name().starts_with("fake-browser"));

    let drained = dir.path().join("stderr-drained");
    for _ in 0..200 {
        if drained.exists() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    assert!(drained.exists(), "browser blocked writing to stderr");

    let good_out = dir.path().join("good.gif");
    session
        .render(&request(dir.path().join("good.json"), good_out.clone()))
        .await
        .unwrap();
    let written = std::fs::read_to_string(&good_out).unwrap();
    assert!(written.ends_with("good.json"));

    let err = session
        .render(&request(
            dir.path().join("bad.json"),
            dir.path().join("bad.gif"),
        ))
        .await
        .unwrap_err();
    match err {
        TgsError::Render { message } => assert!(message.contains("invalid animation")),
        other => panic!("unexpected error: {other}"),
    }

    // The session survives a failed job.
    session
        .render(&request(
            dir.path().join("again.json"),
            dir.path().join("again.gif"),
        ))
        .await
        .unwrap();

    session.close().await.unwrap();
}
