//! tgsrender Render Engine
//!
//! Hosts the external rendering capability. One headless browser is
//! launched per batch; every job runs the renderer command against that
//! browser's DevTools endpoint.
//!
//! ```text
//! BrowserLauncher::launch ──▶ chromium --headless --remote-debugging-port=0
//!                                   │  "DevTools listening on ws://…"
//!                                   ▼
//!                             BrowserSession ◀── render(RenderRequest) × N
//!                                   │              └── tgsrender-lottie --browser-ws-endpoint …
//!                                   ▼
//!                               close() (kill + reap)
//! ```

pub mod browser;
pub mod renderer;
pub mod request;
pub mod session;

pub use browser::*;
pub use request::*;
pub use session::*;
