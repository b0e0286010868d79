//! Rendering session abstraction.

use tgsrender_common::error::TgsResult;

use crate::request::RenderRequest;

/// A long-lived handle to an external rendering process.
///
/// A session is exclusively owned by one batch: every job borrows it
/// mutably in turn, and it is consumed by [`RenderSession::close`].
#[allow(async_fn_in_trait)]
pub trait RenderSession {
    /// Session name for logs.
    fn name(&self) -> &str;

    /// Render one animation document.
    async fn render(&mut self, request: &RenderRequest) -> TgsResult<()>;

    /// Release the underlying process.
    async fn close(self) -> TgsResult<()>
    where
        Self: Sized;
}

/// Opens rendering sessions.
#[allow(async_fn_in_trait)]
pub trait SessionLauncher {
    type Session: RenderSession;

    /// Start a new session. Failure here is fatal for the batch.
    async fn launch(&self) -> TgsResult<Self::Session>;
}
