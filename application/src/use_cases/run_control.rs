//! Single-flight cancellation for top-level actions.

use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Holds the token of the current top-level run.
///
/// Starting a new run cancels the previous one (last writer wins), so at most
/// one orchestration is live and a stale run fails its next token check.
#[derive(Default)]
pub struct CancellableRun {
    current: Mutex<Option<CancellationToken>>,
}

impl CancellableRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any previous run and install a fresh token.
    pub fn begin(&self) -> CancellationToken {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = current.take() {
            if !previous.is_cancelled() {
                debug!("Superseding the previous run");
            }
            previous.cancel();
        }
        let token = CancellationToken::new();
        *current = Some(token.clone());
        token
    }

    /// Cancel the current run. Returns `false` if nothing was running.
    pub fn cancel_current(&self) -> bool {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        match current.as_ref() {
            Some(token) if !token.is_cancelled() => {
                token.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.as_ref().is_some_and(|token| !token.is_cancelled())
    }
}
