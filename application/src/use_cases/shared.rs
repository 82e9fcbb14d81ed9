//! Shared utilities for use cases.

use crate::use_cases::run_turn::SwarmError;
use tokio_util::sync::CancellationToken;

/// Return `Err(SwarmError::Cancelled)` once cancellation has been requested.
pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), SwarmError> {
    if token.is_cancelled() {
        return Err(SwarmError::Cancelled);
    }
    Ok(())
}
