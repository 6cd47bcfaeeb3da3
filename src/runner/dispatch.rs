//! Panic-contained phase dispatch.
//!
//! # Responsibilities
//! - Invoke one phase of one module on its own Tokio task
//! - Convert a panic inside the call into a normal [`PhaseError`]
//!
//! Dispatching onto a task and joining immediately keeps init and stop
//! calls sequential while still giving every call the task boundary that
//! contains its panics. A module defect therefore never unwinds into the
//! runner's control loop.

use std::sync::Arc;

use tokio::task::JoinError;

use crate::error::{Phase, PhaseError};
use crate::module::Module;

/// Run one phase call to completion, returning its error or recovered panic.
pub(crate) async fn call(module: Arc<dyn Module>, phase: Phase) -> Result<(), PhaseError> {
    let handle = tokio::spawn(async move {
        match phase {
            Phase::Init => module.init().await,
            Phase::Run => module.run().await,
            Phase::Stop => module.stop().await,
        }
    });

    match handle.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(PhaseError::Failed(err)),
        Err(join_err) => Err(PhaseError::Panicked(panic_message(join_err))),
    }
}

/// Extract the panic payload as text. Panics raised with `panic!("...")`
/// carry a `&str` or `String`; anything else gets a placeholder.
fn panic_message(err: JoinError) -> String {
    match err.try_into_panic() {
        Ok(payload) => {
            if let Some(s) = payload.downcast_ref::<&'static str>() {
                (*s).to_owned()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "opaque panic payload".to_owned()
            }
        }
        // Task was cancelled, not panicked. The runner never cancels phase
        // tasks, so this is unreachable in practice.
        Err(err) => err.to_string(),
    }
}
