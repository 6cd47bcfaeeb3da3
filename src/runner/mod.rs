//! Module lifecycle orchestration.
//!
//! # Data Flow
//! ```text
//! Init:
//!     For each module in list order → dispatch init → abort on first failure
//!
//! Run:
//!     One task per module → first exit triggers shutdown → failures collected
//!
//! Stop:
//!     For each module in reverse order → dispatch stop → failures collected
//! ```
//!
//! # Design Decisions
//! - Ordered startup: a module never sees `run` without its own `init` done
//! - First exit wins: any run return, success or error, starts the cascade
//! - Reverse teardown: dependents release before their dependencies
//! - The runner never exits the process; only [`Runner::run_or_exit`] does

mod dispatch;
pub mod shutdown;

pub use shutdown::Shutdown;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AggregateError, Phase, PhaseFailure, RunnerError};
use crate::module::Module;

/// Shared collector for run- and stop-phase failures.
///
/// Run tasks append concurrently as they finish; the stop loop appends
/// serially. Drained once after teardown completes.
type FailureLog = Arc<Mutex<Vec<PhaseFailure>>>;

/// Drives an ordered set of modules through init, run, and stop.
///
/// Stateless across invocations: the shutdown signal, failure collector,
/// and run tasks all live for a single [`Runner::run`] call.
pub struct Runner {
    modules: Vec<Arc<dyn Module>>,
}

impl Runner {
    /// Create a runner over an ordered module list.
    ///
    /// Order is semantically meaningful: init and run start in list order,
    /// stop executes in exactly the reverse order.
    pub fn new(modules: Vec<Arc<dyn Module>>) -> Self {
        Self { modules }
    }

    /// Execute the full lifecycle, blocking until teardown completes.
    ///
    /// Returns `Ok(())` only if every phase of every module succeeded. An
    /// init failure aborts startup immediately; run and stop failures are
    /// aggregated and all surfaced in the returned error.
    pub async fn run(self) -> Result<(), RunnerError> {
        self.init_all().await?;

        // With no run tasks there is no first exit to wait for.
        if self.modules.is_empty() {
            return Ok(());
        }

        let failures: FailureLog = Arc::new(Mutex::new(Vec::new()));
        let shutdown = Shutdown::new();
        let mut first_exit = shutdown.subscribe();

        let mut run_tasks = Vec::with_capacity(self.modules.len());
        for module in &self.modules {
            let module = Arc::clone(module);
            let failures = Arc::clone(&failures);
            let shutdown = shutdown.clone();
            run_tasks.push(tokio::spawn(async move {
                let name = module.name().to_owned();
                tracing::info!(module = %name, "module started");
                match dispatch::call(Arc::clone(&module), Phase::Run).await {
                    Ok(()) => tracing::info!(module = %name, "module exited"),
                    Err(error) => {
                        tracing::error!(module = %name, %error, "module exited with failure");
                        failures.lock().await.push(PhaseFailure {
                            module: name,
                            phase: Phase::Run,
                            error,
                        });
                    }
                }
                shutdown.trigger();
            }));
        }

        // Advisory only: stragglers keep running until their own stop
        // unblocks them. The runner just stops waiting for them.
        let _ = first_exit.recv().await;
        tracing::info!("first module exit observed, starting shutdown cascade");

        self.stop_all(&failures).await;

        // Every stop has returned, so each remaining run unblocks in
        // bounded time. Joining here picks up errors from runs that
        // outlived the cascade; nothing is drained before they land.
        for task in run_tasks {
            let _ = task.await;
        }

        let collected = std::mem::take(&mut *failures.lock().await);
        if collected.is_empty() {
            Ok(())
        } else {
            Err(RunnerError::Shutdown(AggregateError::new(collected)))
        }
    }

    /// Execute the full lifecycle and exit the process on failure.
    ///
    /// Thin adapter for `main` functions; the core lifecycle never calls
    /// `process::exit` itself.
    pub async fn run_or_exit(self) {
        if let Err(error) = self.run().await {
            tracing::error!(%error, "orchestration failed");
            std::process::exit(1);
        }
    }

    /// Init phase: sequential, list order, abort on first failure.
    async fn init_all(&self) -> Result<(), RunnerError> {
        for module in &self.modules {
            let name = module.name().to_owned();
            tracing::info!(module = %name, "initializing module");
            if let Err(error) = dispatch::call(Arc::clone(module), Phase::Init).await {
                tracing::error!(module = %name, %error, "module failed to initialize");
                return Err(RunnerError::Startup(PhaseFailure {
                    module: name,
                    phase: Phase::Init,
                    error,
                }));
            }
            tracing::info!(module = %name, "module initialized");
        }
        Ok(())
    }

    /// Stop phase: sequential, strict reverse order, never skips a module.
    async fn stop_all(&self, failures: &FailureLog) {
        for module in self.modules.iter().rev() {
            let name = module.name().to_owned();
            tracing::info!(module = %name, "stopping module");
            match dispatch::call(Arc::clone(module), Phase::Stop).await {
                Ok(()) => tracing::info!(module = %name, "module stopped"),
                Err(error) => {
                    tracing::error!(module = %name, %error, "module failed to stop");
                    failures.lock().await.push(PhaseFailure {
                        module: name,
                        phase: Phase::Stop,
                        error,
                    });
                }
            }
        }
    }
}
