//! The module contract every supervised component implements.
//!
//! # Responsibilities
//! - Define the uniform capability set (`name`, `init`, `run`, `stop`)
//! - Stay agnostic to what a module actually does
//!
//! # Design Decisions
//! - Object-safe async trait: the set of module kinds is open-ended, so
//!   modules are held as `Arc<dyn Module>` rather than an enum
//! - `&self` methods with interior mutability: the runner shares a module
//!   between its run task and the stop loop
//! - Module errors are `anyhow::Error`: components are independently
//!   implemented and carry heterogeneous error types

use async_trait::async_trait;

/// A supervised component with a three-phase lifecycle.
///
/// The runner calls `init` exactly once, then `run` exactly once, then
/// `stop` exactly once, in that order. `init` is never invoked while
/// another module's `init` is in flight; the same holds for `stop`.
#[async_trait]
pub trait Module: Send + Sync + 'static {
    /// Stable human-readable identifier, used only in logs and errors.
    ///
    /// Must be side-effect-free. Uniqueness is not required.
    fn name(&self) -> &str;

    /// One-shot setup: allocate listeners, connections, timers.
    ///
    /// Must return promptly. If setup cannot complete, release anything
    /// already acquired before returning the error; a failed `init` is
    /// never followed by `stop`.
    async fn init(&self) -> anyhow::Result<()>;

    /// Block until the module's work is done, fails, or `stop` unblocks it.
    ///
    /// Returning immediately is legal and makes the module a pure trigger:
    /// its exit starts the shutdown cascade for the whole process.
    async fn run(&self) -> anyhow::Result<()>;

    /// Request graceful shutdown and block until resources are released.
    ///
    /// Must be safe to call even when `run` has already returned, and
    /// should unblock an in-flight `run` in bounded time. Any teardown
    /// timeout policy belongs here; the runner imposes none.
    async fn stop(&self) -> anyhow::Result<()>;
}
