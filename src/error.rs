//! Lifecycle error definitions.

use std::fmt;

use thiserror::Error;

/// The three ordered stages every module passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Init,
    Run,
    Stop,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Run => "run",
            Phase::Stop => "stop",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single phase call went wrong.
#[derive(Debug, Error)]
pub enum PhaseError {
    /// The module returned an error of its own. Alternate formatting keeps
    /// the whole context chain visible in the aggregate.
    #[error("{0:#}")]
    Failed(anyhow::Error),

    /// The phase call panicked; the payload is preserved as text.
    #[error("panicked: {0}")]
    Panicked(String),
}

impl PhaseError {
    /// Whether this failure was a recovered panic rather than an error the
    /// module returned deliberately.
    pub fn is_panic(&self) -> bool {
        matches!(self, PhaseError::Panicked(_))
    }
}

/// One failure slot: which module, which phase, what happened.
#[derive(Debug, Error)]
#[error("module {module} {phase} failed: {error}")]
pub struct PhaseFailure {
    pub module: String,
    pub phase: Phase,
    pub error: PhaseError,
}

/// Every run- and stop-phase failure from one orchestration, combined.
///
/// Multiple modules may legitimately fail during a shutdown cascade; all
/// of them are preserved, not just the first.
#[derive(Debug)]
pub struct AggregateError {
    failures: Vec<PhaseFailure>,
}

impl AggregateError {
    pub(crate) fn new(failures: Vec<PhaseFailure>) -> Self {
        Self { failures }
    }

    /// The individual failures, in the order they were recorded.
    pub fn failures(&self) -> &[PhaseFailure] {
        &self.failures
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} module failure(s): ", self.failures.len())?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

/// Terminal result of one orchestration.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A module failed to initialize; nothing was run or stopped.
    #[error("startup aborted: {0}")]
    Startup(PhaseFailure),

    /// One or more modules failed during run or stop.
    #[error(transparent)]
    Shutdown(AggregateError),
}
