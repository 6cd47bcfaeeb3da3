//! Process lifecycle orchestrator for long-lived service modules.
//!
//! Every long-lived process in a service fleet is assembled from the same
//! kinds of parts: an HTTP server, a signal listener, a ticker, a tracer
//! provider, a leader-election loop. This crate supervises such parts as
//! uniform [`Module`]s and drives them through three ordered phases:
//!
//! ```text
//!  Init (sequential, list order)
//!      m1.init → m2.init → ... → mn.init        any failure aborts startup
//!
//!  Run (concurrent fan-out)
//!      m1.run ║ m2.run ║ ... ║ mn.run           first exit triggers shutdown
//!
//!  Stop (sequential, strict reverse order)
//!      mn.stop → ... → m2.stop → m1.stop        failures recorded, never skipped
//! ```
//!
//! Every phase call is panic-contained: a module that panics is reported as
//! a recovered-panic error and its peers still get an orderly teardown. Run
//! and stop failures are aggregated so the operator sees all of them, not
//! just the first.
//!
//! # Example
//!
//! ```ignore
//! use modrun::Runner;
//!
//! let runner = Runner::new(vec![signals, tracer, server]);
//! runner.run_or_exit().await;
//! ```

pub mod error;
pub mod module;
pub mod runner;

pub use error::{AggregateError, Phase, PhaseError, PhaseFailure, RunnerError};
pub use module::Module;
pub use runner::{Runner, Shutdown};
