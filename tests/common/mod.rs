//! Shared utilities for lifecycle integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::Notify;

use modrun::Module;

/// Ordered record of every phase entry across all test modules.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Install a fmt subscriber for lifecycle event output; later calls in the
/// same test binary are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "modrun=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[allow(dead_code)]
pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Position of an event in the log; panics if the event never happened.
#[allow(dead_code)]
pub fn position(log: &EventLog, event: &str) -> usize {
    let events = log.lock().unwrap();
    events
        .iter()
        .position(|e| e == event)
        .unwrap_or_else(|| panic!("event {event:?} not found in {events:?}"))
}

#[allow(dead_code)]
pub fn count(log: &EventLog, event: &str) -> usize {
    log.lock().unwrap().iter().filter(|e| *e == event).count()
}

/// Scripted outcome for one phase call.
#[derive(Clone, Copy)]
pub enum Outcome {
    Succeed,
    Fail(&'static str),
    Panic(&'static str),
}

impl Outcome {
    fn apply(self) -> anyhow::Result<()> {
        match self {
            Outcome::Succeed => Ok(()),
            Outcome::Fail(msg) => Err(anyhow!(msg)),
            Outcome::Panic(msg) => panic!("{msg}"),
        }
    }
}

/// A scriptable module that records each phase entry into the shared log.
///
/// By default every phase succeeds and `run` returns immediately. Builder
/// methods script failures, panics, blocking runs, and slow stops.
pub struct TestModule {
    name: &'static str,
    log: EventLog,
    init_outcome: Outcome,
    run_outcome: Outcome,
    run_blocks: bool,
    run_drain: Option<Duration>,
    stop_outcome: Outcome,
    stop_signal: Notify,
}

#[allow(dead_code)]
impl TestModule {
    pub fn new(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            init_outcome: Outcome::Succeed,
            run_outcome: Outcome::Succeed,
            run_blocks: false,
            run_drain: None,
            stop_outcome: Outcome::Succeed,
            stop_signal: Notify::new(),
        }
    }

    /// `run` blocks until this module's `stop` is called.
    pub fn blocking(mut self) -> Self {
        self.run_blocks = true;
        self
    }

    pub fn init_fails(mut self, msg: &'static str) -> Self {
        self.init_outcome = Outcome::Fail(msg);
        self
    }

    pub fn init_panics(mut self, msg: &'static str) -> Self {
        self.init_outcome = Outcome::Panic(msg);
        self
    }

    pub fn run_fails(mut self, msg: &'static str) -> Self {
        self.run_outcome = Outcome::Fail(msg);
        self
    }

    pub fn run_panics(mut self, msg: &'static str) -> Self {
        self.run_outcome = Outcome::Panic(msg);
        self
    }

    pub fn stop_fails(mut self, msg: &'static str) -> Self {
        self.stop_outcome = Outcome::Fail(msg);
        self
    }

    pub fn stop_panics(mut self, msg: &'static str) -> Self {
        self.stop_outcome = Outcome::Panic(msg);
        self
    }

    /// `run` keeps draining in-flight work for `delay` after `stop`
    /// unblocks it, and only then reports its outcome.
    pub fn run_drains_for(mut self, delay: Duration) -> Self {
        self.run_drain = Some(delay);
        self
    }

    pub fn build(self) -> Arc<dyn Module> {
        Arc::new(self)
    }

    fn record(&self, phase: &str) {
        self.log.lock().unwrap().push(format!("{phase}:{}", self.name));
    }
}

#[async_trait]
impl Module for TestModule {
    fn name(&self) -> &str {
        self.name
    }

    async fn init(&self) -> anyhow::Result<()> {
        self.record("init");
        self.init_outcome.apply()
    }

    async fn run(&self) -> anyhow::Result<()> {
        self.record("run");
        if self.run_blocks {
            self.stop_signal.notified().await;
        }
        if let Some(delay) = self.run_drain {
            tokio::time::sleep(delay).await;
        }
        self.run_outcome.apply()
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.record("stop");
        self.stop_signal.notify_one();
        self.stop_outcome.apply()
    }
}
