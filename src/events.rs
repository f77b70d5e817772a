//! Lifecycle events published by the test runner host and the in-process bus
//! that routes them to listeners.

use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const TARGET_SELECTED: &str = "report:run:browser";
pub const SUITE_STARTED: &str = "report:testsuite:started";
pub const ASSERTION: &str = "report:assertion";
pub const TEST_STARTED: &str = "report:test:started";
pub const TEST_FINISHED: &str = "report:test:finished";
pub const SUITE_FINISHED: &str = "report:testsuite:finished";
pub const RUNNER_FINISHED: &str = "report:runner:finished";
pub const REPORT_WRITTEN: &str = "report:written";

/// Structured lifecycle event emitted by the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event", content = "data")]
pub enum Event {
    /// Name of the browser or environment the next suites run against.
    #[serde(rename = "report:run:browser")]
    TargetSelected(String),
    /// Suite name.
    #[serde(rename = "report:testsuite:started")]
    SuiteStarted(String),
    #[serde(rename = "report:assertion")]
    Assertion(Assertion),
    #[serde(rename = "report:test:started")]
    TestStarted(TestStarted),
    #[serde(rename = "report:test:finished")]
    TestFinished(TestFinished),
    #[serde(rename = "report:testsuite:finished")]
    SuiteFinished,
    #[serde(rename = "report:runner:finished")]
    RunnerFinished(RunnerFinished),
}

impl Event {
    /// Wire name the host publishes this event under.
    pub fn name(&self) -> &'static str {
        match self {
            Event::TargetSelected(_) => TARGET_SELECTED,
            Event::SuiteStarted(_) => SUITE_STARTED,
            Event::Assertion(_) => ASSERTION,
            Event::TestStarted(_) => TEST_STARTED,
            Event::TestFinished(_) => TEST_FINISHED,
            Event::SuiteFinished => SUITE_FINISHED,
            Event::RunnerFinished(_) => RUNNER_FINISHED,
        }
    }

    /// Build an event from its wire name and payload.
    ///
    /// Returns `None` for names this crate does not know. The payload of
    /// `report:testsuite:finished` is ignored, hosts differ in what they send.
    pub fn from_parts(
        name: &str,
        data: serde_json::Value,
    ) -> Option<std::result::Result<Self, serde_json::Error>> {
        let event = match name {
            TARGET_SELECTED => serde_json::from_value(data).map(Event::TargetSelected),
            SUITE_STARTED => serde_json::from_value(data).map(Event::SuiteStarted),
            ASSERTION => serde_json::from_value(data).map(Event::Assertion),
            TEST_STARTED => serde_json::from_value(data).map(Event::TestStarted),
            TEST_FINISHED => serde_json::from_value(data).map(Event::TestFinished),
            SUITE_FINISHED => Ok(Event::SuiteFinished),
            RUNNER_FINISHED => serde_json::from_value(data).map(Event::RunnerFinished),
            _ => return None,
        };
        Some(event)
    }
}

/// Result of one assertion inside the running test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Assertion {
    /// Assertion kind, e.g. `val` or `title`.
    #[serde(rename = "type")]
    pub kind: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestStarted {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestFinished {
    pub status: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunnerFinished {
    #[serde(default)]
    pub elapsed_time: serde_json::Value,
    pub status: bool,
    #[serde(default)]
    pub assertions: u64,
    #[serde(default)]
    pub assertions_failed: u64,
    #[serde(default)]
    pub assertions_passed: u64,
}

/// Notification emitted back onto the bus by a listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum Notification {
    #[serde(rename = "report:written")]
    ReportWritten {
        #[serde(rename = "type")]
        kind: String,
        dest: PathBuf,
    },
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Notification::ReportWritten { .. } => REPORT_WRITTEN,
        }
    }
}

/// Sink for notifications raised while handling events.
pub trait Emitter {
    fn emit(&mut self, notification: Notification);
}

impl Emitter for Vec<Notification> {
    fn emit(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Something that reacts to lifecycle events.
pub trait Listener {
    /// Event names this listener wants to receive.
    fn subscriptions(&self) -> &'static [&'static str];

    fn on_event(&mut self, event: &Event, emitter: &mut dyn Emitter) -> Result<()>;
}

/// Routes published events to the listeners subscribed to their name.
///
/// Listeners are borrowed, so the host keeps ownership of each one and can
/// inspect it once the bus is dropped.
pub struct EventBus<'a, E> {
    listeners: Vec<&'a mut dyn Listener>,
    emitter: E,
}

impl<'a, E: Emitter> EventBus<'a, E> {
    pub fn new(emitter: E) -> Self {
        Self {
            listeners: Vec::new(),
            emitter,
        }
    }

    pub fn subscribe(&mut self, listener: &'a mut dyn Listener) {
        tracing::debug!(events = ?listener.subscriptions(), "listener subscribed");
        self.listeners.push(listener);
    }

    /// Deliver `event` to every subscribed listener, in subscription order.
    ///
    /// Stops at the first listener error. Returns how many listeners received
    /// the event.
    pub fn publish(&mut self, event: &Event) -> Result<usize> {
        let name = event.name();
        let mut delivered = 0;
        for listener in self.listeners.iter_mut() {
            if listener.subscriptions().contains(&name) {
                listener.on_event(event, &mut self.emitter)?;
                delivered += 1;
            }
        }
        if delivered == 0 {
            tracing::trace!(event = name, "no listener subscribed");
        }
        Ok(delivered)
    }

    pub fn into_emitter(self) -> E {
        self.emitter
    }
}

/// Generate JSON Schema for one recorded event.
pub fn generate_schema() -> std::result::Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(Event);
    serde_json::to_string_pretty(&schema)
}
