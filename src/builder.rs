//! Incremental report builder driven by runner lifecycle events.
//!
//! Events are expected in strict lifecycle order: a suite opens before any of
//! its tests, a test opens before any of its assertions, and each entity is
//! finished only after its children. At most one suite, test and assertion is
//! open at a time. Open entities are held outside the tree and moved into their
//! parent when they close.

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigLookup, ReporterOptions};
use crate::error::{ReportError, Result};
use crate::events::{self, Assertion, Emitter, Event, Listener, Notification, RunnerFinished};
use crate::model::{Case, CaseResult, Report, RunSummary, Severity, Suite, Variation};
use crate::{output, serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Events the builder subscribes to.
pub const SUBSCRIPTIONS: &[&str] = &[
    events::TARGET_SELECTED,
    events::ASSERTION,
    events::TEST_STARTED,
    events::TEST_FINISHED,
    events::RUNNER_FINISHED,
    events::SUITE_STARTED,
    events::SUITE_FINISHED,
];

/// Accumulates the report tree and writes it once the run finishes.
pub struct ReportBuilder<C = SystemClock> {
    report: Report,
    target: Option<String>,
    open_suite: Option<Suite>,
    open_case: Option<Case>,
    open_variation: Option<Variation>,
    finished_tests: usize,
    summary: Option<RunSummary>,
    dest: PathBuf,
    clock: C,
}

impl ReportBuilder<SystemClock> {
    pub fn new(config: &dyn ConfigLookup) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> ReportBuilder<C> {
    pub fn with_clock(config: &dyn ConfigLookup, clock: C) -> Self {
        let dest = ReporterOptions::from_config(config).destination();
        debug!(dest = %dest.display(), "junit reporter configured");
        Self {
            report: Report::default(),
            target: None,
            open_suite: None,
            open_case: None,
            open_variation: None,
            finished_tests: 0,
            summary: None,
            dest,
            clock,
        }
    }

    /// Override the destination read from configuration.
    pub fn set_destination(&mut self, dest: impl Into<PathBuf>) {
        self.dest = dest.into();
    }

    /// Path the report will be written to.
    pub fn destination(&self) -> PathBuf {
        output::resolve_destination(&self.dest)
    }

    /// Closed suites collected so far.
    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Dispatch one event to its handler.
    ///
    /// Returns the written path when the event finished the run.
    pub fn handle(&mut self, event: &Event, emitter: &mut dyn Emitter) -> Result<Option<PathBuf>> {
        debug!(event = event.name(), "handling event");
        match event {
            Event::TargetSelected(target) => self.target_selected(target),
            Event::SuiteStarted(name) => self.suite_started(name)?,
            Event::Assertion(data) => self.assertion(data)?,
            Event::TestStarted(data) => self.test_started(&data.name)?,
            Event::TestFinished(data) => self.test_finished(data.status)?,
            Event::SuiteFinished => self.suite_finished()?,
            Event::RunnerFinished(data) => return self.runner_finished(data, emitter).map(Some),
        }
        Ok(None)
    }

    pub fn target_selected(&mut self, target: &str) {
        self.target = Some(target.to_string());
    }

    pub fn suite_started(&mut self, name: &str) -> Result<()> {
        if self.open_suite.is_some() {
            return Err(out_of_order(events::SUITE_STARTED, "another suite is still open"));
        }
        let target = self.target.as_deref().unwrap_or("null");
        let label = format!("{name} [{target}]");
        self.finished_tests = 0;
        self.open_suite = Some(Suite::open(label, self.clock.now()));
        Ok(())
    }

    pub fn suite_finished(&mut self) -> Result<()> {
        if self.open_case.is_some() {
            return Err(out_of_order(events::SUITE_FINISHED, "a test is still open"));
        }
        let mut suite = self
            .open_suite
            .take()
            .ok_or_else(|| out_of_order(events::SUITE_FINISHED, "no suite is open"))?;
        suite.end = Some(self.clock.now());
        debug!(suite = %suite.name, tests = suite.total_tests, "suite closed");
        self.report.suites.push(suite);
        Ok(())
    }

    pub fn test_started(&mut self, name: &str) -> Result<()> {
        if self.open_suite.is_none() {
            return Err(out_of_order(events::TEST_STARTED, "no suite is open"));
        }
        if self.open_case.is_some() {
            return Err(out_of_order(events::TEST_STARTED, "another test is still open"));
        }
        self.open_case = Some(Case::open(name.to_string(), self.clock.now()));
        Ok(())
    }

    pub fn test_finished(&mut self, status: bool) -> Result<()> {
        let now = self.clock.now();
        let (Some(suite), Some(mut case)) = (self.open_suite.as_mut(), self.open_case.take()) else {
            return Err(out_of_order(events::TEST_FINISHED, "no test is open"));
        };
        if let Some(mut last) = self.open_variation.take() {
            last.end = Some(now);
            case.variations.push(last);
        }
        case.end = Some(now);
        case.result = Some(CaseResult::from_status(status));
        suite.cases.push(case);

        self.finished_tests += 1;
        suite.total_tests = self.finished_tests;
        Ok(())
    }

    pub fn assertion(&mut self, data: &Assertion) -> Result<()> {
        let now = self.clock.now();
        let case = self
            .open_case
            .as_mut()
            .ok_or_else(|| out_of_order(events::ASSERTION, "no test is open"))?;
        if let Some(mut previous) = self.open_variation.take() {
            previous.end = Some(now);
            case.variations.push(previous);
        }
        self.open_variation = Some(Variation {
            start: now,
            end: None,
            name: data.kind.clone(),
            severity: Severity::from_success(data.success),
            description: describe(data),
        });
        Ok(())
    }

    /// Record the run summary, then serialize and write the report.
    ///
    /// The `report:written` notification is emitted only after the file was
    /// written. Filesystem failures are returned as is.
    pub fn runner_finished(
        &mut self,
        data: &RunnerFinished,
        emitter: &mut dyn Emitter,
    ) -> Result<PathBuf> {
        self.summary = Some(RunSummary {
            elapsed_time: data.elapsed_time.clone(),
            status: data.status,
            assertions: data.assertions,
            assertions_failed: data.assertions_failed,
            assertions_passed: data.assertions_passed,
        });
        self.flush_open_entities();

        let contents = serialize::to_xml(&self.report)?;
        let dest = self.destination();
        output::write_report(&dest, &contents)?;
        info!(dest = %dest.display(), suites = self.report.suites.len(), "junit report written");

        emitter.emit(Notification::ReportWritten {
            kind: "junit".to_string(),
            dest: dest.clone(),
        });
        Ok(dest)
    }

    /// Move anything still open into the tree, leaving its end unset.
    fn flush_open_entities(&mut self) {
        if self.open_variation.is_none() && self.open_case.is_none() && self.open_suite.is_none() {
            return;
        }
        warn!("run finished with unclosed entities, writing them without an end time");
        if let (Some(case), Some(variation)) = (self.open_case.as_mut(), self.open_variation.take()) {
            case.variations.push(variation);
        }
        if let (Some(suite), Some(case)) = (self.open_suite.as_mut(), self.open_case.take()) {
            suite.cases.push(case);
        }
        if let Some(suite) = self.open_suite.take() {
            self.report.suites.push(suite);
        }
    }
}

impl<C: Clock> Listener for ReportBuilder<C> {
    fn subscriptions(&self) -> &'static [&'static str] {
        SUBSCRIPTIONS
    }

    fn on_event(&mut self, event: &Event, emitter: &mut dyn Emitter) -> Result<()> {
        self.handle(event, emitter).map(|_| ())
    }
}

fn out_of_order(event: &'static str, problem: &'static str) -> ReportError {
    ReportError::OutOfOrder { event, problem }
}

/// The assertion message, or an expected/actual line when there is none.
///
/// The synthesized line has no separator between the two halves; consumers of
/// existing reports match on it.
fn describe(data: &Assertion) -> String {
    match data.message.as_deref() {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => format!(
            "Expected: {}Actual: {}",
            display_value(data.expected.as_ref()),
            display_value(data.value.as_ref())
        ),
    }
}

/// String form of a payload value when concatenated by the host runtime.
fn display_value(value: Option<&serde_json::Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(value) => host_string(value),
    }
}

fn host_string(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) => "[object Object]".to_string(),
        // nulls inside arrays join as empty strings
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => host_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
