use crate::builder::ReportBuilder;
use crate::cli::ReplayArgs;
use crate::config::{self, NoConfig};
use crate::console::Console;
use crate::events::{Event, EventBus};
use crate::exit_codes::exit;
use crate::stream;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Publish a recorded event stream to a fresh report builder.
pub fn run(args: ReplayArgs) -> Result<i32> {
    let events = stream::read_events(&args.events).context("failed to load event stream")?;

    let mut builder = match &args.config {
        Some(path) => {
            let host_config = config::load_config(path).context("failed to load configuration")?;
            ReportBuilder::new(&host_config)
        }
        None => ReportBuilder::new(&NoConfig),
    };
    if let Some(dest) = args.dest {
        builder.set_destination(dest);
    }

    let finished = events
        .iter()
        .any(|event| matches!(event, Event::RunnerFinished(_)));

    let mut bus = EventBus::new(Console::new(args.json));
    bus.subscribe(&mut builder);
    for event in &events {
        bus.publish(event)
            .with_context(|| format!("failed to handle {}", event.name()))?;
    }
    drop(bus);

    if !finished {
        warn!(
            events = events.len(),
            "event stream ended before the runner finished, no report written"
        );
        return Ok(exit::INCOMPLETE_STREAM);
    }
    if let Some(summary) = builder.summary() {
        info!(
            status = summary.status,
            assertions = summary.assertions,
            failed = summary.assertions_failed,
            passed = summary.assertions_passed,
            elapsed = %summary.elapsed_time,
            "run summary"
        );
    }
    Ok(exit::SUCCESS)
}
