//! Event-driven jUnit XML reporter.
//!
//! A [`builder::ReportBuilder`] listens to the lifecycle events of a test run
//! (suite, test and assertion start/finish), keeps the report tree in memory and
//! writes it as XML once the runner finishes.

pub mod builder;
pub mod cli;
pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod model;
pub mod output;
pub mod replay;
pub mod serialize;
pub mod stream;

pub use builder::ReportBuilder;
pub use error::{ReportError, Result};
pub use events::{Event, EventBus};
