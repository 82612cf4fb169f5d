//! # geofuse-runner
//!
//! The thin caller around the geofuse pipeline: parses the CLI, sets up
//! logging, and drives locate → fetch → merge → sample over one output area.

mod cli;
mod error;
mod pipeline;

pub use cli::Cli;
pub use error::PipelineError;
pub use pipeline::{run, PipelineConfig, PipelineOutcome};
