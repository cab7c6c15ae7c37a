//! fuzzytag command-line front end
//!
//! Supplies the collaborators the core engine leaves out:
//! - **cli**: clap arguments mirroring the single-node flags
//! - **settings**: YAML settings and validation into a run plan
//! - **output**: text and JSON-lines sinks
//! - **tracing**: stderr logging setup

pub mod cli;
pub mod output;
pub mod settings;
pub mod tracing;

pub use cli::{Args, Format};
pub use settings::{RunPlan, Settings, SettingsError};
