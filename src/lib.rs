//! Sequential processing pipelines and a registry of named pipelines.
//!
//! A [`Pipeline`] passes one value (the traveler) through an ordered list of
//! [`Stage`]s, each of which decides whether to continue the chain. A
//! [`Hub`] stores pipeline construction callbacks by name and dispatches
//! values to them.

pub mod config;
pub mod error;
pub mod hub;
pub mod logging;
pub mod pipeline;
pub mod pipes;

pub use error::{PipelineError, Result};
pub use hub::{Hub, PipelineCallback};
pub use pipeline::{DEFAULT_METHOD, FailureHandler, IntoStages, Next, Pipe, Pipeline, Stage};
