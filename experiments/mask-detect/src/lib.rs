//! Camera to classifier to label: live face-mask detection.

pub mod config;
pub mod display;
pub mod pipeline;
pub mod snapshot;
pub mod status;

pub use config::Args;
pub use pipeline::{CancelHandle, Outputs, Pipeline, PipelineOptions};
pub use snapshot::Snapshot;
pub use status::{PERMISSION_NOTICE, Status, status_text};
