//! Camera capture for the mask-detect pipeline.
//!
//! `VideoIn` runs a capture device on a blocking worker thread and hands
//! stamped `VideoFrame`s to async consumers through a bounded channel.

pub mod config;
pub mod error;
pub mod videoframe;
pub mod videoin;

pub use config::{AspectRatio, CaptureConfig, VideoSource};
pub use error::VideoError;
pub use videoframe::VideoFrame;
pub use videoin::{CaptureInfo, RawFileCamera, SyntheticCamera, VideoIn, VideoInDevice};

#[cfg(feature = "v4l2")]
pub use videoin::V4l2Camera;
