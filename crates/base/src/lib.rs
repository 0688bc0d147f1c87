//! Shared vocabulary for the mask-detect workspace: small geometry types,
//! the `Tensor` handed to classifiers, frame sequence stamping and logging.

pub mod logging;
pub use logging::{FileLogger, StdoutLogger, init_file_logger, init_stdout_logger};

mod rect;
pub use rect::*;

mod stamp;
pub use stamp::*;

mod tensor;
pub use tensor::*;

mod vec2;
pub use vec2::*;

// Re-export log crate so downstream crates can use base::log::*
pub use log;
