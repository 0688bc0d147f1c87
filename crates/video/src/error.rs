use std::fmt;

#[derive(Debug)]
pub enum VideoError {
    Device(String),
    Stream(String),
    /// Access to the capture device was refused.
    PermissionDenied(String),
    /// The source has no more frames.
    EndOfStream,
    Frame(image::ImageError),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Device(msg) => write!(f, "device error: {msg}"),
            VideoError::Stream(msg) => write!(f, "stream error: {msg}"),
            VideoError::PermissionDenied(msg) => write!(f, "camera permission denied: {msg}"),
            VideoError::EndOfStream => write!(f, "end of stream"),
            VideoError::Frame(err) => write!(f, "frame error: {err}"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => VideoError::PermissionDenied(err.to_string()),
            _ => VideoError::Device(err.to_string()),
        }
    }
}

impl From<image::ImageError> for VideoError {
    fn from(err: image::ImageError) -> Self {
        VideoError::Frame(err)
    }
}
