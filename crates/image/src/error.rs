use std::fmt;

#[derive(Debug)]
pub enum ImageError {
    /// Plane offsets, strides or sizes do not fit the frame.
    Layout(String),
    UnsupportedFormat(String),
    InvalidRotation(i32),
    Encode(String),
    Io(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Layout(msg) => write!(f, "layout error: {msg}"),
            ImageError::UnsupportedFormat(msg) => write!(f, "unsupported format: {msg}"),
            ImageError::InvalidRotation(degrees) => {
                write!(f, "invalid rotation: {degrees} is not a multiple of 90 degrees")
            }
            ImageError::Encode(msg) => write!(f, "encode error: {msg}"),
            ImageError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for ImageError {}

impl From<crates_image::ImageError> for ImageError {
    fn from(err: crates_image::ImageError) -> Self {
        ImageError::Encode(err.to_string())
    }
}

impl From<std::io::Error> for ImageError {
    fn from(err: std::io::Error) -> Self {
        ImageError::Io(err.to_string())
    }
}
