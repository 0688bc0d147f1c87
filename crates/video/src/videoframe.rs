use {image::RawFrame, std::time::Duration};

/// A captured frame as delivered by `VideoIn`.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Position in the capture session, starting at 1 and strictly increasing.
    pub seq: u64,
    /// Time since the session was opened.
    pub timestamp: Duration,
    pub frame: RawFrame,
}
