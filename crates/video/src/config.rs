use {
    base::Vec2,
    image::{PixelFormat, Rotation},
    std::path::PathBuf,
};

const RATIO_4_3_VALUE: f64 = 4.0 / 3.0;
const RATIO_16_9_VALUE: f64 = 16.0 / 9.0;

/// Capture aspect ratios offered to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Ratio4x3,
    Ratio16x9,
}

impl AspectRatio {
    /// The supported ratio nearest to `width:height` (either orientation). Ties go to 4:3.
    pub fn closest(width: usize, height: usize) -> Self {
        let ratio = width.max(height) as f64 / width.min(height) as f64;
        if (ratio - RATIO_4_3_VALUE).abs() <= (ratio - RATIO_16_9_VALUE).abs() {
            AspectRatio::Ratio4x3
        } else {
            AspectRatio::Ratio16x9
        }
    }

    /// Landscape capture size used when none is configured.
    pub fn default_size(&self) -> Vec2<usize> {
        match self {
            AspectRatio::Ratio4x3 => Vec2::new(640, 480),
            AspectRatio::Ratio16x9 => Vec2::new(640, 360),
        }
    }
}

/// Where frames come from.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoSource {
    /// Generated moving test pattern.
    Synthetic,
    /// File of back-to-back tightly packed frames, e.g. `ffmpeg -pix_fmt nv12 -f rawvideo`.
    RawFile { path: PathBuf, looping: bool },
    /// V4L2 device, `/dev/video0` if no path is given.
    #[cfg(feature = "v4l2")]
    V4l2 { path: Option<PathBuf> },
}

/// Configuration for a capture session.
///
/// Fields left at `None` are chosen by the device.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    source: VideoSource,
    size: Option<Vec2<usize>>,
    frame_rate: Option<f32>,
    format: Option<PixelFormat>,
    rotation: Rotation,
}

impl CaptureConfig {
    pub fn new(source: VideoSource) -> Self {
        Self {
            source,
            size: None,
            frame_rate: None,
            format: None,
            rotation: Rotation::Deg0,
        }
    }

    pub fn synthetic() -> Self {
        Self::new(VideoSource::Synthetic)
    }

    pub fn raw_file(path: impl Into<PathBuf>, looping: bool) -> Self {
        Self::new(VideoSource::RawFile {
            path: path.into(),
            looping,
        })
    }

    /// Set the capture size in pixels.
    pub fn with_size(mut self, size: Vec2<usize>) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the frames per second.
    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = Some(frame_rate);
        self
    }

    /// Set the pixel format requested from the device.
    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the rotation hint attached to every frame, i.e. how the sensor is mounted.
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn source(&self) -> &VideoSource {
        &self.source
    }

    pub fn size(&self) -> Option<Vec2<usize>> {
        self.size
    }

    pub fn frame_rate(&self) -> Option<f32> {
        self.frame_rate
    }

    pub fn format(&self) -> Option<PixelFormat> {
        self.format
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }
}
