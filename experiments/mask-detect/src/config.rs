use {
    crate::PipelineOptions,
    anyhow::{Result, bail},
    base::{Rect, Vec2},
    clap::{Parser, ValueEnum},
    image::{ColorRange, ConverterOptions, PixelFormat, Rotation},
    inference::{Device, InputLayout, ModelInput, Normalization},
    std::path::PathBuf,
    video::{AspectRatio, CaptureConfig, VideoSource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Moving test pattern
    Synthetic,
    /// Raw YUV file given by --input
    File,
    /// V4L2 camera, --input selects the device node
    V4l2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RangeArg {
    Full,
    Limited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    Nchw,
    Nhwc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NormalizationArg {
    ZeroToOne,
    MinusOneToOne,
}

/// Live face-mask detection from a camera.
#[derive(Parser, Debug, Clone)]
#[command(name = "mask-detect", version, about)]
pub struct Args {
    /// Where frames come from
    #[arg(long, value_enum, default_value = "synthetic", env = "MASK_DETECT_SOURCE")]
    pub source: SourceKind,

    /// Raw YUV file, or V4L2 device node
    #[arg(long, env = "MASK_DETECT_INPUT")]
    pub input: Option<PathBuf>,

    /// Restart the raw file when it ends
    #[arg(long = "loop")]
    pub looping: bool,

    /// Capture size, e.g. 640x480
    #[arg(long, value_parser = parse_size, env = "MASK_DETECT_SIZE")]
    pub size: Option<Vec2<usize>>,

    /// Size of the screen the preview is shown on; picks a 4:3 or 16:9 capture size
    #[arg(long, value_parser = parse_size)]
    pub display_size: Option<Vec2<usize>>,

    /// Capture frames per second
    #[arg(long, env = "MASK_DETECT_FRAME_RATE")]
    pub frame_rate: Option<f32>,

    /// Pixel format fourcc: NV12, NV21, YU12 or YV12
    #[arg(long, value_parser = parse_format)]
    pub format: Option<PixelFormat>,

    /// Clockwise rotation in degrees needed to show frames upright
    #[arg(long, value_parser = parse_rotation, default_value = "0", allow_negative_numbers = true, env = "MASK_DETECT_ROTATION")]
    pub rotation: Rotation,

    /// YUV sample range of the camera
    #[arg(long, value_enum, default_value = "full")]
    pub color_range: RangeArg,

    /// Region to classify, in camera pixels: X,Y,WxH
    #[arg(long, value_parser = parse_crop)]
    pub crop: Option<Rect<usize>>,

    /// ONNX classifier model
    #[arg(long, default_value = "models/mask_detector.onnx", env = "MASK_DETECT_MODEL")]
    pub model: PathBuf,

    /// Label file, one label per line in model output order
    #[arg(long, default_value = "models/labels.txt", env = "MASK_DETECT_LABELS")]
    pub labels: PathBuf,

    /// Model input size
    #[arg(long, value_parser = parse_size, default_value = "224x224")]
    pub input_size: Vec2<usize>,

    /// Model input tensor layout
    #[arg(long, value_enum, default_value = "nchw")]
    pub input_layout: LayoutArg,

    /// Model input value range
    #[arg(long, value_enum, default_value = "zero-to-one")]
    pub normalization: NormalizationArg,

    /// Apply softmax to the model output
    #[arg(long)]
    pub softmax: bool,

    /// Run the model on this CUDA device instead of the CPU
    #[arg(long, env = "MASK_DETECT_CUDA")]
    pub cuda: Option<i32>,

    /// Inference threads
    #[arg(long, default_value_t = 5, env = "MASK_DETECT_THREADS")]
    pub threads: usize,

    /// Frames converted and classified in parallel
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=16))]
    pub workers: u32,

    /// Log labels instead of opening a preview window
    #[arg(long, env = "MASK_DETECT_HEADLESS")]
    pub headless: bool,

    /// Write logs to daily files in this directory instead of stdout
    #[arg(long, env = "MASK_DETECT_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, value_parser = parse_level, default_value = "info", env = "MASK_DETECT_LOG_LEVEL")]
    pub log_level: log::LevelFilter,

    /// Save the first oriented frame as PNG or JPEG
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

impl Args {
    pub fn capture_config(&self) -> Result<CaptureConfig> {
        let source = match self.source {
            SourceKind::Synthetic => VideoSource::Synthetic,
            SourceKind::File => {
                let Some(path) = self.input.clone() else {
                    bail!("--source file needs --input");
                };
                VideoSource::RawFile {
                    path,
                    looping: self.looping,
                }
            }
            #[cfg(feature = "v4l2")]
            SourceKind::V4l2 => VideoSource::V4l2 {
                path: self.input.clone(),
            },
            #[cfg(not(feature = "v4l2"))]
            SourceKind::V4l2 => bail!("built without V4L2 support, rebuild with --features v4l2"),
        };

        let mut config = CaptureConfig::new(source).with_rotation(self.rotation);
        let size = self.size.or_else(|| {
            self.display_size
                .map(|display| AspectRatio::closest(display.x, display.y).default_size())
        });
        if let Some(size) = size {
            config = config.with_size(size);
        }
        if let Some(frame_rate) = self.frame_rate {
            if frame_rate.is_nan() || frame_rate <= 0.0 {
                bail!("invalid frame rate {}", frame_rate);
            }
            config = config.with_frame_rate(frame_rate);
        }
        if let Some(format) = self.format {
            config = config.with_format(format);
        }
        Ok(config)
    }

    pub fn converter_options(&self) -> ConverterOptions {
        let range = match self.color_range {
            RangeArg::Full => ColorRange::Full,
            RangeArg::Limited => ColorRange::Limited,
        };
        let options = ConverterOptions::default().with_range(range);
        match self.crop {
            Some(crop) => options.with_crop(crop),
            None => options,
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            workers: self.workers as usize,
            converter: self.converter_options(),
            preview: !self.headless || self.snapshot.is_some(),
        }
    }

    pub fn model_input(&self) -> ModelInput {
        ModelInput {
            size: self.input_size,
            layout: match self.input_layout {
                LayoutArg::Nchw => InputLayout::Nchw,
                LayoutArg::Nhwc => InputLayout::Nhwc,
            },
            normalization: match self.normalization {
                NormalizationArg::ZeroToOne => Normalization::ZeroToOne,
                NormalizationArg::MinusOneToOne => Normalization::MinusOneToOne,
            },
        }
    }

    pub fn device(&self) -> Device {
        match self.cuda {
            Some(device_id) => Device::Cuda { device_id },
            None => Device::Cpu,
        }
    }

    #[cfg(feature = "onnx")]
    pub fn classifier_config(&self) -> inference::ClassifierConfig {
        inference::ClassifierConfig::default()
            .with_threads(self.threads)
            .with_device(self.device())
            .with_softmax(self.softmax)
            .with_input(self.model_input())
    }
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_size(text: &str) -> Result<Vec2<usize>, String> {
    let (width, height) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{text}'"))?;
    let width: usize = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{width}'"))?;
    let height: usize = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{height}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("size must not be empty, got {width}x{height}"));
    }
    Ok(Vec2::new(width, height))
}

/// Parse `X,Y,WIDTHxHEIGHT`.
pub fn parse_crop(text: &str) -> Result<Rect<usize>, String> {
    let mut parts = text.splitn(3, ',');
    let (Some(x), Some(y), Some(size)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected X,Y,WIDTHxHEIGHT, got '{text}'"));
    };
    let x: usize = x.trim().parse().map_err(|_| format!("invalid x '{x}'"))?;
    let y: usize = y.trim().parse().map_err(|_| format!("invalid y '{y}'"))?;
    Ok(Rect::new(Vec2::new(x, y), parse_size(size)?))
}

pub fn parse_rotation(text: &str) -> Result<Rotation, String> {
    let degrees: i32 = text
        .trim()
        .parse()
        .map_err(|_| format!("invalid rotation '{text}'"))?;
    Rotation::from_degrees(degrees).map_err(|error| error.to_string())
}

/// Parse a YUV 4:2:0 fourcc such as `NV12`.
pub fn parse_format(text: &str) -> Result<PixelFormat, String> {
    let bytes: [u8; 4] = text
        .trim()
        .to_ascii_uppercase()
        .as_bytes()
        .try_into()
        .map_err(|_| format!("fourcc must be 4 characters, got '{text}'"))?;
    let format =
        PixelFormat::from_fourcc(u32::from_le_bytes(bytes)).map_err(|error| error.to_string())?;
    if !format.is_yuv420() {
        return Err(format!("{text} is not a YUV 4:2:0 format"));
    }
    Ok(format)
}

pub fn parse_level(text: &str) -> Result<log::LevelFilter, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("unknown log level '{text}'"))
}
