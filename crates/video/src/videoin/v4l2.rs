use {
    crate::*,
    base::Vec2,
    image::{PixelFormat, PlaneLayout, RawFrame, Rotation},
    std::path::PathBuf,
    v4l::{
        Device, Format, FourCC, buffer::Type, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture,
    },
};

// formats we can convert, in order of preference
const SUPPORTED_FORMATS: [PixelFormat; 4] = [
    PixelFormat::Nv12,
    PixelFormat::Nv21,
    PixelFormat::Yu12,
    PixelFormat::Yv12,
];

/// Video4Linux2 camera delivering YUV 4:2:0 frames.
pub struct V4l2Camera {
    path: Option<PathBuf>,
    requested_size: Option<Vec2<usize>>,
    requested_format: Option<PixelFormat>,
    requested_frame_rate: Option<f32>,
    rotation: Rotation,
    stream: Option<MmapStream<'static>>,
    size: Vec2<usize>,
    format: PixelFormat,
    planes: Option<[PlaneLayout; 3]>,
}

impl V4l2Camera {
    pub fn new(config: &CaptureConfig) -> Self {
        let path = match config.source() {
            VideoSource::V4l2 { path } => path.clone(),
            _ => None,
        };
        Self {
            path,
            requested_size: config.size(),
            requested_format: config.format(),
            requested_frame_rate: config.frame_rate(),
            rotation: config.rotation(),
            stream: None,
            size: Vec2::zero(),
            format: PixelFormat::Nv12,
            planes: None,
        }
    }
}

impl VideoInDevice for V4l2Camera {
    fn open(&mut self) -> Result<CaptureInfo, VideoError> {
        // close stream
        self.stream.take();
        self.planes = None;

        // create device from path or default
        let device = match &self.path {
            Some(path) => Device::with_path(path)?,
            None => Device::new(0)?,
        };
        let device_format = Capture::format(&device)?;

        let desired_size = self.requested_size.unwrap_or_else(|| {
            Vec2::new(device_format.width as usize, device_format.height as usize)
        });

        // try the requested format first, then whatever else we can convert
        let candidates = self
            .requested_format
            .into_iter()
            .chain(SUPPORTED_FORMATS)
            .filter(|format| format.is_yuv420());
        let mut actual = None;
        for format in candidates {
            let fourcc = FourCC::new(&format.as_fourcc().to_le_bytes());
            let result = Capture::set_format(
                &device,
                &Format::new(desired_size.x as u32, desired_size.y as u32, fourcc),
            )?;
            if let Ok(format) = PixelFormat::from_fourcc(u32::from_le_bytes(result.fourcc.repr)) {
                if format.is_yuv420() {
                    actual = Some((format, result));
                    break;
                }
            }
        }
        let Some((format, actual_format)) = actual else {
            return Err(VideoError::Device(
                "device offers no YUV 4:2:0 format".to_string(),
            ));
        };

        self.size = Vec2::new(actual_format.width as usize, actual_format.height as usize);
        self.format = format;
        let stride = (actual_format.stride as usize).max(self.size.x);
        self.planes = format.strided_planes(self.size, stride);

        // set the frame rate and get the actual frame rate back
        if let Some(frame_rate) = self.requested_frame_rate {
            Capture::set_params(
                &device,
                &v4l::video::capture::Parameters::with_fps(frame_rate as u32),
            )?;
        }
        let params = Capture::params(&device)?;
        let frame_rate = params.interval.denominator as f32 / params.interval.numerator.max(1) as f32;

        // create the stream
        self.stream = match MmapStream::with_buffers(&device, Type::VideoCapture, 4u32) {
            Ok(stream) => Some(stream),
            Err(error) => {
                return Err(VideoError::Stream(error.to_string()));
            }
        };

        Ok(CaptureInfo {
            size: self.size,
            format: self.format,
            frame_rate,
        })
    }

    fn close(&mut self) {
        self.stream.take();
    }

    fn blocking_capture(&mut self) -> Result<Option<RawFrame>, VideoError> {
        let (Some(stream), Some(planes)) = (self.stream.as_mut(), self.planes) else {
            return Err(VideoError::Stream("No stream".to_string()));
        };
        match CaptureStream::next(stream) {
            Ok((frame_data, metadata)) => {
                let used = (metadata.bytesused as usize).min(frame_data.len());
                if used == 0 {
                    return Ok(None);
                }
                let frame = RawFrame::new(
                    self.size,
                    frame_data[..used].to_vec(),
                    planes,
                    self.rotation,
                )?;
                Ok(Some(frame))
            }
            Err(error) => Err(VideoError::Stream(error.to_string())),
        }
    }
}
