use {
    crate::*,
    base::Vec2,
    image::{PixelFormat, RawFrame, Rotation},
    std::{
        fs::File,
        io::{BufReader, Read, Seek, SeekFrom},
        path::PathBuf,
        time::{Duration, Instant},
    },
};

const DEFAULT_FRAME_RATE: f32 = 30.0;

/// Replays a file of back-to-back tightly packed YUV 4:2:0 frames.
///
/// A file without a size in the config is assumed to be 640x480 NV12.
pub struct RawFileCamera {
    path: PathBuf,
    looping: bool,
    size: Vec2<usize>,
    format: PixelFormat,
    frame_rate: f32,
    rotation: Rotation,
    reader: Option<BufReader<File>>,
    next_deadline: Option<Instant>,
}

impl RawFileCamera {
    pub fn new(config: &CaptureConfig) -> Result<Self, VideoError> {
        let VideoSource::RawFile { path, looping } = config.source() else {
            return Err(VideoError::Device(
                "RawFileCamera needs a raw file source".to_string(),
            ));
        };
        let format = config.format().unwrap_or(PixelFormat::Nv12);
        if !format.is_yuv420() {
            return Err(VideoError::Device(format!(
                "{format:?} is not a YUV 4:2:0 format"
            )));
        }
        Ok(Self {
            path: path.clone(),
            looping: *looping,
            size: config
                .size()
                .unwrap_or_else(|| AspectRatio::Ratio4x3.default_size()),
            format,
            frame_rate: config.frame_rate().unwrap_or(DEFAULT_FRAME_RATE),
            rotation: config.rotation(),
            reader: None,
            next_deadline: None,
        })
    }

    // fill `buffer` completely; returns the number of bytes read before EOF
    fn read_frame(reader: &mut BufReader<File>, buffer: &mut [u8]) -> Result<usize, VideoError> {
        let mut filled = 0;
        while filled < buffer.len() {
            match reader.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(error) if error.kind() == std::io::ErrorKind::Interrupted => {}
                Err(error) => return Err(VideoError::Stream(error.to_string())),
            }
        }
        Ok(filled)
    }
}

impl VideoInDevice for RawFileCamera {
    fn open(&mut self) -> Result<CaptureInfo, VideoError> {
        if self.size.x == 0 || self.size.y == 0 {
            return Err(VideoError::Device(format!("invalid capture size {}", self.size)));
        }
        let file = File::open(&self.path)?;
        log::debug!("raw file {} opened", self.path.display());
        self.reader = Some(BufReader::new(file));
        self.next_deadline = None;
        Ok(CaptureInfo {
            size: self.size,
            format: self.format,
            frame_rate: self.frame_rate,
        })
    }

    fn close(&mut self) {
        self.reader.take();
    }

    fn blocking_capture(&mut self) -> Result<Option<RawFrame>, VideoError> {
        let frame_len = self.format.packed_len(self.size);
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| VideoError::Stream("raw file not open".to_string()))?;

        let mut data = vec![0u8; frame_len];
        let mut filled = Self::read_frame(reader, &mut data)?;
        if filled == 0 && self.looping {
            reader
                .seek(SeekFrom::Start(0))
                .map_err(|error| VideoError::Stream(error.to_string()))?;
            filled = Self::read_frame(reader, &mut data)?;
        }
        if filled == 0 {
            return Err(VideoError::EndOfStream);
        }
        if filled < frame_len {
            log::warn!(
                "raw file {}: trailing partial frame of {} bytes ignored",
                self.path.display(),
                filled
            );
            return Err(VideoError::EndOfStream);
        }

        // pace to the frame rate
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now);
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        if self.frame_rate > 0.0 {
            self.next_deadline =
                Some(deadline.max(now) + Duration::from_secs_f32(1.0 / self.frame_rate));
        }

        Ok(Some(RawFrame::from_packed(
            self.size,
            self.format,
            data,
            self.rotation,
        )?))
    }
}
