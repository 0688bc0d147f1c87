use {
    crate::*,
    base::Vec2,
    image::{PixelFormat, PlaneLayout, RawFrame, Rotation},
    std::time::{Duration, Instant},
};

const DEFAULT_FRAME_RATE: f32 = 30.0;

/// Moving test pattern, for running without a camera.
///
/// Luma is a diagonal ramp that scrolls one step per frame; chroma is split
/// into four quadrants of different hue.
pub struct SyntheticCamera {
    size: Vec2<usize>,
    format: PixelFormat,
    frame_rate: f32,
    rotation: Rotation,
    planes: Option<[PlaneLayout; 3]>,
    index: usize,
    next_deadline: Option<Instant>,
}

impl SyntheticCamera {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            size: config
                .size()
                .unwrap_or_else(|| AspectRatio::Ratio4x3.default_size()),
            format: config.format().unwrap_or(PixelFormat::Nv12),
            frame_rate: config.frame_rate().unwrap_or(DEFAULT_FRAME_RATE),
            rotation: config.rotation(),
            planes: None,
            index: 0,
            next_deadline: None,
        }
    }

    fn render(&self, planes: &[PlaneLayout; 3]) -> Vec<u8> {
        let mut data = vec![0u8; self.format.packed_len(self.size)];
        let shift = self.index * 2;

        let y = &planes[0];
        for row in 0..self.size.y {
            for col in 0..self.size.x {
                data[y.offset + row * y.row_stride + col * y.pixel_stride] =
                    ((row + col + shift) & 0xFF) as u8;
            }
        }

        let chroma = image::chroma_size(self.size);
        let (u, v) = (&planes[1], &planes[2]);
        for row in 0..chroma.y {
            for col in 0..chroma.x {
                let right = col >= chroma.x / 2;
                let bottom = row >= chroma.y / 2;
                let (cb, cr) = match (right, bottom) {
                    (false, false) => (128u8, 128u8),
                    (true, false) => (64, 192),
                    (false, true) => (192, 64),
                    (true, true) => (200, 200),
                };
                data[u.offset + row * u.row_stride + col * u.pixel_stride] = cb;
                data[v.offset + row * v.row_stride + col * v.pixel_stride] = cr;
            }
        }
        data
    }
}

impl VideoInDevice for SyntheticCamera {
    fn open(&mut self) -> Result<CaptureInfo, VideoError> {
        if self.size.x == 0 || self.size.y == 0 {
            return Err(VideoError::Device(format!("invalid capture size {}", self.size)));
        }
        if self.frame_rate.is_nan() || self.frame_rate <= 0.0 {
            return Err(VideoError::Device(format!(
                "invalid frame rate {}",
                self.frame_rate
            )));
        }
        let planes = self.format.packed_planes(self.size).ok_or_else(|| {
            VideoError::Device(format!("{:?} is not a YUV 4:2:0 format", self.format))
        })?;
        self.planes = Some(planes);
        self.next_deadline = None;
        Ok(CaptureInfo {
            size: self.size,
            format: self.format,
            frame_rate: self.frame_rate,
        })
    }

    fn close(&mut self) {
        self.planes = None;
    }

    fn blocking_capture(&mut self) -> Result<Option<RawFrame>, VideoError> {
        let planes = self
            .planes
            .ok_or_else(|| VideoError::Stream("synthetic camera not open".to_string()))?;

        // pace to the frame rate
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now);
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        self.next_deadline =
            Some(deadline.max(now) + Duration::from_secs_f32(1.0 / self.frame_rate));

        let data = self.render(&planes);
        self.index = self.index.wrapping_add(1);
        Ok(Some(RawFrame::new(
            self.size,
            data,
            planes,
            self.rotation,
        )?))
    }
}
