use {
    crate::*,
    base::{Rect, Vec2},
};

/// Settings for `FrameConverter`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConverterOptions {
    range: ColorRange,
    crop: Option<Rect<usize>>,
    rotation: Option<Rotation>,
}

impl ConverterOptions {
    /// Set the YUV sample range of incoming frames.
    pub fn with_range(mut self, range: ColorRange) -> Self {
        self.range = range;
        self
    }

    /// Only keep this region of the frame, in frame (pre-rotation) coordinates.
    pub fn with_crop(mut self, crop: Rect<usize>) -> Self {
        self.crop = Some(crop);
        self
    }

    /// Ignore the rotation hint carried by the frames and use this one.
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn range(&self) -> ColorRange {
        self.range
    }

    pub fn crop(&self) -> Option<Rect<usize>> {
        self.crop
    }

    pub fn rotation(&self) -> Option<Rotation> {
        self.rotation
    }
}

/// Turns captured YUV frames into upright RGBA images.
///
/// Owns two reusable buffers: the converted frame and its rotated copy. The
/// returned `OrientedImage` borrows one of them, so it has to be dropped
/// before the next frame is converted.
#[derive(Debug, Default)]
pub struct FrameConverter {
    options: ConverterOptions,
    pixels: PixelBuffer,
    oriented: PixelBuffer,
}

impl FrameConverter {
    pub fn new(options: ConverterOptions) -> Self {
        Self {
            options,
            pixels: PixelBuffer::default(),
            oriented: PixelBuffer::default(),
        }
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// The frame as converted, before rotation and cropping.
    pub fn pixel_buffer(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn convert(&mut self, frame: &RawFrame) -> OrientedImage<'_> {
        let size = frame.size();
        if self.pixels.ensure_size(size) {
            log::debug!("pixel buffer allocated for {}", size);
        }
        yuv420_to_rgba(frame, self.options.range, &mut self.pixels);

        let rotation = self.options.rotation.unwrap_or(frame.rotation());
        let full = Rect::new(Vec2::zero(), size);
        // a crop that misses the frame entirely falls back to the whole frame
        let region = self
            .options
            .crop
            .and_then(|crop| crop.clamped_to(size))
            .unwrap_or(full);

        if rotation == Rotation::Deg0 && region == full {
            return OrientedImage {
                size,
                data: self.pixels.data(),
            };
        }

        let out_size = rotation.output_size(region.size);
        if self.oriented.ensure_size(out_size) {
            log::debug!("oriented buffer allocated for {}", out_size);
        }
        rotate_into(&self.pixels, region, rotation, &mut self.oriented);
        OrientedImage {
            size: out_size,
            data: self.oriented.data(),
        }
    }
}

/// Upright RGBA view of the last converted frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedImage<'a> {
    size: Vec2<usize>,
    data: &'a [u8],
}

impl<'a> OrientedImage<'a> {
    /// Wrap packed RGBA pixels. Returns `None` if `data` does not match `size`.
    pub fn from_rgba(size: Vec2<usize>, data: &'a [u8]) -> Option<Self> {
        (data.len() == size.area() * BYTES_PER_PIXEL).then_some(Self { size, data })
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.size.x + x) * BYTES_PER_PIXEL;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Copy the pixels out so they can outlive the converter's next frame.
    pub fn to_image(&self) -> Image {
        Image::new(self.size, self.data.to_vec(), PixelFormat::Rgba8)
    }
}
