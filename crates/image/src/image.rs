use {
    crate::*,
    base::Vec2,
    crates_image::{ExtendedColorType, ImageEncoder},
    std::path::Path,
};

/// An owned, packed RGB or RGBA image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    fn channels(&self) -> Result<usize, ImageError> {
        match self.format {
            PixelFormat::Rgba8 => Ok(4),
            PixelFormat::Rgb8 => Ok(3),
            other => Err(ImageError::UnsupportedFormat(format!(
                "{other:?} image cannot be encoded"
            ))),
        }
    }

    /// Packed RGB bytes, alpha dropped.
    pub fn to_rgb(&self) -> Result<Vec<u8>, ImageError> {
        match self.channels()? {
            3 => Ok(self.data.clone()),
            _ => Ok(self
                .data
                .chunks_exact(4)
                .flat_map(|c| [c[0], c[1], c[2]])
                .collect()),
        }
    }

    /// Pixels packed as `0x00RRGGBB`, the layout minifb expects.
    pub fn to_u32(&self) -> Result<Vec<u32>, ImageError> {
        let channels = self.channels()?;
        Ok(self
            .data
            .chunks_exact(channels)
            .map(|c| (c[0] as u32) << 16 | (c[1] as u32) << 8 | c[2] as u32)
            .collect())
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, ImageError> {
        let color_type = match self.channels()? {
            3 => ExtendedColorType::Rgb8,
            _ => ExtendedColorType::Rgba8,
        };
        let mut buffer = Vec::new();
        crates_image::codecs::png::PngEncoder::new(&mut buffer).write_image(
            &self.data,
            self.size.x as u32,
            self.size.y as u32,
            color_type,
        )?;
        Ok(buffer)
    }

    /// JPEG has no alpha channel, RGBA images are flattened to RGB first.
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, ImageError> {
        let rgb = self.to_rgb()?;
        let mut buffer = Vec::new();
        crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality)
            .write_image(
                &rgb,
                self.size.x as u32,
                self.size.y as u32,
                ExtendedColorType::Rgb8,
            )?;
        Ok(buffer)
    }

    /// Write the image to `path`, PNG or JPEG by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let bytes = match extension.as_deref() {
            Some("png") => self.encode_png()?,
            Some("jpg") | Some("jpeg") => self.encode_jpeg(90)?,
            _ => {
                return Err(ImageError::UnsupportedFormat(format!(
                    "cannot tell image format from {}",
                    path.display()
                )));
            }
        };
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
