use {crate::*, base::Vec2};

// fourcc codes
pub(crate) const FOURCC_YU12: u32 = u32::from_le_bytes(*b"YU12");
pub(crate) const FOURCC_YV12: u32 = u32::from_le_bytes(*b"YV12");
pub(crate) const FOURCC_NV12: u32 = u32::from_le_bytes(*b"NV12");
pub(crate) const FOURCC_NV21: u32 = u32::from_le_bytes(*b"NV21");
pub(crate) const FOURCC_RGBA: u32 = u32::from_le_bytes(*b"RGBA");
pub(crate) const FOURCC_RGB3: u32 = u32::from_le_bytes(*b"RGB3");

/// Convert a fourcc code to a readable 4-character string.
pub fn fourcc_to_string(fourcc: u32) -> String {
    String::from_utf8_lossy(&fourcc.to_le_bytes()).into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Planar 4:2:0, Y then U then V (I420).
    Yu12,
    /// Planar 4:2:0, Y then V then U.
    Yv12,
    /// Semi-planar 4:2:0, Y then interleaved UV.
    Nv12,
    /// Semi-planar 4:2:0, Y then interleaved VU.
    Nv21,
    Rgba8,
    Rgb8,
}

impl PixelFormat {
    pub fn from_fourcc(fourcc: u32) -> Result<Self, ImageError> {
        match fourcc {
            FOURCC_YU12 => Ok(PixelFormat::Yu12),
            FOURCC_YV12 => Ok(PixelFormat::Yv12),
            FOURCC_NV12 => Ok(PixelFormat::Nv12),
            FOURCC_NV21 => Ok(PixelFormat::Nv21),
            FOURCC_RGBA => Ok(PixelFormat::Rgba8),
            FOURCC_RGB3 => Ok(PixelFormat::Rgb8),
            _ => Err(ImageError::UnsupportedFormat(fourcc_to_string(fourcc))),
        }
    }

    pub fn as_fourcc(&self) -> u32 {
        match self {
            PixelFormat::Yu12 => FOURCC_YU12,
            PixelFormat::Yv12 => FOURCC_YV12,
            PixelFormat::Nv12 => FOURCC_NV12,
            PixelFormat::Nv21 => FOURCC_NV21,
            PixelFormat::Rgba8 => FOURCC_RGBA,
            PixelFormat::Rgb8 => FOURCC_RGB3,
        }
    }

    pub fn is_yuv420(&self) -> bool {
        matches!(
            self,
            PixelFormat::Yu12 | PixelFormat::Yv12 | PixelFormat::Nv12 | PixelFormat::Nv21
        )
    }

    /// Bytes needed for one tightly packed frame of this format.
    pub fn packed_len(&self, size: Vec2<usize>) -> usize {
        match self {
            PixelFormat::Rgba8 => size.area() * 4,
            PixelFormat::Rgb8 => size.area() * 3,
            _ => size.area() + 2 * chroma_size(size).area(),
        }
    }

    /// Y, U and V plane layouts for a tightly packed frame, `None` for RGB formats.
    pub fn packed_planes(&self, size: Vec2<usize>) -> Option<[PlaneLayout; 3]> {
        let luma_len = size.area();
        let chroma = chroma_size(size);
        let y = PlaneLayout::new(0, size.x, 1);
        match self {
            PixelFormat::Yu12 => Some([
                y,
                PlaneLayout::new(luma_len, chroma.x, 1),
                PlaneLayout::new(luma_len + chroma.area(), chroma.x, 1),
            ]),
            PixelFormat::Yv12 => Some([
                y,
                PlaneLayout::new(luma_len + chroma.area(), chroma.x, 1),
                PlaneLayout::new(luma_len, chroma.x, 1),
            ]),
            PixelFormat::Nv12 => Some([
                y,
                PlaneLayout::new(luma_len, chroma.x * 2, 2),
                PlaneLayout::new(luma_len + 1, chroma.x * 2, 2),
            ]),
            PixelFormat::Nv21 => Some([
                y,
                PlaneLayout::new(luma_len + 1, chroma.x * 2, 2),
                PlaneLayout::new(luma_len, chroma.x * 2, 2),
            ]),
            PixelFormat::Rgba8 | PixelFormat::Rgb8 => None,
        }
    }

    /// Plane layouts of a driver buffer whose luma rows are `stride` bytes apart.
    /// Planar chroma rows are half as long, rounded up.
    pub fn strided_planes(&self, size: Vec2<usize>, stride: usize) -> Option<[PlaneLayout; 3]> {
        let luma_len = stride * size.y;
        let y = PlaneLayout::new(0, stride, 1);
        let chroma_stride = stride.div_ceil(2);
        let chroma_len = chroma_stride * chroma_size(size).y;
        match self {
            PixelFormat::Yu12 => Some([
                y,
                PlaneLayout::new(luma_len, chroma_stride, 1),
                PlaneLayout::new(luma_len + chroma_len, chroma_stride, 1),
            ]),
            PixelFormat::Yv12 => Some([
                y,
                PlaneLayout::new(luma_len + chroma_len, chroma_stride, 1),
                PlaneLayout::new(luma_len, chroma_stride, 1),
            ]),
            PixelFormat::Nv12 => Some([
                y,
                PlaneLayout::new(luma_len, stride, 2),
                PlaneLayout::new(luma_len + 1, stride, 2),
            ]),
            PixelFormat::Nv21 => Some([
                y,
                PlaneLayout::new(luma_len + 1, stride, 2),
                PlaneLayout::new(luma_len, stride, 2),
            ]),
            PixelFormat::Rgba8 | PixelFormat::Rgb8 => None,
        }
    }
}

/// Size of a 4:2:0 chroma plane; odd dimensions round up.
pub fn chroma_size(size: Vec2<usize>) -> Vec2<usize> {
    Vec2::new(size.x.div_ceil(2), size.y.div_ceil(2))
}
