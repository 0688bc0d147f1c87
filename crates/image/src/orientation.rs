use {
    crate::*,
    base::{Rect, Vec2},
};

/// Clockwise rotation that makes a frame appear upright.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Accepts any multiple of 90, negative values turn counter-clockwise.
    pub fn from_degrees(degrees: i32) -> Result<Self, ImageError> {
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            _ => Err(ImageError::InvalidRotation(degrees)),
        }
    }

    pub fn degrees(&self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn swaps_axes(&self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    pub fn output_size(&self, size: Vec2<usize>) -> Vec2<usize> {
        if self.swaps_axes() {
            size.transposed()
        } else {
            size
        }
    }
}

/// Copy `region` of `src` into `dst`, rotated clockwise by `rotation`.
///
/// `region` must lie inside `src` and `dst` must have the rotated region size.
pub fn rotate_into(src: &PixelBuffer, region: Rect<usize>, rotation: Rotation, dst: &mut PixelBuffer) {
    debug_assert!(Rect::new(Vec2::zero(), src.size()).contains_rect(region));
    debug_assert_eq!(dst.size(), rotation.output_size(region.size));

    let src_width = src.size().x;
    let dst_width = dst.size().x;
    let (w, h) = (region.size.x, region.size.y);
    let src_data = src.data();
    let dst_data = dst.data_mut();

    for y in 0..h {
        let src_row = (region.origin.y + y) * src_width + region.origin.x;
        for x in 0..w {
            let (dx, dy) = match rotation {
                Rotation::Deg0 => (x, y),
                Rotation::Deg90 => (h - 1 - y, x),
                Rotation::Deg180 => (w - 1 - x, h - 1 - y),
                Rotation::Deg270 => (y, w - 1 - x),
            };
            let s = (src_row + x) * BYTES_PER_PIXEL;
            let d = (dy * dst_width + dx) * BYTES_PER_PIXEL;
            dst_data[d..d + BYTES_PER_PIXEL].copy_from_slice(&src_data[s..s + BYTES_PER_PIXEL]);
        }
    }
}
