use crate::*;

/// Range of the Y, U and V samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorRange {
    /// Y, U, V span 0..=255 (JPEG/JFIF style).
    #[default]
    Full,
    /// Y spans 16..=235, U and V 16..=240 (broadcast style).
    Limited,
}

impl ColorRange {
    pub fn to_rgb(self, y: u8, u: u8, v: u8) -> (u8, u8, u8) {
        match self {
            ColorRange::Full => yuv_to_rgb(y, u, v),
            ColorRange::Limited => limited_yuv_to_rgb(y, u, v),
        }
    }
}

// BT.601 full range YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = (y + ((359 * v) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * u) >> 8)).clamp(0, 255) as u8;
    (r, g, b)
}

// BT.601 limited range YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
pub fn limited_yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let c = 298 * (y as i32 - 16);
    let d = u as i32 - 128;
    let e = v as i32 - 128;
    let r = ((c + 409 * e + 128) >> 8).clamp(0, 255) as u8;
    let g = ((c - 100 * d - 208 * e + 128) >> 8).clamp(0, 255) as u8;
    let b = ((c + 516 * d + 128) >> 8).clamp(0, 255) as u8;
    (r, g, b)
}

/// Convert a 4:2:0 frame into `out` as packed RGBA, one row at a time.
///
/// `out` must already have the frame's size.
pub fn yuv420_to_rgba(frame: &RawFrame, range: ColorRange, out: &mut PixelBuffer) {
    debug_assert_eq!(out.size(), frame.size());
    let width = frame.size().x;
    let data = frame.data();
    let [y_plane, u_plane, v_plane] = *frame.planes();

    for (row, dst) in out.data_mut().chunks_exact_mut(width * 4).enumerate() {
        let y_row = y_plane.offset + row * y_plane.row_stride;
        let u_row = u_plane.offset + (row / 2) * u_plane.row_stride;
        let v_row = v_plane.offset + (row / 2) * v_plane.row_stride;
        for (col, pixel) in dst.chunks_exact_mut(4).enumerate() {
            let y = data[y_row + col * y_plane.pixel_stride];
            let u = data[u_row + (col / 2) * u_plane.pixel_stride];
            let v = data[v_row + (col / 2) * v_plane.pixel_stride];
            let (r, g, b) = range.to_rgb(y, u, v);
            pixel.copy_from_slice(&[r, g, b, 0xFF]);
        }
    }
}
