use base::Vec2;

pub const BYTES_PER_PIXEL: usize = 4;

/// Packed RGBA8 pixels, row-major, no row padding.
///
/// Reused across frames: `ensure_size` keeps the allocation while the size is
/// unchanged and reallocates only when it differs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PixelBuffer {
    size: Vec2<usize>,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(size: Vec2<usize>) -> Self {
        Self {
            size,
            data: vec![0; size.area() * BYTES_PER_PIXEL],
        }
    }

    /// Resize to `size`, returns true if the storage was reallocated.
    pub fn ensure_size(&mut self, size: Vec2<usize>) -> bool {
        if self.size == size {
            return false;
        }
        *self = Self::new(size);
        true
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.size.x + x) * BYTES_PER_PIXEL;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}
