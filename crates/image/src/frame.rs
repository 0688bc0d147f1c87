use {crate::*, base::Vec2};

/// Where one plane lives inside a frame buffer.
///
/// Sample `(col, row)` of the plane is at
/// `offset + row * row_stride + col * pixel_stride`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneLayout {
    pub offset: usize,
    pub row_stride: usize,
    pub pixel_stride: usize,
}

impl PlaneLayout {
    pub fn new(offset: usize, row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            offset,
            row_stride,
            pixel_stride,
        }
    }

    // index of the last sample of a plane with `size` samples, None on overflow
    fn last_index(&self, size: Vec2<usize>) -> Option<usize> {
        let last_row = (size.y - 1).checked_mul(self.row_stride)?;
        let last_col = (size.x - 1).checked_mul(self.pixel_stride)?;
        self.offset.checked_add(last_row)?.checked_add(last_col)
    }
}

/// One plane borrowed from a capture device buffer.
#[derive(Debug, Clone, Copy)]
pub struct PlaneData<'a> {
    pub data: &'a [u8],
    pub row_stride: usize,
    pub pixel_stride: usize,
}

/// One captured YUV 4:2:0 frame.
///
/// The Y, U and V planes share one buffer and are described by their
/// layouts. Every layout is checked against the buffer when the frame is
/// built, so conversion never reads out of bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    size: Vec2<usize>,
    data: Vec<u8>,
    planes: [PlaneLayout; 3],
    rotation: Rotation,
}

impl RawFrame {
    pub fn new(
        size: Vec2<usize>,
        data: Vec<u8>,
        planes: [PlaneLayout; 3],
        rotation: Rotation,
    ) -> Result<Self, ImageError> {
        if size.x == 0 || size.y == 0 {
            return Err(ImageError::Layout(format!("empty frame size {size}")));
        }

        let chroma = chroma_size(size);
        for (name, plane, plane_size) in [
            ("Y", &planes[0], size),
            ("U", &planes[1], chroma),
            ("V", &planes[2], chroma),
        ] {
            if plane.pixel_stride == 0 {
                return Err(ImageError::Layout(format!("{name} plane has zero pixel stride")));
            }
            let row_span = (plane_size.x - 1)
                .saturating_mul(plane.pixel_stride)
                .saturating_add(1);
            if plane.row_stride < row_span {
                return Err(ImageError::Layout(format!(
                    "{name} plane row stride {} too small for {} samples with pixel stride {}",
                    plane.row_stride, plane_size.x, plane.pixel_stride
                )));
            }
            match plane.last_index(plane_size) {
                Some(last) if last < data.len() => {}
                _ => {
                    return Err(ImageError::Layout(format!(
                        "{name} plane at offset {} runs past the {} byte buffer",
                        plane.offset,
                        data.len()
                    )));
                }
            }
        }

        Ok(Self {
            size,
            data,
            planes,
            rotation,
        })
    }

    /// Build a frame from a tightly packed YU12, YV12, NV12 or NV21 buffer.
    pub fn from_packed(
        size: Vec2<usize>,
        format: PixelFormat,
        data: Vec<u8>,
        rotation: Rotation,
    ) -> Result<Self, ImageError> {
        let planes = format.packed_planes(size).ok_or_else(|| {
            ImageError::UnsupportedFormat(format!("{format:?} is not a YUV 4:2:0 format"))
        })?;
        let expected = format.packed_len(size);
        if data.len() < expected {
            return Err(ImageError::Layout(format!(
                "{format:?} {size} frame needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Self::new(size, data, planes, rotation)
    }

    /// Build a frame from three separately delivered planes, as camera HALs
    /// hand them out. The planes are copied into one buffer.
    pub fn from_planes(
        size: Vec2<usize>,
        y: PlaneData<'_>,
        u: PlaneData<'_>,
        v: PlaneData<'_>,
        rotation: Rotation,
    ) -> Result<Self, ImageError> {
        let mut data = Vec::with_capacity(y.data.len() + u.data.len() + v.data.len());
        let mut planes = [PlaneLayout::new(0, 0, 0); 3];
        for (layout, plane) in planes.iter_mut().zip([y, u, v]) {
            *layout = PlaneLayout::new(data.len(), plane.row_stride, plane.pixel_stride);
            data.extend_from_slice(plane.data);
        }
        Self::new(size, data, planes, rotation)
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn planes(&self) -> &[PlaneLayout; 3] {
        &self.planes
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }
}
