use {
    crate::*,
    base::{Tensor, Vec2},
    image::OrientedImage,
};

/// Memory order of the model input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputLayout {
    /// `[1, 3, H, W]`
    #[default]
    Nchw,
    /// `[1, H, W, 3]`
    Nhwc,
}

/// How 8-bit channel values are scaled before they reach the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// `v / 255`
    #[default]
    ZeroToOne,
    /// `v / 127.5 - 1`
    MinusOneToOne,
}

impl Normalization {
    fn apply(&self, value: u8) -> f32 {
        match self {
            Normalization::ZeroToOne => value as f32 / 255.0,
            Normalization::MinusOneToOne => value as f32 / 127.5 - 1.0,
        }
    }
}

/// Input geometry expected by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInput {
    pub size: Vec2<usize>,
    pub layout: InputLayout,
    pub normalization: Normalization,
}

impl Default for ModelInput {
    fn default() -> Self {
        Self {
            size: Vec2::new(224, 224),
            layout: InputLayout::Nchw,
            normalization: Normalization::ZeroToOne,
        }
    }
}

impl ModelInput {
    pub fn shape(&self) -> Vec<usize> {
        match self.layout {
            InputLayout::Nchw => vec![1, 3, self.size.y, self.size.x],
            InputLayout::Nhwc => vec![1, self.size.y, self.size.x, 3],
        }
    }
}

/// Resize an RGBA image to the model size (nearest neighbour), drop alpha,
/// normalize and lay out as the model expects.
pub fn preprocess(image: &OrientedImage<'_>, input: &ModelInput) -> Result<Tensor<f32>, InferError> {
    let (w, h) = (input.size.x, input.size.y);
    if w == 0 || h == 0 {
        return Err(InferError::Shape(format!("invalid model input size {}", input.size)));
    }
    let (src_w, src_h) = (image.width(), image.height());
    if src_w == 0 || src_h == 0 {
        return Err(InferError::Shape(format!("empty image {}", image.size())));
    }

    let plane = w * h;
    let mut data = vec![0.0f32; 3 * plane];
    for out_y in 0..h {
        let src_y = (out_y * src_h / h).min(src_h - 1);
        for out_x in 0..w {
            let src_x = (out_x * src_w / w).min(src_w - 1);
            let rgba = image.pixel(src_x, src_y);
            for ch in 0..3 {
                let value = input.normalization.apply(rgba[ch]);
                let index = match input.layout {
                    InputLayout::Nchw => ch * plane + out_y * w + out_x,
                    InputLayout::Nhwc => (out_y * w + out_x) * 3 + ch,
                };
                data[index] = value;
            }
        }
    }

    Ok(Tensor::new(input.shape(), data)?)
}

/// In-place softmax, turning logits into probabilities.
pub fn softmax(values: &mut [f32]) {
    let Some(max) = values.iter().copied().reduce(f32::max) else {
        return;
    };
    let mut sum = 0.0;
    for value in values.iter_mut() {
        *value = (*value - max).exp();
        sum += *value;
    }
    if sum > 0.0 {
        for value in values.iter_mut() {
            *value /= sum;
        }
    }
}
