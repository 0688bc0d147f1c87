use {base::Vec2, image::OrientedImage, inference::*};

// 2x2 RGBA image: red, green / blue, white
fn quad() -> Vec<u8> {
    vec![
        255, 0, 0, 255, 0, 255, 0, 255, //
        0, 0, 255, 255, 255, 255, 255, 255,
    ]
}

#[test]
fn test_nchw_same_size() {
    let pixels = quad();
    let image = OrientedImage::from_rgba(Vec2::new(2, 2), &pixels).unwrap();
    let input = ModelInput {
        size: Vec2::new(2, 2),
        ..ModelInput::default()
    };
    let tensor = preprocess(&image, &input).unwrap();
    assert_eq!(tensor.shape, vec![1, 3, 2, 2]);
    // R plane, G plane, B plane
    assert_eq!(
        tensor.data,
        vec![
            1.0, 0.0, 0.0, 1.0, //
            0.0, 1.0, 0.0, 1.0, //
            0.0, 0.0, 1.0, 1.0,
        ]
    );
}

#[test]
fn test_nhwc_minus_one_to_one() {
    let pixels = quad();
    let image = OrientedImage::from_rgba(Vec2::new(2, 2), &pixels).unwrap();
    let input = ModelInput {
        size: Vec2::new(2, 2),
        layout: InputLayout::Nhwc,
        normalization: Normalization::MinusOneToOne,
    };
    let tensor = preprocess(&image, &input).unwrap();
    assert_eq!(tensor.shape, vec![1, 2, 2, 3]);
    assert_eq!(&tensor.data[0..3], &[1.0, -1.0, -1.0]);
    assert_eq!(&tensor.data[9..12], &[1.0, 1.0, 1.0]);
}

#[test]
fn test_nearest_neighbour_upscale() {
    let pixels = quad();
    let image = OrientedImage::from_rgba(Vec2::new(2, 2), &pixels).unwrap();
    let input = ModelInput {
        size: Vec2::new(4, 4),
        layout: InputLayout::Nhwc,
        normalization: Normalization::ZeroToOne,
    };
    let tensor = preprocess(&image, &input).unwrap();
    assert_eq!(tensor.shape, vec![1, 4, 4, 3]);
    let at = |x: usize, y: usize| &tensor.data[(y * 4 + x) * 3..(y * 4 + x) * 3 + 3];
    assert_eq!(at(1, 1), &[1.0, 0.0, 0.0]);
    assert_eq!(at(2, 0), &[0.0, 1.0, 0.0]);
    assert_eq!(at(0, 3), &[0.0, 0.0, 1.0]);
    assert_eq!(at(3, 3), &[1.0, 1.0, 1.0]);
}

#[test]
fn test_downscale_to_single_pixel() {
    let pixels = quad();
    let image = OrientedImage::from_rgba(Vec2::new(2, 2), &pixels).unwrap();
    let input = ModelInput {
        size: Vec2::new(1, 1),
        ..ModelInput::default()
    };
    let tensor = preprocess(&image, &input).unwrap();
    assert_eq!(tensor.data, vec![1.0, 0.0, 0.0]);
}

#[test]
fn test_zero_model_size_fails() {
    let pixels = quad();
    let image = OrientedImage::from_rgba(Vec2::new(2, 2), &pixels).unwrap();
    let input = ModelInput {
        size: Vec2::new(0, 224),
        ..ModelInput::default()
    };
    assert!(matches!(preprocess(&image, &input), Err(InferError::Shape(_))));
}

#[test]
fn test_default_model_input() {
    let input = ModelInput::default();
    assert_eq!(input.size, Vec2::new(224, 224));
    assert_eq!(input.shape(), vec![1, 3, 224, 224]);
}

#[test]
fn test_softmax() {
    let mut values = [1.0f32, 1.0];
    softmax(&mut values);
    assert_eq!(values, [0.5, 0.5]);

    let mut values = [2.0f32, 0.0, -1.0];
    softmax(&mut values);
    let sum: f32 = values.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert!(values[0] > values[1] && values[1] > values[2]);

    // large logits do not overflow
    let mut values = [1000.0f32, 999.0];
    softmax(&mut values);
    assert!(values.iter().all(|v| v.is_finite()));

    let mut empty: [f32; 0] = [];
    softmax(&mut empty);
}
