use base::Vec2;
use image::{Image, ImageError, PixelFormat};

fn rgba_image() -> Image {
    let data = vec![255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 9, 9, 9, 255];
    Image::new(Vec2::new(2, 2), data, PixelFormat::Rgba8)
}

#[test]
fn test_to_rgb_drops_alpha() {
    let rgb = rgba_image().to_rgb().unwrap();
    assert_eq!(rgb, vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 9, 9, 9]);
}

#[test]
fn test_to_u32() {
    let packed = rgba_image().to_u32().unwrap();
    assert_eq!(packed, vec![0x00FF0000, 0x0000FF00, 0x000000FF, 0x00090909]);
}

#[test]
fn test_encode_png_signature() {
    let png = rgba_image().encode_png().unwrap();
    assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
}

#[test]
fn test_encode_jpeg_signature() {
    let jpeg = rgba_image().encode_jpeg(90).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_yuv_image_cannot_encode() {
    let image = Image::new(Vec2::new(2, 2), vec![0; 6], PixelFormat::Nv12);
    assert!(matches!(image.encode_png(), Err(ImageError::UnsupportedFormat(_))));
}

#[test]
fn test_save_by_extension() {
    let dir = std::env::temp_dir().join(format!("mask-detect-snap-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let png = dir.join("frame.png");
    rgba_image().save(&png).unwrap();
    assert!(std::fs::read(&png).unwrap().starts_with(&[0x89, b'P']));

    let jpg = dir.join("frame.JPG");
    rgba_image().save(&jpg).unwrap();
    assert!(std::fs::read(&jpg).unwrap().starts_with(&[0xFF, 0xD8]));

    assert!(rgba_image().save(dir.join("frame.bmp")).is_err());
    std::fs::remove_dir_all(&dir).ok();
}
