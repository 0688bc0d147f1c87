use {
    base::{Rect, Vec2},
    clap::Parser,
    image::{ColorRange, PixelFormat, Rotation},
    inference::{Device, InputLayout, Normalization},
    mask_detect::{Args, config::*},
    video::VideoSource,
};

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("mask-detect").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_parse_size() {
    assert_eq!(parse_size("640x480"), Ok(Vec2::new(640, 480)));
    assert_eq!(parse_size("1280X720"), Ok(Vec2::new(1280, 720)));
    assert!(parse_size("640").is_err());
    assert!(parse_size("0x480").is_err());
    assert!(parse_size("ax480").is_err());
}

#[test]
fn test_parse_crop() {
    assert_eq!(
        parse_crop("10,20,100x50"),
        Ok(Rect::new(Vec2::new(10, 20), Vec2::new(100, 50)))
    );
    assert!(parse_crop("10,100x50").is_err());
    assert!(parse_crop("-1,0,10x10").is_err());
}

#[test]
fn test_parse_rotation() {
    assert_eq!(parse_rotation("90"), Ok(Rotation::Deg90));
    assert_eq!(parse_rotation("-90"), Ok(Rotation::Deg270));
    assert_eq!(parse_rotation("360"), Ok(Rotation::Deg0));
    assert!(parse_rotation("45").is_err());
    assert!(parse_rotation("up").is_err());
}

#[test]
fn test_parse_format() {
    assert_eq!(parse_format("NV12"), Ok(PixelFormat::Nv12));
    assert_eq!(parse_format("yu12"), Ok(PixelFormat::Yu12));
    assert!(parse_format("RGBA").is_err());
    assert!(parse_format("NV1").is_err());
}

#[test]
fn test_parse_level() {
    assert_eq!(parse_level("debug"), Ok(log::LevelFilter::Debug));
    assert_eq!(parse_level("WARN"), Ok(log::LevelFilter::Warn));
    assert_eq!(parse_level("off"), Ok(log::LevelFilter::Off));
    assert!(parse_level("loud").is_err());
}

#[test]
fn test_defaults() {
    let args = parse(&[]);
    assert!(!args.headless);
    assert_eq!(args.workers, 1);
    assert_eq!(args.threads, 5);
    assert_eq!(args.device(), Device::Cpu);
    assert_eq!(args.log_level, log::LevelFilter::Info);

    let config = args.capture_config().unwrap();
    assert_eq!(config.source(), &VideoSource::Synthetic);
    assert_eq!(config.size(), None);
    assert_eq!(config.rotation(), Rotation::Deg0);

    let input = args.model_input();
    assert_eq!(input.size, Vec2::new(224, 224));
    assert_eq!(input.layout, InputLayout::Nchw);
    assert_eq!(input.normalization, Normalization::ZeroToOne);

    let options = args.pipeline_options();
    assert_eq!(options.workers, 1);
    assert!(options.preview);
    assert_eq!(options.converter.range(), ColorRange::Full);
    assert_eq!(options.converter.crop(), None);
}

#[test]
fn test_file_source_needs_input() {
    let args = parse(&["--source", "file"]);
    assert!(args.capture_config().is_err());

    let args = parse(&["--source", "file", "--input", "clip.nv12", "--loop", "--size", "320x240"]);
    let config = args.capture_config().unwrap();
    assert_eq!(
        config.source(),
        &VideoSource::RawFile {
            path: "clip.nv12".into(),
            looping: true
        }
    );
    assert_eq!(config.size(), Some(Vec2::new(320, 240)));
}

#[test]
fn test_display_size_picks_aspect_ratio() {
    let args = parse(&["--display-size", "1920x1080"]);
    assert_eq!(args.capture_config().unwrap().size(), Some(Vec2::new(640, 360)));

    let args = parse(&["--display-size", "1024x768"]);
    assert_eq!(args.capture_config().unwrap().size(), Some(Vec2::new(640, 480)));

    // an explicit size wins
    let args = parse(&["--display-size", "1920x1080", "--size", "800x600"]);
    assert_eq!(args.capture_config().unwrap().size(), Some(Vec2::new(800, 600)));
}

#[test]
fn test_capture_options() {
    let args = parse(&[
        "--rotation",
        "-90",
        "--format",
        "nv21",
        "--frame-rate",
        "15",
        "--color-range",
        "limited",
        "--crop",
        "0,0,64x48",
    ]);
    let config = args.capture_config().unwrap();
    assert_eq!(config.rotation(), Rotation::Deg270);
    assert_eq!(config.format(), Some(PixelFormat::Nv21));
    assert_eq!(config.frame_rate(), Some(15.0));

    let converter = args.converter_options();
    assert_eq!(converter.range(), ColorRange::Limited);
    assert_eq!(
        converter.crop(),
        Some(Rect::new(Vec2::new(0, 0), Vec2::new(64, 48)))
    );
}

#[test]
fn test_model_options() {
    let args = parse(&[
        "--input-size",
        "96x96",
        "--input-layout",
        "nhwc",
        "--normalization",
        "minus-one-to-one",
        "--cuda",
        "1",
    ]);
    let input = args.model_input();
    assert_eq!(input.size, Vec2::new(96, 96));
    assert_eq!(input.layout, InputLayout::Nhwc);
    assert_eq!(input.normalization, Normalization::MinusOneToOne);
    assert_eq!(args.device(), Device::Cuda { device_id: 1 });
}

#[test]
fn test_log_level_option() {
    assert_eq!(parse(&["--log-level", "trace"]).log_level, log::LevelFilter::Trace);
}

#[test]
fn test_headless_preview_only_for_snapshot() {
    assert!(!parse(&["--headless"]).pipeline_options().preview);
    assert!(parse(&["--headless", "--snapshot", "first.png"]).pipeline_options().preview);
}

#[test]
fn test_invalid_arguments() {
    let argv = |args: &[&'static str]| std::iter::once("mask-detect").chain(args.iter().copied()).collect::<Vec<_>>();
    assert!(Args::try_parse_from(argv(&["--workers", "0"])).is_err());
    assert!(Args::try_parse_from(argv(&["--rotation", "45"])).is_err());
    assert!(Args::try_parse_from(argv(&["--source", "network"])).is_err());
    assert!(Args::try_parse_from(argv(&["--log-level", "loud"])).is_err());
    assert!(parse(&["--frame-rate", "0"]).capture_config().is_err());
}
