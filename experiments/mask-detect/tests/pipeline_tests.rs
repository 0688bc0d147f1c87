use {
    base::Vec2,
    image::{OrientedImage, PixelFormat, RawFrame, Rotation},
    inference::{Classification, Classifier, InferError},
    mask_detect::*,
    std::{
        collections::VecDeque,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
    video::{CaptureConfig, CaptureInfo, VideoError, VideoIn, VideoInDevice},
};

// classifier that says "mask" for bright frames and "no_mask" for dark ones
struct BrightnessClassifier {
    calls: Arc<AtomicUsize>,
    sizes: Arc<std::sync::Mutex<Vec<Vec2<usize>>>>,
}

impl Classifier for BrightnessClassifier {
    fn classify(&mut self, image: &OrientedImage<'_>) -> Result<Classification, InferError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sizes.lock().unwrap().push(image.size());
        let bright = image.pixel(0, 0)[0] > 128;
        let scores = if bright { [0.9, 0.1] } else { [0.2, 0.8] };
        Classification::from_scores(&["mask", "no_mask"], &scores)
    }
}

fn brightness_classifier() -> (BrightnessClassifier, Arc<AtomicUsize>, Arc<std::sync::Mutex<Vec<Vec2<usize>>>>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let sizes = Arc::new(std::sync::Mutex::new(Vec::new()));
    (
        BrightnessClassifier {
            calls: Arc::clone(&calls),
            sizes: Arc::clone(&sizes),
        },
        calls,
        sizes,
    )
}

struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn classify(&mut self, _image: &OrientedImage<'_>) -> Result<Classification, InferError> {
        Err(InferError::Runtime("model exploded".to_string()))
    }
}

struct ScriptedDevice {
    script: VecDeque<Result<Option<RawFrame>, VideoError>>,
}

impl VideoInDevice for ScriptedDevice {
    fn open(&mut self) -> Result<CaptureInfo, VideoError> {
        Ok(CaptureInfo {
            size: Vec2::new(4, 2),
            format: PixelFormat::Yu12,
            frame_rate: 30.0,
        })
    }

    fn close(&mut self) {}

    fn blocking_capture(&mut self) -> Result<Option<RawFrame>, VideoError> {
        // give the worker time to finish so no frame is dropped
        std::thread::sleep(Duration::from_millis(20));
        self.script.pop_front().unwrap_or(Err(VideoError::EndOfStream))
    }
}

// delivers one frame, then hangs like an unplugged camera
struct StalledDevice {
    delivered: bool,
}

impl VideoInDevice for StalledDevice {
    fn open(&mut self) -> Result<CaptureInfo, VideoError> {
        Ok(CaptureInfo {
            size: Vec2::new(4, 2),
            format: PixelFormat::Yu12,
            frame_rate: 30.0,
        })
    }

    fn close(&mut self) {}

    fn blocking_capture(&mut self) -> Result<Option<RawFrame>, VideoError> {
        if !self.delivered {
            self.delivered = true;
            return Ok(Some(frame(230, Rotation::Deg0)));
        }
        std::thread::sleep(Duration::from_millis(1500));
        Err(VideoError::EndOfStream)
    }
}

// 4x2 frame, uniform luma, neutral chroma
fn frame(luma: u8, rotation: Rotation) -> RawFrame {
    let size = Vec2::new(4, 2);
    let mut data = vec![128u8; PixelFormat::Yu12.packed_len(size)];
    data[..8].fill(luma);
    RawFrame::from_packed(size, PixelFormat::Yu12, data, rotation).unwrap()
}

async fn scripted(script: Vec<Result<Option<RawFrame>, VideoError>>) -> VideoIn {
    VideoIn::with_device(Box::new(ScriptedDevice {
        script: script.into(),
    }))
    .await
    .unwrap()
}

fn options(workers: usize) -> PipelineOptions {
    PipelineOptions {
        workers,
        preview: true,
        ..PipelineOptions::default()
    }
}

#[tokio::test]
async fn test_last_frame_label_is_published() {
    let video_in = scripted(vec![
        Ok(Some(frame(30, Rotation::Deg0))),
        Ok(None),
        Ok(Some(frame(230, Rotation::Deg0))),
    ])
    .await;
    let (classifier, calls, _) = brightness_classifier();
    let pipeline = Pipeline::new(video_in, classifier, options(1));
    let outputs = pipeline.outputs();

    pipeline.run().await.unwrap();

    let status = outputs.status.get().unwrap();
    assert_eq!(status.inner.label(), Some("mask"));
    // the image-less frame never got a sequence number
    assert_eq!(status.seq, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(outputs.preview.seq(), 2);
}

#[tokio::test]
async fn test_rotation_hint_reaches_classifier_and_preview() {
    let video_in = scripted(vec![Ok(Some(frame(200, Rotation::Deg90)))]).await;
    let (classifier, _, sizes) = brightness_classifier();
    let pipeline = Pipeline::new(video_in, classifier, options(1));
    let outputs = pipeline.outputs();

    pipeline.run().await.unwrap();

    assert_eq!(*sizes.lock().unwrap(), vec![Vec2::new(2, 4)]);
    let preview = outputs.preview.get().unwrap();
    assert_eq!(preview.inner.size, Vec2::new(2, 4));
    assert_eq!(preview.inner.format, PixelFormat::Rgba8);
}

#[tokio::test]
async fn test_no_preview_when_not_requested() {
    let video_in = scripted(vec![Ok(Some(frame(200, Rotation::Deg0)))]).await;
    let (classifier, _, _) = brightness_classifier();
    let pipeline = Pipeline::new(video_in, classifier, PipelineOptions { workers: 1, ..PipelineOptions::default() });
    let outputs = pipeline.outputs();

    pipeline.run().await.unwrap();

    assert!(outputs.status.get().is_some());
    assert!(outputs.preview.get().is_none());
}

#[tokio::test]
async fn test_classification_errors_drop_the_frame() {
    let video_in = scripted(vec![Ok(Some(frame(200, Rotation::Deg0))), Ok(Some(frame(20, Rotation::Deg0)))]).await;
    let pipeline = Pipeline::new(video_in, FailingClassifier, options(1));
    let outputs = pipeline.outputs();

    pipeline.run().await.unwrap();

    assert!(outputs.status.get().is_none());
    // conversion still happened
    assert_eq!(outputs.preview.seq(), 2);
}

#[tokio::test]
async fn test_permission_loss_shows_notice() {
    let video_in = scripted(vec![
        Ok(Some(frame(200, Rotation::Deg0))),
        Err(VideoError::PermissionDenied("revoked".to_string())),
    ])
    .await;
    let (classifier, _, _) = brightness_classifier();
    let pipeline = Pipeline::new(video_in, classifier, options(2));
    let outputs = pipeline.outputs();

    let result = pipeline.run().await;
    assert!(matches!(result, Err(VideoError::PermissionDenied(_))));
    assert_eq!(outputs.status.get().unwrap().inner, Status::PermissionDenied);
}

#[tokio::test]
async fn test_cancel_stops_a_live_source() {
    let config = CaptureConfig::synthetic()
        .with_size(Vec2::new(16, 12))
        .with_frame_rate(200.0);
    let video_in = VideoIn::open(config).await.unwrap();
    let (classifier, calls, _) = brightness_classifier();
    let pipeline = Pipeline::new(video_in, classifier, options(2));
    let outputs = pipeline.outputs();
    let cancel = pipeline.cancel_handle();
    let handle = tokio::spawn(pipeline.run());

    for _ in 0..200 {
        if outputs.status.get().is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cancel.cancel();
    handle.await.unwrap().unwrap();

    assert!(outputs.status.get().is_some());
    assert!(calls.load(Ordering::SeqCst) >= 1);
    assert_eq!(outputs.preview.get().unwrap().inner.size, Vec2::new(16, 12));
}

#[tokio::test]
async fn test_cancel_does_not_wait_for_a_stalled_camera() {
    let video_in = VideoIn::with_device(Box::new(StalledDevice { delivered: false }))
        .await
        .unwrap();
    let (classifier, _, _) = brightness_classifier();
    let pipeline = Pipeline::new(video_in, classifier, options(1));
    let outputs = pipeline.outputs();
    let cancel = pipeline.cancel_handle();
    let handle = tokio::spawn(pipeline.run());

    for _ in 0..100 {
        if outputs.status.get().is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(outputs.status.get().unwrap().inner.label(), Some("mask"));

    cancel.cancel();
    assert!(cancel.is_cancelled());
    let result = tokio::time::timeout(Duration::from_millis(500), handle)
        .await
        .expect("cancel waited for the camera");
    result.unwrap().unwrap();
}

#[tokio::test]
async fn test_cancel_before_run() {
    let video_in = scripted(vec![Ok(Some(frame(230, Rotation::Deg0)))]).await;
    let (classifier, calls, _) = brightness_classifier();
    let pipeline = Pipeline::new(video_in, classifier, options(1));
    pipeline.cancel_handle().cancel();

    pipeline.run().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_snapshot_is_written_once() {
    let path = std::env::temp_dir().join(format!("mask-detect-snapshot-{}.png", std::process::id()));
    let mut snapshot = Snapshot::new(Some(path.clone()));
    assert!(snapshot.is_pending());

    let image = image::Image::new(Vec2::new(2, 1), vec![255, 0, 0, 255, 0, 0, 255, 255], PixelFormat::Rgba8);
    snapshot.offer(&image);
    assert!(!snapshot.is_pending());
    let written = std::fs::metadata(&path).unwrap().len();
    assert!(written > 0);

    // later frames are ignored
    std::fs::remove_file(&path).unwrap();
    snapshot.offer(&image);
    assert!(!path.exists());
}
