use {
    crate::*,
    base::{Sequence, Vec2},
    image::{PixelFormat, RawFrame},
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::{Duration, Instant},
    },
    tokio::{
        sync::{mpsc, oneshot},
        task::{JoinHandle, spawn_blocking},
    },
};

mod rawfile;
mod synthetic;

#[cfg(feature = "v4l2")]
mod v4l2;

pub use rawfile::RawFileCamera;
pub use synthetic::SyntheticCamera;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Camera;

// capacity of the video input channel
const CHANNEL_CAPACITY: usize = 4;

// delay before reconnecting after failure
const WAIT_BEFORE_RECONNECT_MS: u64 = 100;

/// What a device actually delivers once opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureInfo {
    pub size: Vec2<usize>,
    pub format: PixelFormat,
    pub frame_rate: f32,
}

/// A frame source driven by the `VideoIn` worker thread.
///
/// `open` and `blocking_capture` are always called from the same thread.
pub trait VideoInDevice: Send {
    /// Open (or reopen) the device and report what it will deliver.
    fn open(&mut self) -> Result<CaptureInfo, VideoError>;

    /// Close the device, if open.
    fn close(&mut self);

    /// Block until the next frame. `Ok(None)` means a frame arrived without image data.
    fn blocking_capture(&mut self) -> Result<Option<RawFrame>, VideoError>;
}

pub struct VideoIn {
    receiver: mpsc::Receiver<Result<VideoFrame, VideoError>>,
    cancel: Arc<AtomicBool>,
    info: CaptureInfo,
    join_handle: Option<JoinHandle<()>>,
}

impl VideoIn {
    fn create_device(config: &CaptureConfig) -> Result<Box<dyn VideoInDevice>, VideoError> {
        match config.source() {
            VideoSource::Synthetic => Ok(Box::new(SyntheticCamera::new(config))),
            VideoSource::RawFile { .. } => Ok(Box::new(RawFileCamera::new(config)?)),
            #[cfg(feature = "v4l2")]
            VideoSource::V4l2 { .. } => Ok(Box::new(V4l2Camera::new(config))),
        }
    }

    // keep pumping frames until cancelled, the consumer goes away or the source ends
    fn run_worker(
        mut device: Box<dyn VideoInDevice>,
        sender: mpsc::Sender<Result<VideoFrame, VideoError>>,
        cancel: Arc<AtomicBool>,
    ) {
        let sequence = Sequence::new();
        let started = Instant::now();

        while !cancel.load(Ordering::Relaxed) {
            log::info!("video worker: starting capture loop");
            loop {
                if cancel.load(Ordering::Relaxed) {
                    device.close();
                    return;
                }
                match device.blocking_capture() {
                    Ok(Some(frame)) => {
                        let frame = VideoFrame {
                            seq: sequence.next(),
                            timestamp: started.elapsed(),
                            frame,
                        };
                        if sender.blocking_send(Ok(frame)).is_err() {
                            log::debug!("video worker: consumer closed the channel");
                            device.close();
                            return;
                        }
                    }
                    Ok(None) => {
                        log::debug!("video worker: frame without image, skipped");
                    }
                    Err(VideoError::EndOfStream) => {
                        log::info!("video worker: end of stream");
                        device.close();
                        let _ = sender.blocking_send(Err(VideoError::EndOfStream));
                        return;
                    }
                    Err(error @ VideoError::PermissionDenied(_)) => {
                        log::error!("video worker: {}", error);
                        device.close();
                        let _ = sender.blocking_send(Err(error));
                        return;
                    }
                    Err(error) => {
                        log::error!("video worker: capture failed: {}", error);
                        break;
                    }
                }
            }

            // close, wait, and reopen the device
            while !cancel.load(Ordering::Relaxed) {
                log::info!("video worker: reconnecting...");
                device.close();
                std::thread::sleep(Duration::from_millis(WAIT_BEFORE_RECONNECT_MS));
                match device.open() {
                    Ok(_) => break,
                    Err(error @ VideoError::PermissionDenied(_)) => {
                        log::error!("video worker: {}", error);
                        let _ = sender.blocking_send(Err(error));
                        return;
                    }
                    // stay in the loop
                    Err(error) => log::warn!("video worker: reopen failed: {}", error),
                }
            }
        }
        device.close();
    }

    async fn spawn_worker(
        mut device: Box<dyn VideoInDevice>,
        sender: mpsc::Sender<Result<VideoFrame, VideoError>>,
        cancel: Arc<AtomicBool>,
    ) -> Result<(JoinHandle<()>, CaptureInfo), VideoError> {
        // device.open() runs on the worker thread because some backends need
        // open and capture on the same OS thread
        let (init_tx, init_rx) = oneshot::channel::<Result<CaptureInfo, VideoError>>();

        let join_handle = spawn_blocking(move || {
            match device.open() {
                Ok(info) => {
                    let _ = init_tx.send(Ok(info));
                }
                Err(error) => {
                    let _ = init_tx.send(Err(error));
                    return;
                }
            }
            Self::run_worker(device, sender, cancel);
        });

        let info = init_rx
            .await
            .map_err(|_| VideoError::Device("worker thread died during init".to_string()))??;

        Ok((join_handle, info))
    }

    /// Open the device described by `config` and start capturing.
    pub async fn open(config: CaptureConfig) -> Result<Self, VideoError> {
        let device = Self::create_device(&config)?;
        Self::with_device(device).await
    }

    /// Start capturing from a caller-provided device.
    pub async fn with_device(device: Box<dyn VideoInDevice>) -> Result<Self, VideoError> {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let cancel = Arc::new(AtomicBool::new(false));
        let (join_handle, info) = Self::spawn_worker(device, sender, Arc::clone(&cancel)).await?;
        log::info!(
            "video input open: {} {:?} at {:.1} fps",
            info.size,
            info.format,
            info.frame_rate
        );

        Ok(Self {
            receiver,
            cancel,
            info,
            join_handle: Some(join_handle),
        })
    }

    pub fn info(&self) -> &CaptureInfo {
        &self.info
    }

    /// Wait for the next frame.
    ///
    /// When the worker stops because the source ended or permission was
    /// revoked, that error is returned once; after that every call fails
    /// with `VideoError::Stream`.
    pub async fn capture(&mut self) -> Result<VideoFrame, VideoError> {
        match self.receiver.recv().await {
            Some(result) => result,
            None => Err(VideoError::Stream("video input channel closed".to_string())),
        }
    }
}

impl Drop for VideoIn {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        // the worker notices the flag or the closed channel on its next frame
        self.join_handle.take();
    }
}
