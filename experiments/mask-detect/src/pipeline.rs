use {
    crate::*,
    base::{Latest, Stamped},
    image::{ConverterOptions, FrameConverter, Image},
    inference::{Classification, Classifier, InferError},
    std::sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    tokio::{
        sync::{Notify, mpsc},
        task::{JoinHandle, spawn_blocking},
    },
    video::{VideoError, VideoFrame, VideoIn},
};

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Number of frames converted and classified at the same time.
    pub workers: usize,
    pub converter: ConverterOptions,
    /// Publish every oriented frame for display.
    pub preview: bool,
}

/// Where the pipeline leaves its results for the display.
#[derive(Clone, Default)]
pub struct Outputs {
    pub status: Latest<Status>,
    pub preview: Latest<Image>,
}

/// Stops a running pipeline, also while it is waiting for the camera.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        // stores a permit when nobody is waiting yet
        self.notify.notify_one();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    async fn cancelled(&self) {
        while !self.is_cancelled() {
            self.notify.notified().await;
        }
    }
}

// result of converting and classifying one frame
struct FrameOutcome {
    seq: u64,
    preview: Option<Image>,
    classification: Result<Classification, InferError>,
}

struct Worker {
    sender: mpsc::Sender<VideoFrame>,
    busy: Arc<AtomicBool>,
    join_handle: JoinHandle<()>,
}

/// Capture, convert, classify, publish.
pub struct Pipeline<C> {
    video_in: VideoIn,
    classifier: Arc<Mutex<C>>,
    options: PipelineOptions,
    outputs: Outputs,
    cancel: CancelHandle,
}

impl<C: Classifier + 'static> Pipeline<C> {
    pub fn new(video_in: VideoIn, classifier: C, options: PipelineOptions) -> Self {
        Self {
            video_in,
            classifier: Arc::new(Mutex::new(classifier)),
            options,
            outputs: Outputs::default(),
            cancel: CancelHandle::default(),
        }
    }

    pub fn outputs(&self) -> Outputs {
        self.outputs.clone()
    }

    /// Stops the pipeline without waiting for the next frame. Frames already handed
    /// to workers are finished.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    fn process_frame(
        converter: &mut FrameConverter,
        classifier: &Mutex<C>,
        frame: &VideoFrame,
        preview: bool,
    ) -> FrameOutcome {
        let image = converter.convert(&frame.frame);
        let preview = preview.then(|| image.to_image());
        let classification = {
            let mut classifier = classifier.lock().unwrap_or_else(|e| e.into_inner());
            classifier.classify(&image)
        };
        FrameOutcome {
            seq: frame.seq,
            preview,
            classification,
        }
    }

    fn publish(outputs: &Outputs, outcome: FrameOutcome) {
        if let Some(image) = outcome.preview {
            outputs.preview.publish(Stamped::new(outcome.seq, image));
        }
        match outcome.classification {
            Ok(classification) => match Status::from_classification(&classification) {
                Some(status) => {
                    if !outputs.status.publish(Stamped::new(outcome.seq, status)) {
                        log::debug!("frame {}: newer result already shown", outcome.seq);
                    }
                }
                None => log::debug!("frame {}: empty classification", outcome.seq),
            },
            Err(error) => log::warn!("frame {}: classification failed: {}", outcome.seq, error),
        }
    }

    fn spawn_worker(&self, index: usize) -> Worker {
        // one slot: a worker is only handed a frame while it is idle
        let (sender, mut receiver) = mpsc::channel::<VideoFrame>(1);
        let busy = Arc::new(AtomicBool::new(false));
        let classifier = Arc::clone(&self.classifier);
        let outputs = self.outputs.clone();
        let preview = self.options.preview;
        let mut converter = FrameConverter::new(self.options.converter.clone());
        let worker_busy = Arc::clone(&busy);

        let join_handle = tokio::spawn(async move {
            while let Some(frame) = receiver.recv().await {
                let classifier = Arc::clone(&classifier);
                let result = spawn_blocking(move || {
                    let outcome = Self::process_frame(&mut converter, &classifier, &frame, preview);
                    (converter, outcome)
                })
                .await;
                match result {
                    Ok((returned, outcome)) => {
                        converter = returned;
                        Self::publish(&outputs, outcome);
                    }
                    Err(error) => {
                        log::error!("worker {}: frame task failed: {}", index, error);
                        return;
                    }
                }
                worker_busy.store(false, Ordering::Release);
            }
            log::debug!("worker {}: done", index);
        });

        Worker {
            sender,
            busy,
            join_handle,
        }
    }

    /// Run until the source ends, the pipeline is cancelled or capture fails.
    ///
    /// Permission loss ends the run with `VideoError::PermissionDenied` after
    /// the status has been switched to the permission notice.
    pub async fn run(mut self) -> Result<(), VideoError> {
        let workers: Vec<Worker> = (0..self.options.workers.max(1))
            .map(|index| self.spawn_worker(index))
            .collect();
        log::info!("pipeline running with {} worker(s)", workers.len());

        let mut next = 0;
        let result = loop {
            // a stalled camera must not hold up shutdown
            let captured = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break Ok(()),
                captured = self.video_in.capture() => captured,
            };
            let frame = match captured {
                Ok(frame) => frame,
                Err(VideoError::EndOfStream) => break Ok(()),
                Err(error) => break Err(error),
            };

            // hand the frame to the first idle worker, drop it if there is none
            let idle = (0..workers.len())
                .map(|offset| (next + offset) % workers.len())
                .find(|&index| !workers[index].busy.swap(true, Ordering::AcqRel));
            match idle {
                Some(index) => {
                    let seq = frame.seq;
                    if workers[index].sender.try_send(frame).is_err() {
                        log::warn!("frame {}: worker {} is gone", seq, index);
                        workers[index].busy.store(false, Ordering::Release);
                    }
                    next = index + 1;
                }
                None => log::debug!("frame {}: all workers busy, dropped", frame.seq),
            }
        };

        // let the workers finish what they have
        for worker in workers {
            drop(worker.sender);
            if let Err(error) = worker.join_handle.await {
                log::error!("worker task failed: {}", error);
            }
        }

        match &result {
            Ok(()) => log::info!("pipeline stopped"),
            Err(VideoError::PermissionDenied(_)) => {
                // final: nothing may replace the notice
                self.outputs
                    .status
                    .publish(Stamped::new(u64::MAX, Status::PermissionDenied));
            }
            Err(error) => log::error!("pipeline stopped: {}", error),
        }
        result
    }
}
