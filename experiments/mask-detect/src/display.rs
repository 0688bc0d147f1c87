use {
    crate::*,
    anyhow::{Result, anyhow},
    base::Vec2,
    image::Image,
    minifb::{Key, Window, WindowOptions},
    std::time::{Duration, Instant},
};

const TITLE: &str = "mask-detect";
const NOTICE_SIZE: Vec2<usize> = Vec2 { x: 480, y: 120 };
const NOTICE_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(30);

fn title(status: &Status) -> String {
    format!("{} - {}", TITLE, status)
}

fn open_window(status: &Status, size: Vec2<usize>) -> Result<Window> {
    let mut window = Window::new(&title(status), size.x, size.y, WindowOptions::default())
        .map_err(|e| anyhow!("failed to open window: {}", e))?;

    // Limit to max 30 FPS
    window.set_target_fps(30);
    Ok(window)
}

fn show_image(window: &mut Window, image: &Image) -> Result<()> {
    let argb = image.to_u32()?;
    window
        .update_with_buffer(&argb, image.size.x, image.size.y)
        .map_err(|e| anyhow!("failed to update window: {}", e))
}

/// What a display loop does after looking at the pipeline outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Continue,
    Exit,
    /// Pipeline is done and camera permission was lost.
    Notice,
}

/// Decide the next step. Nothing ends while a preview is still waiting to be shown.
pub fn next_action(status: &Status, finished: bool, preview_pending: bool) -> Action {
    if !finished || preview_pending {
        Action::Continue
    } else if *status == Status::PermissionDenied {
        Action::Notice
    } else {
        Action::Exit
    }
}

/// Display-side position in the pipeline outputs.
#[derive(Debug)]
pub struct Viewer {
    status: Status,
    status_seq: u64,
    preview_seq: u64,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            status: Status::Starting,
            status_seq: 0,
            preview_seq: 0,
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Take the newest status and decide the next step. Returns the action and whether
    /// the status changed.
    ///
    /// `finished` is sampled before the status is read, so whatever the pipeline
    /// published before it finished is seen in the same call.
    pub fn poll(&mut self, outputs: &Outputs, finished: impl Fn() -> bool) -> (Action, bool) {
        let done = finished();
        let mut changed = false;
        if let Some(stamped) = outputs.status.get_newer(self.status_seq) {
            self.status_seq = stamped.seq;
            if stamped.inner != self.status {
                self.status = stamped.inner;
                changed = true;
            }
        }
        let preview_pending = outputs.preview.seq() != self.preview_seq;
        (next_action(&self.status, done, preview_pending), changed)
    }

    /// Newest preview not shown yet.
    pub fn take_preview(&mut self, outputs: &Outputs) -> Option<Image> {
        let stamped = outputs.preview.get_newer(self.preview_seq)?;
        self.preview_seq = stamped.seq;
        Some(stamped.inner)
    }
}

/// Show the preview with the current label in the title until the window is
/// closed or the pipeline is done.
///
/// A permission notice stays up until the user closes the window.
pub fn run_window(outputs: &Outputs, snapshot: &mut Snapshot, finished: impl Fn() -> bool) -> Result<()> {
    let mut viewer = Viewer::new();
    let mut window: Option<(Window, Vec2<usize>)> = None;

    loop {
        let (action, changed) = viewer.poll(outputs, &finished);
        if changed {
            log::debug!("status: {}", viewer.status());
            if let Some((window, _)) = window.as_mut() {
                window.set_title(&title(viewer.status()));
            }
        }
        match action {
            Action::Exit => return Ok(()),
            Action::Notice if window.is_none() => return show_notice(PERMISSION_NOTICE),
            // the notice stays in the title until the window is closed
            Action::Notice | Action::Continue => {}
        }

        match viewer.take_preview(outputs) {
            Some(image) => {
                snapshot.offer(&image);
                // frame size can change when the source reconnects
                if window.as_ref().is_none_or(|(_, size)| *size != image.size) {
                    window = Some((open_window(viewer.status(), image.size)?, image.size));
                }
                if let Some((window, _)) = window.as_mut() {
                    show_image(window, &image)?;
                }
            }
            None => match window.as_mut() {
                Some((window, _)) => window.update(),
                None => std::thread::sleep(POLL_INTERVAL),
            },
        }

        if let Some((window, _)) = window.as_ref() {
            if !window.is_open() || window.is_key_down(Key::Escape) {
                return Ok(());
            }
        }
    }
}

/// Blocking notice: a small window titled with `text`, up until closed.
pub fn show_notice(text: &str) -> Result<()> {
    let mut window = Window::new(
        &format!("{} - {}", TITLE, text),
        NOTICE_SIZE.x,
        NOTICE_SIZE.y,
        WindowOptions::default(),
    )
    .map_err(|e| anyhow!("failed to open window: {}", e))?;
    window.set_target_fps(30);

    let buffer = vec![0x00_40_10_10u32; NOTICE_SIZE.area()];
    let started = Instant::now();
    while window.is_open() && !window.is_key_down(Key::Escape) && started.elapsed() < NOTICE_TIMEOUT {
        window
            .update_with_buffer(&buffer, NOTICE_SIZE.x, NOTICE_SIZE.y)
            .map_err(|e| anyhow!("failed to update window: {}", e))?;
    }
    Ok(())
}

/// No window: log every label change until the pipeline is done.
pub fn run_headless(outputs: &Outputs, snapshot: &mut Snapshot, finished: impl Fn() -> bool) {
    let mut viewer = Viewer::new();
    let mut shown: Option<String> = None;
    loop {
        let (action, changed) = viewer.poll(outputs, &finished);

        if let Some(image) = viewer.take_preview(outputs) {
            snapshot.offer(&image);
        }

        if changed {
            let status = viewer.status();
            let text = status.label().map(str::to_string);
            if *status == Status::PermissionDenied {
                log::error!("{}", PERMISSION_NOTICE);
            } else if text != shown {
                log::info!("{}", status);
                shown = text;
            }
        }

        match action {
            Action::Continue => std::thread::sleep(POLL_INTERVAL),
            Action::Exit | Action::Notice => return,
        }
    }
}
