use {image::Image, std::path::PathBuf};

/// Writes the first oriented frame to disk, once.
#[derive(Debug, Default)]
pub struct Snapshot {
    path: Option<PathBuf>,
}

impl Snapshot {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Whether a frame is still wanted.
    pub fn is_pending(&self) -> bool {
        self.path.is_some()
    }

    /// Save `image` if no snapshot was taken yet. The format follows the file extension.
    pub fn offer(&mut self, image: &Image) {
        let Some(path) = self.path.take() else {
            return;
        };
        match image.save(&path) {
            Ok(()) => log::info!("snapshot written to {}", path.display()),
            Err(error) => log::error!("failed to write snapshot {}: {}", path.display(), error),
        }
    }
}
