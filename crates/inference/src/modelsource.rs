use std::path::PathBuf;

/// Where a model is loaded from.
#[derive(Clone, Debug)]
pub enum ModelSource {
    File(PathBuf),
}
