use {crate::*, std::path::Path};

/// Read a label file: one label per line, blank lines skipped.
pub fn load_labels(path: impl AsRef<Path>) -> Result<Vec<String>, InferError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| InferError::Labels(format!("cannot read {}: {}", path.display(), e)))?;
    let labels = parse_labels(&text);
    if labels.is_empty() {
        return Err(InferError::Labels(format!(
            "{} contains no labels",
            path.display()
        )));
    }
    log::debug!("loaded {} labels from {}", labels.len(), path.display());
    Ok(labels)
}

pub fn parse_labels(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
