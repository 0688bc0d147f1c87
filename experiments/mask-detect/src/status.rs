use {inference::Classification, std::fmt};

/// Shown when the camera cannot be used because access was refused.
pub const PERMISSION_NOTICE: &str = "camera permission denied";

/// What the label area currently says.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Starting,
    Label { label: String, score: f32 },
    PermissionDenied,
}

impl Status {
    /// Status for the top category, `None` when the classifier returned nothing.
    pub fn from_classification(classification: &Classification) -> Option<Self> {
        classification.top().map(|top| Status::Label {
            label: top.label.clone(),
            score: top.score,
        })
    }

    /// The label without the confidence.
    pub fn label(&self) -> Option<&str> {
        match self {
            Status::Label { label, .. } => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Starting => write!(f, "starting..."),
            Status::Label { label, score } => write!(f, "{} ({:.0}%)", label, score * 100.0),
            Status::PermissionDenied => write!(f, "{}", PERMISSION_NOTICE),
        }
    }
}

/// Text to display for a classification: the label of the top category.
pub fn status_text(classification: &Classification) -> Option<String> {
    classification.top().map(|top| top.label.clone())
}
