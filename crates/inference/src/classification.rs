use crate::*;

/// One label with its confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub label: String,
    pub score: f32,
}

impl Category {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Classifier output for one frame, highest score first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classification {
    categories: Vec<Category>,
}

impl Classification {
    /// Sort `categories` by descending score. Equal scores keep their order.
    pub fn new(mut categories: Vec<Category>) -> Self {
        categories.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self { categories }
    }

    /// Pair up labels with model scores.
    pub fn from_scores<S: AsRef<str>>(labels: &[S], scores: &[f32]) -> Result<Self, InferError> {
        if labels.len() != scores.len() {
            return Err(InferError::Shape(format!(
                "{} labels for {} scores",
                labels.len(),
                scores.len()
            )));
        }
        Ok(Self::new(
            labels
                .iter()
                .zip(scores)
                .map(|(label, score)| Category::new(label.as_ref(), *score))
                .collect(),
        ))
    }

    /// The highest scoring category.
    pub fn top(&self) -> Option<&Category> {
        self.categories.first()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
