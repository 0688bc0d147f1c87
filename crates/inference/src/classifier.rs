use {crate::*, image::OrientedImage};

/// Something that labels a frame.
///
/// Implementations are shared between pipeline workers behind a mutex, so
/// they only need `Send`.
pub trait Classifier: Send {
    fn classify(&mut self, image: &OrientedImage<'_>) -> Result<Classification, InferError>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn classify(&mut self, image: &OrientedImage<'_>) -> Result<Classification, InferError> {
        (**self).classify(image)
    }
}
