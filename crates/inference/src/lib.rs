//! Image classification for the mask-detect pipeline.

pub mod classification;
pub mod classifier;
pub mod device;
pub mod error;
pub mod labels;
pub mod modelsource;
pub mod preprocess;

#[cfg(feature = "onnx")]
pub mod onnx;

pub use classification::{Category, Classification};
pub use classifier::Classifier;
pub use device::Device;
pub use error::InferError;
pub use labels::{load_labels, parse_labels};
pub use modelsource::ModelSource;
pub use preprocess::{InputLayout, ModelInput, Normalization, preprocess, softmax};

#[cfg(feature = "onnx")]
pub use onnx::{ClassifierConfig, OnnxClassifier};
