use {
    crate::*,
    image::OrientedImage,
    ndarray::ArrayD,
    ort::{inputs, session::Session as OrtSession, value::TensorRef},
};

/// Settings for `OnnxClassifier`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    threads: usize,
    device: Device,
    softmax: bool,
    input: ModelInput,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            device: Device::Cpu,
            softmax: false,
            input: ModelInput::default(),
        }
    }
}

impl ClassifierConfig {
    /// Set the number of intra-op threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Apply softmax to the model output, for models that emit logits.
    pub fn with_softmax(mut self, softmax: bool) -> Self {
        self.softmax = softmax;
        self
    }

    pub fn with_input(mut self, input: ModelInput) -> Self {
        self.input = input;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn softmax(&self) -> bool {
        self.softmax
    }

    pub fn input(&self) -> &ModelInput {
        &self.input
    }
}

/// Image classifier running an ONNX model with one image input and one score output.
pub struct OnnxClassifier {
    session: OrtSession,
    labels: Vec<String>,
    config: ClassifierConfig,
}

impl OnnxClassifier {
    pub fn new(
        model: ModelSource,
        labels: Vec<String>,
        config: ClassifierConfig,
    ) -> Result<Self, InferError> {
        if labels.is_empty() {
            return Err(InferError::Labels("no labels given".to_string()));
        }

        let mut builder = OrtSession::builder().map_err(|e| {
            InferError::Runtime(format!("failed to create session builder: {}", e))
        })?;
        builder = builder
            .with_intra_threads(config.threads.max(1))
            .map_err(|e| InferError::Runtime(format!("failed to set threads: {}", e)))?;

        // map Device to ort execution providers
        builder = match config.device {
            Device::Cpu => {
                log::info!("classifier device: CPU, {} threads", config.threads);
                builder
            }
            #[cfg(feature = "cuda")]
            Device::Cuda { device_id } => {
                use ort::execution_providers::CUDAExecutionProvider;
                log::info!("classifier device: CUDA (device_id={})", device_id);
                let ep = CUDAExecutionProvider::default().with_device_id(device_id);
                builder
                    .with_execution_providers([ep.build()])
                    .map_err(|_| InferError::UnsupportedDevice(config.device))?
            }
            #[cfg(not(feature = "cuda"))]
            Device::Cuda { .. } => {
                return Err(InferError::UnsupportedDevice(config.device));
            }
        };

        let session = match &model {
            ModelSource::File(path) => builder.commit_from_file(path).map_err(|e| {
                InferError::ModelLoad(format!("failed to load {}: {}", path.display(), e))
            })?,
        };
        log::info!("loaded classifier {:?} with {} labels", model, labels.len());

        Ok(Self {
            session,
            labels,
            config,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&mut self, image: &OrientedImage<'_>) -> Result<Classification, InferError> {
        let tensor = preprocess(image, &self.config.input)?;
        let array = ArrayD::from_shape_vec(tensor.shape, tensor.data)
            .map_err(|e| InferError::Shape(format!("failed to create input array: {}", e)))?;
        let tensor_ref = TensorRef::from_array_view(array.view())
            .map_err(|e| InferError::Runtime(format!("failed to create tensor ref: {}", e)))?;
        let outputs = self
            .session
            .run(inputs![tensor_ref])
            .map_err(|e| InferError::Runtime(format!("inference failed: {}", e)))?;

        let scores = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| InferError::Runtime(format!("output is not f32: {}", e)))?;
        let mut scores: Vec<f32> = scores.iter().copied().collect();
        if self.config.softmax {
            softmax(&mut scores);
        }
        Classification::from_scores(self.labels.as_slice(), &scores)
    }
}
