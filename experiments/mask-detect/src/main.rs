use {
    anyhow::{Context, Result, bail},
    clap::Parser,
    inference::Classifier,
    mask_detect::*,
    tokio::runtime::Runtime,
    video::{VideoError, VideoIn},
};

#[cfg(feature = "onnx")]
fn load_classifier(args: &Args) -> Result<Box<dyn Classifier>> {
    let labels = inference::load_labels(&args.labels).context("failed to load labels")?;
    let classifier = inference::OnnxClassifier::new(
        inference::ModelSource::File(args.model.clone()),
        labels,
        args.classifier_config(),
    )
    .context("failed to load classifier")?;
    Ok(Box::new(classifier))
}

#[cfg(not(feature = "onnx"))]
fn load_classifier(_args: &Args) -> Result<Box<dyn Classifier>> {
    bail!("built without a classifier backend, rebuild with --features onnx")
}

fn run(runtime: &Runtime, args: Args) -> Result<()> {
    let capture = args.capture_config()?;
    let classifier = load_classifier(&args)?;

    log::info!("opening camera...");
    let video_in = match runtime.block_on(VideoIn::open(capture)) {
        Ok(video_in) => video_in,
        Err(VideoError::PermissionDenied(msg)) => {
            log::error!("{}: {}", PERMISSION_NOTICE, msg);
            if !args.headless {
                display::show_notice(PERMISSION_NOTICE)?;
            }
            bail!(PERMISSION_NOTICE);
        }
        Err(error) => return Err(error).context("failed to open camera"),
    };

    let pipeline = Pipeline::new(video_in, classifier, args.pipeline_options());
    let outputs = pipeline.outputs();
    let cancel = pipeline.cancel_handle();
    let handle = runtime.spawn(pipeline.run());

    let mut snapshot = Snapshot::new(args.snapshot.clone());
    if args.headless {
        display::run_headless(&outputs, &mut snapshot, || handle.is_finished());
    } else {
        display::run_window(&outputs, &mut snapshot, || handle.is_finished())?;
    }
    if snapshot.is_pending() {
        log::warn!("no frame arrived, snapshot not written");
    }

    log::info!("exiting...");
    cancel.cancel();
    match runtime.block_on(handle).context("pipeline task failed")? {
        Ok(()) => Ok(()),
        Err(VideoError::PermissionDenied(_)) => bail!(PERMISSION_NOTICE),
        Err(error) => Err(error).context("capture failed"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    match &args.log_dir {
        Some(dir) => base::init_file_logger(dir, args.log_level)
            .with_context(|| format!("failed to open log directory {}", dir.display()))?,
        None => base::init_stdout_logger(args.log_level),
    }

    let runtime = match Runtime::new() {
        Ok(runtime) => runtime,
        Err(error) => base::log_fatal!("failed to start async runtime: {}", error),
    };
    let result = run(&runtime, args);
    if let Err(error) = &result {
        log::error!("{:#}", error);
    }
    result
}
