//! Pipeline implementation.
//!
//! A [`Pipeline`] runs one filter over one file: resolve the filter name,
//! load the source, apply the filter, save the result. Steps run strictly in
//! sequence and the first failure aborts the run.

use crate::core::error::{PipelineError, PipelineResult};
use crate::core::filter::Filter;
use crate::core::image::{ImageHandle, SaveOptions};
use crate::core::types::ImageMetadata;
use crate::execution::progress::{ProgressCallback, ProgressTracker, ProgressUpdate, Step};
use crate::filters::registry::FilterRegistry;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pipeline options.
#[derive(Clone, Default)]
pub struct PipelineOptions {
    /// Encoder settings for the destination file.
    pub save_options: SaveOptions,
    /// Progress callback.
    pub progress_callback: Option<Arc<ProgressCallback>>,
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("save_options", &self.save_options)
            .field("progress_callback", &self.progress_callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl PipelineOptions {
    /// Create a new options builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set encoder settings.
    pub fn with_save_options(mut self, options: SaveOptions) -> Self {
        self.save_options = options;
        self
    }

    /// Set progress callback.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(Box::new(callback)));
        self
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// The filter that was applied.
    pub filter: Filter,
    /// Source file.
    pub source: PathBuf,
    /// Destination file.
    pub destination: PathBuf,
    /// The decoded source raster.
    pub input: ImageMetadata,
    /// The raster that was written.
    pub output: ImageMetadata,
    /// Wall time for the whole run.
    pub elapsed_ms: u64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Applied '{}' to {} ({}) -> {} ({}) in {} ms",
            self.filter,
            self.source.display(),
            self.input,
            self.destination.display(),
            self.output,
            self.elapsed_ms
        )
    }
}

/// Runs load → filter → save against a shared, read-only registry.
///
/// The pipeline holds no per-run state, so one instance can serve any number
/// of sequential runs.
#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
    registry: &'a FilterRegistry,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline with default options.
    pub fn new(registry: &'a FilterRegistry) -> Self {
        Self {
            registry,
            options: PipelineOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// The registry used for name resolution.
    pub fn registry(&self) -> &FilterRegistry {
        self.registry
    }

    /// The current options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Apply the filter named `filter_name` to `source` and write the result
    /// to `destination`.
    ///
    /// The filter is resolved before the filesystem is touched, so an unknown
    /// name fails without reading or writing anything.
    pub fn run(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        filter_name: &str,
    ) -> PipelineResult<RunSummary> {
        let source = source.as_ref();
        let destination = destination.as_ref();

        let mut tracker = ProgressTracker::new(Step::ALL.len());
        if let Some(callback) = &self.options.progress_callback {
            tracker = tracker.with_callback(callback.clone());
        }
        tracker.start();

        // Resolve
        tracker.step_started(Step::Resolve);
        let filter = self
            .registry
            .resolve(filter_name)
            .map_err(|e| abort(&tracker, Step::Resolve, e.into()))?;
        tracker.step_completed(Step::Resolve);

        // Load
        tracker.step_started(Step::Load);
        let mut handle = ImageHandle::new(source);
        let raster = handle
            .load()
            .map_err(|e| abort(&tracker, Step::Load, e.into()))?;
        tracker.step_completed(Step::Load);

        // Apply
        tracker.step_started(Step::Apply);
        let input = ImageMetadata::of(raster);
        let filtered = filter.apply(raster);
        let output = ImageMetadata::of(&filtered);
        handle.replace_raster(filtered);
        log::info!("Filter '{}' applied: {} -> {}", filter, input, output);
        tracker.step_completed(Step::Apply);

        // Save
        tracker.step_started(Step::Save);
        handle
            .save_with(destination, &self.options.save_options)
            .map_err(|e| abort(&tracker, Step::Save, e.into()))?;
        tracker.step_completed(Step::Save);

        tracker.complete();
        let summary = RunSummary {
            filter,
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            input,
            output,
            elapsed_ms: tracker.elapsed_ms(),
        };
        log::info!("{}", summary);

        Ok(summary)
    }
}

fn abort(tracker: &ProgressTracker, step: Step, error: PipelineError) -> PipelineError {
    log::warn!("Run aborted during {}: {}", step, error);
    tracker.report_error(step, error.to_string());
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ErrorKind, Stage};
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::sync::Mutex;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("input.png");
        let mut image = RgbaImage::new(3, 2);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = Rgba([(x * 80) as u8, (y * 120) as u8, 200, 255 - (x * 10) as u8]);
        }
        DynamicImage::ImageRgba8(image).save(&path).unwrap();
        path
    }

    #[test]
    fn test_run_writes_output() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let source = write_sample(dir.path());
        let destination = dir.path().join("out.png");

        let registry = FilterRegistry::with_builtins();
        let summary = Pipeline::new(&registry)
            .run(&source, &destination, "Rotate90")
            .unwrap();

        assert_eq!(summary.filter, Filter::Rotate90);
        assert_eq!((summary.input.width, summary.input.height), (3, 2));
        assert_eq!((summary.output.width, summary.output.height), (2, 3));
        assert_eq!(summary.destination, destination);

        let written = image::open(&destination).unwrap();
        assert_eq!((written.width(), written.height()), (2, 3));
    }

    #[test]
    fn test_unknown_filter_touches_nothing() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("out.png");

        let registry = FilterRegistry::with_builtins();
        let error = Pipeline::new(&registry)
            .run(dir.path().join("missing.png"), &destination, "vintage")
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UnknownFilter);
        assert_eq!(error.stage(), Stage::Resolve);
        assert!(!destination.exists());
    }

    #[test]
    fn test_missing_source_fails_at_load() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("out.png");

        let registry = FilterRegistry::with_builtins();
        let error = Pipeline::new(&registry)
            .run(dir.path().join("missing.png"), &destination, "invert")
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.stage(), Stage::Load);
        assert!(!destination.exists());
    }

    #[test]
    fn test_save_failure_fails_the_run() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let source = write_sample(dir.path());

        let registry = FilterRegistry::with_builtins();
        let error = Pipeline::new(&registry)
            .run(&source, dir.path().join("out.nosuchformat"), "mirror")
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::EncodeError);
        assert_eq!(error.stage(), Stage::Save);
    }

    #[test]
    fn test_save_options_are_applied() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let source = write_sample(dir.path());
        let destination = dir.path().join("a").join("b").join("out.png");

        let registry = FilterRegistry::with_builtins();
        let pipeline = Pipeline::new(&registry).with_options(
            PipelineOptions::new()
                .with_save_options(SaveOptions::new().with_create_missing_dirs(true)),
        );
        pipeline.run(&source, &destination, "sepia").unwrap();
        assert!(destination.is_file());
    }

    #[test]
    fn test_progress_events() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let source = write_sample(dir.path());

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let registry = FilterRegistry::with_builtins();
        let pipeline = Pipeline::new(&registry).with_options(
            PipelineOptions::new().with_progress(move |update| sink.lock().unwrap().push(update)),
        );

        pipeline.run(&source, dir.path().join("ok.png"), "posterize").unwrap();
        {
            let events = events.lock().unwrap();
            let completed: Vec<Step> = events
                .iter()
                .filter_map(|e| match e {
                    ProgressUpdate::StepCompleted { step, .. } => Some(*step),
                    _ => None,
                })
                .collect();
            assert_eq!(completed, Step::ALL.to_vec());
            assert!(matches!(events.last(), Some(ProgressUpdate::Completed { .. })));
        }

        events.lock().unwrap().clear();
        let _ = pipeline.run(dir.path().join("missing.png"), dir.path().join("x.png"), "posterize");
        let events = events.lock().unwrap();
        assert!(matches!(
            events.last(),
            Some(ProgressUpdate::Error { step: Step::Load, .. })
        ));
    }

    #[test]
    fn test_failed_step_matches_error_stage() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let source = write_sample(dir.path());

        let failed = Arc::new(Mutex::new(Vec::new()));
        let sink = failed.clone();
        let registry = FilterRegistry::with_builtins();
        let pipeline = Pipeline::new(&registry).with_options(PipelineOptions::new().with_progress(
            move |update| {
                if let ProgressUpdate::Error { step, .. } = update {
                    sink.lock().unwrap().push(step);
                }
            },
        ));

        let cases = [
            (source.clone(), dir.path().join("a.png"), "nope"),
            (dir.path().join("missing.png"), dir.path().join("b.png"), "blur"),
            (source.clone(), dir.path().join("c.unknownext"), "blur"),
        ];
        for (input, output, filter) in cases {
            let error = pipeline.run(&input, &output, filter).unwrap_err();
            let step = failed.lock().unwrap().pop().unwrap();
            assert_eq!(step.to_string(), error.stage().to_string());
        }
    }

    #[test]
    fn test_registry_reused_across_runs() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let source = write_sample(dir.path());

        let registry = FilterRegistry::with_builtins();
        let pipeline = Pipeline::new(&registry);
        for filter in Filter::ALL {
            let destination = dir.path().join(format!("{}.png", filter));
            let summary = pipeline.run(&source, &destination, filter.name()).unwrap();
            assert_eq!(summary.filter, filter);
            assert!(destination.is_file());
        }
    }

    #[test]
    fn test_summary_serializes() {
        let summary = RunSummary {
            filter: Filter::FindEdges,
            source: PathBuf::from("in.png"),
            destination: PathBuf::from("out.png"),
            input: ImageMetadata::of(&DynamicImage::new_rgb8(4, 4)),
            output: ImageMetadata::of(&DynamicImage::new_rgb8(4, 4)),
            elapsed_ms: 3,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["filter"], "find_edges");
        assert_eq!(json["output"]["width"], 4);
        assert!(summary.to_string().contains("find_edges"));
    }

    #[test]
    fn test_options_debug_hides_callback() {
        let options = PipelineOptions::new().with_progress(|_| {});
        let debug = format!("{:?}", options);
        assert!(debug.contains("<callback>"));
    }
}
