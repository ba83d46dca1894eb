//! Icon-set generation.
//!
//! Takes one square source image and a destination root, and produces an
//! Xcode asset-catalog icon set:
//!
//! ```text
//! <destination>/
//! └── AppIcon.appiconset/
//!     ├── Contents.json      # derived from the size catalog
//!     ├── 16.png             # 8x8 pixels at the default 2.0 density
//!     ├── 20.png
//!     ├── ...
//!     └── 1024.png           # 512x512 pixels
//! ```
//!
//! ## Steps
//!
//! 1. Validate the source (present, square) and the destination root.
//! 2. Create the icon-set folder, including parents. Failure aborts the run.
//! 3. Write `Contents.json`. Failure aborts the run before any PNG is written.
//! 4. For every catalog entry: resize, encode, write `<edge>.png`. A failing
//!    size is logged and recorded; its siblings still run.
//! 5. Return a [`GenerationReport`] listing written, failed and skipped sizes.
//!
//! ## Parallel Processing
//!
//! Sizes are rendered one after another by default. With
//! `processing.max_processes > 1` they are spread over a bounded
//! [rayon](https://docs.rs/rayon) pool. Folder and manifest are always
//! written first, and the report keeps catalog order either way.
//!
//! ## Cancellation
//!
//! A [`CancelToken`] is checked before each size starts. Sizes already in
//! flight finish; the rest are reported as skipped.

use crate::catalog::{IconSpec, SizeCatalog};
use crate::config::{ConfigError, IconConfig, effective_threads};
use crate::imaging::{
    BackendError, IconBackend, RenderConfig, RustBackend, SourceImage, is_square, render_icon,
    write_asset,
};
use crate::manifest::{self, MANIFEST_FILENAME};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Failures that abort a whole run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No source image selected")]
    SourceMissing,
    #[error("Source image must be square, got {width}x{height}")]
    NonSquareSource { width: u32, height: u32 },
    #[error("No destination folder selected")]
    DestinationMissing,
    #[error("Destination is not a usable directory: {0}")]
    DestinationUnavailable(PathBuf),
    #[error("Could not create icon set folder {path}: {source}")]
    FolderCreation {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("An icon set is already being generated")]
    Busy,
    #[error("Could not start generation worker: {0}")]
    WorkerSpawn(std::io::Error),
    #[error("Generation worker stopped unexpectedly")]
    WorkerPanicked,
}

/// Failure of a single size. Never aborts the run.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("{0}")]
    Encoding(#[from] BackendError),
    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct AssetFailure {
    pub edge_length: u32,
    pub error: AssetError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenIcon {
    pub edge_length: u32,
    /// Pixel edge of the stored PNG.
    pub pixels: u32,
    pub path: PathBuf,
}

/// Progress events emitted while a run is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateEvent {
    FolderCreated { path: PathBuf },
    ManifestWritten { path: PathBuf, records: usize },
    IconWritten { edge_length: u32, pixels: u32 },
    IconFailed { edge_length: u32, reason: String },
    IconSkipped { edge_length: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Every size was written.
    Complete,
    /// Some sizes failed; see [`GenerationReport::failures`].
    Partial,
    /// The run was cancelled before every size started.
    Cancelled,
}

/// Result of a run that got past folder creation and the manifest.
#[derive(Debug)]
pub struct GenerationReport {
    pub folder: PathBuf,
    pub manifest: PathBuf,
    /// In catalog order.
    pub written: Vec<WrittenIcon>,
    pub failures: Vec<AssetFailure>,
    pub skipped: Vec<u32>,
}

impl GenerationReport {
    pub fn outcome(&self) -> GenerationOutcome {
        if !self.skipped.is_empty() {
            GenerationOutcome::Cancelled
        } else if !self.failures.is_empty() {
            GenerationOutcome::Partial
        } else {
            GenerationOutcome::Complete
        }
    }

    pub fn is_complete(&self) -> bool {
        self.outcome() == GenerationOutcome::Complete
    }

    pub fn failed_sizes(&self) -> Vec<u32> {
        self.failures.iter().map(|f| f.edge_length).collect()
    }

    pub fn attempted(&self) -> usize {
        self.written.len() + self.failures.len()
    }
}

/// Shared flag that asks a run to stop before its next size.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub catalog: SizeCatalog,
    pub folder_name: String,
    pub render: RenderConfig,
    pub threads: usize,
}

impl GenerateOptions {
    /// Build options from a validated config.
    pub fn from_config(config: &IconConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            catalog: config.catalog()?,
            folder_name: config.folder_name.clone(),
            render: RenderConfig {
                density: config.rendering.density_factor,
                filter: config.rendering.filter,
            },
            threads: effective_threads(&config.processing),
        })
    }

    pub fn with_catalog(mut self, catalog: SizeCatalog) -> Self {
        self.catalog = catalog;
        self
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            catalog: SizeCatalog::standard(),
            folder_name: IconConfig::default().folder_name,
            render: RenderConfig::default(),
            threads: 1,
        }
    }
}

/// Generate an icon set with the production backend.
pub fn generate(
    source: &SourceImage,
    destination_root: &Path,
    options: &GenerateOptions,
    events: Option<Sender<GenerateEvent>>,
    cancel: &CancelToken,
) -> Result<GenerationReport, PipelineError> {
    generate_with_backend(
        &RustBackend::new(),
        source,
        destination_root,
        options,
        events,
        cancel,
    )
}

/// Generate an icon set using a specific backend (allows testing with mock).
pub fn generate_with_backend(
    backend: &impl IconBackend,
    source: &SourceImage,
    destination_root: &Path,
    options: &GenerateOptions,
    events: Option<Sender<GenerateEvent>>,
    cancel: &CancelToken,
) -> Result<GenerationReport, PipelineError> {
    if source.is_empty() {
        return Err(PipelineError::SourceMissing);
    }
    let (width, height) = source.dimensions();
    if !is_square((width, height)) {
        return Err(PipelineError::NonSquareSource { width, height });
    }
    if destination_root.exists() && !destination_root.is_dir() {
        return Err(PipelineError::DestinationUnavailable(
            destination_root.to_path_buf(),
        ));
    }

    // Built before touching the filesystem so a pool failure leaves nothing behind.
    let pool = if options.threads > 1 {
        Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(options.threads)
                .build()?,
        )
    } else {
        None
    };

    let folder = destination_root.join(&options.folder_name);
    std::fs::create_dir_all(&folder).map_err(|source| PipelineError::FolderCreation {
        path: folder.clone(),
        source,
    })?;
    info!("Created {}", folder.display());
    emit(&events, GenerateEvent::FolderCreated { path: folder.clone() });

    let manifest_path = manifest::write(&folder, &options.catalog).map_err(|source| {
        PipelineError::ManifestWrite {
            path: folder.join(MANIFEST_FILENAME),
            source,
        }
    })?;
    let records: usize = options.catalog.iter().map(|s| s.slots.len()).sum();
    info!("Wrote {} ({} records)", manifest_path.display(), records);
    emit(
        &events,
        GenerateEvent::ManifestWritten {
            path: manifest_path.clone(),
            records,
        },
    );

    let run = IconRun {
        backend,
        source,
        folder: &folder,
        render: &options.render,
        events: &events,
        cancel,
    };
    let specs = options.catalog.specs();
    let outcomes: Vec<IconOutcome> = match pool {
        Some(pool) => pool.install(|| {
            specs
                .par_iter()
                .enumerate()
                .map(|(index, spec)| run.icon(index, spec))
                .collect()
        }),
        None => specs
            .iter()
            .enumerate()
            .map(|(index, spec)| run.icon(index, spec))
            .collect(),
    };

    let mut report = GenerationReport {
        folder,
        manifest: manifest_path,
        written: Vec::new(),
        failures: Vec::new(),
        skipped: Vec::new(),
    };
    for outcome in outcomes {
        match outcome {
            IconOutcome::Written(icon) => report.written.push(icon),
            IconOutcome::Failed(failure) => report.failures.push(failure),
            IconOutcome::Skipped(edge) => report.skipped.push(edge),
        }
    }
    info!(
        "Icon set finished: {} written, {} failed, {} skipped",
        report.written.len(),
        report.failures.len(),
        report.skipped.len()
    );
    Ok(report)
}

fn emit(events: &Option<Sender<GenerateEvent>>, event: GenerateEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        let _ = tx.send(event);
    }
}

enum IconOutcome {
    Written(WrittenIcon),
    Failed(AssetFailure),
    Skipped(u32),
}

/// Everything a single size needs, shared read-only across workers.
struct IconRun<'a, B> {
    backend: &'a B,
    source: &'a SourceImage,
    folder: &'a Path,
    render: &'a RenderConfig,
    events: &'a Option<Sender<GenerateEvent>>,
    cancel: &'a CancelToken,
}

impl<B: IconBackend> IconRun<'_, B> {
    fn icon(&self, index: usize, spec: &IconSpec) -> IconOutcome {
        let edge_length = spec.edge_length;
        if self.cancel.is_cancelled() {
            debug!("Skipping {}.png: cancelled", edge_length);
            emit(self.events, GenerateEvent::IconSkipped { edge_length });
            return IconOutcome::Skipped(edge_length);
        }

        let result = render_icon(self.backend, self.source, spec, self.render)
            .map_err(AssetError::from)
            .and_then(|asset| {
                write_asset(self.folder, &asset, index)
                    .map(|path| WrittenIcon {
                        edge_length,
                        pixels: asset.pixels,
                        path,
                    })
                    .map_err(|source| AssetError::Write {
                        path: self.folder.join(spec.filename()),
                        source,
                    })
            });

        match result {
            Ok(icon) => {
                debug!("Wrote {} ({}px)", icon.path.display(), icon.pixels);
                emit(
                    self.events,
                    GenerateEvent::IconWritten {
                        edge_length,
                        pixels: icon.pixels,
                    },
                );
                IconOutcome::Written(icon)
            }
            Err(error) => {
                warn!("Failed to generate {}.png: {}", edge_length, error);
                emit(
                    self.events,
                    GenerateEvent::IconFailed {
                        edge_length,
                        reason: error.to_string(),
                    },
                );
                IconOutcome::Failed(AssetFailure { edge_length, error })
            }
        }
    }
}

/// The once-per-run signal handed back to the calling surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub success: bool,
    pub message: String,
}

impl Completion {
    pub fn from_result(result: &Result<GenerationReport, PipelineError>) -> Self {
        match result {
            Ok(report) => Self::from_report(report),
            Err(err) => Self {
                success: false,
                message: format!("Icon set generation failed: {err}"),
            },
        }
    }

    pub fn from_report(report: &GenerationReport) -> Self {
        let total = report.attempted() + report.skipped.len();
        match report.outcome() {
            GenerationOutcome::Complete => Self {
                success: true,
                message: format!(
                    "Icon set created: {} icons in {}",
                    report.written.len(),
                    report.folder.display()
                ),
            },
            GenerationOutcome::Partial => Self {
                success: false,
                message: format!(
                    "Icon set incomplete: {} of {} icons failed ({})",
                    report.failures.len(),
                    total,
                    size_list(&report.failed_sizes())
                ),
            },
            GenerationOutcome::Cancelled => {
                let mut message = format!(
                    "Icon set generation cancelled after {} of {} icons",
                    report.attempted(),
                    total
                );
                if !report.failures.is_empty() {
                    message.push_str(&format!(
                        " ({} failed: {})",
                        report.failures.len(),
                        size_list(&report.failed_sizes())
                    ));
                }
                Self {
                    success: false,
                    message,
                }
            }
        }
    }
}

fn size_list(sizes: &[u32]) -> String {
    sizes
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ResizeParams;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::{file_names, gradient_rgba, png_dimensions};
    use image::RgbaImage;
    use std::fs;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn square_source(edge: u32) -> SourceImage {
        SourceImage::from_rgba(gradient_rgba(edge))
    }

    fn options_for(edges: &[u32]) -> GenerateOptions {
        GenerateOptions::default().with_catalog(SizeCatalog::only(edges).unwrap())
    }

    /// Real backend, except one size renders to an empty buffer.
    struct ZeroSizedAt(u32);

    impl IconBackend for ZeroSizedAt {
        fn resize(&self, source: &SourceImage, params: &ResizeParams) -> RgbaImage {
            if params.edge_length == self.0 {
                RgbaImage::new(0, 0)
            } else {
                RustBackend::new().resize(source, params)
            }
        }

        fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, BackendError> {
            RustBackend::new().encode(image)
        }
    }

    /// Cancels the run from inside the first resize.
    struct CancelOnFirstResize(CancelToken);

    impl IconBackend for CancelOnFirstResize {
        fn resize(&self, _source: &SourceImage, params: &ResizeParams) -> RgbaImage {
            self.0.cancel();
            RgbaImage::new(params.pixel_edge, params.pixel_edge)
        }

        fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, BackendError> {
            RustBackend::new().encode(image)
        }
    }

    /// Cancels the run and fails the size it was rendering.
    struct FailAndCancel(CancelToken);

    impl IconBackend for FailAndCancel {
        fn resize(&self, _source: &SourceImage, _params: &ResizeParams) -> RgbaImage {
            self.0.cancel();
            RgbaImage::new(0, 0)
        }

        fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, BackendError> {
            RustBackend::new().encode(image)
        }
    }

    // =========================================================================
    // Full runs with the real backend
    // =========================================================================

    #[test]
    fn generates_one_png_per_size_plus_manifest() {
        let tmp = TempDir::new().unwrap();
        let report = generate(
            &square_source(64),
            tmp.path(),
            &GenerateOptions::default(),
            None,
            &CancelToken::new(),
        )
        .unwrap();

        assert!(report.is_complete());
        let catalog = SizeCatalog::standard();
        assert_eq!(report.written.len(), catalog.len());

        let mut expected: Vec<String> = catalog.iter().map(|s| s.filename()).collect();
        expected.push(MANIFEST_FILENAME.to_string());
        expected.sort();
        assert_eq!(file_names(&report.folder), expected);
        assert_eq!(report.folder, tmp.path().join("AppIcon.appiconset"));
    }

    #[test]
    fn stored_pixels_are_edge_over_density() {
        let tmp = TempDir::new().unwrap();
        let report = generate(
            &square_source(40),
            tmp.path(),
            &options_for(&[16, 32]),
            None,
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(png_dimensions(&report.folder.join("16.png")), (8, 8));
        assert_eq!(png_dimensions(&report.folder.join("32.png")), (16, 16));
        assert_eq!(report.written[0].pixels, 8);
        assert_eq!(report.written[1].pixels, 16);
    }

    #[test]
    fn custom_density_changes_pixels() {
        let tmp = TempDir::new().unwrap();
        let mut options = options_for(&[128]);
        options.render.density = crate::imaging::DensityFactor::new(1.0).unwrap();

        let report =
            generate(&square_source(32), tmp.path(), &options, None, &CancelToken::new())
                .unwrap();
        assert_eq!(png_dimensions(&report.folder.join("128.png")), (128, 128));
    }

    #[test]
    fn manifest_is_identical_across_runs_and_sources() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let options = options_for(&[16, 32]);

        let a = generate(&square_source(16), first.path(), &options, None, &CancelToken::new())
            .unwrap();
        let b = generate(&square_source(48), second.path(), &options, None, &CancelToken::new())
            .unwrap();

        assert_eq!(fs::read(a.manifest).unwrap(), fs::read(b.manifest).unwrap());
    }

    #[test]
    fn parallel_run_matches_sequential_output() {
        let seq = TempDir::new().unwrap();
        let par = TempDir::new().unwrap();
        let source = square_source(64);
        let sequential = GenerateOptions::default();
        let parallel = GenerateOptions {
            threads: 4,
            ..GenerateOptions::default()
        };

        let a = generate(&source, seq.path(), &sequential, None, &CancelToken::new()).unwrap();
        let b = generate(&source, par.path(), &parallel, None, &CancelToken::new()).unwrap();

        assert_eq!(
            a.written.iter().map(|w| w.edge_length).collect::<Vec<_>>(),
            b.written.iter().map(|w| w.edge_length).collect::<Vec<_>>()
        );
        assert_eq!(file_names(&a.folder), file_names(&b.folder));
        for name in file_names(&a.folder) {
            assert_eq!(
                fs::read(a.folder.join(&name)).unwrap(),
                fs::read(b.folder.join(&name)).unwrap(),
                "{name} differs"
            );
        }
    }

    #[test]
    fn duplicate_sizes_write_one_file() {
        let tmp = TempDir::new().unwrap();
        let options = options_for(&[16, 16]);
        let report =
            generate(&square_source(16), tmp.path(), &options, None, &CancelToken::new())
                .unwrap();

        assert_eq!(report.written.len(), 2);
        assert_eq!(
            file_names(&report.folder),
            vec!["16.png".to_string(), MANIFEST_FILENAME.to_string()]
        );
    }

    // =========================================================================
    // Fatal failures
    // =========================================================================

    #[test]
    fn folder_creation_failure_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        // The destination's parent is a regular file, so no folder can be made under it.
        let result = generate(
            &square_source(16),
            &blocker.join("icons"),
            &GenerateOptions::default(),
            None,
            &CancelToken::new(),
        );

        assert!(matches!(result, Err(PipelineError::FolderCreation { .. })));
        assert_eq!(file_names(tmp.path()), vec!["blocker".to_string()]);
    }

    #[test]
    fn destination_that_is_a_file_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not-a-dir");
        fs::write(&file, "").unwrap();

        let result = generate(
            &square_source(16),
            &file,
            &GenerateOptions::default(),
            None,
            &CancelToken::new(),
        );
        assert!(matches!(
            result,
            Err(PipelineError::DestinationUnavailable(_))
        ));
    }

    #[test]
    fn manifest_failure_aborts_before_any_png() {
        let tmp = TempDir::new().unwrap();
        let folder = tmp.path().join("AppIcon.appiconset");
        fs::create_dir_all(folder.join(MANIFEST_FILENAME)).unwrap();

        let backend = MockBackend::new();
        let result = generate_with_backend(
            &backend,
            &square_source(16),
            tmp.path(),
            &GenerateOptions::default(),
            None,
            &CancelToken::new(),
        );

        assert!(matches!(result, Err(PipelineError::ManifestWrite { .. })));
        assert!(backend.get_operations().is_empty());
        assert_eq!(file_names(&folder), vec![MANIFEST_FILENAME.to_string()]);
    }

    #[test]
    fn non_square_source_rejected() {
        let tmp = TempDir::new().unwrap();
        let source = SourceImage::from_rgba(RgbaImage::new(32, 16));
        let result = generate(
            &source,
            tmp.path(),
            &GenerateOptions::default(),
            None,
            &CancelToken::new(),
        );

        assert!(matches!(
            result,
            Err(PipelineError::NonSquareSource {
                width: 32,
                height: 16
            })
        ));
        assert!(file_names(tmp.path()).is_empty());
    }

    #[test]
    fn empty_source_is_missing() {
        let tmp = TempDir::new().unwrap();
        let source = SourceImage::from_rgba(RgbaImage::new(0, 0));
        let result = generate(
            &source,
            tmp.path(),
            &GenerateOptions::default(),
            None,
            &CancelToken::new(),
        );
        assert!(matches!(result, Err(PipelineError::SourceMissing)));
    }

    // =========================================================================
    // Per-size failures
    // =========================================================================

    #[test]
    fn one_failing_size_does_not_stop_the_rest() {
        let tmp = TempDir::new().unwrap();
        let report = generate_with_backend(
            &ZeroSizedAt(57),
            &square_source(32),
            tmp.path(),
            &GenerateOptions::default(),
            None,
            &CancelToken::new(),
        )
        .unwrap();

        let catalog = SizeCatalog::standard();
        assert_eq!(report.outcome(), GenerationOutcome::Partial);
        assert_eq!(report.failed_sizes(), vec![57]);
        assert!(matches!(
            report.failures[0].error,
            AssetError::Encoding(BackendError::Encoding(_))
        ));
        assert_eq!(report.written.len(), catalog.len() - 1);

        let names = file_names(&report.folder);
        assert_eq!(names.len(), catalog.len()); // n - 1 PNGs + manifest
        assert!(names.contains(&MANIFEST_FILENAME.to_string()));
        assert!(!names.contains(&"57.png".to_string()));
    }

    #[test]
    fn failures_collected_in_catalog_order_under_parallel_run() {
        let tmp = TempDir::new().unwrap();
        let options = GenerateOptions {
            threads: 4,
            ..GenerateOptions::default()
        };
        let report = generate_with_backend(
            &ZeroSizedAt(57),
            &square_source(32),
            tmp.path(),
            &options,
            None,
            &CancelToken::new(),
        )
        .unwrap();

        let catalog = SizeCatalog::standard();
        assert_eq!(report.outcome(), GenerationOutcome::Partial);
        assert_eq!(report.failed_sizes(), vec![57]);
        let expected: Vec<u32> = catalog
            .edge_lengths()
            .into_iter()
            .filter(|&e| e != 57)
            .collect();
        assert_eq!(
            report.written.iter().map(|w| w.edge_length).collect::<Vec<_>>(),
            expected
        );
        assert_eq!(file_names(&report.folder).len(), catalog.len());
    }

    #[test]
    fn several_failures_keep_catalog_order_under_parallel_run() {
        let tmp = TempDir::new().unwrap();
        let folder = tmp.path().join("AppIcon.appiconset");
        // A directory in the way makes the write of that size fail.
        for blocked in ["1024.png", "16.png", "180.png"] {
            fs::create_dir_all(folder.join(blocked)).unwrap();
        }
        let options = GenerateOptions {
            threads: 4,
            ..GenerateOptions::default()
        };

        let report =
            generate(&square_source(32), tmp.path(), &options, None, &CancelToken::new())
                .unwrap();

        assert_eq!(report.failed_sizes(), vec![16, 180, 1024]);
        assert_eq!(report.written.len(), SizeCatalog::standard().len() - 3);
    }

    #[test]
    fn write_failure_is_recorded_per_size() {
        let tmp = TempDir::new().unwrap();
        let folder = tmp.path().join("AppIcon.appiconset");
        fs::create_dir_all(folder.join("32.png")).unwrap();

        let report = generate(
            &square_source(16),
            tmp.path(),
            &options_for(&[16, 32, 64]),
            None,
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(report.failed_sizes(), vec![32]);
        assert!(matches!(report.failures[0].error, AssetError::Write { .. }));
        assert_eq!(report.written.len(), 2);
    }

    #[test]
    fn mock_backend_sees_every_size_in_order() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        generate_with_backend(
            &backend,
            &square_source(8),
            tmp.path(),
            &GenerateOptions::default(),
            None,
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(
            backend.resized_edges(),
            SizeCatalog::standard().edge_lengths()
        );
    }

    // =========================================================================
    // Cancellation and events
    // =========================================================================

    #[test]
    fn cancelled_before_start_skips_every_size() {
        let tmp = TempDir::new().unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();

        let report = generate(
            &square_source(16),
            tmp.path(),
            &options_for(&[16, 32]),
            None,
            &cancel,
        )
        .unwrap();

        assert_eq!(report.outcome(), GenerationOutcome::Cancelled);
        assert_eq!(report.skipped, vec![16, 32]);
        assert_eq!(
            file_names(&report.folder),
            vec![MANIFEST_FILENAME.to_string()]
        );
    }

    #[test]
    fn cancel_mid_run_finishes_current_size_only() {
        let tmp = TempDir::new().unwrap();
        let cancel = CancelToken::new();
        let backend = CancelOnFirstResize(cancel.clone());

        let report = generate_with_backend(
            &backend,
            &square_source(16),
            tmp.path(),
            &options_for(&[16, 32, 64]),
            None,
            &cancel,
        )
        .unwrap();

        assert_eq!(report.written.len(), 1);
        assert_eq!(report.skipped, vec![32, 64]);
    }

    #[test]
    fn events_follow_pipeline_order() {
        let tmp = TempDir::new().unwrap();
        let (tx, rx) = mpsc::channel();
        generate_with_backend(
            &ZeroSizedAt(32),
            &square_source(16),
            tmp.path(),
            &options_for(&[16, 32]),
            Some(tx),
            &CancelToken::new(),
        )
        .unwrap();

        let events: Vec<GenerateEvent> = rx.iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], GenerateEvent::FolderCreated { .. }));
        assert!(matches!(
            events[1],
            GenerateEvent::ManifestWritten { records: 3, .. }
        ));
        assert_eq!(
            events[2],
            GenerateEvent::IconWritten {
                edge_length: 16,
                pixels: 8
            }
        );
        assert!(matches!(
            events[3],
            GenerateEvent::IconFailed {
                edge_length: 32,
                ..
            }
        ));
    }

    // =========================================================================
    // Completion messages
    // =========================================================================

    #[test]
    fn completion_success_only_when_complete() {
        let tmp = TempDir::new().unwrap();
        let ok = generate(
            &square_source(16),
            tmp.path(),
            &options_for(&[16]),
            None,
            &CancelToken::new(),
        );
        let completion = Completion::from_result(&ok);
        assert!(completion.success);
        assert!(completion.message.starts_with("Icon set created: 1 icons"));
    }

    #[test]
    fn completion_lists_failed_sizes() {
        let tmp = TempDir::new().unwrap();
        let partial = generate_with_backend(
            &ZeroSizedAt(32),
            &square_source(16),
            tmp.path(),
            &options_for(&[16, 32]),
            None,
            &CancelToken::new(),
        );
        let completion = Completion::from_result(&partial);
        assert!(!completion.success);
        assert_eq!(completion.message, "Icon set incomplete: 1 of 2 icons failed (32)");
    }

    #[test]
    fn cancelled_completion_still_lists_failed_sizes() {
        let tmp = TempDir::new().unwrap();
        let cancel = CancelToken::new();
        let report = generate_with_backend(
            &FailAndCancel(cancel.clone()),
            &square_source(16),
            tmp.path(),
            &options_for(&[16, 32, 64]),
            None,
            &cancel,
        )
        .unwrap();

        assert_eq!(report.outcome(), GenerationOutcome::Cancelled);
        let completion = Completion::from_report(&report);
        assert!(!completion.success);
        assert_eq!(
            completion.message,
            "Icon set generation cancelled after 1 of 3 icons (1 failed: 16)"
        );
    }

    #[test]
    fn cancelled_completion_without_failures() {
        let tmp = TempDir::new().unwrap();
        let cancel = CancelToken::new();
        let report = generate_with_backend(
            &CancelOnFirstResize(cancel.clone()),
            &square_source(16),
            tmp.path(),
            &options_for(&[16, 32]),
            None,
            &cancel,
        )
        .unwrap();

        assert_eq!(
            Completion::from_report(&report).message,
            "Icon set generation cancelled after 1 of 2 icons"
        );
    }

    #[test]
    fn completion_reports_fatal_error() {
        let completion = Completion::from_result(&Err(PipelineError::SourceMissing));
        assert!(!completion.success);
        assert_eq!(
            completion.message,
            "Icon set generation failed: No source image selected"
        );
        assert_eq!(
            Completion::from_result(&Err(PipelineError::DestinationMissing)).message,
            "Icon set generation failed: No destination folder selected"
        );
    }

    #[test]
    fn options_from_config() {
        let config = IconConfig {
            sizes: Some(vec![16, 1024]),
            folder_name: "Mac.appiconset".into(),
            ..IconConfig::default()
        };
        let options = GenerateOptions::from_config(&config).unwrap();
        assert_eq!(options.catalog.edge_lengths(), vec![16, 1024]);
        assert_eq!(options.folder_name, "Mac.appiconset");
        assert_eq!(options.threads, 1);
    }
}
