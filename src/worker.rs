//! Background execution of a generation run.
//!
//! A [`Worker`] runs one icon set at a time on its own thread so the calling
//! surface stays responsive. The result comes back exactly once through the
//! [`GenerationHandle`], after the manifest and every size were written or
//! attempted. While a run is in flight the worker reports itself busy and
//! refuses a second start.
//!
//! ```no_run
//! # use appicon::imaging::SourceImage;
//! # use appicon::pipeline::{Completion, GenerateOptions};
//! # use appicon::worker::{GenerationRequest, Worker};
//! # fn demo(source: SourceImage) -> Result<(), appicon::pipeline::PipelineError> {
//! let worker = Worker::new();
//! let handle = worker.start(
//!     GenerationRequest::new(Some(source), Some("out".into()), GenerateOptions::default()),
//!     None,
//! )?;
//! assert!(worker.is_busy());
//! let completion = Completion::from_result(&handle.wait());
//! println!("{}", completion.message);
//! # Ok(())
//! # }
//! ```

use crate::imaging::{IconBackend, RustBackend, SourceImage};
use crate::pipeline::{
    self, CancelToken, GenerateEvent, GenerateOptions, GenerationReport, PipelineError,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;

pub type RunResult = Result<GenerationReport, PipelineError>;

/// What the calling surface collected: a picked image and a picked folder.
///
/// Either may be absent when the user dismissed a picker.
pub struct GenerationRequest {
    pub source: Option<SourceImage>,
    pub destination: Option<PathBuf>,
    pub options: GenerateOptions,
}

impl GenerationRequest {
    pub fn new(
        source: Option<SourceImage>,
        destination: Option<PathBuf>,
        options: GenerateOptions,
    ) -> Self {
        Self {
            source,
            destination,
            options,
        }
    }
}

/// Clears the busy flag when the run ends, including by panic.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs generation requests on a background thread, one at a time.
#[derive(Debug, Clone, Default)]
pub struct Worker {
    busy: Arc<AtomicBool>,
}

impl Worker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run started by this worker is still in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Start a run with the production backend.
    pub fn start(
        &self,
        request: GenerationRequest,
        events: Option<Sender<GenerateEvent>>,
    ) -> Result<GenerationHandle, PipelineError> {
        self.start_with_backend(RustBackend::new(), request, events)
    }

    /// Start a run with a specific backend.
    ///
    /// Missing inputs are rejected here, before any thread is spawned.
    pub fn start_with_backend<B>(
        &self,
        backend: B,
        request: GenerationRequest,
        events: Option<Sender<GenerateEvent>>,
    ) -> Result<GenerationHandle, PipelineError>
    where
        B: IconBackend + Send + 'static,
    {
        let source = request.source.ok_or(PipelineError::SourceMissing)?;
        let destination = request
            .destination
            .ok_or(PipelineError::DestinationMissing)?;
        let options = request.options;

        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PipelineError::Busy);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let cancel = CancelToken::new();
        let (tx, rx) = mpsc::channel();
        let thread_cancel = cancel.clone();
        let thread = std::thread::Builder::new()
            .name("appicon-worker".into())
            .spawn(move || {
                let result = pipeline::generate_with_backend(
                    &backend,
                    &source,
                    &destination,
                    &options,
                    events,
                    &thread_cancel,
                );
                // Not busy any more by the time anyone sees the result.
                drop(guard);
                let _ = tx.send(result);
            })
            .map_err(PipelineError::WorkerSpawn)?;

        log::debug!("Started icon set worker");
        Ok(GenerationHandle {
            busy: Arc::clone(&self.busy),
            cancel,
            completion: rx,
            thread: Some(thread),
        })
    }
}

/// Handle to one in-flight run.
pub struct GenerationHandle {
    busy: Arc<AtomicBool>,
    cancel: CancelToken,
    completion: Receiver<RunResult>,
    thread: Option<JoinHandle<()>>,
}

impl GenerationHandle {
    /// Ask the run to stop before its next size.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Block until the run completes.
    pub fn wait(mut self) -> RunResult {
        let result = self
            .completion
            .recv()
            .unwrap_or(Err(PipelineError::WorkerPanicked));
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        result
    }

    /// Non-blocking poll. Yields the result once; `None` while running.
    pub fn try_wait(&mut self) -> Option<RunResult> {
        match self.completion.try_recv() {
            Ok(result) => {
                if let Some(thread) = self.thread.take() {
                    let _ = thread.join();
                }
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            // Only reachable if the worker died before sending.
            Err(TryRecvError::Disconnected) if self.thread.is_some() => {
                self.thread = None;
                Some(Err(PipelineError::WorkerPanicked))
            }
            Err(TryRecvError::Disconnected) => None,
        }
    }
}
