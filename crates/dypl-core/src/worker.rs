//! Background dispatch: run one pipeline operation per worker thread and
//! stream its log lines and result back over a single-consumer channel.
//!
//! The presentation layer owns the `Receiver` and drains it on its own
//! thread; workers never touch presentation state. Only one operation runs at
//! a time: a second submit while busy is refused rather than queued.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::detail::VideoDetails;
use crate::error::{PipelineError, Result};
use crate::log_sink::{LogLine, LogSink};
use crate::pipeline::{DownloadReport, DownloadRequest, Pipeline};

/// Messages from a worker, in the order they happened.
#[derive(Debug)]
pub enum WorkerEvent {
    Log(LogLine),
    /// Completion of `submit_parse`; always the last event of that operation.
    Parsed(Result<VideoDetails>),
    /// Completion of `submit_download`; always the last event of that operation.
    Downloaded(Result<DownloadReport>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("another operation is still running")]
    Busy,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(String),
}

/// Log sink that forwards every line onto the event channel.
struct ChannelSink {
    tx: Sender<WorkerEvent>,
}

impl LogSink for ChannelSink {
    fn push(&self, line: LogLine) {
        // Receiver gone means the caller abandoned the result; keep running.
        let _ = self.tx.send(WorkerEvent::Log(line));
    }
}

/// Clears the busy flag when the worker finishes, panicking or not.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Dispatcher {
    pipeline: Pipeline,
    events: Sender<WorkerEvent>,
    busy: Arc<AtomicBool>,
}

impl Dispatcher {
    pub fn new(pipeline: Pipeline) -> (Self, Receiver<WorkerEvent>) {
        let (tx, rx) = mpsc::channel();
        let dispatcher = Self {
            pipeline,
            events: tx,
            busy: Arc::new(AtomicBool::new(false)),
        };
        (dispatcher, rx)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Runs `Pipeline::parse` on a worker thread.
    pub fn submit_parse(&self, share_text: String) -> std::result::Result<JoinHandle<()>, DispatchError> {
        self.spawn("dypl-parse", move |pipeline, sink| {
            let result = guarded(|| pipeline.parse(&share_text, sink));
            WorkerEvent::Parsed(result)
        })
    }

    /// Runs `Pipeline::download` on a worker thread.
    pub fn submit_download(
        &self,
        request: DownloadRequest,
    ) -> std::result::Result<JoinHandle<()>, DispatchError> {
        self.spawn("dypl-download", move |pipeline, sink| {
            let result = guarded(|| pipeline.download(&request, sink));
            WorkerEvent::Downloaded(result)
        })
    }

    fn spawn<F>(&self, name: &str, job: F) -> std::result::Result<JoinHandle<()>, DispatchError>
    where
        F: FnOnce(&Pipeline, &dyn LogSink) -> WorkerEvent + Send + 'static,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(DispatchError::Busy);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));
        let pipeline = self.pipeline.clone();
        let tx = self.events.clone();

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let sink = ChannelSink { tx: tx.clone() };
                let done = job(&pipeline, &sink);
                // Release before announcing completion so the consumer may submit again.
                drop(guard);
                let _ = tx.send(done);
            })
            .map_err(|e| {
                // The closure (and the guard inside it) was dropped; flag is clear.
                DispatchError::Spawn(e.to_string())
            })
    }
}

/// Runs `op`, converting a panic into `WorkerPanicked`.
fn guarded<T>(op: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(op)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::error!("pipeline worker panicked: {}", message);
        Err(PipelineError::WorkerPanicked(message))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
