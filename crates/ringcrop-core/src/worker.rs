//! Background thread for the slow parts: decoding sources and commit renders.
//!
//! The caller keeps all session state on its own thread, ships owned jobs over
//! a channel and polls for results.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use image::DynamicImage;
use tracing::{debug, warn};

use crate::editor::{CommitJob, RenderedCommit};
use crate::error::{CropperError, Result};
use crate::render::{decode_with_orientation, ImageInput};

/// Commands sent from the caller to the worker thread.
pub enum WorkerCommand {
    /// Decode and orient a source image.
    Decode { input: ImageInput },
    /// Render and encode a committed crop.
    Commit { job: CommitJob },
}

/// Results sent from the worker thread back to the caller.
pub enum WorkerResult {
    Decoded {
        source_id: String,
        image: DynamicImage,
    },
    Rendered(RenderedCommit),
    Error {
        source_id: String,
        error: CropperError,
    },
}

/// Handle to the worker thread. Dropping it stops the thread once queued work is done.
pub struct RenderWorker {
    cmd_tx: Option<mpsc::Sender<WorkerCommand>>,
    result_rx: mpsc::Receiver<WorkerResult>,
    handle: Option<JoinHandle<()>>,
}

impl RenderWorker {
    pub fn spawn() -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (result_tx, result_rx) = mpsc::channel::<WorkerResult>();

        let handle = std::thread::Builder::new()
            .name("ringcrop-worker".into())
            .spawn(move || worker_loop(cmd_rx, result_tx))?;

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            result_rx,
            handle: Some(handle),
        })
    }

    pub fn submit(&self, command: WorkerCommand) -> Result<()> {
        self.cmd_tx
            .as_ref()
            .ok_or(CropperError::WorkerDisconnected)?
            .send(command)
            .map_err(|_| CropperError::WorkerDisconnected)
    }

    /// Non-blocking poll.
    pub fn try_recv(&self) -> Option<WorkerResult> {
        self.result_rx.try_recv().ok()
    }

    /// Wait up to `timeout`; `Ok(None)` on timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<WorkerResult>> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => Ok(Some(result)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(CropperError::WorkerDisconnected),
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.cmd_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Render worker panicked");
            }
        }
    }
}

fn worker_loop(cmd_rx: mpsc::Receiver<WorkerCommand>, result_tx: mpsc::Sender<WorkerResult>) {
    while let Ok(cmd) = cmd_rx.recv() {
        let result = match cmd {
            WorkerCommand::Decode { input } => {
                match decode_with_orientation(&input.bytes, input.path.as_deref()) {
                    Ok(image) => WorkerResult::Decoded {
                        source_id: input.source_id,
                        image,
                    },
                    Err(error) => WorkerResult::Error {
                        source_id: input.source_id,
                        error,
                    },
                }
            }
            WorkerCommand::Commit { job } => match job.run() {
                Ok(rendered) => WorkerResult::Rendered(rendered),
                Err(error) => WorkerResult::Error {
                    source_id: job.source_id,
                    error,
                },
            },
        };

        if result_tx.send(result).is_err() {
            break;
        }
    }
    debug!("Render worker exiting");
}
