use crate::core::extractor::CommentSource;
use crate::utils::batch_processor::{BatchError, BatchProcessor, BatchReport, Progress};
use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A batch running on a blocking worker thread.
///
/// Only progress updates and the final report cross back to the caller.
pub struct BatchHandle {
    progress: watch::Receiver<Progress>,
    task: JoinHandle<Result<BatchReport, BatchError>>,
}

/// Hand a batch to tokio's blocking pool. Must be called inside a runtime.
pub fn spawn_batch<S>(processor: BatchProcessor<S>, inputs: Vec<PathBuf>, output: PathBuf) -> BatchHandle
where
    S: CommentSource + Send + 'static,
{
    let initial = Progress {
        completed: 0,
        total: inputs.len(),
    };
    let (tx, rx) = watch::channel(initial);

    let task = tokio::task::spawn_blocking(move || {
        processor.run(&inputs, &output, |p| {
            // The receiver may already be gone; progress is best effort.
            let _ = tx.send(p);
        })
    });

    BatchHandle { progress: rx, task }
}

impl BatchHandle {
    /// Latest progress reported by the worker.
    pub fn progress(&self) -> Progress {
        *self.progress.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn join(self) -> Result<Result<BatchReport, BatchError>> {
        self.task
            .await
            .map_err(|e| anyhow::anyhow!("batch worker failed: {}", e))
    }
}
