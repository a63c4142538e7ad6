//! Batch runner
//!
//! Works through a list of scripts one at a time. Scripts may depend on each
//! other's side effects on the host, so there is never more than one child
//! process per runner. A failing script never stops the batch.
//!
//! Per item the observer sees, in order:
//!
//! 1. `on_status("Running: <name>")`
//! 2. `on_output_append(">>> Running <path>")`
//! 3. `on_output_append(<combined output>)`
//! 4. `on_progress(done / total)`
//!
//! bracketed by one `on_batch_start` / `on_batch_end` pair for the batch.
//! Cancellation is checked between items only; a script that has started is
//! always awaited to completion.

pub mod observer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::audit::AuditLog;
use crate::error::{Error, Result};
use crate::execution::ScriptExecutor;
use crate::models::batch::progress_fraction;
use crate::models::{BatchEvent, BatchItem, BatchSummary};

pub use observer::{BatchObserver, ChannelObserver, NullObserver, RecordingObserver};

/// Sequences batch items through a [`ScriptExecutor`]
pub struct BatchRunner {
    executor: Arc<dyn ScriptExecutor>,
    audit: Arc<AuditLog>,
    running: AtomicBool,
}

impl BatchRunner {
    pub fn new(executor: Arc<dyn ScriptExecutor>, audit: Arc<AuditLog>) -> Self {
        Self {
            executor,
            audit,
            running: AtomicBool::new(false),
        }
    }

    /// Whether a batch is in progress on this runner
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run `items` in order, reporting to `observer`
    ///
    /// Fails only with [`Error::BatchAlreadyRunning`], in which case the
    /// observer receives nothing.
    pub async fn run_batch(
        &self,
        items: &[BatchItem],
        observer: &dyn BatchObserver,
        cancel: &CancellationToken,
    ) -> Result<BatchSummary> {
        let _guard = RunningGuard::acquire(&self.running).ok_or(Error::BatchAlreadyRunning)?;

        let total = items.len();
        let mut summary = BatchSummary::new(total);
        info!("Batch {} started with {} script(s)", summary.batch_id, total);
        self.audit.log(format!(
            "Batch {} started: {} script(s)",
            summary.batch_id, total
        ));
        observer.on_batch_start();

        for (index, item) in items.iter().enumerate() {
            if cancel.is_cancelled() {
                summary.mark_cancelled();
                warn!(
                    "Batch {} cancelled before {}",
                    summary.batch_id, item.display_name
                );
                self.audit.log(format!(
                    "Batch {} cancelled, {} script(s) not run",
                    summary.batch_id,
                    total - index
                ));
                break;
            }

            observer.on_status(&format!("Running: {}", item.display_name));
            observer.on_output_append(&format!(">>> Running {}", item.path.display()));
            self.audit.log(format!("Starting: {}", item.path.display()));

            let result = self.executor.run(&item.path).await;

            observer.on_output_append(&result.combined_output);
            self.audit.log(format!(
                "Completed: {} - ExitCode {}",
                item.path.display(),
                result.exit_code
            ));
            if !result.is_success() {
                debug!(
                    "{} failed with exit code {}, continuing",
                    item.display_name, result.exit_code
                );
            }

            summary.record(result.exit_code);
            observer.on_progress(progress_fraction(index + 1, total));
        }

        summary.mark_finished();
        info!(
            "Batch {} finished: {} run, {} failed{}",
            summary.batch_id,
            summary.completed,
            summary.failed,
            if summary.cancelled { ", cancelled" } else { "" }
        );
        self.audit.log(format!(
            "Batch {} finished: {} run, {} failed",
            summary.batch_id, summary.completed, summary.failed
        ));
        observer.on_batch_end();

        Ok(summary)
    }

    /// Run `items` on a background task and stream its events
    ///
    /// The stream ends with [`BatchEvent::Finished`] unless the batch was
    /// rejected, in which case it closes empty and the handle carries the error.
    pub fn spawn_batch(
        self: &Arc<Self>,
        items: Vec<BatchItem>,
        cancel: CancellationToken,
    ) -> (UnboundedReceiver<BatchEvent>, JoinHandle<Result<BatchSummary>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let observer = ChannelObserver::new(tx.clone(), items.len());
            let summary = runner.run_batch(&items, &observer, &cancel).await?;
            let _ = tx.send(BatchEvent::Finished(summary.clone()));
            Ok(summary)
        });

        (rx, handle)
    }
}

/// Holds the runner's busy flag for the lifetime of one batch
struct RunningGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
