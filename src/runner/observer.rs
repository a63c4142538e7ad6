//! Collaborator callback surface
//!
//! The batch runner reports through a [`BatchObserver`]. A UI implements it
//! directly; [`ChannelObserver`] turns the callbacks into a [`BatchEvent`]
//! stream for callers that prefer to poll.

use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use crate::models::BatchEvent;

/// Receives batch progress as it happens
///
/// All methods default to no-ops. Calls for one item are always complete
/// before any call for the next item.
pub trait BatchObserver: Send + Sync {
    /// A script is about to run: `Running: <display name>`
    fn on_status(&self, _text: &str) {}

    /// Text for the output view
    fn on_output_append(&self, _text: &str) {}

    /// Completed fraction after each item, ending at 1.0
    fn on_progress(&self, _fraction: f64) {}

    /// Disable run-triggering affordances
    fn on_batch_start(&self) {}

    /// Re-enable run-triggering affordances
    fn on_batch_end(&self) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl BatchObserver for NullObserver {}

/// Forwards callbacks into an unbounded channel
///
/// `Finished` is not produced here; the task that owns the batch sends it once
/// the summary exists.
pub struct ChannelObserver {
    tx: UnboundedSender<BatchEvent>,
    total: usize,
}

impl ChannelObserver {
    pub fn new(tx: UnboundedSender<BatchEvent>, total: usize) -> Self {
        Self { tx, total }
    }

    fn send(&self, event: BatchEvent) {
        // Receiver gone means nobody is listening any more
        let _ = self.tx.send(event);
    }
}

impl BatchObserver for ChannelObserver {
    fn on_status(&self, text: &str) {
        self.send(BatchEvent::Status(text.to_string()));
    }

    fn on_output_append(&self, text: &str) {
        self.send(BatchEvent::Output(text.to_string()));
    }

    fn on_progress(&self, fraction: f64) {
        self.send(BatchEvent::Progress(fraction));
    }

    fn on_batch_start(&self) {
        self.send(BatchEvent::Started { total: self.total });
    }
}

/// Records every callback in order; handy for tests and headless callers
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<BatchEvent>>,
    started: Mutex<usize>,
    ended: Mutex<usize>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far
    pub fn events(&self) -> Vec<BatchEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// How many times `on_batch_start` was called
    pub fn start_count(&self) -> usize {
        self.started.lock().map(|n| *n).unwrap_or_default()
    }

    /// How many times `on_batch_end` was called
    pub fn end_count(&self) -> usize {
        self.ended.lock().map(|n| *n).unwrap_or_default()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BatchEvent::Status(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn outputs(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BatchEvent::Output(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<f64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BatchEvent::Progress(fraction) => Some(fraction),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: BatchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl BatchObserver for RecordingObserver {
    fn on_status(&self, text: &str) {
        self.push(BatchEvent::Status(text.to_string()));
    }

    fn on_output_append(&self, text: &str) {
        self.push(BatchEvent::Output(text.to_string()));
    }

    fn on_progress(&self, fraction: f64) {
        self.push(BatchEvent::Progress(fraction));
    }

    fn on_batch_start(&self) {
        if let Ok(mut started) = self.started.lock() {
            *started += 1;
        }
    }

    fn on_batch_end(&self) {
        if let Ok(mut ended) = self.ended.lock() {
            *ended += 1;
        }
    }
}
