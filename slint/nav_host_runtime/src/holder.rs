//! Routes command batches to whichever navigator is currently attached.

use crate::command::Command;
use crate::error::BatchError;
use std::collections::VecDeque;
use tracing::{debug, warn};

pub const DEFAULT_PENDING_BATCH_CAP: usize = 64;

/// Anything that can receive a command batch.
pub trait CommandSink {
    fn apply_commands(&mut self, batch: &[Command]) -> Result<(), BatchError>;
}

/// Attach point for the active navigator. At most one is attached at a time.
pub trait NavigatorHolder {
    fn set_navigator(&mut self, navigator: Box<dyn CommandSink>) -> Result<(), BatchError>;

    fn remove_navigator(&mut self) -> Option<Box<dyn CommandSink>>;
}

/// Holder that queues batches while no navigator is attached.
///
/// Queued batches are replayed in arrival order on attach. The queue is
/// bounded; when full the oldest batch is dropped.
pub struct CommandBuffer {
    navigator: Option<Box<dyn CommandSink>>,
    pending: VecDeque<Vec<Command>>,
    capacity: usize,
    dropped: u64,
}

impl CommandBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            navigator: None,
            pending: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.navigator.is_some()
    }

    pub fn pending_batches(&self) -> usize {
        self.pending.len()
    }

    pub fn dropped_batches(&self) -> u64 {
        self.dropped
    }

    /// Apply `batch` now, or queue it until a navigator is attached.
    ///
    /// Batches still queued from an earlier failed replay are applied first,
    /// so `batch` never overtakes them. Returns `Ok(true)` when the batch was
    /// applied and `Ok(false)` when it was queued.
    pub fn execute(&mut self, batch: Vec<Command>) -> Result<bool, BatchError> {
        self.enqueue(batch);
        if !self.is_attached() {
            return Ok(false);
        }

        self.drain_pending().map(|()| true)
    }

    fn enqueue(&mut self, batch: Vec<Command>) {
        if self.pending.len() >= self.capacity {
            self.pending.pop_front();
            self.dropped += 1;
            if self.dropped == 1 || self.dropped.is_power_of_two() {
                warn!(
                    capacity = self.capacity,
                    dropped = self.dropped,
                    "pending navigation queue full; dropped oldest batch"
                );
            }
        }
        self.pending.push_back(batch);
    }

    fn drain_pending(&mut self) -> Result<(), BatchError> {
        let Some(navigator) = self.navigator.as_mut() else {
            return Ok(());
        };

        while let Some(batch) = self.pending.pop_front() {
            debug!(remaining = self.pending.len(), "applying queued navigation batch");
            navigator.apply_commands(&batch)?;
        }

        Ok(())
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_PENDING_BATCH_CAP)
    }
}

impl NavigatorHolder for CommandBuffer {
    /// Attach `navigator` and replay queued batches. A failing batch is
    /// consumed; the batches after it stay queued and replay ahead of the
    /// next executed batch.
    fn set_navigator(&mut self, navigator: Box<dyn CommandSink>) -> Result<(), BatchError> {
        self.navigator = Some(navigator);
        self.drain_pending()
    }

    fn remove_navigator(&mut self) -> Option<Box<dyn CommandSink>> {
        self.navigator.take()
    }
}
