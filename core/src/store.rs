//! Shared "task being edited" state.
//!
//! # Design
//! One mutable cell holding an [`EditedTask`], replaced wholesale on every
//! write and never partially mutated. The source system kept this in a
//! process-wide singleton; here it is an explicit, cloneable store created by
//! the composition root, with clones sharing the single cell. A `watch`
//! channel provides both the cell's storage and the subscription mechanism:
//! reads and writes are synchronous, while views that render the value can
//! await change notifications. The channel's internal lock gives writes a
//! total order, so two "simultaneous" updates resolve to whichever ran last.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

use crate::types::EditedTask;

/// Store holding exactly one [`EditedTask`], shared by all clones.
#[derive(Debug, Clone)]
pub struct EditedTaskStore {
    cell: Arc<watch::Sender<EditedTask>>,
}

impl EditedTaskStore {
    /// Create a store initialized to the sentinel `{id: 0, title: ""}`.
    pub fn new() -> Self {
        let (cell, _) = watch::channel(EditedTask::empty());
        Self {
            cell: Arc::new(cell),
        }
    }

    /// The current value, reflecting the most recent write from any clone.
    pub fn get(&self) -> EditedTask {
        self.cell.borrow().clone()
    }

    /// The current value with the sentinel made explicit: `None` when nothing
    /// is being edited.
    pub fn editing(&self) -> Option<EditedTask> {
        let value = self.get();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Replace the current value entirely with `payload`.
    ///
    /// No validation is performed; any payload is accepted. Subscribers are
    /// notified of the new value.
    pub fn update(&self, payload: EditedTask) {
        trace!(id = payload.id, "edited task replaced");
        self.cell.send_replace(payload);
    }

    /// Replace the current value with the sentinel.
    pub fn reset(&self) {
        self.update(EditedTask::empty());
    }

    /// Reactive read for views rendering the edited task: `borrow` for the
    /// current value, `changed().await` for update notifications.
    pub fn subscribe(&self) -> watch::Receiver<EditedTask> {
        self.cell.subscribe()
    }
}

impl Default for EditedTaskStore {
    fn default() -> Self {
        Self::new()
    }
}
