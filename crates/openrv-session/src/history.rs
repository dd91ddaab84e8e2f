//! Undo/redo history shared by every editable part of the session.
//!
//! - One undo stack and one redo stack, in strict commit order across
//!   color, transform, annotation and playback-parameter edits
//! - Committing after an undo clears the redo stack (linear history)
//! - Scalar edits that arrive in quick succession (dragging an exposure
//!   slider) are held in a pending slot and merged, so one undo reverts the
//!   whole drag
//!
//! The manager never touches session state directly; every forward, inverse
//! and rollback goes through [`CommandTarget`].

use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::command::{CommandTarget, SessionCommand};

/// A committed history entry.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub command: SessionCommand,
    /// Label shown in the history panel.
    pub label: String,
}

impl HistoryEntry {
    fn new(command: SessionCommand) -> Self {
        Self {
            label: command.label(),
            command,
        }
    }
}

/// A debounced edit that has been applied to live state but not committed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommand {
    /// Net change from before the burst to the latest value.
    pub command: SessionCommand,
    /// The burst closes when no further edit arrives before this instant.
    pub deadline: Instant,
}

/// Undo/redo history with debounced coalescing of scalar edits.
#[derive(Debug)]
pub struct HistoryManager {
    /// Commands that have been executed (most recent last).
    undo_stack: Vec<HistoryEntry>,
    /// Commands that have been undone (most recent last).
    redo_stack: Vec<HistoryEntry>,
    pending: Option<PendingCommand>,
    /// Maximum history depth.
    max_depth: usize,
    /// Coalescing window, measured from the most recent edit of a burst.
    window: Duration,
}

impl HistoryManager {
    pub fn new(max_depth: usize, window: Duration) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending: None,
            max_depth: max_depth.max(1),
            window,
        }
    }

    /// Apply `command` and commit it immediately. Any pending burst is
    /// committed first so entries stay in chronological order.
    pub fn commit(&mut self, command: SessionCommand, target: &mut impl CommandTarget) {
        self.flush();
        target.apply_command(&command);
        self.push(command);
    }

    /// Apply `command` now and commit it once its burst ends. Commands that
    /// do not coalesce are committed straight away.
    pub fn record(&mut self, command: SessionCommand, target: &mut impl CommandTarget, now: Instant) {
        let Some(key) = command.coalesce_key() else {
            self.commit(command, target);
            return;
        };

        target.apply_command(&command);
        let deadline = now + self.window;

        if let Some(pending) = self.pending.as_mut() {
            if pending.command.coalesce_key() == Some(key) && now < pending.deadline {
                if let Some(merged) = pending.command.merge(&command) {
                    pending.command = merged;
                    pending.deadline = deadline;
                    return;
                }
            }
        }

        self.flush();
        self.pending = Some(PendingCommand { command, deadline });
    }

    /// Commit the pending burst if its window has closed by `now`.
    pub fn flush_expired(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.flush(),
            _ => false,
        }
    }

    /// Commit the pending burst regardless of its deadline.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                self.push(pending.command);
                true
            }
            None => false,
        }
    }

    /// Revert the most recent change. Returns false when there is nothing to
    /// undo.
    ///
    /// A pending burst is the most recent change: it is rolled back and
    /// discarded without ever reaching the stack.
    pub fn undo(&mut self, target: &mut impl CommandTarget) -> bool {
        if self.discard_pending(target) {
            return true;
        }
        let Some(entry) = self.undo_stack.pop() else {
            return false;
        };
        target.apply_command(&entry.command.inverse());
        debug!(
            label = %entry.label,
            undo_remaining = self.undo_stack.len(),
            "Undo"
        );
        self.redo_stack.push(entry);
        true
    }

    /// Re-apply the most recently undone change. Returns false when there is
    /// nothing to redo. A pending burst is rolled back and discarded first.
    pub fn redo(&mut self, target: &mut impl CommandTarget) -> bool {
        let discarded = self.discard_pending(target);
        let Some(entry) = self.redo_stack.pop() else {
            return discarded;
        };
        target.apply_command(&entry.command);
        debug!(
            label = %entry.label,
            redo_remaining = self.redo_stack.len(),
            "Redo"
        );
        self.undo_stack.push(entry);
        true
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.pending.is_some() || !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps available on the stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Committed entries listed in the history panel (done and undone).
    pub fn entry_count(&self) -> usize {
        self.undo_count() + self.redo_count()
    }

    /// Panel labels, oldest first: executed entries followed by undone ones.
    pub fn labels(&self) -> Vec<String> {
        self.undo_stack
            .iter()
            .chain(self.redo_stack.iter().rev())
            .map(|e| e.label.clone())
            .collect()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.label.as_str())
    }

    pub fn pending(&self) -> Option<&PendingCommand> {
        self.pending.as_ref()
    }

    /// Clear all history, dropping any pending burst without applying it.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending = None;
        debug!("History cleared");
    }

    fn discard_pending(&mut self, target: &mut impl CommandTarget) -> bool {
        match self.pending.take() {
            Some(pending) => {
                target.apply_command(&pending.command.inverse());
                warn!(label = %pending.command.label(), "Pending edit discarded");
                true
            }
            None => false,
        }
    }

    fn push(&mut self, command: SessionCommand) {
        if command.is_noop() {
            debug!(?command, "No-op command not recorded");
            return;
        }
        self.redo_stack.clear();
        self.undo_stack.push(HistoryEntry::new(command));
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        debug!(
            label = self.undo_label().unwrap_or_default(),
            undo_depth = self.undo_stack.len(),
            "History entry pushed"
        );
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(
            openrv_core::defaults::HISTORY_DEPTH,
            Duration::from_millis(openrv_core::defaults::DEBOUNCE_WINDOW_MS),
        )
    }
}
