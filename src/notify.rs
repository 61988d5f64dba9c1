//! Change Notifier
//!
//! Tracks batch depth and the pending change set. The notifier decides *when*
//! an aggregated event is due; the resolver owns the listeners and performs
//! the dispatch.
//!
//! States: Idle, Batching(n), Notifying. Changes recorded while Idle produce
//! an event right away. Changes recorded while Batching are merged (last write
//! wins) and released when the outermost batch closes. Changes recorded while
//! Notifying, from a listener that mutates settings, are queued and released
//! once the current dispatch finishes.

use crate::value::Value;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::warn;

/// Changed option names and their final values.
pub type Changes = BTreeMap<String, Value>;

/// One aggregated change notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub ts: String,
    pub changes: Changes,
}

impl ChangeEvent {
    pub fn with_now(changes: Changes) -> Self {
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            changes,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.changes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.changes.contains_key(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierState {
    Idle,
    Batching(usize),
    Notifying,
}

#[derive(Debug, Default)]
pub struct ChangeNotifier {
    depth: usize,
    dispatching: bool,
    pending: Changes,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NotifierState {
        if self.dispatching {
            NotifierState::Notifying
        } else if self.depth > 0 {
            NotifierState::Batching(self.depth)
        } else {
            NotifierState::Idle
        }
    }

    pub fn begin_batch(&mut self) {
        self.depth += 1;
    }

    /// Close one batch level; the outermost close releases the pending set.
    pub fn end_batch(&mut self) -> Option<ChangeEvent> {
        if self.depth == 0 {
            warn!("end_batch called without an open batch");
            return None;
        }
        self.depth -= 1;
        self.release()
    }

    pub fn record(&mut self, name: impl Into<String>, value: Value) -> Option<ChangeEvent> {
        self.pending.insert(name.into(), value);
        self.release()
    }

    pub fn record_all(&mut self, changes: Changes) -> Option<ChangeEvent> {
        if changes.is_empty() {
            return None;
        }
        self.pending.extend(changes);
        self.release()
    }

    pub fn begin_dispatch(&mut self) {
        self.dispatching = true;
    }

    /// Finish a dispatch; returns the follow-up event for changes queued by
    /// listeners, if no batch is still open.
    pub fn end_dispatch(&mut self) -> Option<ChangeEvent> {
        self.dispatching = false;
        self.release()
    }

    fn release(&mut self) -> Option<ChangeEvent> {
        if self.depth > 0 || self.dispatching || self.pending.is_empty() {
            return None;
        }
        Some(ChangeEvent::with_now(std::mem::take(&mut self.pending)))
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Channel endpoint for consumers that prefer polling over callbacks.
#[derive(Clone)]
pub struct ChangeBus {
    sender: Sender<ChangeEvent>,
}

impl ChangeBus {
    pub fn new_pair() -> (Self, Receiver<ChangeEvent>) {
        let (sender, receiver) = channel();
        (Self { sender }, receiver)
    }

    /// Forward an event; a dropped receiver is not an error for the sender.
    pub fn emit(&self, event: &ChangeEvent) -> bool {
        self.sender.send(event.clone()).is_ok()
    }
}
