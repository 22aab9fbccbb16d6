// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only message history.
//!
//! Messages are stored behind `Arc`s, so appending never copies existing
//! entries and [`MessageStore::snapshot`] copies pointers only. A snapshot
//! is never disturbed by later appends or by `clear`.

use std::ops::Deref;
use std::sync::Arc;

use crate::message::Message;

/// An immutable view of the message history at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSnapshot(Arc<[Arc<Message>]>);

impl MessageSnapshot {
    pub fn as_slice(&self) -> &[Arc<Message>] {
        &self.0
    }
}

impl Default for MessageSnapshot {
    fn default() -> Self {
        MessageSnapshot(Arc::from(Vec::new()))
    }
}

impl Deref for MessageSnapshot {
    type Target = [Arc<Message>];

    fn deref(&self) -> &[Arc<Message>] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a MessageSnapshot {
    type Item = &'a Arc<Message>;
    type IntoIter = std::slice::Iter<'a, Arc<Message>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Ordered history of the current session.
///
/// Insertion order is the display order. Entries are never reordered,
/// deduplicated, or edited once appended.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Arc<Message>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(Arc::new(message));
    }

    /// Empties the history. Snapshots taken earlier keep their contents.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn snapshot(&self) -> MessageSnapshot {
        MessageSnapshot(Arc::from(self.messages.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last().map(Arc::as_ref)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
