use std::collections::VecDeque;

use telemon_types::service_types::NotificationMessage;
use telemon_types::{DateTime, StatusCode};

/// A sent notification message retained until the client acknowledges it or
/// it ages out of the queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationMessageEntry {
    pub sequence_number: u32,
    pub publish_time: DateTime,
    pub notification: NotificationMessage,
}

/// Sent-but-unacknowledged notification messages, newest at the head. When
/// the server-global cap is reached the oldest entry is evicted on insert;
/// an old unacknowledged message is assumed stale.
#[derive(Debug, Default, Serialize)]
pub struct RetransmissionQueue {
    entries: VecDeque<NotificationMessageEntry>,
}

impl RetransmissionQueue {
    pub fn new() -> RetransmissionQueue {
        RetransmissionQueue {
            entries: VecDeque::new(),
        }
    }

    /// Insert at the head. `max_size` is the server-global cap; 0 leaves the
    /// queue unbounded.
    pub fn insert(&mut self, entry: NotificationMessageEntry, max_size: usize) {
        if max_size > 0 && self.entries.len() >= max_size {
            if let Some(evicted) = self.entries.pop_back() {
                debug!(
                    "Retransmission queue at capacity, evicted sequence number {}",
                    evicted.sequence_number
                );
            }
        }
        self.entries.push_front(entry);
    }

    /// Release the entry matching `sequence_number`. Sequence numbers wrap,
    /// so the match is by equality; the scan is linear because the queue is
    /// small in practice (a map keyed by sequence number is a drop-in change
    /// if caps grow).
    pub fn acknowledge(&mut self, sequence_number: u32) -> StatusCode {
        match self
            .entries
            .iter()
            .position(|e| e.sequence_number == sequence_number)
        {
            Some(idx) => {
                let _ = self.entries.remove(idx);
                StatusCode::Good
            }
            None => StatusCode::BadSequenceNumberUnknown,
        }
    }

    /// Sequence numbers currently buffered, newest first, as reported in a
    /// publish response's available-sequence-number list.
    pub fn sequence_numbers(&self) -> Vec<u32> {
        self.entries.iter().map(|e| e.sequence_number).collect()
    }

    /// Find a buffered message, e.g. to serve a republish request.
    pub fn find(&self, sequence_number: u32) -> Option<&NotificationMessageEntry> {
        self.entries
            .iter()
            .find(|e| e.sequence_number == sequence_number)
    }

    /// Drop every entry. Called when the owning subscription is deleted.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
