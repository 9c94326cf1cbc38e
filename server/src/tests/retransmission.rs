use telemon_types::service_types::NotificationMessage;
use telemon_types::{DateTime, StatusCode};

use crate::subscriptions::retransmission::{NotificationMessageEntry, RetransmissionQueue};

fn make_entry(sequence_number: u32) -> NotificationMessageEntry {
    let publish_time = DateTime::now();
    NotificationMessageEntry {
        sequence_number,
        publish_time,
        notification: NotificationMessage::data_change(sequence_number, publish_time, Vec::new()),
    }
}

#[test]
fn insert_is_newest_first() {
    let mut queue = RetransmissionQueue::new();
    assert!(queue.is_empty());
    queue.insert(make_entry(1), 0);
    queue.insert(make_entry(2), 0);
    queue.insert(make_entry(3), 0);
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.sequence_numbers(), vec![3, 2, 1]);
}

#[test]
fn capacity_evicts_oldest() {
    let mut queue = RetransmissionQueue::new();
    queue.insert(make_entry(1), 2);
    queue.insert(make_entry(2), 2);
    queue.insert(make_entry(3), 2);
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.sequence_numbers(), vec![3, 2]);
    assert!(queue.find(1).is_none());
}

#[test]
fn zero_capacity_means_unbounded() {
    let mut queue = RetransmissionQueue::new();
    for sequence_number in 1..=50 {
        queue.insert(make_entry(sequence_number), 0);
    }
    assert_eq!(queue.len(), 50);
}

#[test]
fn acknowledge_releases_entry() {
    let mut queue = RetransmissionQueue::new();
    queue.insert(make_entry(1), 0);
    queue.insert(make_entry(2), 0);
    assert_eq!(queue.acknowledge(1), StatusCode::Good);
    assert_eq!(queue.sequence_numbers(), vec![2]);
    // Acknowledging the same sequence number twice is a protocol error
    assert_eq!(queue.acknowledge(1), StatusCode::BadSequenceNumberUnknown);
    assert_eq!(queue.acknowledge(99), StatusCode::BadSequenceNumberUnknown);
}

#[test]
fn find_returns_buffered_message() {
    let mut queue = RetransmissionQueue::new();
    queue.insert(make_entry(5), 0);
    let entry = queue.find(5).unwrap();
    assert_eq!(entry.notification.sequence_number, 5);
    assert!(queue.find(6).is_none());
}

#[test]
fn clear_drops_everything() {
    let mut queue = RetransmissionQueue::new();
    queue.insert(make_entry(1), 0);
    queue.insert(make_entry(2), 0);
    queue.clear();
    assert!(queue.is_empty());
    assert_eq!(queue.acknowledge(2), StatusCode::BadSequenceNumberUnknown);
}
