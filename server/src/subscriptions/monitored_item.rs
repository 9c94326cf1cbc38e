use std::collections::VecDeque;

use telemon_types::service_types::MonitoredItemNotification;

/// A single monitored data source within a subscription. The sampling engine
/// owns the production side and pushes fresh values here; the publish tick
/// drains the queue during message assembly.
#[derive(Debug, Serialize)]
pub struct MonitoredItem {
    monitored_item_id: u32,
    /// Pending notifications, oldest first.
    notification_queue: VecDeque<MonitoredItemNotification>,
    /// Cap on the pending queue. The oldest value is discarded on overflow.
    queue_size: usize,
}

impl MonitoredItem {
    pub fn new(monitored_item_id: u32, queue_size: usize) -> MonitoredItem {
        let queue_size = queue_size.max(1);
        MonitoredItem {
            monitored_item_id,
            notification_queue: VecDeque::with_capacity(queue_size),
            queue_size,
        }
    }

    pub fn monitored_item_id(&self) -> u32 {
        self.monitored_item_id
    }

    pub fn queue_size(&self) -> usize {
        self.queue_size
    }

    /// Number of values waiting to be published.
    pub fn notification_count(&self) -> usize {
        self.notification_queue.len()
    }

    /// Push a fresh value from the sampler. A full queue discards its oldest
    /// value first; fresh data beats stale data.
    pub fn enqueue_notification(&mut self, notification: MonitoredItemNotification) {
        if self.notification_queue.len() == self.queue_size {
            let _ = self.notification_queue.pop_front();
            trace!(
                "Monitored item {} queue overflowed, discarded its oldest value",
                self.monitored_item_id
            );
        }
        self.notification_queue.push_back(notification);
    }

    /// Take the oldest pending notification.
    pub(crate) fn dequeue_notification(&mut self) -> Option<MonitoredItemNotification> {
        self.notification_queue.pop_front()
    }
}
