use std::sync::{Arc, RwLock};

use telemon_types::service_types::NotificationMessage;
use telemon_types::{DateTime, Duration, StatusCode};

use crate::{
    constants,
    diagnostics::ServerDiagnostics,
    scheduler::{PublishCallbackId, PublishScheduler},
    subscriptions::monitored_item::MonitoredItem,
    subscriptions::retransmission::RetransmissionQueue,
    DateTimeUtc,
};

/// The state of the subscription
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum SubscriptionState {
    /// The lifetime expired. The registry removes a closed subscription
    /// before the tick that closed it completes.
    Closed,
    Normal,
    /// Data or a keep alive was due but no publish request envelope was
    /// queued. Persists until a send succeeds or the lifetime expires.
    Late,
    /// Nothing to publish; the keep alive counter is running.
    KeepAlive,
}

#[derive(Debug, Serialize)]
pub struct Subscription {
    /// Subscription id, unique within the server
    pub subscription_id: u32,
    /// Publishing interval in milliseconds
    pub publishing_interval: Duration,
    /// Number of silent publish intervals after which a keep alive must be sent
    pub max_keep_alive_count: u32,
    /// Number of starved publish intervals the subscription survives
    pub lifetime_count: u32,
    /// Cap on notifications batched into a single publish. 0 means uncapped.
    pub max_notifications_per_publish: usize,
    /// The parameter that requests publishing to be enabled or disabled
    pub publishing_enabled: bool,
    /// Relative priority of the subscription. When more than one subscription
    /// has a message ready the highest priority subscription should be sent
    /// first.
    pub priority: u8,
    /// Monitored items in creation order
    pub monitored_items: Vec<MonitoredItem>,
    /// State of the subscription
    pub state: SubscriptionState,
    /// Consecutive starved publish intervals since the subscription went late
    pub current_lifetime_count: u32,
    /// Silent publish intervals since the last message went out
    pub current_keep_alive_count: u32,
    /// Sent messages retained until the client acknowledges them
    pub retransmission_queue: RetransmissionQueue,
    /// Sequence number carried by the most recent notification message
    pub(crate) sequence_number: u32,
    /// The next monitored item id
    next_monitored_item_id: u32,
    /// Repeated callback handle assigned by the scheduler
    publish_callback_id: PublishCallbackId,
    /// Whether the publish tick is currently registered with the scheduler
    registered: bool,
    /// Server diagnostics to track creation / destruction of the subscription
    #[serde(skip)]
    diagnostics: Arc<RwLock<ServerDiagnostics>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut diagnostics = trace_write_lock_unwrap!(self.diagnostics);
        diagnostics.on_destroy_subscription(self);
    }
}

impl Subscription {
    pub fn new(
        diagnostics: Arc<RwLock<ServerDiagnostics>>,
        subscription_id: u32,
        publishing_enabled: bool,
        publishing_interval: Duration,
        lifetime_count: u32,
        max_keep_alive_count: u32,
        max_notifications_per_publish: usize,
        priority: u8,
    ) -> Subscription {
        let subscription = Subscription {
            subscription_id,
            publishing_interval,
            max_keep_alive_count,
            lifetime_count,
            max_notifications_per_publish,
            publishing_enabled,
            priority,
            monitored_items: Vec::with_capacity(constants::DEFAULT_MONITORED_ITEM_CAPACITY),
            state: SubscriptionState::Normal,
            current_lifetime_count: 0,
            current_keep_alive_count: 0,
            retransmission_queue: RetransmissionQueue::new(),
            sequence_number: 0,
            next_monitored_item_id: 1,
            publish_callback_id: 0,
            registered: false,
            diagnostics,
        };
        {
            let mut diagnostics = trace_write_lock_unwrap!(subscription.diagnostics);
            diagnostics.on_create_subscription(&subscription);
        }
        subscription
    }

    /// Register a monitored item, returning its id. The sampling machinery is
    /// attached elsewhere; from the subscription's point of view an item is
    /// its pending notification queue.
    pub fn create_monitored_item(&mut self, queue_size: usize) -> u32 {
        self.reset_lifetime_counter();
        let monitored_item_id = self.next_monitored_item_id;
        self.next_monitored_item_id += 1;
        self.monitored_items
            .push(MonitoredItem::new(monitored_item_id, queue_size));
        monitored_item_id
    }

    /// Linear scan; item counts are small in practice.
    pub fn find_monitored_item(&self, monitored_item_id: u32) -> Option<&MonitoredItem> {
        self.monitored_items
            .iter()
            .find(|i| i.monitored_item_id() == monitored_item_id)
    }

    pub fn find_monitored_item_mut(&mut self, monitored_item_id: u32) -> Option<&mut MonitoredItem> {
        self.monitored_items
            .iter_mut()
            .find(|i| i.monitored_item_id() == monitored_item_id)
    }

    /// Delete a monitored item by id. Values still queued on the item are
    /// dropped with it.
    pub fn delete_monitored_item(&mut self, monitored_item_id: u32) -> StatusCode {
        self.reset_lifetime_counter();
        match self
            .monitored_items
            .iter()
            .position(|i| i.monitored_item_id() == monitored_item_id)
        {
            Some(idx) => {
                let _ = self.monitored_items.remove(idx);
                StatusCode::Good
            }
            None => StatusCode::BadMonitoredItemIdInvalid,
        }
    }

    /// Delete the specified monitored items (by item id), returning a status
    /// code for each
    pub fn delete_monitored_items(&mut self, items_to_delete: &[u32]) -> Vec<StatusCode> {
        items_to_delete
            .iter()
            .map(|item_to_delete| self.delete_monitored_item(*item_to_delete))
            .collect()
    }

    /// Count the notifications the next publish would carry. Returns the
    /// count, capped by the per-publish limit, and whether more values remain
    /// queued beyond it.
    pub fn count_available_notifications(&self) -> (usize, bool) {
        if !self.publishing_enabled {
            return (0, false);
        }
        let available: usize = self
            .monitored_items
            .iter()
            .map(|i| i.notification_count())
            .sum();
        let count = if self.max_notifications_per_publish > 0
            && available > self.max_notifications_per_publish
        {
            self.max_notifications_per_publish
        } else {
            available
        };
        (count, available > count)
    }

    /// Assemble the next notification message, draining exactly `count`
    /// values from the item queues in concatenated FIFO order and advancing
    /// the sequence number. The destination is reserved before anything is
    /// dequeued, so a failed reservation leaves the queues untouched; past
    /// the first dequeue nothing can fail.
    pub fn build_notification_message(
        &mut self,
        count: usize,
        now: &DateTimeUtc,
    ) -> Result<NotificationMessage, StatusCode> {
        let mut notifications = Vec::new();
        if notifications.try_reserve_exact(count).is_err() {
            return Err(StatusCode::BadOutOfMemory);
        }
        'items: for monitored_item in &mut self.monitored_items {
            while notifications.len() < count {
                match monitored_item.dequeue_notification() {
                    Some(notification) => notifications.push(notification),
                    None => continue 'items,
                }
            }
            break;
        }
        debug_assert_eq!(notifications.len(), count);
        self.sequence_number = Subscription::following_sequence_number(self.sequence_number);
        debug!(
            "Subscription {} built notification message {} carrying {} notifications",
            self.subscription_id,
            self.sequence_number,
            count
        );
        Ok(NotificationMessage::data_change(
            self.sequence_number,
            DateTime::from(*now),
            notifications,
        ))
    }

    /// The sequence number the next notification message will carry. A keep
    /// alive reports this value without consuming it.
    pub fn next_sequence_number(&self) -> u32 {
        Subscription::following_sequence_number(self.sequence_number)
    }

    // The counter wraps to 1 past the u32 range; consumers compare sequence
    // numbers by equality only.
    fn following_sequence_number(sequence_number: u32) -> u32 {
        if sequence_number == std::u32::MAX {
            1
        } else {
            sequence_number + 1
        }
    }

    /// Advance the keep alive counter for a silent interval and report
    /// whether a keep alive message is now due. The counter saturates at the
    /// maximum so it stays within bounds across starved ticks.
    pub(crate) fn tick_keep_alive_counter(&mut self) -> bool {
        if self.current_keep_alive_count < self.max_keep_alive_count {
            self.current_keep_alive_count += 1;
        }
        if self.current_keep_alive_count < self.max_keep_alive_count {
            if self.state == SubscriptionState::Normal {
                self.state = SubscriptionState::KeepAlive;
            }
            false
        } else {
            true
        }
    }

    /// A due publish found no envelope. The first starved tick marks the
    /// subscription late; each one after that counts against the lifetime.
    /// Returns true when the lifetime is exceeded and the subscription must
    /// be deleted.
    pub(crate) fn tick_starved(&mut self) -> bool {
        if self.state != SubscriptionState::Late {
            debug!(
                "Subscription {} has no publish request queued, going late",
                self.subscription_id
            );
            self.state = SubscriptionState::Late;
            return false;
        }
        self.current_lifetime_count += 1;
        if self.current_lifetime_count > self.lifetime_count {
            self.state = SubscriptionState::Closed;
            true
        } else {
            false
        }
    }

    /// A message went out; counters restart and the subscription is back to
    /// normal.
    pub(crate) fn on_message_sent(&mut self) {
        self.reset_keep_alive_counter();
        self.reset_lifetime_counter();
        self.state = SubscriptionState::Normal;
    }

    /// Enable or disable publishing. Values queued on monitored items stay
    /// queued while publishing is disabled.
    pub fn set_publishing_enabled(&mut self, publishing_enabled: bool) {
        self.reset_lifetime_counter();
        self.publishing_enabled = publishing_enabled;
    }

    /// Reset the keep-alive counter to zero. The counter restarts after any
    /// successful send.
    pub fn reset_keep_alive_counter(&mut self) {
        self.current_keep_alive_count = 0;
    }

    /// Reset the lifetime counter to zero, on a successful send or because a
    /// service references the subscription.
    pub fn reset_lifetime_counter(&mut self) {
        self.current_lifetime_count = 0;
    }

    /// Idempotently register the periodic publish tick with the scheduler.
    pub fn register_publish_callback(
        &mut self,
        scheduler: &mut dyn PublishScheduler,
    ) -> StatusCode {
        if self.registered {
            return StatusCode::Good;
        }
        let (publish_callback_id, status) =
            scheduler.add_repeated_callback(self.subscription_id, self.publishing_interval);
        if status.is_good() {
            trace!(
                "Subscription {} registered publish callback {} every {}ms",
                self.subscription_id,
                publish_callback_id,
                self.publishing_interval
            );
            self.publish_callback_id = publish_callback_id;
            self.registered = true;
        }
        status
    }

    /// Idempotently remove the periodic publish tick from the scheduler.
    pub fn unregister_publish_callback(
        &mut self,
        scheduler: &mut dyn PublishScheduler,
    ) -> StatusCode {
        if !self.registered {
            return StatusCode::Good;
        }
        let status = scheduler.remove_repeated_callback(self.publish_callback_id);
        self.publish_callback_id = 0;
        self.registered = false;
        status
    }

    pub fn registered(&self) -> bool {
        self.registered
    }
}
