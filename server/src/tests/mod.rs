use std::sync::{Arc, RwLock};

use telemon_core::comms::secure_channel::{SecureChannel, SentMessage};
use telemon_types::service_types::{
    MonitoredItemNotification, NotificationData, NotificationMessage, PublishRequest,
    RequestHeader, SubscriptionAcknowledgement,
};
use telemon_types::{DataValue, Duration, StatusCode};

use crate::diagnostics::ServerDiagnostics;
use crate::scheduler::{PublishCallbackId, PublishScheduler};
use crate::subscriptions::subscription::Subscription;
use crate::subscriptions::subscriptions::Subscriptions;
use crate::DateTimeUtc;

mod monitored_item;
mod retransmission;

/// Scheduler double that records registrations so tests can assert on them.
pub struct TestScheduler {
    next_callback_id: PublishCallbackId,
    pub active: Vec<(PublishCallbackId, u32, Duration)>,
    pub removed: Vec<PublishCallbackId>,
}

impl TestScheduler {
    pub fn new() -> TestScheduler {
        TestScheduler {
            next_callback_id: 1,
            active: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl PublishScheduler for TestScheduler {
    fn add_repeated_callback(
        &mut self,
        subscription_id: u32,
        interval_ms: Duration,
    ) -> (PublishCallbackId, StatusCode) {
        let callback_id = self.next_callback_id;
        self.next_callback_id += 1;
        self.active.push((callback_id, subscription_id, interval_ms));
        (callback_id, StatusCode::Good)
    }

    fn remove_repeated_callback(&mut self, callback_id: PublishCallbackId) -> StatusCode {
        match self.active.iter().position(|(id, _, _)| *id == callback_id) {
            Some(idx) => {
                self.active.remove(idx);
                self.removed.push(callback_id);
                StatusCode::Good
            }
            None => StatusCode::BadUnexpectedError,
        }
    }
}

pub fn now() -> DateTimeUtc {
    chrono::Utc::now()
}

pub fn make_diagnostics() -> Arc<RwLock<ServerDiagnostics>> {
    Arc::new(RwLock::new(ServerDiagnostics::default()))
}

pub fn make_subscription(
    subscription_id: u32,
    lifetime_count: u32,
    max_keep_alive_count: u32,
    max_notifications_per_publish: usize,
) -> Subscription {
    Subscription::new(
        make_diagnostics(),
        subscription_id,
        true,
        100.0,
        lifetime_count,
        max_keep_alive_count,
        max_notifications_per_publish,
        0,
    )
}

pub fn make_subscriptions(max_retransmission_queue_size: usize) -> Subscriptions {
    Subscriptions::new(100, max_retransmission_queue_size)
}

pub fn make_channel() -> SecureChannel {
    SecureChannel::new(1)
}

pub fn make_publish_request(request_handle: u32) -> PublishRequest {
    make_publish_request_with_acks(request_handle, Vec::new())
}

pub fn make_publish_request_with_acks(
    request_handle: u32,
    subscription_acknowledgements: Vec<SubscriptionAcknowledgement>,
) -> PublishRequest {
    PublishRequest {
        request_header: RequestHeader::new(request_handle),
        subscription_acknowledgements,
    }
}

pub fn enqueue_publish(subscriptions: &mut Subscriptions, request_id: u32) {
    subscriptions
        .enqueue_publish_request(request_id, make_publish_request(request_id))
        .unwrap();
}

/// Queue int values on a monitored item as `(client_handle, value)` pairs.
pub fn enqueue_values(
    subscription: &mut Subscription,
    monitored_item_id: u32,
    values: &[(u32, i32)],
) {
    let monitored_item = subscription
        .find_monitored_item_mut(monitored_item_id)
        .unwrap();
    for (client_handle, value) in values {
        monitored_item.enqueue_notification(MonitoredItemNotification {
            client_handle: *client_handle,
            value: DataValue::new(*value),
        });
    }
}

/// The client handles embedded in a notification message, in delivery order.
pub fn notification_client_handles(message: &NotificationMessage) -> Vec<u32> {
    message
        .notification_data
        .iter()
        .flat_map(|n| match n {
            NotificationData::DataChange(d) => d.monitored_items.iter().map(|m| m.client_handle),
        })
        .collect()
}

/// Convenience for tests that expect exactly one sent message.
pub fn single_sent_message(channel: &mut SecureChannel) -> SentMessage {
    let mut sent = channel.drain_outgoing();
    assert_eq!(sent.len(), 1);
    sent.remove(0)
}
