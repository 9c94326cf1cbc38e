use std::collections::VecDeque;

use telemon_core::comms::secure_channel::SecureChannel;
use telemon_types::service_types::{
    NotificationMessage, PublishRequest, PublishResponse, ResponseHeader,
    SubscriptionAcknowledgement,
};
use telemon_types::{DateTime, StatusCode};

use crate::{
    scheduler::PublishScheduler,
    subscriptions::retransmission::NotificationMessageEntry,
    subscriptions::subscription::Subscription,
    subscriptions::PublishResponseEntry,
    DateTimeUtc,
};

/// What one publish cycle did.
enum PublishOutcome {
    /// Nothing was sent this cycle.
    Nothing,
    /// A message went out; true when notifications remain queued beyond it.
    Sent { more_notifications: bool },
    /// The lifetime count was exceeded; the caller deletes the subscription.
    Expired,
}

/// The session's subscriptions together with its queue of publish request
/// envelopes and the server-global limits that apply to both.
pub struct Subscriptions {
    /// Subscriptions in creation order. Lookup is a linear scan by id; per
    /// session counts are small (a map keyed by id is a drop-in change).
    subscriptions: Vec<Subscription>,
    /// Response shells pre-allocated for queued publish requests, oldest
    /// first.
    response_queue: VecDeque<PublishResponseEntry>,
    /// Cap on the number of subscriptions the session may hold.
    max_subscriptions: usize,
    /// Server-global bound on each subscription's retransmission queue, read
    /// only at tick time. 0 disables the bound.
    max_retransmission_queue_size: usize,
}

impl Subscriptions {
    pub fn new(max_subscriptions: usize, max_retransmission_queue_size: usize) -> Subscriptions {
        Subscriptions {
            subscriptions: Vec::new(),
            response_queue: VecDeque::new(),
            max_subscriptions,
            max_retransmission_queue_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn contains(&self, subscription_id: u32) -> bool {
        self.get(subscription_id).is_some()
    }

    pub fn get(&self, subscription_id: u32) -> Option<&Subscription> {
        self.subscriptions
            .iter()
            .find(|s| s.subscription_id == subscription_id)
    }

    pub fn get_mut(&mut self, subscription_id: u32) -> Option<&mut Subscription> {
        self.subscriptions
            .iter_mut()
            .find(|s| s.subscription_id == subscription_id)
    }

    /// Publish request envelopes waiting to be paired with a message.
    pub fn queued_publish_requests(&self) -> usize {
        self.response_queue.len()
    }

    /// Add a subscription and register its publish tick with the scheduler.
    pub fn insert(
        &mut self,
        mut subscription: Subscription,
        scheduler: &mut dyn PublishScheduler,
    ) -> StatusCode {
        if self.max_subscriptions > 0 && self.subscriptions.len() >= self.max_subscriptions {
            warn!(
                "Session already holds {} subscriptions, rejecting subscription {}",
                self.subscriptions.len(),
                subscription.subscription_id
            );
            return StatusCode::BadTooManySubscriptions;
        }
        let status = subscription.register_publish_callback(scheduler);
        if status.is_bad() {
            warn!(
                "Subscription {} could not register its publish callback: {}",
                subscription.subscription_id, status
            );
            return status;
        }
        self.subscriptions.push(subscription);
        StatusCode::Good
    }

    /// Delete a subscription: unregister its publish tick, drain its
    /// retransmission queue and drop its monitored items. If it was the
    /// session's last subscription, every queued publish request is answered
    /// with `BadNoSubscription` so clients are not left waiting.
    pub fn delete_subscription(
        &mut self,
        subscription_id: u32,
        scheduler: &mut dyn PublishScheduler,
        channel: Option<&mut SecureChannel>,
    ) -> StatusCode {
        let idx = match self
            .subscriptions
            .iter()
            .position(|s| s.subscription_id == subscription_id)
        {
            Some(idx) => idx,
            None => return StatusCode::BadSubscriptionIdInvalid,
        };
        let mut subscription = self.subscriptions.remove(idx);
        let _ = subscription.unregister_publish_callback(scheduler);
        subscription.retransmission_queue.clear();
        subscription.monitored_items.clear();
        info!("Subscription {} deleted", subscription_id);
        drop(subscription);
        if self.subscriptions.is_empty() {
            self.drain_response_queue_no_subscription(channel);
        }
        StatusCode::Good
    }

    /// Queue a publish request so the next due tick has an envelope to fill.
    /// The acknowledgements riding on the request are processed here and
    /// their results stored in the pre-allocated response shell.
    pub fn enqueue_publish_request(
        &mut self,
        request_id: u32,
        request: PublishRequest,
    ) -> Result<(), StatusCode> {
        if self.subscriptions.is_empty() {
            // There is nothing to wait for; the request layer answers the
            // client immediately.
            return Err(StatusCode::BadNoSubscription);
        }
        let results = self.acknowledge_notifications(&request.subscription_acknowledgements);
        let response = PublishResponse {
            response_header: ResponseHeader::new_good(&request.request_header),
            subscription_id: 0,
            available_sequence_numbers: Vec::new(),
            more_notifications: false,
            notification_message: NotificationMessage::null(),
            results,
            diagnostic_infos: Vec::new(),
        };
        self.response_queue.push_back(PublishResponseEntry {
            request_id,
            response,
        });
        debug!(
            "Queued publish request {}, {} now queued",
            request_id,
            self.response_queue.len()
        );
        Ok(())
    }

    /// Process the acknowledgements carried by a publish request, releasing
    /// each acknowledged message from its retransmission queue.
    pub fn acknowledge_notifications(
        &mut self,
        acknowledgements: &[SubscriptionAcknowledgement],
    ) -> Vec<StatusCode> {
        acknowledgements
            .iter()
            .map(|ack| {
                match self
                    .subscriptions
                    .iter_mut()
                    .find(|s| s.subscription_id == ack.subscription_id)
                {
                    Some(subscription) => subscription
                        .retransmission_queue
                        .acknowledge(ack.sequence_number),
                    None => StatusCode::BadSubscriptionIdInvalid,
                }
            })
            .collect()
    }

    /// Serve a republish request from the retransmission queue.
    pub fn republish(
        &mut self,
        subscription_id: u32,
        retransmit_sequence_number: u32,
    ) -> Result<NotificationMessage, StatusCode> {
        let subscription = self
            .get_mut(subscription_id)
            .ok_or(StatusCode::BadSubscriptionIdInvalid)?;
        subscription.reset_lifetime_counter();
        match subscription
            .retransmission_queue
            .find(retransmit_sequence_number)
        {
            Some(entry) => Ok(entry.notification.clone()),
            None => Err(StatusCode::BadMessageNotAvailable),
        }
    }

    /// Enable or disable publishing on each listed subscription.
    pub fn set_publishing_mode(
        &mut self,
        subscription_ids: &[u32],
        publishing_enabled: bool,
    ) -> Vec<StatusCode> {
        subscription_ids
            .iter()
            .map(|subscription_id| match self.get_mut(*subscription_id) {
                Some(subscription) => {
                    subscription.set_publishing_enabled(publishing_enabled);
                    StatusCode::Good
                }
                None => StatusCode::BadSubscriptionIdInvalid,
            })
            .collect()
    }

    /// Run the publish tick for one subscription. The cycle repeats while a
    /// send leaves more notifications pending; every repeat consumed a queued
    /// envelope, so the loop is bounded by the response queue. A starved
    /// repeat is safe because the next cycle re-checks the queue and runs the
    /// late logic instead.
    pub fn tick_subscription(
        &mut self,
        now: &DateTimeUtc,
        subscription_id: u32,
        channel: &mut SecureChannel,
        scheduler: &mut dyn PublishScheduler,
    ) -> Result<(), StatusCode> {
        let max_retransmission_queue_size = self.max_retransmission_queue_size;
        let expired = {
            let response_queue = &mut self.response_queue;
            let subscription = self
                .subscriptions
                .iter_mut()
                .find(|s| s.subscription_id == subscription_id)
                .ok_or(StatusCode::BadSubscriptionIdInvalid)?;
            let mut expired = false;
            loop {
                match publish_once(
                    subscription,
                    response_queue,
                    max_retransmission_queue_size,
                    channel,
                    now,
                ) {
                    PublishOutcome::Sent { more_notifications } => {
                        if !more_notifications {
                            break;
                        }
                    }
                    PublishOutcome::Expired => {
                        expired = true;
                        break;
                    }
                    PublishOutcome::Nothing => break,
                }
            }
            expired
        };
        if expired {
            info!(
                "Subscription {} has exceeded its lifetime and will be removed",
                subscription_id
            );
            let _ = self.delete_subscription(subscription_id, scheduler, Some(channel));
        }
        Ok(())
    }

    /// The session has no subscriptions left; answer every queued publish
    /// request with a distinguished service result.
    fn drain_response_queue_no_subscription(&mut self, channel: Option<&mut SecureChannel>) {
        let channel = match channel {
            Some(channel) => channel,
            None => {
                // No way to deliver them; the entries are dropped.
                self.response_queue.clear();
                return;
            }
        };
        while let Some(PublishResponseEntry {
            request_id,
            mut response,
        }) = self.response_queue.pop_front()
        {
            response.response_header.timestamp = DateTime::now();
            response.response_header.service_result = StatusCode::BadNoSubscription;
            debug!(
                "Answering queued publish request {} with BadNoSubscription",
                request_id
            );
            let _ = channel.send_symmetric_message(request_id, response);
        }
    }
}

/// One publish cycle for one subscription: count what is pending, run the
/// keep alive counter on a silent interval, pair with a queued envelope or
/// run the late and lifetime logic, then assemble, store and send.
fn publish_once(
    subscription: &mut Subscription,
    response_queue: &mut VecDeque<PublishResponseEntry>,
    max_retransmission_queue_size: usize,
    channel: &mut SecureChannel,
    now: &DateTimeUtc,
) -> PublishOutcome {
    let (notification_count, more_notifications) = subscription.count_available_notifications();

    // With nothing to send the keep alive counter runs; most ticks end here.
    let keep_alive = notification_count == 0;
    if keep_alive && !subscription.tick_keep_alive_counter() {
        trace!(
            "Subscription {} keep alive counter at {} of {}",
            subscription.subscription_id,
            subscription.current_keep_alive_count,
            subscription.max_keep_alive_count
        );
        return PublishOutcome::Nothing;
    }

    // Pair with the next queued envelope, or run the late and lifetime logic.
    let entry = match response_queue.pop_front() {
        Some(entry) => entry,
        None => {
            if subscription.tick_starved() {
                return PublishOutcome::Expired;
            }
            return PublishOutcome::Nothing;
        }
    };

    // Materialize the message. For a data message this is the point of no
    // return: values leave their item queues and the sequence number
    // advances. A keep alive reports the next sequence number without
    // consuming it.
    let notification_message = if keep_alive {
        debug!(
            "Subscription {} sending keep alive with sequence number {}",
            subscription.subscription_id,
            subscription.next_sequence_number()
        );
        NotificationMessage::keep_alive(subscription.next_sequence_number(), DateTime::from(*now))
    } else {
        match subscription.build_notification_message(notification_count, now) {
            Ok(notification_message) => notification_message,
            Err(status) => {
                // Nothing was dequeued; put the envelope back and give up on
                // this tick with the subscription untouched.
                warn!(
                    "Subscription {} could not assemble a notification message: {}",
                    subscription.subscription_id, status
                );
                response_queue.push_front(entry);
                return PublishOutcome::Nothing;
            }
        }
    };

    if !keep_alive {
        // Stored before the snapshot below so the just-sent message is
        // acknowledgeable from its own response.
        subscription.retransmission_queue.insert(
            NotificationMessageEntry {
                sequence_number: notification_message.sequence_number,
                publish_time: notification_message.publish_time,
                notification: notification_message.clone(),
            },
            max_retransmission_queue_size,
        );
    }

    let PublishResponseEntry {
        request_id,
        mut response,
    } = entry;
    response.response_header.timestamp = DateTime::from(*now);
    response.response_header.service_result = StatusCode::Good;
    response.subscription_id = subscription.subscription_id;
    response.available_sequence_numbers = subscription.retransmission_queue.sequence_numbers();
    response.more_notifications = more_notifications;
    response.notification_message = notification_message;

    // Fire and forget. If the transport has gone away the retransmission
    // entry stays put and the client recovers through republish.
    let _ = channel.send_symmetric_message(request_id, response);

    subscription.on_message_sent();
    PublishOutcome::Sent { more_notifications }
}
