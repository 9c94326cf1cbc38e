use std::sync::{Arc, Mutex, RwLock};

use telemon_core::comms::secure_channel::SecureChannel;
use telemon_types::service_types::{NotificationMessage, PublishRequest};
use telemon_types::{Duration, StatusCode};

use crate::{
    constants,
    diagnostics::ServerDiagnostics,
    scheduler::PublishScheduler,
    subscriptions::next_subscription_id,
    subscriptions::subscription::Subscription,
    subscriptions::subscriptions::Subscriptions,
    DateTimeUtc,
};

lazy_static! {
    static ref NEXT_SESSION_ID: Mutex<u32> = Mutex::new(0);
}

fn next_session_id() -> u32 {
    let mut last_session_id = trace_lock_unwrap!(NEXT_SESSION_ID);
    *last_session_id += 1;
    *last_session_id
}

/// The state maintained for one client between session creation and teardown.
/// Establishment and authentication happen in the request layer; here the
/// session is the owner of the publish machinery and of the secure channel
/// the transport attaches once established.
pub struct Session {
    /// Subscriptions associated with the session
    pub subscriptions: Subscriptions,
    /// The session identifier
    session_id: u32,
    /// Secure channel attached by the transport, None until then
    secure_channel: Option<SecureChannel>,
    /// Diagnostics associated with the session
    diagnostics: Arc<RwLock<ServerDiagnostics>>,
}

impl Drop for Session {
    fn drop(&mut self) {
        info!("Session {} is being dropped", self.session_id);
        let mut diagnostics = trace_write_lock_unwrap!(self.diagnostics);
        diagnostics.on_destroy_session(self);
    }
}

impl Session {
    pub fn new(
        diagnostics: Arc<RwLock<ServerDiagnostics>>,
        max_subscriptions: usize,
        max_retransmission_queue_size: usize,
    ) -> Session {
        let session = Session {
            subscriptions: Subscriptions::new(max_subscriptions, max_retransmission_queue_size),
            session_id: next_session_id(),
            secure_channel: None,
            diagnostics,
        };
        {
            let mut diagnostics = trace_write_lock_unwrap!(session.diagnostics);
            diagnostics.on_create_session(&session);
        }
        session
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    /// Attach the secure channel once the transport has established it.
    pub fn set_secure_channel(&mut self, secure_channel: SecureChannel) {
        self.secure_channel = Some(secure_channel);
    }

    pub fn secure_channel_mut(&mut self) -> Option<&mut SecureChannel> {
        self.secure_channel.as_mut()
    }

    /// Create a subscription from the negotiated parameters, register its
    /// publish tick with the scheduler, and return its id. Requested values
    /// are revised to the server's bounds first.
    pub fn create_subscription(
        &mut self,
        scheduler: &mut dyn PublishScheduler,
        publishing_enabled: bool,
        requested_publishing_interval: Duration,
        requested_lifetime_count: u32,
        requested_max_keep_alive_count: u32,
        max_notifications_per_publish: usize,
        priority: u8,
    ) -> Result<u32, StatusCode> {
        let (publishing_interval, lifetime_count, max_keep_alive_count) =
            Session::revise_subscription_values(
                requested_publishing_interval,
                requested_lifetime_count,
                requested_max_keep_alive_count,
            );
        let subscription_id = next_subscription_id();
        let subscription = Subscription::new(
            self.diagnostics.clone(),
            subscription_id,
            publishing_enabled,
            publishing_interval,
            lifetime_count,
            max_keep_alive_count,
            max_notifications_per_publish,
            priority,
        );
        let status = self.subscriptions.insert(subscription, scheduler);
        if status.is_good() {
            Ok(subscription_id)
        } else {
            Err(status)
        }
    }

    // Clamp requested subscription parameters to protocol bounds. The
    // publishing interval has a server minimum, the keep alive count must be
    // at least 1 and the lifetime at least three keep alive periods.
    fn revise_subscription_values(
        requested_publishing_interval: Duration,
        requested_lifetime_count: u32,
        requested_max_keep_alive_count: u32,
    ) -> (Duration, u32, u32) {
        let publishing_interval =
            if requested_publishing_interval < constants::MIN_PUBLISHING_INTERVAL_MS {
                constants::MIN_PUBLISHING_INTERVAL_MS
            } else {
                requested_publishing_interval
            };
        let max_keep_alive_count = requested_max_keep_alive_count.max(1);
        let lifetime_count = requested_lifetime_count.max(max_keep_alive_count.saturating_mul(3));
        (publishing_interval, lifetime_count, max_keep_alive_count)
    }

    /// Delete a subscription, unregistering its publish tick. When the last
    /// subscription goes, queued publish requests are answered with
    /// `BadNoSubscription`.
    pub fn delete_subscription(
        &mut self,
        scheduler: &mut dyn PublishScheduler,
        subscription_id: u32,
    ) -> StatusCode {
        self.subscriptions.delete_subscription(
            subscription_id,
            scheduler,
            self.secure_channel.as_mut(),
        )
    }

    /// Queue a publish request so the next due tick has an envelope to fill.
    pub fn enqueue_publish_request(
        &mut self,
        request_id: u32,
        request: PublishRequest,
    ) -> Result<(), StatusCode> {
        self.subscriptions.enqueue_publish_request(request_id, request)
    }

    /// Entry point for the scheduler's repeated callback. Does nothing until
    /// a secure channel is attached, and nothing if the subscription is gone;
    /// a callback can still fire between deletion and unregistration.
    pub fn publish_timer_fired(
        &mut self,
        scheduler: &mut dyn PublishScheduler,
        subscription_id: u32,
        now: &DateTimeUtc,
    ) {
        match self.secure_channel {
            Some(ref mut secure_channel) => {
                if let Err(status) = self.subscriptions.tick_subscription(
                    now,
                    subscription_id,
                    secure_channel,
                    scheduler,
                ) {
                    trace!(
                        "Publish tick for subscription {} did not run: {}",
                        subscription_id,
                        status
                    );
                }
            }
            None => trace!(
                "Session {} has no secure channel, skipping publish tick",
                self.session_id
            ),
        }
    }

    /// Serve a republish request from the subscription's retransmission
    /// queue.
    pub fn republish(
        &mut self,
        subscription_id: u32,
        retransmit_sequence_number: u32,
    ) -> Result<NotificationMessage, StatusCode> {
        self.subscriptions
            .republish(subscription_id, retransmit_sequence_number)
    }

    /// Enable or disable publishing on each listed subscription.
    pub fn set_publishing_mode(
        &mut self,
        subscription_ids: &[u32],
        publishing_enabled: bool,
    ) -> Vec<StatusCode> {
        self.subscriptions
            .set_publishing_mode(subscription_ids, publishing_enabled)
    }

    /// Reset the lifetime counter on the subscription, e.g. because a service
    /// references the subscription.
    pub fn reset_subscription_lifetime_counter(&mut self, subscription_id: u32) {
        if let Some(subscription) = self.subscriptions.get_mut(subscription_id) {
            subscription.reset_lifetime_counter();
        }
    }
}
