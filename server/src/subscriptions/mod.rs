//! Subscriptions, their monitored item queues and the publish machinery that
//! turns queued value changes into notification messages.

use std::sync::Mutex;

use telemon_types::service_types::PublishResponse;

pub mod monitored_item;
pub mod retransmission;
pub mod subscription;
pub mod subscriptions;

lazy_static! {
    static ref NEXT_SUBSCRIPTION_ID: Mutex<u32> = Mutex::new(0);
}

/// Allocate the next server-unique subscription id.
pub fn next_subscription_id() -> u32 {
    let mut next_subscription_id = trace_lock_unwrap!(NEXT_SUBSCRIPTION_ID);
    *next_subscription_id += 1;
    *next_subscription_id
}

/// A publish response shell pre-allocated when the client's publish request
/// arrived, so the publish tick always has an envelope ready to fill. The
/// shell already carries the acknowledgement results processed at enqueue
/// time.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishResponseEntry {
    pub request_id: u32,
    pub response: PublishResponse,
}
