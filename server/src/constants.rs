//! Server-global defaults used when no configuration layer supplies a value.

use telemon_types::Duration;

/// Minimum publishing interval in milliseconds. Requested intervals below
/// this are revised up when the subscription is created.
pub const MIN_PUBLISHING_INTERVAL_MS: Duration = 10.0;

/// Default cap on the number of subscriptions a session may hold.
pub const DEFAULT_MAX_SUBSCRIPTIONS: usize = 100;

/// Default server-global bound on each subscription's retransmission queue.
/// A value of 0 disables the bound.
pub const DEFAULT_MAX_RETRANSMISSION_QUEUE_SIZE: usize = 256;

/// Capacity reserved up front for a subscription's monitored item list.
pub const DEFAULT_MONITORED_ITEM_CAPACITY: usize = 100;

/// Default cap on a monitored item's pending notification queue.
pub const DEFAULT_NOTIFICATION_QUEUE_SIZE: usize = 10;
