//! Contract with the server's repeated-callback scheduler. The engine only
//! registers and unregisters publish ticks; the timer wheel itself belongs to
//! the server main loop.

use telemon_types::{Duration, StatusCode};

/// Opaque handle identifying one repeated callback registration.
pub type PublishCallbackId = u64;

/// The scheduler surface the publish engine consumes. Implementations must
/// serialize callbacks per subscription: two ticks for the same subscription
/// never run concurrently.
pub trait PublishScheduler {
    /// Ask for the publish tick of `subscription_id` to run every
    /// `interval_ms` milliseconds, returning the registration handle.
    fn add_repeated_callback(
        &mut self,
        subscription_id: u32,
        interval_ms: Duration,
    ) -> (PublishCallbackId, StatusCode);

    /// Remove a previously added repeated callback.
    fn remove_repeated_callback(&mut self, callback_id: PublishCallbackId) -> StatusCode;
}
