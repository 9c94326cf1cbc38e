//! Runtime counters tracking the server's sessions and subscriptions. The
//! struct serializes so a management surface can report server health.

use crate::session::Session;
use crate::subscriptions::subscription::Subscription;

#[derive(Debug, Default, Clone, Serialize)]
pub struct ServerDiagnostics {
    pub sessions_created: u32,
    pub sessions_destroyed: u32,
    pub subscriptions_created: u32,
    pub subscriptions_destroyed: u32,
}

impl ServerDiagnostics {
    pub fn on_create_session(&mut self, session: &Session) {
        trace!("Diagnostics recording creation of session {}", session.session_id());
        self.sessions_created += 1;
    }

    pub fn on_destroy_session(&mut self, session: &Session) {
        trace!("Diagnostics recording destruction of session {}", session.session_id());
        self.sessions_destroyed += 1;
    }

    pub fn on_create_subscription(&mut self, subscription: &Subscription) {
        trace!(
            "Diagnostics recording creation of subscription {}",
            subscription.subscription_id
        );
        self.subscriptions_created += 1;
    }

    pub fn on_destroy_subscription(&mut self, subscription: &Subscription) {
        trace!(
            "Diagnostics recording destruction of subscription {}",
            subscription.subscription_id
        );
        self.subscriptions_destroyed += 1;
    }

    /// Subscriptions currently alive across the server.
    pub fn current_subscription_count(&self) -> u32 {
        self.subscriptions_created - self.subscriptions_destroyed
    }
}
