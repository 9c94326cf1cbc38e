//! The server crate implements the subscription publish engine: long-lived
//! subscriptions that periodically drain monitored item queues, batch the
//! pending value changes into notification messages, pair them with the
//! publish request envelopes clients queued ahead of time, and deliver them
//! over the session's secure channel while maintaining sequence numbering,
//! retransmission, keep alive and lifetime accounting.
//!
//! Session establishment, the sampling engine and the transport live
//! elsewhere; the engine consumes their surfaces through [`session::Session`],
//! [`subscriptions::monitored_item::MonitoredItem`] queues and the
//! [`scheduler::PublishScheduler`] contract.

#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate telemon_core;

use chrono::Utc;

pub mod constants;
pub mod diagnostics;
pub mod scheduler;
pub mod session;
pub mod subscriptions;

/// UTC timestamps as handled throughout the server.
pub type DateTimeUtc = chrono::DateTime<Utc>;

pub mod prelude {
    pub use telemon_core::comms::prelude::*;
    pub use telemon_types::service_types::*;
    pub use telemon_types::*;

    pub use crate::constants;
    pub use crate::diagnostics::ServerDiagnostics;
    pub use crate::scheduler::*;
    pub use crate::session::*;
    pub use crate::subscriptions::monitored_item::*;
    pub use crate::subscriptions::retransmission::*;
    pub use crate::subscriptions::subscription::*;
    pub use crate::subscriptions::subscriptions::*;
    pub use crate::subscriptions::*;
    pub use crate::DateTimeUtc;
}

#[cfg(test)]
mod tests;
