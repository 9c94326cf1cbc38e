//! Contains all code related to sending messages to a transport. Chunking,
//! encryption and the codec itself sit below this layer; the publish engine
//! only sees the secure channel's send surface.

pub mod secure_channel;

pub mod prelude {
    pub use super::secure_channel::*;
}
