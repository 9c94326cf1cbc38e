use std::collections::VecDeque;

use telemon_types::service_types::PublishResponse;
use telemon_types::StatusCode;

/// Framing applied to an outgoing message on the channel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MessageType {
    OpenSecureChannel,
    CloseSecureChannel,
    /// An ordinary service message on an established channel.
    Message,
}

/// A response handed to the transport, paired with the request id the client
/// used so it can route the reply.
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub request_id: u32,
    pub message_type: MessageType,
    pub response: PublishResponse,
}

/// Server side of an established secure channel. From the publish engine's
/// point of view a send is synchronous; the channel buffers outgoing messages
/// until the transport below drains them.
#[derive(Debug)]
pub struct SecureChannel {
    secure_channel_id: u32,
    outgoing: VecDeque<SentMessage>,
}

impl SecureChannel {
    pub fn new(secure_channel_id: u32) -> SecureChannel {
        SecureChannel {
            secure_channel_id,
            outgoing: VecDeque::new(),
        }
    }

    pub fn secure_channel_id(&self) -> u32 {
        self.secure_channel_id
    }

    /// Queue a symmetrically signed service message for the transport.
    /// Callers on the publish path treat the send as fire-and-forget; the
    /// returned status is informational.
    pub fn send_symmetric_message(
        &mut self,
        request_id: u32,
        response: PublishResponse,
    ) -> StatusCode {
        trace!(
            "Channel {} sending response to request id {}",
            self.secure_channel_id,
            request_id
        );
        self.outgoing.push_back(SentMessage {
            request_id,
            message_type: MessageType::Message,
            response,
        });
        StatusCode::Good
    }

    /// Hand every buffered message to the caller, oldest first.
    pub fn drain_outgoing(&mut self) -> Vec<SentMessage> {
        self.outgoing.drain(..).collect()
    }
}
