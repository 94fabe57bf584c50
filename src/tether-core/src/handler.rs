use crate::packet::Packet;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Outbound side of the transport that delivers packets to the paired device.
///
/// `send` is a fire-and-forget handoff: implementations must enqueue and
/// return without blocking on the network. Callers are allowed to invoke it
/// while holding their own locks.
pub trait DeviceChannel: Send + Sync {
    fn send(&self, packet: Packet);
}

/// Failures surfaced by packet handlers and the dispatch boundary.
///
/// The protocol has no acknowledgment/retry layer; a failed request is
/// logged, nothing is sent back, and the next request starts fresh.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("malformed '{packet_type}' packet: missing required field '{missing}'")]
    MalformedPacket {
        packet_type: String,
        missing: &'static str,
    },
    #[error("no handler registered for packet type '{packet_type}'")]
    UnsupportedPacket { packet_type: String },
}

pub type HandlerResult = Result<(), HandlerError>;

/// A capability-specific handler ("plugin") for inbound request packets.
///
/// Handlers hold no mutable state of their own and must be safe to invoke
/// concurrently for different packets.
pub trait PacketHandler: Send + Sync {
    /// Packet type tags this handler accepts.
    fn incoming_packet_types(&self) -> &'static [&'static str];

    /// Packet type tags this handler may emit on the channel.
    fn outgoing_packet_types(&self) -> &'static [&'static str];

    fn handle_packet(&self, packet: &Packet, channel: &dyn DeviceChannel) -> HandlerResult;
}

/// Routes inbound packets to the handler registered for their type tag.
///
/// Unknown packet types are rejected here and never reach a handler.
#[derive(Default)]
pub struct PacketRouter {
    handlers: HashMap<&'static str, Arc<dyn PacketHandler>>,
}

impl PacketRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for all of its incoming packet types. A later
    /// registration for the same tag replaces the earlier one.
    pub fn register(&mut self, handler: Arc<dyn PacketHandler>) {
        for packet_type in handler.incoming_packet_types() {
            self.handlers.insert(packet_type, Arc::clone(&handler));
        }
    }

    pub fn dispatch(&self, packet: &Packet, channel: &dyn DeviceChannel) -> HandlerResult {
        let Some(handler) = self.handlers.get(packet.packet_type()) else {
            tracing::warn!(
                packet_type = packet.packet_type(),
                "rejecting packet with no registered handler"
            );
            return Err(HandlerError::UnsupportedPacket {
                packet_type: packet.packet_type().to_owned(),
            });
        };

        if let Err(err) = handler.handle_packet(packet, channel) {
            tracing::warn!(packet_type = packet.packet_type(), %err, "packet handler failed");
            return Err(err);
        }
        Ok(())
    }
}
