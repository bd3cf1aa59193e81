use crate::{filter::packet::Packet, foundation::error::HwResult};

/// Consumer of finalized packets: the command encoder and execution side.
///
/// Packets for one frame arrive in pipeline order, and only after every filter of that frame
/// emitted successfully.
pub trait EngineBackend {
    /// Take ownership of one packet for execution.
    fn submit(&mut self, packet: Packet) -> HwResult<()>;
}

/// In-memory backend for tests and diagnostics.
#[derive(Debug, Default)]
pub struct PacketLog {
    packets: Vec<Packet>,
}

impl PacketLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Packets in submission order.
    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn into_packets(self) -> Vec<Packet> {
        self.packets
    }

    pub fn clear(&mut self) {
        self.packets.clear();
    }
}

impl EngineBackend for PacketLog {
    fn submit(&mut self, packet: Packet) -> HwResult<()> {
        self.packets.push(packet);
        Ok(())
    }
}
