use std::collections::VecDeque;

use tracing::debug;

use athena::Endian;
use byteorder::ByteOrder;

/// Queue of fully built outgoing packets awaiting the transport flush.
///
/// Handlers enqueue only finished packets, so the transport can never
/// observe a partial one. The queue itself does no I/O.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: VecDeque<Vec<u8>>,
}

impl Outbox {
    pub fn new() -> Outbox {
        Self::default()
    }

    pub fn queue(&mut self, packet: Vec<u8>) {
        debug_assert!(packet.len() >= 2);
        debug!("SEND {:#06x} ({} bytes)", Endian::read_u16(&packet[..2]),
            packet.len());
        self.queue.push_back(packet);
    }

    pub fn len(&self) -> usize { self.queue.len() }

    pub fn is_empty(&self) -> bool { self.queue.is_empty() }

    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.queue.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Vec<u8>> + '_ {
        self.queue.drain(..)
    }
}
