use std::collections::HashMap;

use anyhow::{bail, Result};
use athena::{BufferUnderrun, Endian, MessageReader, NetworkVersion};
use byteorder::ByteOrder;
use once_cell::sync::Lazy;
use tracing::{trace, warn};

use crate::session::Session;
use crate::{eathena, tmwa, ServerFamily};

/// Decodes one incoming message body into session state.
pub type RecvFn = fn(&mut Session, &mut MessageReader) -> Result<(), BufferUnderrun>;

/// Wire length of a packet, as declared by the per-family table.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PacketLength {
    /// Total packet size including the opcode.
    Fixed(u16),
    /// A 2-byte length field follows the opcode and covers the whole
    /// packet.
    Variable,
}

#[derive(Clone, Copy)]
pub struct PacketSpec {
    pub length: PacketLength,
    pub recv: RecvFn,
}

pub type PacketTable = HashMap<u16, PacketSpec>;

static TMWA_TABLE: Lazy<PacketTable> = Lazy::new(tmwa::recv::table);
static EATHENA_TABLE: Lazy<PacketTable> = Lazy::new(eathena::recv::table);

fn table_for(family: ServerFamily) -> &'static PacketTable {
    match family {
        ServerFamily::TmwAthena => &TMWA_TABLE,
        ServerFamily::EAthena => &EATHENA_TABLE,
    }
}

/// Splits the incoming byte stream into messages and routes each to its
/// receiver.
///
/// A receiver that runs past its message's declared end poisons that
/// message only: the dispatcher logs it, drops the remaining bytes of
/// the message, and picks up at the next opcode. An opcode missing from
/// the family table is fatal, since without a length the stream cannot
/// be resynchronized.
pub struct Dispatcher {
    family: ServerFamily,
    table: PacketTable,
    buffer: Vec<u8>,
}

impl Dispatcher {
    /// Fixed packet sizes grew over the eAthena protocol's history, so
    /// the table is resolved against the negotiated version once, here.
    pub fn new(family: ServerFamily, version: NetworkVersion) -> Dispatcher {
        let mut table = table_for(family).clone();
        if family == ServerFamily::EAthena {
            eathena::recv::apply_version(&mut table, version);
        }
        Self { family, table, buffer: Vec::new() }
    }

    pub fn family(&self) -> ServerFamily { self.family }

    /// Bytes buffered but not yet forming a complete message.
    pub fn pending(&self) -> usize { self.buffer.len() }

    /// Append freshly received bytes and dispatch every complete message
    /// in the buffer.
    pub fn feed(&mut self, sess: &mut Session, bytes: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(bytes);
        let table = &self.table;

        loop {
            if self.buffer.len() < 2 {
                return Ok(());
            }
            let opcode = Endian::read_u16(&self.buffer[..2]);
            let Some(spec) = table.get(&opcode) else {
                bail!("unknown opcode {opcode:#06x}, cannot resynchronize");
            };

            let total = match spec.length {
                PacketLength::Fixed(size) => size as usize,
                PacketLength::Variable => {
                    if self.buffer.len() < 4 {
                        return Ok(());
                    }
                    let declared = Endian::read_u16(&self.buffer[2..4]) as usize;
                    if declared < 4 {
                        bail!("opcode {opcode:#06x} declares length {declared}");
                    }
                    declared
                }
            };
            if self.buffer.len() < total {
                return Ok(());
            }

            // Body excludes the opcode and, for variable packets, the
            // length field.
            let body_start = match spec.length {
                PacketLength::Fixed(_) => 2,
                PacketLength::Variable => 4,
            };
            trace!("DISPATCH {opcode:#06x} ({total} bytes)");
            let mut msg = MessageReader::new(&self.buffer[body_start..total]);
            if let Err(err) = (spec.recv)(sess, &mut msg) {
                warn!("opcode {opcode:#06x}: {err}; message dropped");
            }
            self.buffer.drain(..total);
        }
    }
}

#[cfg(test)]
mod tests {
    use athena::{NetworkVersion, PacketVersion, ServerVariant};

    use crate::state::GameEvent;

    use super::*;

    fn version() -> NetworkVersion {
        NetworkVersion::new(PacketVersion::new(20150513), ServerVariant::Main)
    }

    fn session(family: ServerFamily) -> Session {
        Session::new(family, version())
    }

    #[test]
    fn splits_messages_across_feeds() {
        let mut sess = session(ServerFamily::TmwAthena);
        let mut dispatcher = Dispatcher::new(ServerFamily::TmwAthena, version());

        // Attack range packet (0x013a, fixed 4 bytes), delivered in two
        // halves.
        dispatcher.feed(&mut sess, &[0x3a, 0x01]).unwrap();
        assert_eq!(sess.state.attack_range, 0);
        dispatcher.feed(&mut sess, &[0x02, 0x00]).unwrap();
        assert_eq!(sess.state.attack_range, 2);
        assert_eq!(dispatcher.pending(), 0);
    }

    #[test]
    fn truncated_message_is_dropped_and_stream_continues() {
        let mut sess = session(ServerFamily::TmwAthena);
        let mut dispatcher = Dispatcher::new(ServerFamily::TmwAthena, version());

        // An inventory list whose declared length cuts its only entry
        // short, followed by a healthy attack-range packet.
        let mut bytes = vec![0xee, 0x01, 0x0e, 0x00];
        bytes.extend_from_slice(&[0x02, 0x00, 0x00, 0x02, 0x02, 0x00,
            0x05, 0x00, 0x00, 0x00]);
        bytes.extend_from_slice(&[0x3a, 0x01, 0x03, 0x00]);
        dispatcher.feed(&mut sess, &bytes).unwrap();

        assert!(sess.state.inventory.is_empty());
        assert_eq!(sess.state.attack_range, 3);
    }

    #[test]
    fn unknown_opcode_is_fatal() {
        let mut sess = session(ServerFamily::TmwAthena);
        let mut dispatcher = Dispatcher::new(ServerFamily::TmwAthena, version());
        assert!(dispatcher.feed(&mut sess, &[0xff, 0xef]).is_err());
    }

    #[test]
    fn server_notice_reaches_the_event_queue() {
        let mut sess = session(ServerFamily::TmwAthena);
        let mut dispatcher = Dispatcher::new(ServerFamily::TmwAthena, version());

        // GM announce (0x009a): variable length, text body.
        let text = b"maintenance in 5 minutes";
        let mut bytes = vec![0x9a, 0x00];
        bytes.extend_from_slice(&((4 + text.len()) as u16).to_le_bytes());
        bytes.extend_from_slice(text);
        dispatcher.feed(&mut sess, &bytes).unwrap();

        assert_eq!(sess.state.next_event(),
            Some(GameEvent::ServerNotice("maintenance in 5 minutes".into())));
    }
}
