use std::fmt;

pub use byteorder::LittleEndian as Endian;
use byteorder::ByteOrder;
use tracing::trace;

use crate::BeingId;

/// A read ran past the declared end of an incoming message.
///
/// Fatal to the current message only: the dispatcher discards the rest of
/// the message using its declared length and continues with the next one.
#[derive(Debug, Clone, Copy)]
pub struct BufferUnderrun {
    pub field: &'static str,
    pub wanted: usize,
    pub available: usize,
}

impl fmt::Display for BufferUnderrun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer underrun reading {:?}: wanted {} bytes, {} available",
            self.field, self.wanted, self.available)
    }
}

impl std::error::Error for BufferUnderrun {}

/// Serializes one outgoing packet.
///
/// All integers are little-endian; this protocol family predates the
/// network-order convention. Packets start with a 2-byte opcode;
/// variable-length packets additionally carry a 2-byte length covering
/// the whole packet (opcode + length + body).
///
/// A writer holds at most one packet at a time: `begin`/`begin_var` start
/// it, the typed writes fill it, `finish` closes it and hands back the
/// bytes. Starting a new packet while one is open is a programming error.
#[derive(Debug, Default)]
pub struct MessageWriter {
    buf: Vec<u8>,
    open: bool,
    variable: bool,
}

impl MessageWriter {
    pub fn new() -> MessageWriter {
        Self::default()
    }

    pub fn is_open(&self) -> bool { self.open }

    pub fn begin(&mut self, opcode: u16) {
        assert!(!self.open, "previous packet was not flushed");
        self.open = true;
        self.variable = false;
        self.buf.clear();
        let mut bytes = [0u8; 2];
        Endian::write_u16(&mut bytes, opcode);
        self.buf.extend_from_slice(&bytes);
        trace!("BEGIN {opcode:#06x}");
    }

    pub fn begin_var(&mut self, opcode: u16) {
        self.begin(opcode);
        self.variable = true;
        // Length slot, patched by finish().
        self.buf.extend_from_slice(&[0, 0]);
    }

    fn put(&mut self, bytes: &[u8]) {
        assert!(self.open, "write outside of begin/finish");
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8, label: &'static str) {
        trace!("write_u8 {label}: {value}");
        self.put(&[value]);
    }

    pub fn write_i8(&mut self, value: i8, label: &'static str) {
        trace!("write_i8 {label}: {value}");
        self.put(&[value as u8]);
    }

    pub fn write_u16(&mut self, value: u16, label: &'static str) {
        trace!("write_u16 {label}: {value}");
        let mut bytes = [0u8; 2];
        Endian::write_u16(&mut bytes, value);
        self.put(&bytes);
    }

    pub fn write_i16(&mut self, value: i16, label: &'static str) {
        self.write_u16(value as u16, label);
    }

    pub fn write_u32(&mut self, value: u32, label: &'static str) {
        trace!("write_u32 {label}: {value}");
        let mut bytes = [0u8; 4];
        Endian::write_u32(&mut bytes, value);
        self.put(&bytes);
    }

    pub fn write_i32(&mut self, value: i32, label: &'static str) {
        self.write_u32(value as u32, label);
    }

    pub fn write_i64(&mut self, value: i64, label: &'static str) {
        trace!("write_i64 {label}: {value}");
        let mut bytes = [0u8; 8];
        Endian::write_u64(&mut bytes, value as u64);
        self.put(&bytes);
    }

    pub fn write_being_id(&mut self, id: BeingId, label: &'static str) {
        self.write_u32(id.as_u32(), label);
    }

    /// Write exactly `width` bytes: the string truncated if it is longer,
    /// NUL-padded if it is shorter. Truncation is silent; the wire format
    /// has no other way to carry an overlong value.
    pub fn write_string(&mut self, value: &str, width: usize, label: &'static str) {
        trace!("write_string {label}: {value:?} (width {width})");
        let bytes = value.as_bytes();
        if bytes.len() >= width {
            let truncated = &bytes[..width];
            self.put(truncated);
        } else {
            self.put(bytes);
            let padding = width - bytes.len();
            assert!(self.open, "write outside of begin/finish");
            self.buf.resize(self.buf.len() + padding, 0);
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8], label: &'static str) {
        trace!("write_bytes {label}: {} bytes", bytes.len());
        self.put(bytes);
    }

    /// Close the packet and return its bytes. For variable-length packets
    /// the length field is patched to the total packet size here, so the
    /// caller never computes it by hand.
    pub fn finish(&mut self) -> Vec<u8> {
        assert!(self.open, "finish without begin");
        self.open = false;
        if self.variable {
            let total = self.buf.len() as u16;
            let mut bytes = [0u8; 2];
            Endian::write_u16(&mut bytes, total);
            self.buf[2..4].copy_from_slice(&bytes);
        }
        std::mem::take(&mut self.buf)
    }
}

/// Sequential typed reads over one incoming message body.
///
/// Field labels exist purely for diagnostics; the wire format is not
/// self-describing, so reads must match the declared layout exactly.
#[derive(Debug)]
pub struct MessageReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MessageReader<'a> {
    pub fn new(data: &'a [u8]) -> MessageReader<'a> {
        Self { data, pos: 0 }
    }

    pub fn len(&self) -> usize { self.data.len() }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    pub fn position(&self) -> usize { self.pos }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take(&mut self, wanted: usize, field: &'static str)
        -> Result<&'a [u8], BufferUnderrun>
    {
        let available = self.remaining();
        if wanted > available {
            return Err(BufferUnderrun { field, wanted, available });
        }
        let slice = &self.data[self.pos..self.pos + wanted];
        self.pos += wanted;
        Ok(slice)
    }

    pub fn skip(&mut self, count: usize, label: &'static str)
        -> Result<(), BufferUnderrun>
    {
        trace!("skip {label}: {count}");
        self.take(count, label)?;
        Ok(())
    }

    pub fn read_u8(&mut self, label: &'static str) -> Result<u8, BufferUnderrun> {
        let value = self.take(1, label)?[0];
        trace!("read_u8 {label}: {value}");
        Ok(value)
    }

    pub fn read_i8(&mut self, label: &'static str) -> Result<i8, BufferUnderrun> {
        Ok(self.read_u8(label)? as i8)
    }

    pub fn read_u16(&mut self, label: &'static str) -> Result<u16, BufferUnderrun> {
        let value = Endian::read_u16(self.take(2, label)?);
        trace!("read_u16 {label}: {value}");
        Ok(value)
    }

    pub fn read_i16(&mut self, label: &'static str) -> Result<i16, BufferUnderrun> {
        Ok(self.read_u16(label)? as i16)
    }

    pub fn read_u32(&mut self, label: &'static str) -> Result<u32, BufferUnderrun> {
        let value = Endian::read_u32(self.take(4, label)?);
        trace!("read_u32 {label}: {value}");
        Ok(value)
    }

    pub fn read_i32(&mut self, label: &'static str) -> Result<i32, BufferUnderrun> {
        Ok(self.read_u32(label)? as i32)
    }

    pub fn read_u64(&mut self, label: &'static str) -> Result<u64, BufferUnderrun> {
        let value = Endian::read_u64(self.take(8, label)?);
        trace!("read_u64 {label}: {value}");
        Ok(value)
    }

    pub fn read_i64(&mut self, label: &'static str) -> Result<i64, BufferUnderrun> {
        Ok(self.read_u64(label)? as i64)
    }

    pub fn read_being_id(&mut self, label: &'static str)
        -> Result<BeingId, BufferUnderrun>
    {
        Ok(BeingId::from_u32(self.read_u32(label)?))
    }

    /// Read a fixed-width field and return the text up to the first NUL
    /// (or the whole field if none). Always consumes exactly `width`.
    pub fn read_string(&mut self, width: usize, label: &'static str)
        -> Result<String, BufferUnderrun>
    {
        let raw = self.take(width, label)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(width);
        let value = String::from_utf8_lossy(&raw[..end]).into_owned();
        trace!("read_string {label}: {value:?}");
        Ok(value)
    }

    pub fn read_bytes(&mut self, count: usize, label: &'static str)
        -> Result<&'a [u8], BufferUnderrun>
    {
        let raw = self.take(count, label)?;
        trace!("read_bytes {label}: {count}");
        Ok(raw)
    }

    /// 3-byte packed position: 10 bits x, 10 bits y, 4 bits direction
    /// (in the server's own direction encoding).
    pub fn read_coordinates(&mut self, label: &'static str)
        -> Result<(u16, u16, u8), BufferUnderrun>
    {
        let raw = self.take(3, label)?;
        let x = (((raw[0] as u16) << 8) | (raw[1] & 0xc0) as u16) >> 6;
        let y = ((((raw[1] & 0x3f) as u16) << 8) | (raw[2] & 0xf0) as u16) >> 4;
        let dir = raw[2] & 0x0f;
        trace!("read_coordinates {label}: {x},{y} dir {dir}");
        Ok((x, y, dir))
    }

    /// 5-byte packed movement: source and destination positions, 10 bits
    /// per axis.
    pub fn read_coordinate_pair(&mut self, label: &'static str)
        -> Result<(u16, u16, u16, u16), BufferUnderrun>
    {
        let raw = self.take(5, label)?;
        let src_x = (((raw[0] as u16) << 8) | raw[1] as u16) >> 6;
        let src_y = ((((raw[1] & 0x3f) as u16) << 8) | raw[2] as u16) >> 4;
        let dst_x = ((((raw[2] & 0x0f) as u16) << 8) | raw[3] as u16) >> 2;
        let dst_y = (((raw[3] & 0x03) as u16) << 8) | raw[4] as u16;
        trace!("read_coordinate_pair {label}: {src_x},{src_y} -> {dst_x},{dst_y}");
        Ok((src_x, src_y, dst_x, dst_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_packet_layout() {
        let mut out = MessageWriter::new();
        out.begin(0x00a7);
        out.write_i16(12, "index");
        out.write_i32(-1, "amount");
        let packet = out.finish();
        assert_eq!(packet, vec![0xa7, 0x00, 0x0c, 0x00, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn variable_length_covers_whole_packet() {
        let mut out = MessageWriter::new();
        out.begin_var(0x00c9);
        out.write_i16(5, "index");
        out.write_i32(100, "price");
        let packet = out.finish();
        // opcode(2) + length(2) + body(6)
        assert_eq!(packet.len(), 10);
        assert_eq!(Endian::read_u16(&packet[2..4]), 10);
    }

    #[test]
    fn string_truncates_to_field_width() {
        let mut out = MessageWriter::new();
        out.begin(0x0001);
        out.write_string("abcdefghijklmnopqrstuvwxyz1234", 24, "name");
        let packet = out.finish();
        assert_eq!(packet.len(), 2 + 24);
        assert_eq!(&packet[2..], b"abcdefghijklmnopqrstuvwx");
    }

    #[test]
    fn string_pads_with_nuls() {
        let mut out = MessageWriter::new();
        out.begin(0x0001);
        out.write_string("abcde", 24, "name");
        let packet = out.finish();
        assert_eq!(&packet[2..7], b"abcde");
        assert!(packet[7..].iter().all(|&b| b == 0));
        assert_eq!(packet.len(), 2 + 24);
    }

    #[test]
    #[should_panic(expected = "previous packet was not flushed")]
    fn begin_twice_panics() {
        let mut out = MessageWriter::new();
        out.begin(0x0001);
        out.begin(0x0002);
    }

    #[test]
    fn writer_is_reusable_after_finish() {
        let mut out = MessageWriter::new();
        out.begin(0x0001);
        let first = out.finish();
        out.begin(0x0002);
        let second = out.finish();
        assert_eq!(first, vec![0x01, 0x00]);
        assert_eq!(second, vec![0x02, 0x00]);
    }

    #[test]
    fn reader_reads_in_declared_order() {
        let data = [0x0c, 0x00, 0xe8, 0x03, 0x00, 0x00];
        let mut msg = MessageReader::new(&data);
        assert_eq!(msg.read_i16("index").unwrap(), 12);
        assert_eq!(msg.read_i32("amount").unwrap(), 1000);
        assert_eq!(msg.remaining(), 0);
    }

    #[test]
    fn reader_underrun_reports_field() {
        let data = [0x01, 0x00];
        let mut msg = MessageReader::new(&data);
        msg.read_u16("id").unwrap();
        let err = msg.read_u32("amount").unwrap_err();
        assert_eq!(err.field, "amount");
        assert_eq!(err.wanted, 4);
        assert_eq!(err.available, 0);
    }

    #[test]
    fn read_string_stops_at_nul() {
        let mut data = b"hello".to_vec();
        data.resize(24, 0);
        data.extend_from_slice(&[0x2a]);
        let mut msg = MessageReader::new(&data);
        assert_eq!(msg.read_string(24, "name").unwrap(), "hello");
        // The whole field was consumed regardless of the NUL position.
        assert_eq!(msg.read_u8("tail").unwrap(), 0x2a);
    }

    #[test]
    fn packed_coordinates_decode() {
        let data = [0x02, 0x81, 0x42];
        let mut msg = MessageReader::new(&data);
        let (x, y, dir) = msg.read_coordinates("pos").unwrap();
        assert_eq!((x, y, dir), (10, 20, 2));
    }
}
