use super::BitReader;

/// Byte mode (0100): raw 8-bit values, copied as-is
pub struct ByteDecoder;

impl ByteDecoder {
    pub fn decode(reader: &mut BitReader<'_>, count: usize, out: &mut Vec<u8>) -> Option<()> {
        if reader.remaining() < count * 8 {
            return None;
        }
        out.reserve(count);
        for _ in 0..count {
            out.push(reader.read(8)? as u8);
        }
        Some(())
    }
}
