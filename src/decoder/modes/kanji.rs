use super::BitReader;

/// Kanji mode (1000): 13-bit values expanded back to Shift JIS byte pairs.
///
/// The payload keeps the Shift JIS bytes; no transcoding happens here.
pub struct KanjiDecoder;

impl KanjiDecoder {
    pub fn decode(reader: &mut BitReader<'_>, count: usize, out: &mut Vec<u8>) -> Option<()> {
        for _ in 0..count {
            let value = reader.read(13)?;
            let packed = ((value / 0xC0) << 8) | (value % 0xC0);
            let sjis = if packed < 0x1F00 {
                packed + 0x8140
            } else {
                packed + 0xC140
            };
            out.push((sjis >> 8) as u8);
            out.push(sjis as u8);
        }
        Some(())
    }
}
