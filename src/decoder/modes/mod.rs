//! Segment decoding for the data codeword stream.
//!
//! Numeric, alphanumeric, byte and kanji segments append to one payload.
//! ECI, structured-append and FNC1 headers are consumed and skipped.

pub mod alphanumeric;
pub mod byte;
pub mod kanji;
pub mod numeric;

use tracing::trace;

use crate::models::Version;

use alphanumeric::AlphanumericDecoder;
use byte::ByteDecoder;
use kanji::KanjiDecoder;
use numeric::NumericDecoder;

/// MSB-first reader over data codewords
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    /// Next `count` bits (at most 32) as an integer
    pub fn read(&mut self, count: usize) -> Option<u32> {
        if count > 32 || count > self.remaining() {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..count {
            let bit = (self.data[self.pos / 8] >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.pos += 1;
        }
        Some(value)
    }
}

/// Four-bit segment mode indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Terminator,
    Numeric,
    Alphanumeric,
    StructuredAppend,
    Byte,
    Fnc1First,
    Eci,
    Kanji,
    Fnc1Second,
}

impl Mode {
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0b0000 => Some(Mode::Terminator),
            0b0001 => Some(Mode::Numeric),
            0b0010 => Some(Mode::Alphanumeric),
            0b0011 => Some(Mode::StructuredAppend),
            0b0100 => Some(Mode::Byte),
            0b0101 => Some(Mode::Fnc1First),
            0b0111 => Some(Mode::Eci),
            0b1000 => Some(Mode::Kanji),
            0b1001 => Some(Mode::Fnc1Second),
            _ => None,
        }
    }

    /// Width of the character count field
    pub fn char_count_bits(self, version: Version) -> usize {
        let tier = match version.number() {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match self {
            Mode::Numeric => [10, 12, 14][tier],
            Mode::Alphanumeric => [9, 11, 13][tier],
            Mode::Byte => [8, 16, 16][tier],
            Mode::Kanji => [8, 10, 12][tier],
            _ => 0,
        }
    }
}

/// Concatenate every data segment in the stream
pub fn decode_segments(data: &[u8], version: Version) -> Option<Vec<u8>> {
    let mut reader = BitReader::new(data);
    let mut payload = Vec::new();

    while reader.remaining() >= 4 {
        let mode = Mode::from_bits(reader.read(4)?)?;
        match mode {
            Mode::Terminator => break,
            Mode::Eci => {
                let designator = read_eci(&mut reader)?;
                trace!(designator, "skipping ECI header");
            }
            Mode::StructuredAppend => {
                reader.read(16)?;
            }
            Mode::Fnc1First => {}
            Mode::Fnc1Second => {
                reader.read(8)?;
            }
            Mode::Numeric | Mode::Alphanumeric | Mode::Byte | Mode::Kanji => {
                let count = reader.read(mode.char_count_bits(version))? as usize;
                match mode {
                    Mode::Numeric => NumericDecoder::decode(&mut reader, count, &mut payload)?,
                    Mode::Alphanumeric => {
                        AlphanumericDecoder::decode(&mut reader, count, &mut payload)?
                    }
                    Mode::Byte => ByteDecoder::decode(&mut reader, count, &mut payload)?,
                    _ => KanjiDecoder::decode(&mut reader, count, &mut payload)?,
                }
            }
        }
    }

    Some(payload)
}

/// ECI assignment number: 1, 2 or 3 bytes depending on the leading bits
fn read_eci(reader: &mut BitReader<'_>) -> Option<u32> {
    let first = reader.read(8)?;
    if first & 0x80 == 0 {
        Some(first & 0x7F)
    } else if first & 0xC0 == 0x80 {
        Some(((first & 0x3F) << 8) | reader.read(8)?)
    } else if first & 0xE0 == 0xC0 {
        Some(((first & 0x1F) << 16) | reader.read(16)?)
    } else {
        None
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Bit packer for building segment streams
    #[derive(Default)]
    pub(crate) struct BitWriter {
        bits: Vec<bool>,
    }

    impl BitWriter {
        pub(crate) fn push(&mut self, value: u32, count: usize) -> &mut Self {
            for i in (0..count).rev() {
                self.bits.push((value >> i) & 1 == 1);
            }
            self
        }

        pub(crate) fn into_bytes(self) -> Vec<u8> {
            self.bits
                .chunks(8)
                .map(|chunk| {
                    chunk
                        .iter()
                        .enumerate()
                        .fold(0u8, |acc, (i, &b)| acc | (b as u8) << (7 - i))
                })
                .collect()
        }
    }

    fn v1() -> Version {
        Version::new(1).unwrap()
    }

    #[test]
    fn test_bit_reader() {
        let mut reader = BitReader::new(&[0b1010_0000, 0xFF]);
        assert_eq!(reader.read(3), Some(0b101));
        assert_eq!(reader.remaining(), 13);
        assert_eq!(reader.read(13), Some(0b0_0000_1111_1111));
        assert_eq!(reader.read(1), None);
    }

    #[test]
    fn test_char_count_widths() {
        let v10 = Version::new(10).unwrap();
        let v27 = Version::new(27).unwrap();
        assert_eq!(Mode::Byte.char_count_bits(v1()), 8);
        assert_eq!(Mode::Byte.char_count_bits(v10), 16);
        assert_eq!(Mode::Numeric.char_count_bits(v27), 14);
        assert_eq!(Mode::Kanji.char_count_bits(v10), 10);
    }

    #[test]
    fn test_mixed_segments() {
        let mut w = BitWriter::default();
        // "12" numeric, then "AB" alphanumeric, then b"!" byte
        w.push(0b0001, 4).push(2, 10).push(12, 7);
        w.push(0b0010, 4).push(2, 9).push(10 * 45 + 11, 11);
        w.push(0b0100, 4).push(1, 8).push(b'!' as u32, 8);
        w.push(0, 4);
        assert_eq!(decode_segments(&w.into_bytes(), v1()), Some(b"12AB!".to_vec()));
    }

    #[test]
    fn test_eci_and_fnc1_are_skipped() {
        let mut w = BitWriter::default();
        w.push(0b0111, 4).push(26, 8);
        w.push(0b0101, 4);
        w.push(0b0100, 4).push(2, 8).push(0xC3, 8).push(0xA9, 8);
        assert_eq!(decode_segments(&w.into_bytes(), v1()), Some(vec![0xC3, 0xA9]));
    }

    #[test]
    fn test_unknown_mode_fails() {
        let mut w = BitWriter::default();
        w.push(0b1111, 4).push(0, 4);
        assert_eq!(decode_segments(&w.into_bytes(), v1()), None);
    }

    #[test]
    fn test_truncated_segment_fails() {
        let mut w = BitWriter::default();
        w.push(0b0100, 4).push(5, 8).push(b'a' as u32, 8);
        assert_eq!(decode_segments(&w.into_bytes(), v1()), None);
    }
}
