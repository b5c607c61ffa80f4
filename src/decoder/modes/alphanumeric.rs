use super::BitReader;

/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
const ALPHANUMERIC_TABLE: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Alphanumeric mode (0010): pairs in 11 bits, a trailing single in 6
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    pub fn decode(reader: &mut BitReader<'_>, count: usize, out: &mut Vec<u8>) -> Option<()> {
        let mut remaining = count;
        while remaining >= 2 {
            let value = reader.read(11)? as usize;
            if value >= 45 * 45 {
                return None;
            }
            out.push(ALPHANUMERIC_TABLE[value / 45]);
            out.push(ALPHANUMERIC_TABLE[value % 45]);
            remaining -= 2;
        }
        if remaining == 1 {
            let value = reader.read(6)? as usize;
            out.push(*ALPHANUMERIC_TABLE.get(value)?);
        }
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::modes::tests::BitWriter;

    #[test]
    fn test_alphanumeric_decode() {
        // "AC-42": (10,12) (41,4) (2)
        let mut w = BitWriter::default();
        w.push(10 * 45 + 12, 11).push(41 * 45 + 4, 11).push(2, 6);
        let bytes = w.into_bytes();
        let mut out = Vec::new();
        AlphanumericDecoder::decode(&mut BitReader::new(&bytes), 5, &mut out).unwrap();
        assert_eq!(out, b"AC-42");
    }

    #[test]
    fn test_invalid_single() {
        let mut w = BitWriter::default();
        w.push(50, 6);
        let bytes = w.into_bytes();
        let mut out = Vec::new();
        assert!(AlphanumericDecoder::decode(&mut BitReader::new(&bytes), 1, &mut out).is_none());
    }
}
