use super::BitReader;

/// Numeric mode (0001): three digits per 10 bits, remainders in 7 or 4
pub struct NumericDecoder;

impl NumericDecoder {
    pub fn decode(reader: &mut BitReader<'_>, count: usize, out: &mut Vec<u8>) -> Option<()> {
        let mut remaining = count;
        while remaining > 0 {
            let (digits, bits, limit) = match remaining {
                1 => (1, 4, 10),
                2 => (2, 7, 100),
                _ => (3, 10, 1000),
            };
            let value = reader.read(bits)?;
            if value >= limit {
                return None;
            }
            let text = format!("{value:0digits$}");
            out.extend_from_slice(text.as_bytes());
            remaining -= digits;
        }
        Some(())
    }
}
