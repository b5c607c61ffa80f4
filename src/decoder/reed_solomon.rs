//! Reed-Solomon error correction over GF(256).
//!
//! QR uses the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D) with
//! generator roots alpha^0 .. alpha^(ecc-1).

const PRIMITIVE: u16 = 0x11D;

const fn build_exp() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        table[i + 255] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    table
}

const fn build_log() -> [u8; 256] {
    let exp = build_exp();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static EXP_TABLE: [u8; 512] = build_exp();
static LOG_TABLE: [u8; 256] = build_log();

/// GF(256) arithmetic via log/exp tables
pub struct Gf256;

impl Gf256 {
    #[inline]
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        EXP_TABLE[LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize]
    }

    /// `a / b`; `b` must be non-zero
    #[inline]
    pub fn div(a: u8, b: u8) -> u8 {
        debug_assert!(b != 0, "division by zero in GF(256)");
        if a == 0 || b == 0 {
            return 0;
        }
        EXP_TABLE[LOG_TABLE[a as usize] as usize + 255 - LOG_TABLE[b as usize] as usize]
    }

    /// alpha^n
    #[inline]
    pub fn exp(n: usize) -> u8 {
        EXP_TABLE[n % 255]
    }

    #[inline]
    pub fn inv(a: u8) -> u8 {
        Self::div(1, a)
    }
}

/// Evaluate a polynomial stored lowest degree first
fn eval_low_first(poly: &[u8], x: u8) -> u8 {
    poly.iter()
        .rev()
        .fold(0u8, |acc, &coef| Gf256::mul(acc, x) ^ coef)
}

/// Syndromes S_i = r(alpha^i), codeword stored highest degree first
fn syndromes(block: &[u8], ecc_len: usize) -> Vec<u8> {
    (0..ecc_len)
        .map(|i| {
            let x = Gf256::exp(i);
            block.iter().fold(0u8, |acc, &c| Gf256::mul(acc, x) ^ c)
        })
        .collect()
}

/// Error locator polynomial (lowest degree first) via Berlekamp-Massey
fn berlekamp_massey(synd: &[u8]) -> Vec<u8> {
    let mut locator = vec![1u8];
    let mut prev = vec![1u8];
    let mut len = 0usize;
    let mut shift = 1usize;
    let mut prev_disc = 1u8;

    for k in 0..synd.len() {
        let mut disc = synd[k];
        for i in 1..=len.min(locator.len() - 1) {
            disc ^= Gf256::mul(locator[i], synd[k - i]);
        }
        if disc == 0 {
            shift += 1;
            continue;
        }
        let scale = Gf256::div(disc, prev_disc);
        let snapshot = locator.clone();
        if locator.len() < prev.len() + shift {
            locator.resize(prev.len() + shift, 0);
        }
        for (i, &p) in prev.iter().enumerate() {
            locator[i + shift] ^= Gf256::mul(scale, p);
        }
        if 2 * len <= k {
            len = k + 1 - len;
            prev = snapshot;
            prev_disc = disc;
            shift = 1;
        } else {
            shift += 1;
        }
    }

    locator.truncate(len + 1);
    locator
}

/// Correct `block` (data followed by `ecc_len` check bytes) in place.
///
/// Returns the number of corrected bytes, or `None` when the block holds more
/// errors than the code can repair.
pub fn correct(block: &mut [u8], ecc_len: usize) -> Option<usize> {
    let n = block.len();
    if ecc_len == 0 || ecc_len >= n || n > 255 {
        return None;
    }
    let synd = syndromes(block, ecc_len);
    if synd.iter().all(|&s| s == 0) {
        return Some(0);
    }

    let locator = berlekamp_massey(&synd);
    let num_errors = locator.len() - 1;
    if num_errors == 0 || num_errors * 2 > ecc_len {
        return None;
    }

    // Chien search: byte j sits at power n-1-j
    let positions: Vec<usize> = (0..n)
        .filter(|&j| {
            let x_inv = Gf256::inv(Gf256::exp(n - 1 - j));
            eval_low_first(&locator, x_inv) == 0
        })
        .collect();
    if positions.len() != num_errors {
        return None;
    }

    // Omega = S(x) * Lambda(x) mod x^ecc
    let mut omega = vec![0u8; ecc_len];
    for (i, &s) in synd.iter().enumerate() {
        for (j, &l) in locator.iter().enumerate() {
            if i + j < ecc_len {
                omega[i + j] ^= Gf256::mul(s, l);
            }
        }
    }

    // formal derivative keeps the odd terms
    let derivative: Vec<u8> = locator
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &c)| if i % 2 == 1 { c } else { 0 })
        .collect();

    for &j in &positions {
        let x = Gf256::exp(n - 1 - j);
        let x_inv = Gf256::inv(x);
        let denom = eval_low_first(&derivative, x_inv);
        if denom == 0 {
            return None;
        }
        let magnitude = Gf256::mul(x, Gf256::div(eval_low_first(&omega, x_inv), denom));
        block[j] ^= magnitude;
    }

    if syndromes(block, ecc_len).iter().any(|&s| s != 0) {
        return None;
    }
    Some(num_errors)
}

/// Check bytes for `data`, used by tests to build valid blocks
#[cfg(test)]
pub(crate) fn encode(data: &[u8], ecc_len: usize) -> Vec<u8> {
    // generator = prod (x - alpha^i), highest degree first, leading 1 implied
    let mut generator = vec![0u8; ecc_len];
    generator[ecc_len - 1] = 1;
    let mut root = 1u8;
    for _ in 0..ecc_len {
        for j in 0..ecc_len {
            generator[j] = Gf256::mul(generator[j], root);
            if j + 1 < ecc_len {
                generator[j] ^= generator[j + 1];
            }
        }
        root = Gf256::mul(root, 2);
    }

    let mut remainder = vec![0u8; ecc_len];
    for &b in data {
        let factor = b ^ remainder[0];
        remainder.rotate_left(1);
        remainder[ecc_len - 1] = 0;
        for (r, &g) in remainder.iter_mut().zip(&generator) {
            *r ^= Gf256::mul(g, factor);
        }
    }
    remainder
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codeword(data: &[u8], ecc_len: usize) -> Vec<u8> {
        let mut block = data.to_vec();
        block.extend(encode(data, ecc_len));
        block
    }

    #[test]
    fn test_field_tables() {
        assert_eq!(Gf256::exp(8), 29);
        assert_eq!(Gf256::mul(2, 128), 29);
        for a in 1..=255u8 {
            assert_eq!(Gf256::mul(a, Gf256::inv(a)), 1);
        }
    }

    #[test]
    fn test_clean_block_passes() {
        let mut block = codeword(b"hello world", 10);
        assert_eq!(correct(&mut block, 10), Some(0));
    }

    #[test]
    fn test_corrects_up_to_half_ecc() {
        let data: Vec<u8> = (0..19u8).map(|i| i.wrapping_mul(37)).collect();
        let clean = codeword(&data, 7 * 2);
        for errors in 1..=7 {
            let mut block = clean.clone();
            for e in 0..errors {
                block[e * 4] ^= 0x5A ^ e as u8;
            }
            assert_eq!(correct(&mut block, 14), Some(errors));
            assert_eq!(block, clean);
        }
    }

    #[test]
    fn test_errors_in_check_bytes() {
        let clean = codeword(b"QR", 10);
        let mut block = clean.clone();
        let last = block.len() - 1;
        block[last] ^= 0xFF;
        block[last - 3] ^= 0x01;
        assert_eq!(correct(&mut block, 10), Some(2));
        assert_eq!(block, clean);
    }

    #[test]
    fn test_too_many_errors_rejected() {
        let clean = codeword(&[0u8; 10], 4);
        let mut block = clean.clone();
        for b in block.iter_mut().take(5) {
            *b ^= 0x33;
        }
        assert_eq!(correct(&mut block, 4), None);
    }
}
