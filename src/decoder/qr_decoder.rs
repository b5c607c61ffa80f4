use tracing::trace;

use crate::decoder::bitstream::extract_codewords;
use crate::decoder::format::FormatInfo;
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::modes::decode_segments;
use crate::decoder::reed_solomon;
use crate::decoder::tables::{ec_block_info, total_codewords};
use crate::decoder::unmask::unmask;
use crate::decoder::version;
use crate::models::{BitMatrix, ECLevel, Point, QRCode, Version};

/// Turns a sampled module grid into a decoded symbol
pub struct QrDecoder;

impl QrDecoder {
    /// Decode a square module grid; mirrored symbols are retried transposed
    pub fn decode(grid: &BitMatrix) -> Option<QRCode> {
        if grid.width() != grid.height() {
            return None;
        }
        Self::decode_oriented(grid, false).or_else(|| {
            trace!("retrying grid as mirrored");
            Self::decode_oriented(&grid.transposed(), true)
        })
    }

    fn decode_oriented(grid: &BitMatrix, mirrored: bool) -> Option<QRCode> {
        let version = version::extract(grid)?;
        if version.size() != grid.width() {
            trace!(
                encoded = version.number(),
                sampled = grid.width(),
                "version block disagrees with grid size"
            );
            return None;
        }
        let format = FormatInfo::extract(grid)?;

        let func = FunctionMask::new(version);
        let mut unmasked = grid.clone();
        unmask(&mut unmasked, format.mask_pattern, &func);
        let codewords = extract_codewords(&unmasked, &func);

        let data = Self::deinterleave_and_correct(&codewords, version, format.ec_level)?;
        let payload = decode_segments(&data, version)?;

        Some(QRCode {
            data: payload,
            version,
            error_correction: format.ec_level,
            mask_pattern: format.mask_pattern,
            corners: [Point::default(); 4],
            modules: grid.clone(),
            mirrored,
        })
    }

    /// Split interleaved codewords into blocks, correct each, and return the
    /// data codewords in order
    pub fn deinterleave_and_correct(
        codewords: &[u8],
        version: Version,
        ec_level: ECLevel,
    ) -> Option<Vec<u8>> {
        let info = ec_block_info(version, ec_level);
        let total = total_codewords(version);
        if codewords.len() < total || info.num_blocks == 0 {
            return None;
        }
        let num_long_blocks = total % info.num_blocks;
        let num_short_blocks = info.num_blocks - num_long_blocks;
        let short_data_len = (total / info.num_blocks).checked_sub(info.ecc_per_block)?;
        let data_len = |b: usize| short_data_len + usize::from(b >= num_short_blocks);

        let mut blocks: Vec<Vec<u8>> = (0..info.num_blocks)
            .map(|b| Vec::with_capacity(data_len(b) + info.ecc_per_block))
            .collect();

        let mut source = codewords[..total].iter().copied();
        for i in 0..=short_data_len {
            for (b, block) in blocks.iter_mut().enumerate() {
                if i < data_len(b) {
                    block.push(source.next()?);
                }
            }
        }
        for _ in 0..info.ecc_per_block {
            for block in blocks.iter_mut() {
                block.push(source.next()?);
            }
        }

        let mut data = Vec::with_capacity(total - info.num_blocks * info.ecc_per_block);
        for (b, block) in blocks.iter_mut().enumerate() {
            let corrected = reed_solomon::correct(block, info.ecc_per_block);
            match corrected {
                Some(0) => {}
                Some(n) => trace!(block = b, corrected = n, "repaired codewords"),
                None => {
                    trace!(block = b, "uncorrectable block");
                    return None;
                }
            }
            data.extend_from_slice(&block[..data_len(b)]);
        }
        Some(data)
    }
}
