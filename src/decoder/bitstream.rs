//! Codeword placement: the two-column zigzag from the bottom-right corner.

use crate::decoder::function_mask::FunctionMask;
use crate::models::BitMatrix;

/// Visit data modules in placement order
pub fn data_module_order(func: &FunctionMask) -> impl Iterator<Item = (usize, usize)> + '_ {
    let size = func.size();
    let mut columns = Vec::with_capacity(size / 2);
    let mut right = size as isize - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        columns.push(right as usize);
        right -= 2;
    }
    columns
        .into_iter()
        .flat_map(move |right| {
            let upward = (right + 1) & 2 == 0;
            (0..size).flat_map(move |vert| {
                let y = if upward { size - 1 - vert } else { vert };
                [(right, y), (right - 1, y)]
            })
        })
        .filter(move |&(x, y)| !func.is_function(x, y))
}

/// Read codewords (MSB first) from an unmasked grid.
///
/// Remainder bits that do not fill a whole byte are dropped.
pub fn extract_codewords(grid: &BitMatrix, func: &FunctionMask) -> Vec<u8> {
    let mut codewords = Vec::new();
    let mut current = 0u8;
    let mut filled = 0;
    for (x, y) in data_module_order(func) {
        current = (current << 1) | grid.get(x, y) as u8;
        filled += 1;
        if filled == 8 {
            codewords.push(current);
            current = 0;
            filled = 0;
        }
    }
    codewords
}

/// Inverse of [`extract_codewords`], for building test grids
#[cfg(test)]
pub(crate) fn place_codewords(grid: &mut BitMatrix, func: &FunctionMask, codewords: &[u8]) {
    for (i, (x, y)) in data_module_order(func).enumerate() {
        let bit = codewords
            .get(i / 8)
            .is_some_and(|byte| (byte >> (7 - i % 8)) & 1 == 1);
        grid.set(x, y, bit);
    }
}
