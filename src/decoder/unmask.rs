use crate::decoder::function_mask::FunctionMask;
use crate::models::{BitMatrix, MaskPattern};

/// Undo the data mask in place; function modules are left alone
pub fn unmask(grid: &mut BitMatrix, mask_pattern: MaskPattern, func: &FunctionMask) {
    let size = grid.width();
    for y in 0..size {
        for x in 0..size {
            if !func.is_function(x, y) && mask_pattern.is_masked(x, y) {
                grid.toggle(x, y);
            }
        }
    }
}
