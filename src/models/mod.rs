pub mod matrix;
pub mod pixels;
pub mod point;
pub mod qr_code;
pub mod symbol;

pub use matrix::BitMatrix;
pub use pixels::PixelBuffer;
pub use point::Point;
pub use qr_code::{ECLevel, MaskPattern, QRCode, Version};
pub use symbol::{Location, Orientation, Symbol, SymbolRecord, SymbolType};
