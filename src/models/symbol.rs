//! Symbol types shared by engines and callers.
//!
//! Numeric codes follow the zbar numbering so results can be handed to hosts
//! that already switch on those integers.

use std::fmt;

/// Symbology of a decoded symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SymbolType {
    None = 0,
    /// Detected but not fully decoded; never returned to callers
    Partial = 1,
    Ean2 = 2,
    Ean5 = 5,
    Ean8 = 8,
    Upce = 9,
    Isbn10 = 10,
    Upca = 12,
    Ean13 = 13,
    Isbn13 = 14,
    Composite = 15,
    I25 = 25,
    Databar = 34,
    DatabarExp = 35,
    Codabar = 38,
    Code39 = 39,
    Pdf417 = 57,
    QrCode = 64,
    SqCode = 80,
    Code93 = 93,
    Code128 = 128,
}

impl SymbolType {
    /// Every symbology, in code order
    pub const ALL: [SymbolType; 21] = [
        SymbolType::None,
        SymbolType::Partial,
        SymbolType::Ean2,
        SymbolType::Ean5,
        SymbolType::Ean8,
        SymbolType::Upce,
        SymbolType::Isbn10,
        SymbolType::Upca,
        SymbolType::Ean13,
        SymbolType::Isbn13,
        SymbolType::Composite,
        SymbolType::I25,
        SymbolType::Databar,
        SymbolType::DatabarExp,
        SymbolType::Codabar,
        SymbolType::Code39,
        SymbolType::Pdf417,
        SymbolType::QrCode,
        SymbolType::SqCode,
        SymbolType::Code93,
        SymbolType::Code128,
    ];

    pub const fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| ty.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            SymbolType::None => "NONE",
            SymbolType::Partial => "PARTIAL",
            SymbolType::Ean2 => "EAN-2",
            SymbolType::Ean5 => "EAN-5",
            SymbolType::Ean8 => "EAN-8",
            SymbolType::Upce => "UPC-E",
            SymbolType::Isbn10 => "ISBN-10",
            SymbolType::Upca => "UPC-A",
            SymbolType::Ean13 => "EAN-13",
            SymbolType::Isbn13 => "ISBN-13",
            SymbolType::Composite => "COMPOSITE",
            SymbolType::I25 => "I2/5",
            SymbolType::Databar => "DataBar",
            SymbolType::DatabarExp => "DataBar-Exp",
            SymbolType::Codabar => "Codabar",
            SymbolType::Code39 => "CODE-39",
            SymbolType::Pdf417 => "PDF417",
            SymbolType::QrCode => "QR-Code",
            SymbolType::SqCode => "SQ-Code",
            SymbolType::Code93 => "CODE-93",
            SymbolType::Code128 => "CODE-128",
        }
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rotation of a symbol relative to the image axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum Orientation {
    #[default]
    Unknown = -1,
    Up = 0,
    /// Rotated 90 degrees clockwise
    Right = 1,
    Down = 2,
    /// Rotated 90 degrees counter-clockwise
    Left = 3,
}

impl Orientation {
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Orientation::Unknown),
            0 => Some(Orientation::Up),
            1 => Some(Orientation::Right),
            2 => Some(Orientation::Down),
            3 => Some(Orientation::Left),
            _ => None,
        }
    }
}

/// Integer image coordinate of a symbol corner or scan point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A symbol as reported by an engine, before filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub symbol_type: SymbolType,
    pub data: Vec<u8>,
    pub orientation: Orientation,
    pub locations: Vec<Location>,
    pub quality: i32,
}

impl Symbol {
    /// A located candidate the engine could not decode
    pub fn partial(locations: Vec<Location>) -> Self {
        Self {
            symbol_type: SymbolType::Partial,
            data: Vec::new(),
            orientation: Orientation::Unknown,
            locations,
            quality: 0,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.symbol_type == SymbolType::Partial
    }
}

/// One decoded symbol returned to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub symbol_type: SymbolType,
    /// Payload bytes exactly as the engine reported them
    pub data: Vec<u8>,
    pub orientation: Orientation,
    pub locations: Vec<Location>,
    pub quality: i32,
}

impl SymbolRecord {
    /// Payload as text, lossy for non-UTF-8 bytes
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

impl From<Symbol> for SymbolRecord {
    fn from(symbol: Symbol) -> Self {
        Self {
            symbol_type: symbol.symbol_type,
            data: symbol.data,
            orientation: symbol.orientation,
            locations: symbol.locations,
            quality: symbol.quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_codes_round_trip() {
        for code in [0, 1, 2, 5, 8, 9, 10, 12, 13, 14, 15, 25, 34, 35, 38, 39, 57, 64, 80, 93, 128] {
            let ty = SymbolType::from_code(code).unwrap();
            assert_eq!(ty.code(), code);
        }
        assert_eq!(SymbolType::from_code(3), None);
        assert_eq!(SymbolType::QrCode.code(), 64);
    }

    #[test]
    fn test_orientation_codes() {
        assert_eq!(Orientation::Unknown.code(), -1);
        assert_eq!(Orientation::Left.code(), 3);
        assert_eq!(Orientation::from_code(1), Some(Orientation::Right));
        assert_eq!(Orientation::from_code(4), None);
    }

    #[test]
    fn test_partial_constructor() {
        let s = Symbol::partial(vec![Location::new(1, 2)]);
        assert!(s.is_partial());
        assert!(s.data.is_empty());
    }
}
