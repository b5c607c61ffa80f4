//! Synthetic inputs shared by the integration tests

use image::{Rgba, RgbaImage};

/// Render `data` as a QR symbol centred on a white `side` x `side` canvas,
/// `scale` pixels per module
pub fn render_qr(data: &[u8], scale: u32, side: u32) -> RgbaImage {
    let code = qrcode::QrCode::new(data).expect("payload fits a QR symbol");
    let modules = code.width() as u32;
    assert!(modules * scale <= side, "symbol does not fit the canvas");
    let origin = (side - modules * scale) / 2;

    let mut img = RgbaImage::from_pixel(side, side, Rgba([255, 255, 255, 255]));
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color != qrcode::Color::Dark {
            continue;
        }
        let (mx, my) = (i as u32 % modules, i as u32 / modules);
        for y in origin + my * scale..origin + (my + 1) * scale {
            for x in origin + mx * scale..origin + (mx + 1) * scale {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
    }
    img
}

/// Solid `side` x `side` image of one colour
pub fn solid(side: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(side, side, Rgba(rgba))
}
