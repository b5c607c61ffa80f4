//! End-to-end detection through the crate-level API

mod common;

use common::{render_qr, solid};
use image::imageops;
use qrdetect::utils::grayscale::convert;
use qrdetect::{Error, Orientation, PixelBuffer, Scanner, SymbolType, detect, detect_image};

#[test]
fn test_solid_image_has_no_symbols() {
    for colour in [[0, 0, 0, 255], [255, 255, 255, 255], [90, 140, 30, 0]] {
        let img = solid(100, colour);
        let records = detect(img.as_raw(), 100, 100).unwrap();
        assert!(records.is_empty(), "{colour:?} gave {records:?}");
    }
}

#[test]
fn test_hello_symbol() {
    let img = render_qr(b"HELLO", 8, 200);
    let records = detect(img.as_raw(), 200, 200).unwrap();
    assert_eq!(records.len(), 1);

    let r = &records[0];
    assert_eq!(r.data, b"HELLO");
    assert_eq!(r.symbol_type, SymbolType::QrCode);
    assert_eq!(r.symbol_type.code(), 64);
    assert!(r.quality > 0);
    assert_eq!(r.locations.len(), 4);
    assert_eq!(r.orientation, Orientation::Up);

    // 21 modules at 8 px leave a 16 px margin
    let expected = [(16, 16), (16, 184), (184, 184), (184, 16)];
    for (loc, (x, y)) in r.locations.iter().zip(expected) {
        assert!((loc.x - x).abs() <= 2 && (loc.y - y).abs() <= 2, "{loc:?}");
    }
}

#[test]
fn test_rotated_symbols_report_orientation() {
    let img = render_qr(b"turn me around", 6, 240);

    let right = imageops::rotate90(&img);
    let records = detect_image(&right).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].orientation, Orientation::Right);
    assert_eq!(records[0].text(), "turn me around");

    let down = imageops::rotate180(&img);
    let records = detect_image(&down).unwrap();
    assert_eq!(records[0].orientation, Orientation::Down);

    let left = imageops::rotate270(&img);
    let records = detect_image(&left).unwrap();
    assert_eq!(records[0].orientation, Orientation::Left);
}

#[test]
fn test_larger_version_decodes() {
    let text = "Larger symbols carry alignment patterns, and from version 7 a version block.";
    let payload = text.repeat(2);
    let img = render_qr(payload.as_bytes(), 4, 480);
    let records = detect_image(&img).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text(), payload);
}

#[test]
fn test_two_symbols_side_by_side() {
    let left = render_qr(b"left", 5, 200);
    let right = render_qr(b"right", 5, 200);
    let mut canvas = solid(400, [255, 255, 255, 255]);
    imageops::replace(&mut canvas, &left, 0, 100);
    imageops::replace(&mut canvas, &right, 200, 100);

    let records = detect_image(&canvas).unwrap();
    let mut texts: Vec<_> = records.iter().map(|r| r.text().into_owned()).collect();
    texts.sort();
    assert_eq!(texts, ["left", "right"]);
}

#[test]
fn test_sequential_calls_share_engine() {
    let img = render_qr(b"again", 6, 200);
    for _ in 0..3 {
        let records = detect(img.as_raw(), 200, 200).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, b"again");
    }
}

#[test]
fn test_windowed_input() {
    let img = render_qr(b"offset", 6, 200);
    let mut framed = vec![7u8; 32];
    framed.extend_from_slice(img.as_raw());
    framed.extend_from_slice(&[1, 2, 3]);

    let pixels = PixelBuffer::with_window(&framed, 32, framed.len() - 32, 200, 200).unwrap();
    let records = qrdetect::detect_pixels(&pixels).unwrap();
    assert_eq!(records[0].data, b"offset");
}

#[test]
fn test_shape_errors() {
    let data = vec![0u8; 10 * 10 * 4];
    assert!(matches!(detect(&data, 0, 10), Err(Error::InputShape(_))));
    assert!(matches!(detect(&data, 10, 0), Err(Error::InputShape(_))));
    assert!(matches!(detect(&data, 11, 10), Err(Error::InputShape(_))));
    assert!(matches!(
        PixelBuffer::with_window(&data, 8, data.len(), 10, 10),
        Err(Error::InputShape(_))
    ));
    assert!(matches!(
        PixelBuffer::with_window(&data, 4, data.len() - 4, 10, 10),
        Err(Error::InputShape(_))
    ));
}

#[test]
fn test_grayscale_fixed_points() {
    let black = solid(16, [0, 0, 0, 255]);
    let gray = convert(&PixelBuffer::new(black.as_raw(), 16, 16).unwrap());
    assert_eq!(gray.as_slice().len(), 256);
    assert!(gray.as_slice().iter().all(|&v| v == 0));

    let white = solid(16, [255, 255, 255, 0]);
    let gray = convert(&PixelBuffer::new(white.as_raw(), 16, 16).unwrap());
    assert!(gray.as_slice().iter().all(|&v| v == 255));
}

#[test]
fn test_owned_scanner_matches_global() {
    let img = render_qr(b"scanner", 6, 200);
    let mut scanner = Scanner::open().unwrap();
    assert_eq!(scanner.version(), qrdetect::version());
    assert_eq!(
        scanner.detect(img.as_raw(), 200, 200).unwrap(),
        detect(img.as_raw(), 200, 200).unwrap()
    );
}
