use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qrdetect::{Scanner, detect};

/// RGBA rendering of `data` centred on a white `side` x `side` canvas
fn render_rgba(data: &[u8], scale: usize, side: usize) -> Vec<u8> {
    let code = qrcode::QrCode::new(data).unwrap();
    let modules = code.width();
    let origin = (side - modules * scale) / 2;
    let mut rgba = vec![255u8; side * side * 4];
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color != qrcode::Color::Dark {
            continue;
        }
        let (mx, my) = (i % modules, i / modules);
        for y in origin + my * scale..origin + (my + 1) * scale {
            for x in origin + mx * scale..origin + (mx + 1) * scale {
                let at = (y * side + x) * 4;
                rgba[at..at + 3].fill(0);
            }
        }
    }
    rgba
}

fn bench_detect_blank(c: &mut Criterion) {
    let image = vec![128u8; 640 * 480 * 4];
    c.bench_function("detect_blank_640x480", |b| {
        b.iter(|| detect(black_box(&image), black_box(640), black_box(480)))
    });
}

fn bench_detect_small_symbol(c: &mut Criterion) {
    let image = render_rgba(b"HELLO", 6, 200);
    c.bench_function("detect_v1_200x200", |b| {
        b.iter(|| detect(black_box(&image), black_box(200), black_box(200)))
    });
}

fn bench_detect_large_symbol(c: &mut Criterion) {
    let text = "https://example.com/a/fairly/long/path?with=query&and=more#fragment".repeat(4);
    let image = render_rgba(text.as_bytes(), 5, 800);
    c.bench_function("detect_large_800x800", |b| {
        b.iter(|| detect(black_box(&image), black_box(800), black_box(800)))
    });
}

fn bench_scanner_owned_engine(c: &mut Criterion) {
    let image = render_rgba(b"owned engine", 4, 320);
    let mut scanner = Scanner::open().unwrap();
    c.bench_function("scanner_detect_320x320", |b| {
        b.iter(|| scanner.detect(black_box(&image), black_box(320), black_box(320)))
    });
}

criterion_group!(
    benches,
    bench_detect_blank,
    bench_detect_small_symbol,
    bench_detect_large_symbol,
    bench_scanner_owned_engine
);
criterion_main!(benches);
