//! The built-in engine's decode pass: binarize, find finder patterns, group
//! them into triples, sample and decode each triple.

use tracing::{debug, trace};

use crate::decoder::QrDecoder;
use crate::decoder::version;
use crate::detector::alignment::find_alignment_center;
use crate::detector::finder::{FinderDetector, FinderPattern};
use crate::detector::grouping::{FinderTriple, group_finder_patterns};
use crate::engine::ProcessorConfig;
use crate::models::{BitMatrix, Location, Orientation, Point, QRCode, Symbol, SymbolType};
use crate::utils::binarization::{adaptive_binarize, otsu_binarize};
use crate::utils::geometry::{PerspectiveTransform, sample_grid};

const ADAPTIVE_WINDOW: usize = 31;
const ADAPTIVE_BIAS_PERCENT: u64 = 10;
const MIN_DIMENSION: usize = 21;
const MAX_DIMENSION: usize = 177;

/// Decode every QR symbol in a luminance plane.
///
/// Decoded symbols come first in candidate order, followed by partial
/// symbols for located triples that could not be decoded.
pub fn scan(gray: &[u8], width: usize, height: usize, config: &ProcessorConfig) -> Vec<Symbol> {
    let binary = otsu_binarize(gray, width, height);
    let symbols = scan_binary(&binary, config);
    if !config.adaptive_fallback || symbols.iter().any(|s| !s.is_partial()) {
        return symbols;
    }

    trace!("global threshold found nothing decodable, trying local mean");
    let adaptive = adaptive_binarize(gray, width, height, ADAPTIVE_WINDOW, ADAPTIVE_BIAS_PERCENT);
    let retry = scan_binary(&adaptive, config);
    if retry.iter().any(|s| !s.is_partial()) || symbols.is_empty() {
        retry
    } else {
        symbols
    }
}

fn scan_binary(binary: &BitMatrix, config: &ProcessorConfig) -> Vec<Symbol> {
    let mut finders = FinderDetector::detect(binary);
    finders.truncate(config.max_finder_candidates);
    if finders.len() < 3 {
        trace!(finders = finders.len(), "not enough finder patterns");
        return Vec::new();
    }

    let triples = group_finder_patterns(&finders);
    debug!(
        finders = finders.len(),
        triples = triples.len(),
        "finder grouping"
    );

    let mut used = vec![false; finders.len()];
    let mut decoded = Vec::new();
    let mut failed = Vec::new();

    for triple in triples {
        if triple.indices.iter().any(|&i| used[i]) {
            continue;
        }
        match decode_triple(binary, &triple, config) {
            Some(qr) => {
                for &i in &triple.indices {
                    used[i] = true;
                }
                debug!(
                    version = qr.version.number(),
                    ec_level = ?qr.error_correction,
                    bytes = qr.data.len(),
                    "decoded symbol"
                );
                decoded.push(symbol_from_qr(qr));
            }
            None => {
                trace!(indices = ?triple.indices, "triple failed to decode");
                failed.push(triple);
            }
        }
    }

    let partials = failed
        .into_iter()
        .filter(|t| t.indices.iter().all(|&i| !used[i]))
        .map(|t| Symbol::partial(partial_locations(&t, &finders)));
    decoded.extend(partials);
    decoded
}

fn decode_triple(binary: &BitMatrix, triple: &FinderTriple, config: &ProcessorConfig) -> Option<QRCode> {
    let mut dimensions = vec![triple.dimension];
    if config.dimension_retries {
        if triple.dimension >= MIN_DIMENSION + 4 {
            dimensions.push(triple.dimension - 4);
        }
        if triple.dimension + 4 <= MAX_DIMENSION {
            dimensions.push(triple.dimension + 4);
        }
    }

    let mut next = 0;
    while next < dimensions.len() {
        let dimension = dimensions[next];
        next += 1;

        for transform in transforms(binary, triple, dimension) {
            let Some(grid) = sample_grid(binary, &transform, dimension) else {
                continue;
            };
            if let Some(mut qr) = QrDecoder::decode(&grid) {
                qr.corners = symbol_corners(&transform, dimension, qr.mirrored);
                return Some(qr);
            }
            // a readable version block overrides the size estimate
            if let Some(v) = version::extract(&grid) {
                if !dimensions.contains(&v.size()) {
                    trace!(from = dimension, to = v.size(), "resampling at encoded version");
                    dimensions.push(v.size());
                }
            }
        }
    }
    None
}

/// Candidate module-to-image maps: alignment-refined first when possible
fn transforms(binary: &BitMatrix, triple: &FinderTriple, dimension: usize) -> Vec<PerspectiveTransform> {
    let Some(affine) = PerspectiveTransform::for_symbol(
        triple.top_left,
        triple.top_right,
        triple.bottom_left,
        None,
        dimension,
    ) else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(2);
    if dimension > MIN_DIMENSION {
        let a = dimension as f32 - 6.5;
        let predicted = affine.transform(&Point::new(a, a));
        let refined = find_alignment_center(binary, predicted, triple.module_size).and_then(|found| {
            PerspectiveTransform::for_symbol(
                triple.top_left,
                triple.top_right,
                triple.bottom_left,
                Some(found),
                dimension,
            )
        });
        out.extend(refined);
    }
    out.push(affine);
    out
}

/// Outer corners in the symbol's frame: top-left, bottom-left, bottom-right,
/// top-right
fn symbol_corners(transform: &PerspectiveTransform, dimension: usize, mirrored: bool) -> [Point; 4] {
    let d = dimension as f32;
    let module_corners = if mirrored {
        [(0.0, 0.0), (d, 0.0), (d, d), (0.0, d)]
    } else {
        [(0.0, 0.0), (0.0, d), (d, d), (d, 0.0)]
    };
    module_corners.map(|(x, y)| transform.transform(&Point::new(x, y)))
}

/// Rotation from the direction of the symbol's top edge
pub(crate) fn orientation_of(top_left: Point, top_right: Point) -> Orientation {
    let dx = top_right.x - top_left.x;
    let dy = top_right.y - top_left.y;
    if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
        return Orientation::Unknown;
    }
    if dx.abs() >= dy.abs() {
        if dx > 0.0 { Orientation::Up } else { Orientation::Down }
    } else if dy > 0.0 {
        Orientation::Right
    } else {
        Orientation::Left
    }
}

fn to_location(p: &Point) -> Location {
    let (x, y) = p.rounded();
    Location::new(x, y)
}

fn symbol_from_qr(qr: QRCode) -> Symbol {
    let [tl, bl, br, tr] = qr.corners;
    Symbol {
        symbol_type: SymbolType::QrCode,
        orientation: orientation_of(tl, tr),
        locations: [tl, bl, br, tr].iter().map(to_location).collect(),
        data: qr.data,
        quality: 1,
    }
}

fn partial_locations(triple: &FinderTriple, finders: &[FinderPattern]) -> Vec<Location> {
    match PerspectiveTransform::for_symbol(
        triple.top_left,
        triple.top_right,
        triple.bottom_left,
        None,
        triple.dimension,
    ) {
        Some(t) => symbol_corners(&t, triple.dimension, false)
            .iter()
            .map(to_location)
            .collect(),
        None => triple
            .indices
            .iter()
            .map(|&i| to_location(&finders[i].center))
            .collect(),
    }
}
