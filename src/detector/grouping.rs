//! Finder triples: which three patterns form one symbol, and in what order.

use crate::detector::finder::FinderPattern;
use crate::models::Point;

/// Three finders ordered in the symbol's own frame
#[derive(Debug, Clone, Copy)]
pub struct FinderTriple {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    /// Estimated module pitch in pixels
    pub module_size: f32,
    /// Estimated symbol width in modules (17 + 4 * version)
    pub dimension: usize,
    /// Indices into the finder list
    pub indices: [usize; 3],
}

/// Order three finders as top-left, top-right, bottom-left.
///
/// Top-left sits at the corner closest to a right angle; the other two are
/// told apart by the turn direction, which is clockwise from top-right to
/// bottom-left in image coordinates (y down) for an unmirrored symbol.
pub fn order_finder_patterns(patterns: &[FinderPattern], indices: [usize; 3]) -> Option<FinderTriple> {
    let [a, b, c] = indices.map(|i| &patterns[i]);
    let group = [a, b, c];
    if group.iter().any(|p| p.module_size < 1.0) {
        return None;
    }

    let mut best_idx = 0usize;
    let mut best_cos = f32::INFINITY;
    for i in 0..3 {
        let p = &group[i].center;
        let p1 = &group[(i + 1) % 3].center;
        let p2 = &group[(i + 2) % 3].center;
        let denom = p.distance(p1) * p.distance(p2);
        if denom == 0.0 {
            return None;
        }
        let dot = (p1.x - p.x) * (p2.x - p.x) + (p1.y - p.y) * (p2.y - p.y);
        let cos = (dot / denom).abs();
        if cos < best_cos {
            best_cos = cos;
            best_idx = i;
        }
    }
    // allow roughly 70..110 degrees at the corner
    if best_cos > 0.35 {
        return None;
    }

    let tl_idx = best_idx;
    let (mut tr_idx, mut bl_idx) = ((best_idx + 1) % 3, (best_idx + 2) % 3);
    let tl = group[tl_idx];
    if tl.center.cross(&group[tr_idx].center, &group[bl_idx].center) < 0.0 {
        std::mem::swap(&mut tr_idx, &mut bl_idx);
    }
    let (tr, bl) = (group[tr_idx], group[bl_idx]);

    let avg_module = (tl.module_size + tr.module_size + bl.module_size) / 3.0;
    let d_tr = tl.center.distance(&tr.center);
    let d_bl = tl.center.distance(&bl.center);
    if d_tr.max(d_bl) > d_tr.min(d_bl) * 1.5 {
        return None;
    }

    let dim1 = estimate_dimension_from_distance(d_tr, avg_module)?;
    let dim2 = estimate_dimension_from_distance(d_bl, avg_module)?;
    let dimension = if dim1 == dim2 {
        dim1
    } else if dim1.abs_diff(dim2) <= 4 {
        nearest_dimension((d_tr + d_bl) / 2.0 / avg_module + 7.0)?
    } else {
        return None;
    };

    let module_size = (d_tr + d_bl) / 2.0 / (dimension as f32 - 7.0);
    let module_ratio = module_size / avg_module;
    if !(0.7..=1.3).contains(&module_ratio) {
        return None;
    }

    Some(FinderTriple {
        top_left: tl.center,
        top_right: tr.center,
        bottom_left: bl.center,
        module_size,
        dimension,
        indices: [indices[tl_idx], indices[tr_idx], indices[bl_idx]],
    })
}

/// Symbol width implied by a centre-to-centre finder distance
pub fn estimate_dimension_from_distance(distance: f32, module_size: f32) -> Option<usize> {
    if module_size <= 0.0 {
        return None;
    }
    nearest_dimension(distance / module_size + 7.0)
}

fn nearest_dimension(raw_dim: f32) -> Option<usize> {
    if !raw_dim.is_finite() || raw_dim < 19.0 {
        return None;
    }
    let version = ((raw_dim - 17.0) / 4.0).round() as i32;
    if !(1..=40).contains(&version) {
        return None;
    }
    Some(17 + 4 * version as usize)
}

/// Every plausible triple, best candidates first
pub fn group_finder_patterns(patterns: &[FinderPattern]) -> Vec<FinderTriple> {
    let n = patterns.len();
    let mut triples = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let sizes = [i, j, k].map(|idx| patterns[idx].module_size);
                let min_size = sizes.iter().copied().fold(f32::INFINITY, f32::min);
                let max_size = sizes.iter().copied().fold(0.0f32, f32::max);
                if max_size > min_size * 1.5 {
                    continue;
                }
                if let Some(triple) = order_finder_patterns(patterns, [i, j, k]) {
                    triples.push(triple);
                }
            }
        }
    }

    triples.sort_by(|a, b| {
        group_score(patterns, a)
            .partial_cmp(&group_score(patterns, b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    triples
}

/// Lower is better: size spread, leg mismatch, skew, and weak support
fn group_score(patterns: &[FinderPattern], triple: &FinderTriple) -> f32 {
    let [a, b, c] = triple.indices.map(|i| &patterns[i]);
    let sizes = [a.module_size, b.module_size, c.module_size];
    let min_size = sizes.iter().copied().fold(f32::INFINITY, f32::min);
    let max_size = sizes.iter().copied().fold(0.0f32, f32::max);

    let d_tr = triple.top_left.distance(&triple.top_right);
    let d_bl = triple.top_left.distance(&triple.bottom_left);
    let legs = d_tr.max(d_bl) / d_tr.min(d_bl);

    let v1 = (
        triple.top_right.x - triple.top_left.x,
        triple.top_right.y - triple.top_left.y,
    );
    let v2 = (
        triple.bottom_left.x - triple.top_left.x,
        triple.bottom_left.y - triple.top_left.y,
    );
    let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / (d_tr * d_bl)).abs();

    let support = (a.count.min(b.count).min(c.count) as f32).max(1.0);
    (max_size / min_size) * 2.0 + legs + cos + 1.0 / support
}
