//! Path sampling and densification.

use crate::geom::{PathCommand, Point};

/// Upper bound on subdivisions of one span. Any span needing more than this
/// is degenerate geometry (coordinates far outside any plausible canvas);
/// its extra points would be dropped at the grid bounds anyway.
const MAX_SEGMENTS_PER_SPAN: f64 = 4096.0;

/// Walk a path command list and collect sample points.
///
/// `move` and `line` contribute their endpoints directly. Curve commands
/// contribute **only their terminal endpoint**: control points are never
/// sampled into intermediate positions. This is a deliberate fidelity gap -
/// grid resolution downstream is coarse enough that true curve flattening is
/// rarely visible - so callers must not rely on intermediate points along a
/// curve being present.
#[must_use]
pub fn sample_path(commands: &[PathCommand]) -> Vec<Point> {
    commands.iter().map(PathCommand::endpoint).collect()
}

/// Densify an ordered point list with straight-line interpolation so that
/// consecutive output points are never farther apart than `step` canvas
/// units.
///
/// This is what keeps the rasterizer from leaving gaps when a grid cell is
/// smaller than the distance between two consecutive path vertices. Lists of
/// fewer than two points are returned unchanged.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn interpolate(points: &[Point], step: f64) -> Vec<Point> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    if step <= 0.0 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len());
    out.push(*first);

    for pair in points.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let distance = from.distance_to(to);
        // ceil so the final sub-segment is never longer than `step`
        let wanted = (distance / step).ceil();
        let segments = if wanted.is_finite() {
            wanted.clamp(1.0, MAX_SEGMENTS_PER_SPAN) as u64
        } else {
            1
        };
        for i in 1..=segments {
            let t = i as f64 / segments as f64;
            out.push(Point::new(
                from.x + (to.x - from.x) * t,
                from.y + (to.y - from.y) * t,
            ));
        }
    }

    out
}
