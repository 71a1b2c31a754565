//! Conversion of drawing primitives into perimeter point sets.

use std::f64::consts::TAU;

use crate::geom::Point;
use crate::sampler::sample_path;
use crate::shape::Shape;

/// Angular step for circle/ellipse perimeter sampling (~31 samples per turn).
pub const ANGULAR_STEP_RADIANS: f64 = 0.2;

/// Convert a shape into the point set tracing its outline.
///
/// Shapes missing a required numeric field, and shape types this crate does
/// not know, yield an empty point set: the caller simply rasterizes nothing
/// for that shape, and one bad shape never prevents the rest of the canvas
/// from being encoded.
#[must_use]
pub fn shape_points(shape: &Shape) -> Vec<Point> {
    match shape {
        Shape::Circle { cx, cy, r, .. } => {
            let (Some(cx), Some(cy), Some(r)) = (*cx, *cy, *r) else {
                return Vec::new();
            };
            perimeter(cx, cy, r, r)
        }

        Shape::Ellipse { cx, cy, rx, ry, .. } => {
            let (Some(cx), Some(cy), Some(rx), Some(ry)) = (*cx, *cy, *rx, *ry) else {
                return Vec::new();
            };
            perimeter(cx, cy, rx, ry)
        }

        Shape::Rect {
            x,
            y,
            width,
            height,
            ..
        } => {
            let (Some(x), Some(y), Some(w), Some(h)) = (*x, *y, *width, *height) else {
                return Vec::new();
            };
            vec![
                Point::new(x, y),
                Point::new(x + w, y),
                Point::new(x + w, y + h),
                Point::new(x, y + h),
                Point::new(x, y),
            ]
        }

        Shape::Line { x1, y1, x2, y2, .. } => {
            let (Some(x1), Some(y1), Some(x2), Some(y2)) = (*x1, *y1, *x2, *y2) else {
                return Vec::new();
            };
            vec![Point::new(x1, y1), Point::new(x2, y2)]
        }

        Shape::Polygon { points, .. } => {
            let mut out: Vec<Point> = points.iter().map(|[x, y]| Point::new(*x, *y)).collect();
            if let Some(first) = out.first().copied() {
                out.push(first);
            }
            out
        }

        Shape::Path { commands, .. } => sample_path(commands),

        Shape::Unknown => Vec::new(),
    }
}

fn perimeter(cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<Point> {
    let mut points = Vec::new();
    let mut angle = 0.0;
    while angle < TAU {
        points.push(Point::new(
            cx + rx * angle.cos(),
            cy + ry * angle.sin(),
        ));
        angle += ANGULAR_STEP_RADIANS;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeStyle;

    #[test]
    fn test_circle_perimeter_sample_count() {
        let shape = Shape::Circle {
            cx: Some(50.0),
            cy: Some(50.0),
            r: Some(10.0),
            style: ShapeStyle::default(),
        };
        let points = shape_points(&shape);

        // TAU / 0.2 = ~31.4, so 32 samples starting at angle 0
        assert_eq!(points.len(), 32);
        for p in &points {
            let d = Point::new(50.0, 50.0).distance_to(*p);
            assert!((d - 10.0).abs() < 1e-9, "point not on perimeter: {p:?}");
        }
    }

    #[test]
    fn test_rect_closes_on_first_corner() {
        let shape = Shape::Rect {
            x: Some(0.0),
            y: Some(0.0),
            width: Some(20.0),
            height: Some(10.0),
            style: ShapeStyle::default(),
        };
        let points = shape_points(&shape);

        assert_eq!(points.len(), 5);
        assert_eq!(points.first(), points.last());
        assert_eq!(points[2], Point::new(20.0, 10.0));
    }

    #[test]
    fn test_polygon_closes_on_first_vertex() {
        let shape = Shape::Polygon {
            points: vec![[0.0, 0.0], [10.0, 0.0], [5.0, 8.0]],
            style: ShapeStyle::default(),
        };
        let points = shape_points(&shape);

        assert_eq!(points.len(), 4);
        assert_eq!(points.first(), points.last());
    }

    #[test]
    fn test_incomplete_shape_yields_nothing() {
        let shape = Shape::Circle {
            cx: Some(10.0),
            cy: Some(10.0),
            r: None,
            style: ShapeStyle::default(),
        };
        assert!(shape_points(&shape).is_empty());
    }

    #[test]
    fn test_unknown_shape_yields_nothing() {
        assert!(shape_points(&Shape::Unknown).is_empty());
    }

    #[test]
    fn test_empty_polygon_yields_nothing() {
        let shape = Shape::Polygon {
            points: Vec::new(),
            style: ShapeStyle::default(),
        };
        assert!(shape_points(&shape).is_empty());
    }
}
