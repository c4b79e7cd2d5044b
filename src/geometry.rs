use egui::{Pos2, Rect, Vec2};

use crate::path::PathData;

/// The kinds of primitive a [`crate::surface::DrawingSurface`] can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Rect,
    Ellipse,
    /// Marker hit-circles
    Circle,
    Path,
}

/// Typed geometry of a primitive, replaced as a whole on every update.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rect(Rect),
    /// Ellipse inscribed in the given bounding box
    Ellipse(Rect),
    Circle {
        center: Pos2,
        radius: f32,
    },
    Path {
        data: PathData,
        /// Box used for hit testing
        bounds: Rect,
    },
}

impl Geometry {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Geometry::Rect(_) => PrimitiveKind::Rect,
            Geometry::Ellipse(_) => PrimitiveKind::Ellipse,
            Geometry::Circle { .. } => PrimitiveKind::Circle,
            Geometry::Path { .. } => PrimitiveKind::Path,
        }
    }

    /// Axis-aligned bounds of the drawn primitive
    pub fn bounds(&self) -> Rect {
        match self {
            Geometry::Rect(rect) | Geometry::Ellipse(rect) => *rect,
            Geometry::Circle { center, radius } => {
                Rect::from_center_size(*center, Vec2::splat(radius * 2.0))
            }
            Geometry::Path { bounds, .. } => *bounds,
        }
    }

    /// Hit test used by the surface when routing primitive-scoped events.
    pub fn contains(&self, pos: Pos2) -> bool {
        match self {
            Geometry::Circle { center, radius } => center.distance(pos) <= *radius,
            _ => self.bounds().contains(pos),
        }
    }
}

/// Records which dimensions were negative on the last resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quadrant {
    pub neg_x: bool,
    pub neg_y: bool,
}

/// Turns a signed extent measured from `origin` into a rectangle with
/// non-negative size whose far corner is `origin + extent`.
pub fn normalize_extent(origin: Pos2, extent: Vec2) -> (Rect, Quadrant) {
    let mut min = origin;
    let mut size = extent;
    let mut quadrant = Quadrant::default();

    if size.x < 0.0 {
        min.x += size.x;
        size.x = -size.x;
        quadrant.neg_x = true;
    }
    if size.y < 0.0 {
        min.y += size.y;
        size.y = -size.y;
        quadrant.neg_y = true;
    }

    (Rect::from_min_size(min, size), quadrant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn test_positive_extent_keeps_origin() {
        let (rect, quadrant) = normalize_extent(pos2(10.0, 10.0), vec2(40.0, 30.0));
        assert_eq!(rect.min, pos2(10.0, 10.0));
        assert_eq!(rect.size(), vec2(40.0, 30.0));
        assert_eq!(quadrant, Quadrant::default());
    }

    #[test]
    fn test_negative_extent_shifts_min() {
        let (rect, quadrant) = normalize_extent(pos2(10.0, 10.0), vec2(-10.0, -5.0));
        assert_eq!(rect.min, pos2(0.0, 5.0));
        assert_eq!(rect.size(), vec2(10.0, 5.0));
        assert!(quadrant.neg_x && quadrant.neg_y);
    }

    #[test]
    fn test_mixed_signs() {
        let origin = pos2(20.0, 20.0);
        for extent in [vec2(7.0, -3.0), vec2(-7.0, 3.0), vec2(0.0, -1.0), vec2(-0.5, 0.0)] {
            let (rect, quadrant) = normalize_extent(origin, extent);
            assert!(rect.width() >= 0.0 && rect.height() >= 0.0);
            assert_eq!(quadrant.neg_x, extent.x < 0.0);
            assert_eq!(quadrant.neg_y, extent.y < 0.0);

            // The far corner always lands on origin + extent
            let far_x = if quadrant.neg_x { rect.min.x } else { rect.max.x };
            let far_y = if quadrant.neg_y { rect.min.y } else { rect.max.y };
            assert_eq!(pos2(far_x, far_y), origin + extent);
        }
    }

    #[test]
    fn test_circle_hit_test() {
        let circle = Geometry::Circle { center: pos2(5.0, 5.0), radius: 8.0 };
        assert!(circle.contains(pos2(10.0, 10.0)));
        assert!(!circle.contains(pos2(14.0, 14.0)));
        assert_eq!(circle.kind(), PrimitiveKind::Circle);
    }
}
