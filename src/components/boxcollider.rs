use bevy_ecs::prelude::Component;

use crate::components::mapposition::MapPosition;

/// Axis-aligned box collider, positioned relative to the entity's
/// [`MapPosition`].
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl BoxCollider {
    /// Create a BoxCollider with given size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Modify BoxCollider with given offset
    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Returns (min_x, min_y, max_x, max_y) of the collider AABB for a given
    /// entity position. Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, position: MapPosition) -> (f32, f32, f32, f32) {
        let x0 = position.x + self.offset_x;
        let y0 = position.y + self.offset_y;
        let x1 = x0 + self.width;
        let y1 = y0 + self.height;
        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    /// AABB vs AABB overlap test against another BoxCollider at a different entity position.
    pub fn overlaps(&self, position: MapPosition, other: &Self, other_position: MapPosition) -> bool {
        let (ax0, ay0, ax1, ay1) = self.aabb(position);
        let (bx0, by0, bx1, by1) = other.aabb(other_position);
        ax0 < bx1 && ax1 > bx0 && ay0 < by1 && ay1 > by0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes() {
        let a = BoxCollider::new(10.0, 10.0);
        let b = BoxCollider::new(10.0, 10.0);
        assert!(a.overlaps(MapPosition::new(0.0, 0.0), &b, MapPosition::new(5.0, 5.0)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = BoxCollider::new(10.0, 10.0);
        let b = BoxCollider::new(10.0, 10.0);
        assert!(!a.overlaps(MapPosition::new(0.0, 0.0), &b, MapPosition::new(10.0, 0.0)));
    }

    #[test]
    fn negative_size_is_normalized() {
        let a = BoxCollider::new(-10.0, -10.0);
        assert_eq!(a.aabb(MapPosition::new(0.0, 0.0)), (-10.0, -10.0, 0.0, 0.0));
    }

    #[test]
    fn offset_moves_the_box() {
        let a = BoxCollider::new(4.0, 4.0).with_offset(-2.0, -2.0);
        assert_eq!(a.aabb(MapPosition::new(10.0, 10.0)), (8.0, 8.0, 12.0, 12.0));
    }
}
