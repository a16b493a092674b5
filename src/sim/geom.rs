//! Axis-aligned box geometry for entities and hitboxes
//!
//! Every entity owns a `Body` (where its sprite is drawn) and an `Offset`
//! that insets or outsets that body into the `Rect` used for collisions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle stored by its edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, right: f32, bottom: f32) -> Self {
        Self {
            x,
            y,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.y
    }

    /// True if the rectangle encloses no area
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// Inset/outset turning a body into a hitbox
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Offset {
    pub const fn new(x: f32, y: f32, right: f32, bottom: f32) -> Self {
        Self {
            x,
            y,
            right,
            bottom,
        }
    }
}

/// Position and size of an entity in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Hitbox of this body under `offset`
    pub fn hitbox(&self, offset: &Offset) -> Rect {
        let x = self.pos.x + offset.x;
        let y = self.pos.y + offset.y;
        Rect {
            x,
            y,
            right: x + offset.right + self.size.x,
            bottom: y + offset.bottom + self.size.y,
        }
    }
}

/// Anything with a body and a collision offset
pub trait Hitboxed {
    fn body(&self) -> &Body;
    fn offset(&self) -> &Offset;

    fn hitbox(&self) -> Rect {
        self.body().hitbox(self.offset())
    }
}

/// Overlap test with horizontal proximity padding
///
/// Both projections must intersect. `proximity` widens each rectangle's
/// right edge so "near" interactions fire before contact.
pub fn overlap(a: &Rect, b: &Rect, proximity: f32) -> bool {
    if proximity <= 0.0 && (a.is_empty() || b.is_empty()) {
        return false;
    }
    let x_hit = !(a.right + proximity < b.x || a.x > b.right + proximity);
    let y_hit = !(a.bottom < b.y || a.y > b.bottom);
    x_hit && y_hit
}

/// Shift `body` so that its hitbox lies inside `bounds`
///
/// A hitbox pushed past an edge ends exactly on it. Left/top win when the
/// hitbox is larger than the bounds.
pub fn clamp_within(body: &mut Body, offset: &Offset, bounds: &Rect) {
    let hit = body.hitbox(offset);
    if hit.right > bounds.right {
        body.pos.x = bounds.right - (offset.x + offset.right + body.size.x);
    }
    if hit.bottom > bounds.bottom {
        body.pos.y = bounds.bottom - (offset.y + offset.bottom + body.size.y);
    }
    if hit.x < bounds.x {
        body.pos.x = bounds.x - offset.x;
    }
    if hit.y < bounds.y {
        body.pos.y = bounds.y - offset.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    #[test]
    fn test_hitbox_formula() {
        let body = Body::new(Vec2::new(100.0, 200.0), Vec2::new(90.0, 83.0));
        let offset = Offset::new(10.0, 15.0, -35.0, -25.0);
        let hit = body.hitbox(&offset);
        assert_eq!(hit, Rect::new(110.0, 215.0, 165.0, 273.0));
    }

    #[test]
    fn test_overlap_contact_and_miss() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(overlap(&a, &rect(5.0, 5.0, 10.0, 10.0), 0.0));
        // Touching edges still count
        assert!(overlap(&a, &rect(10.0, 0.0, 10.0, 10.0), 0.0));
        assert!(!overlap(&a, &rect(11.0, 0.0, 10.0, 10.0), 0.0));
        assert!(!overlap(&a, &rect(0.0, 11.0, 10.0, 10.0), 0.0));
    }

    #[test]
    fn test_overlap_proximity_is_horizontal_only() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let far_right = rect(50.0, 0.0, 10.0, 10.0);
        assert!(!overlap(&a, &far_right, 0.0));
        assert!(overlap(&a, &far_right, 80.0));

        let far_below = rect(0.0, 50.0, 10.0, 10.0);
        assert!(!overlap(&a, &far_below, 80.0));
    }

    #[test]
    fn test_zero_area_needs_proximity() {
        let dot = Rect::new(5.0, 5.0, 5.0, 5.0);
        assert!(!overlap(&dot, &dot, 0.0));
        assert!(overlap(&dot, &dot, 1.0));
    }

    #[test]
    fn test_clamp_right_edge_exact() {
        let bounds = Rect::new(0.0, 55.0, 707.0, 625.0);
        let offset = Offset::new(10.0, 15.0, -35.0, -25.0);
        let mut body = Body::new(Vec2::new(700.0, 300.0), Vec2::new(90.0, 83.0));
        clamp_within(&mut body, &offset, &bounds);
        assert_eq!(body.hitbox(&offset).right, bounds.right);
        assert_eq!(body.pos.y, 300.0);
    }

    #[test]
    fn test_clamp_top_left() {
        let bounds = Rect::new(0.0, 55.0, 707.0, 625.0);
        let offset = Offset::new(10.0, 15.0, -35.0, -25.0);
        let mut body = Body::new(Vec2::new(-200.0, -50.0), Vec2::new(90.0, 83.0));
        clamp_within(&mut body, &offset, &bounds);
        let hit = body.hitbox(&offset);
        assert_eq!(hit.x, bounds.x);
        assert_eq!(hit.y, bounds.y);
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            w in 1.0f32..200.0, h in 1.0f32..200.0,
            p in 0.0f32..100.0,
        ) {
            let a = rect(ax, ay, w, h);
            let b = rect(bx, by, w, h);
            prop_assert_eq!(overlap(&a, &b, p), overlap(&b, &a, p));
        }

        #[test]
        fn prop_clamped_hitbox_stays_inside(
            x in -2000.0f32..2000.0, y in -2000.0f32..2000.0,
        ) {
            let bounds = Rect::new(0.0, 50.0, 707.0, 708.0);
            let offset = Offset::new(10.0, 15.0, -35.0, -25.0);
            let mut body = Body::new(Vec2::new(x, y), Vec2::new(90.0, 83.0));
            clamp_within(&mut body, &offset, &bounds);
            let hit = body.hitbox(&offset);
            prop_assert!(hit.x >= bounds.x - 1e-3 && hit.right <= bounds.right + 1e-3);
            prop_assert!(hit.y >= bounds.y - 1e-3 && hit.bottom <= bounds.bottom + 1e-3);
        }
    }
}
