//! Cosmetic behaviour around the stage sequence
//!
//! Where a new stage appears and how the anchor is pulled toward the pointer
//! are swappable so the sequencing itself can be tested without them.

use glam::Vec2;

use crate::sim::BodyDesc;

/// Decides where a stage body is inserted
pub trait Placement {
    fn place(&self, body: &BodyDesc, pointer: Vec2) -> Vec2;
}

/// Design-time origin moved to the pointer, so parts fly in from there
#[derive(Debug, Clone, Copy, Default)]
pub struct FlyInFromPointer;

impl Placement for FlyInFromPointer {
    fn place(&self, body: &BodyDesc, pointer: Vec2) -> Vec2 {
        body.position + pointer
    }
}

/// Insert at the design-time position, ignoring the pointer
#[derive(Debug, Clone, Copy, Default)]
pub struct DesignPosition;

impl Placement for DesignPosition {
    fn place(&self, body: &BodyDesc, _pointer: Vec2) -> Vec2 {
        body.position
    }
}

/// Force applied to the anchor once per tick
pub trait PointerForce {
    fn force(&self, anchor: Vec2, pointer: Vec2, active_bodies: usize) -> Vec2;
}

/// Pull proportional to the anchor-to-pointer vector, divided across the
/// bodies currently in the ragdoll
#[derive(Debug, Clone, Copy)]
pub struct PointerFollow {
    pub strength: f32,
}

impl PointerForce for PointerFollow {
    fn force(&self, anchor: Vec2, pointer: Vec2, active_bodies: usize) -> Vec2 {
        (pointer - anchor) * (self.strength / active_bodies.max(1) as f32)
    }
}

/// No pull at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPull;

impl PointerForce for NoPull {
    fn force(&self, _anchor: Vec2, _pointer: Vec2, _active_bodies: usize) -> Vec2 {
        Vec2::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fly_in_offsets_by_pointer() {
        let body = BodyDesc::rectangle("arm", Vec2::new(10.0, -5.0), 1.0, 1.0);
        assert_eq!(FlyInFromPointer.place(&body, Vec2::new(100.0, 50.0)), Vec2::new(110.0, 45.0));
        assert_eq!(DesignPosition.place(&body, Vec2::new(100.0, 50.0)), Vec2::new(10.0, -5.0));
    }

    #[test]
    fn test_pull_scales_inversely_with_parts() {
        let pull = PointerFollow { strength: 0.001 };
        let one = pull.force(Vec2::ZERO, Vec2::new(100.0, 0.0), 1);
        let four = pull.force(Vec2::ZERO, Vec2::new(100.0, 0.0), 4);
        assert!((one.x - 0.1).abs() < 1e-6);
        assert!((four.x * 4.0 - one.x).abs() < 1e-6);
        // Empty ragdoll does not divide by zero
        assert!(pull.force(Vec2::ZERO, Vec2::X, 0).is_finite());
        assert_eq!(NoPull.force(Vec2::ZERO, Vec2::X, 1), Vec2::ZERO);
    }
}
