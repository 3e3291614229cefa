//! Minimal 2D rigid body simulation
//!
//! Rectangular bodies integrated with position Verlet, joined by spring-like
//! point constraints that are relaxed a few times per step. Time is measured
//! in milliseconds internally (gravity in px/ms², forces in mass·px/ms²) so
//! tuning constants read the same as in the browser physics engines the
//! ragdoll was first tuned against.
//!
//! There is no collision detection: ragdoll parts share a non-colliding
//! group and the world has no ground.

pub mod body;
pub mod constraint;
pub mod world;

pub use body::{Body, BodyDesc, RenderStyle};
pub use constraint::{Constraint, ConstraintDesc};
pub use world::World;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Handle to a body living in a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Handle to a constraint living in a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConstraintId(pub u32);

/// The physics primitives the ragdoll relies on
pub trait PhysicsWorld {
    /// Insert a rectangular body
    fn add_body(&mut self, desc: BodyDesc) -> BodyId;
    /// Remove a body and any constraint attached to it. Returns false if unknown.
    fn remove_body(&mut self, id: BodyId) -> bool;
    /// Insert a spring-like constraint between two bodies
    fn add_constraint(&mut self, desc: ConstraintDesc) -> ConstraintId;
    /// Returns false if unknown
    fn remove_constraint(&mut self, id: ConstraintId) -> bool;
    /// Current centre of mass of a body
    fn body_position(&self, id: BodyId) -> Option<Vec2>;
    /// Apply a force at a world point for the next step
    fn apply_force(&mut self, id: BodyId, point: Vec2, force: Vec2);
    /// Advance by `dt` seconds
    fn step(&mut self, dt: f32);
    /// Remove everything
    fn clear(&mut self);
    fn body_count(&self) -> usize;
    fn constraint_count(&self) -> usize;
}

/// Rotate a body-local vector into world orientation
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// 2D cross product (z component)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}
