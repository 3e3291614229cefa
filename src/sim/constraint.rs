//! Spring-like point constraints

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{Body, BodyId, ConstraintId, cross, rotate};

/// Everything needed to create a constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDesc {
    pub body_a: BodyId,
    /// Anchor on `body_a`, body-local
    pub point_a: Vec2,
    pub body_b: BodyId,
    /// Anchor on `body_b`, body-local
    pub point_b: Vec2,
    /// Rest distance between the two anchors
    pub length: f32,
    /// 1.0 = rigid, smaller = springier
    pub stiffness: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    pub id: ConstraintId,
    pub body_a: BodyId,
    pub point_a: Vec2,
    pub body_b: BodyId,
    pub point_b: Vec2,
    pub length: f32,
    pub stiffness: f32,
}

impl Constraint {
    pub fn new(id: ConstraintId, desc: ConstraintDesc) -> Self {
        Self {
            id,
            body_a: desc.body_a,
            point_a: desc.point_a,
            body_b: desc.body_b,
            point_b: desc.point_b,
            length: desc.length.max(0.0),
            stiffness: desc.stiffness.clamp(0.0, 1.0),
        }
    }

    pub fn involves(&self, body: BodyId) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// Current anchor separation minus rest length
    pub fn stretch(&self, a: &Body, b: &Body) -> f32 {
        (a.world_point(self.point_a) - b.world_point(self.point_b)).length() - self.length
    }

    /// One relaxation pass: move both bodies (and rotate them) toward rest
    /// length, shared by inverse mass. `time_scale` = dt / base dt.
    pub fn solve(&self, a: &mut Body, b: &mut Body, time_scale: f32) {
        let r_a = rotate(self.point_a, a.angle);
        let r_b = rotate(self.point_b, b.angle);
        let delta = (a.position + r_a) - (b.position + r_b);
        let current = delta.length();
        if current < 1e-6 {
            return;
        }

        let difference = (current - self.length) / current;
        let stiffness = if self.stiffness < 1.0 {
            self.stiffness * time_scale
        } else {
            self.stiffness
        };
        let force: Vec2 = delta * difference * stiffness.min(1.0);

        let inv_mass_total = a.inverse_mass() + b.inverse_mass();
        let inv_inertia_total = a.inverse_inertia() + b.inverse_inertia();
        let resistance = inv_mass_total + inv_inertia_total;

        let share_a = a.inverse_mass() / inv_mass_total;
        let share_b = b.inverse_mass() / inv_mass_total;

        a.position -= force * share_a;
        a.angle -= cross(r_a, force) / resistance * a.inverse_inertia();

        b.position += force * share_b;
        b.angle += cross(r_b, force) / resistance * b.inverse_inertia();
    }
}
