//! Rectangular rigid bodies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{BodyId, rotate};

/// Default mass per px²
pub const DEFAULT_DENSITY: f32 = 0.001;
/// Fraction of velocity lost to air per 60 Hz step
pub const DEFAULT_AIR_FRICTION: f32 = 0.01;

/// How a body is drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub visible: bool,
    /// CSS colour
    pub fill: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            visible: true,
            fill: "#FFBC42".to_string(),
        }
    }
}

impl RenderStyle {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::default()
        }
    }

    pub fn filled(fill: &str) -> Self {
        Self {
            visible: true,
            fill: fill.to_string(),
        }
    }
}

/// Everything needed to create a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub label: String,
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    /// Corner radii, clockwise from top-left
    pub chamfer: [f32; 4],
    pub density: f32,
    pub style: RenderStyle,
}

impl BodyDesc {
    pub fn rectangle(label: impl Into<String>, position: Vec2, width: f32, height: f32) -> Self {
        Self {
            label: label.into(),
            position,
            width,
            height,
            chamfer: [0.0; 4],
            density: DEFAULT_DENSITY,
            style: RenderStyle::default(),
        }
    }

    pub fn with_chamfer(mut self, chamfer: [f32; 4]) -> Self {
        self.chamfer = chamfer;
        self
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }
}

/// A body in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub label: String,
    pub position: Vec2,
    /// Position one step ago (velocity is implicit)
    pub position_prev: Vec2,
    pub angle: f32,
    pub angle_prev: f32,
    pub width: f32,
    pub height: f32,
    pub chamfer: [f32; 4],
    pub mass: f32,
    pub inertia: f32,
    pub air_friction: f32,
    pub style: RenderStyle,
    /// Accumulated for the next step, cleared after integrating
    pub force: Vec2,
    pub torque: f32,
}

impl Body {
    pub fn new(id: BodyId, desc: BodyDesc) -> Self {
        let mass = (desc.width * desc.height * desc.density).max(f32::EPSILON);
        let inertia = mass * (desc.width * desc.width + desc.height * desc.height) / 12.0;
        Self {
            id,
            label: desc.label,
            position: desc.position,
            position_prev: desc.position,
            angle: 0.0,
            angle_prev: 0.0,
            width: desc.width,
            height: desc.height,
            chamfer: desc.chamfer,
            mass,
            inertia,
            air_friction: DEFAULT_AIR_FRICTION,
            style: desc.style,
            force: Vec2::ZERO,
            torque: 0.0,
        }
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        1.0 / self.mass
    }

    #[inline]
    pub fn inverse_inertia(&self) -> f32 {
        1.0 / self.inertia
    }

    /// Displacement over the last step (px per step)
    pub fn velocity(&self) -> Vec2 {
        self.position - self.position_prev
    }

    /// Body-local point in world space
    pub fn world_point(&self, local: Vec2) -> Vec2 {
        self.position + rotate(local, self.angle)
    }

    /// Accumulate a force applied at world point `point`
    pub fn apply_force(&mut self, point: Vec2, force: Vec2) {
        self.force += force;
        self.torque += super::cross(point - self.position, force);
    }

    /// Position Verlet step. `dt` and `base_dt` in ms; `gravity` in px/ms².
    pub fn integrate(&mut self, dt: f32, base_dt: f32, gravity: Vec2) {
        let time_scale = dt / base_dt;
        let friction = 1.0 - self.air_friction * time_scale;
        let dt2 = dt * dt;

        let accel = self.force * self.inverse_mass() + gravity;
        let velocity = (self.position - self.position_prev) * friction * time_scale + accel * dt2;
        self.position_prev = self.position;
        self.position += velocity;

        let angular_accel = self.torque * self.inverse_inertia();
        let angular_velocity = (self.angle - self.angle_prev) * friction * time_scale + angular_accel * dt2;
        self.angle_prev = self.angle;
        self.angle += angular_velocity;

        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    /// Corners in world space, clockwise from top-left
    pub fn corners(&self) -> [Vec2; 4] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ]
        .map(|c| self.world_point(c))
    }
}
