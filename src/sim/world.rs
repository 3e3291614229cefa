//! Body/constraint container and fixed step

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{Body, BodyDesc, BodyId, Constraint, ConstraintDesc, ConstraintId, PhysicsWorld};
use crate::consts::{CONSTRAINT_ITERATIONS, GRAVITY};

/// Step length the friction/stiffness constants are tuned for (ms)
pub const BASE_DT_MS: f32 = 1000.0 / 60.0;
/// Gravity acceleration at scale 1.0 (px/ms²)
pub const GRAVITY_ACCEL: f32 = 0.001;

/// All live bodies and constraints, kept sorted by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Gravity scale (1.0 = default pull downwards)
    pub gravity: f32,
    pub constraint_iterations: u32,
    bodies: Vec<Body>,
    constraints: Vec<Constraint>,
    next_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new(GRAVITY, CONSTRAINT_ITERATIONS)
    }
}

impl World {
    pub fn new(gravity: f32, constraint_iterations: u32) -> Self {
        Self {
            gravity,
            constraint_iterations: constraint_iterations.max(1),
            bodies: Vec::new(),
            constraints: Vec::new(),
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &mut self.bodies[i])
    }

    pub fn find_by_label(&self, label: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.label == label)
    }

    /// Mutable access to two distinct bodies at once
    fn pair_mut(&mut self, a: BodyId, b: BodyId) -> Option<(&mut Body, &mut Body)> {
        let ia = self.bodies.binary_search_by_key(&a, |b| b.id).ok()?;
        let ib = self.bodies.binary_search_by_key(&b, |b| b.id).ok()?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (lo, hi) = self.bodies.split_at_mut(ib);
            Some((&mut lo[ia], &mut hi[0]))
        } else {
            let (lo, hi) = self.bodies.split_at_mut(ia);
            Some((&mut hi[0], &mut lo[ib]))
        }
    }

    fn solve_constraints(&mut self, time_scale: f32) {
        for i in 0..self.constraints.len() {
            let constraint = self.constraints[i].clone();
            if let Some((a, b)) = self.pair_mut(constraint.body_a, constraint.body_b) {
                constraint.solve(a, b, time_scale);
            }
        }
    }
}

impl PhysicsWorld for World {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.next_id());
        // Ids are increasing, so pushing keeps the order
        self.bodies.push(Body::new(id, desc));
        id
    }

    fn remove_body(&mut self, id: BodyId) -> bool {
        match self.bodies.binary_search_by_key(&id, |b| b.id) {
            Ok(i) => {
                self.bodies.remove(i);
                self.constraints.retain(|c| !c.involves(id));
                true
            }
            Err(_) => false,
        }
    }

    fn add_constraint(&mut self, desc: ConstraintDesc) -> ConstraintId {
        let id = ConstraintId(self.next_id());
        self.constraints.push(Constraint::new(id, desc));
        id
    }

    fn remove_constraint(&mut self, id: ConstraintId) -> bool {
        match self.constraints.binary_search_by_key(&id, |c| c.id) {
            Ok(i) => {
                self.constraints.remove(i);
                true
            }
            Err(_) => false,
        }
    }

    fn body_position(&self, id: BodyId) -> Option<Vec2> {
        self.body(id).map(|b| b.position)
    }

    fn apply_force(&mut self, id: BodyId, point: Vec2, force: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.apply_force(point, force);
        }
    }

    fn step(&mut self, dt: f32) {
        let dt_ms = dt * 1000.0;
        if dt_ms <= 0.0 {
            return;
        }
        let time_scale = dt_ms / BASE_DT_MS;
        // Screen coordinates: +y is down
        let gravity = Vec2::new(0.0, self.gravity * GRAVITY_ACCEL);

        for body in &mut self.bodies {
            body.integrate(dt_ms, BASE_DT_MS, gravity);
        }
        for _ in 0..self.constraint_iterations {
            self.solve_constraints(time_scale);
        }
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.constraints.clear();
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
