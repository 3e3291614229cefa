//! The ragdoll as an owned resource
//!
//! Owns the physics world (through the sequencer), the live pointer position
//! and the fixed-step accumulator. Stepping runs from construction until
//! [`RagdollSimulation::destroy`]; attaching only controls whether the
//! ragdoll is shown and listens to pointer/resize input.

use glam::Vec2;

use super::sequencer::StageSequencer;
use super::stage::{StageError, ragdoll_stages};
use super::strategy::{FlyInFromPointer, PointerFollow};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::game::RevealSequence;
use crate::renderer::{self, Frame, Viewport};
use crate::settings::Settings;
use crate::sim::{PhysicsWorld, World};

pub struct RagdollSimulation {
    sequencer: StageSequencer<World>,
    /// Pointer in world coordinates
    pointer: Vec2,
    scale: f32,
    pointer_offset: Vec2,
    accumulator: f32,
    viewport: Option<Viewport>,
}

impl RagdollSimulation {
    pub fn new(settings: &Settings) -> Self {
        let world = World::new(settings.gravity, settings.constraint_iterations);
        let pointer = Vec2::ZERO;
        let sequencer = StageSequencer::with_strategies(
            world,
            ragdoll_stages(settings.ragdoll_scale),
            Box::new(FlyInFromPointer),
            Box::new(PointerFollow {
                strength: settings.pointer_strength,
            }),
            pointer,
        );
        log::debug!("Ragdoll simulation created ({} stages)", sequencer.stages().len());
        Self {
            sequencer,
            pointer,
            scale: settings.ragdoll_scale,
            pointer_offset: Vec2::new(settings.pointer_offset.0, settings.pointer_offset.1),
            accumulator: 0.0,
            viewport: None,
        }
    }

    // === Lifecycle ===

    /// Start showing the ragdoll and accepting pointer/resize input.
    /// Returns false if already attached.
    pub fn attach(&mut self, viewport: Viewport) -> bool {
        if self.viewport.is_some() {
            return false;
        }
        log::debug!("Ragdoll attached ({}x{})", viewport.width, viewport.height);
        self.viewport = Some(viewport);
        true
    }

    /// Stop showing the ragdoll. Returns false if not attached.
    pub fn detach(&mut self) -> bool {
        if self.viewport.take().is_none() {
            return false;
        }
        log::debug!("Ragdoll detached");
        true
    }

    pub fn is_attached(&self) -> bool {
        self.viewport.is_some()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Detach, empty the world and stop stepping for good
    pub fn destroy(mut self) {
        self.detach();
        let mut world = self.sequencer.into_world();
        world.clear();
        log::debug!("Ragdoll simulation destroyed");
    }

    // === Input ===

    /// Pointer moved to client coordinates; ignored while detached
    pub fn pointer_moved(&mut self, client_x: f32, client_y: f32) {
        if self.viewport.is_none() {
            return;
        }
        self.pointer = Vec2::new(client_x, client_y) / self.scale - self.pointer_offset;
    }

    /// Canvas resized; ignored while detached
    pub fn resize(&mut self, width: f32, height: f32) {
        if let Some(view) = self.viewport.as_mut() {
            *view = view.resized(width, height);
        }
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    // === Stepping ===

    /// Run as many fixed steps as `dt` seconds allow; returns steps taken
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, 0.25);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.sequencer.apply_pointer_force(self.pointer);
            self.sequencer.world_mut().step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop the backlog rather than spiral
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    // === Stages ===

    pub fn next_stage(&mut self) -> Result<usize, StageError> {
        self.sequencer.next_stage(self.pointer)
    }

    pub fn is_final_stage(&self) -> bool {
        self.sequencer.is_final_stage()
    }

    pub fn stage_index(&self) -> Option<usize> {
        self.sequencer.stage_index()
    }

    pub fn stage_count(&self) -> usize {
        self.sequencer.stages().len()
    }

    pub fn reset_stages(&mut self) {
        self.sequencer.reset_stages(self.pointer);
    }

    /// Tear the whole ragdoll out of the world
    pub fn obliterate(&mut self) {
        self.sequencer.obliterate();
    }

    /// Labels of the parts currently in the world, in reveal order
    pub fn active_labels(&self) -> Vec<&str> {
        self.sequencer
            .active()
            .bodies()
            .iter()
            .map(|(label, _)| label.as_str())
            .collect()
    }

    pub fn world(&self) -> &World {
        self.sequencer.world()
    }

    pub fn frame(&self) -> Frame {
        renderer::frame(self.sequencer.world())
    }
}

impl RevealSequence for RagdollSimulation {
    fn reveal_next(&mut self) {
        if let Err(e) = self.next_stage() {
            log::warn!("No further ragdoll stage: {}", e);
        }
    }

    fn is_fully_revealed(&self) -> bool {
        self.is_final_stage()
    }

    fn tear_down(&mut self) {
        self.obliterate();
    }

    fn restart(&mut self) {
        self.reset_stages();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation() -> RagdollSimulation {
        RagdollSimulation::new(&Settings::default())
    }

    #[test]
    fn test_attach_detach_idempotent() {
        let mut sim = simulation();
        assert!(!sim.is_attached());
        assert!(!sim.detach());

        assert!(sim.attach(Viewport::new(800.0, 600.0)));
        assert!(!sim.attach(Viewport::new(100.0, 100.0)));
        assert_eq!(sim.viewport().unwrap().width, 800.0);

        assert!(sim.detach());
        assert!(!sim.detach());
    }

    #[test]
    fn test_pointer_mapping_and_detached_input() {
        let mut sim = simulation();
        sim.pointer_moved(500.0, 500.0);
        assert_eq!(sim.pointer(), Vec2::ZERO);

        sim.attach(Viewport::new(800.0, 600.0));
        sim.pointer_moved(390.0, 195.0);
        let expected = Vec2::new(390.0 / 1.3 - 150.0, 195.0 / 1.3 - 50.0);
        assert!((sim.pointer() - expected).length() < 1e-3);

        sim.resize(400.0, 300.0);
        assert_eq!(sim.viewport().unwrap().width, 400.0);
        sim.detach();
        sim.resize(10.0, 10.0);
        assert_eq!(sim.viewport(), None);
    }

    #[test]
    fn test_stepping_runs_while_detached() {
        let mut sim = simulation();
        let before = sim.world().bodies()[0].position;
        assert_eq!(sim.advance(SIM_DT * 3.5), 3);
        assert!(sim.world().bodies()[0].position != before);
        // Leftover half step carries over
        assert_eq!(sim.advance(SIM_DT * 0.75), 1);
        assert_eq!(sim.advance(0.0), 0);
    }

    #[test]
    fn test_substeps_capped() {
        let mut sim = simulation();
        assert_eq!(sim.advance(10.0), MAX_SUBSTEPS);
        assert!(sim.advance(0.0) <= 1);
    }

    #[test]
    fn test_reveal_sequence_walkthrough() {
        let mut sim = simulation();
        assert_eq!(sim.stage_index(), Some(0));
        assert_eq!(sim.active_labels(), ["handle"]);
        // Handle is never drawn
        assert!(sim.frame().shapes.is_empty());

        for _ in 1..sim.stage_count() {
            sim.reveal_next();
        }
        assert!(sim.is_fully_revealed());
        assert_eq!(sim.frame().shapes.len(), sim.stage_count() - 1);
        sim.reveal_next();
        assert_eq!(sim.stage_index(), Some(sim.stage_count() - 1));

        sim.tear_down();
        assert!(sim.world().bodies().is_empty());
        assert!(!sim.is_fully_revealed());

        sim.restart();
        assert_eq!(sim.active_labels(), ["handle"]);
    }

    #[test]
    fn test_destroy_after_attach() {
        let mut sim = simulation();
        sim.attach(Viewport::new(800.0, 600.0));
        sim.next_stage().unwrap();
        sim.destroy();
    }
}
