//! Stage sequencer
//!
//! Walks the stage list one wrong guess at a time, inserting each stage's
//! bodies and joints into the world it owns. The stage index always names the
//! last stage that was inserted; `None` means the ragdoll is gone entirely
//! (before construction finishes, or after [`StageSequencer::obliterate`]).

use glam::Vec2;

use super::stage::{Stage, StageError, StageList};
use super::strategy::{FlyInFromPointer, NoPull, Placement, PointerForce};
use crate::sim::{BodyId, ConstraintDesc, ConstraintId, PhysicsWorld};

/// Live handles of everything the sequencer has inserted
#[derive(Debug, Clone, Default)]
pub struct ActiveComposite {
    bodies: Vec<(String, BodyId)>,
    constraints: Vec<ConstraintId>,
}

impl ActiveComposite {
    pub fn bodies(&self) -> &[(String, BodyId)] {
        &self.bodies
    }

    pub fn constraints(&self) -> &[ConstraintId] {
        &self.constraints
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn find(&self, label: &str) -> Option<BodyId> {
        self.bodies
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, id)| *id)
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() && self.constraints.is_empty()
    }
}

pub struct StageSequencer<W: PhysicsWorld> {
    world: W,
    stages: StageList,
    index: Option<usize>,
    active: ActiveComposite,
    placement: Box<dyn Placement>,
    pull: Box<dyn PointerForce>,
}

impl<W: PhysicsWorld> StageSequencer<W> {
    /// Sequencer with parts flying in from the pointer and no pull
    pub fn new(world: W, stages: StageList, pointer: Vec2) -> Self {
        Self::with_strategies(world, stages, Box::new(FlyInFromPointer), Box::new(NoPull), pointer)
    }

    /// Builds the sequencer and inserts stage 0 (the anchor)
    pub fn with_strategies(
        world: W,
        stages: StageList,
        placement: Box<dyn Placement>,
        pull: Box<dyn PointerForce>,
        pointer: Vec2,
    ) -> Self {
        let mut sequencer = Self {
            world,
            stages,
            index: None,
            active: ActiveComposite::default(),
            placement,
            pull,
        };
        sequencer.seed(pointer);
        sequencer
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn stages(&self) -> &StageList {
        &self.stages
    }

    pub fn active(&self) -> &ActiveComposite {
        &self.active
    }

    /// Last inserted stage
    pub fn stage_index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_final_stage(&self) -> bool {
        self.index == Some(self.stages.last_index())
    }

    /// Live handle of the anchor body, if the ragdoll exists
    pub fn anchor(&self) -> Option<BodyId> {
        self.active.bodies.first().map(|(_, id)| *id)
    }

    /// Insert the next stage around `pointer`. Returns the new index.
    pub fn next_stage(&mut self, pointer: Vec2) -> Result<usize, StageError> {
        let next = match self.index {
            None => 0,
            Some(i) if i >= self.stages.last_index() => return Err(StageError::AlreadyFinal),
            Some(i) => i + 1,
        };
        let Some(stage) = self.stages.get(next) else {
            return Err(StageError::AlreadyFinal);
        };
        let stage = stage.clone();
        self.insert(&stage, pointer)?;
        self.index = Some(next);
        log::debug!(
            "Ragdoll stage {}/{}: {}",
            next,
            self.stages.last_index(),
            stage.labels().collect::<Vec<_>>().join(", ")
        );
        Ok(next)
    }

    fn insert(&mut self, stage: &Stage, pointer: Vec2) -> Result<(), StageError> {
        let first_new = self.active.bodies.len();
        for desc in &stage.bodies {
            let mut desc = desc.clone();
            desc.position = self.placement.place(&desc, pointer);
            let label = desc.label.clone();
            let id = self.world.add_body(desc);
            self.active.bodies.push((label, id));
        }

        // Labels resolve to live handles only now
        let mut joints = Vec::with_capacity(stage.joints.len());
        for joint in &stage.joints {
            let (Some(body_a), Some(body_b)) =
                (self.active.find(&joint.body_a), self.active.find(&joint.body_b))
            else {
                let missing = if self.active.find(&joint.body_a).is_none() {
                    joint.body_a.clone()
                } else {
                    joint.body_b.clone()
                };
                // Stages are atomic: take back this stage's bodies
                for (_, id) in self.active.bodies.drain(first_new..) {
                    self.world.remove_body(id);
                }
                return Err(StageError::UnknownBody(missing));
            };
            joints.push(ConstraintDesc {
                body_a,
                point_a: joint.point_a,
                body_b,
                point_b: joint.point_b,
                length: joint.length,
                stiffness: joint.stiffness,
            });
        }
        for desc in joints {
            let id = self.world.add_constraint(desc);
            self.active.constraints.push(id);
        }
        Ok(())
    }

    /// Remove every active body and joint, then insert stage 0 again
    pub fn reset_stages(&mut self, pointer: Vec2) {
        self.obliterate();
        self.seed(pointer);
    }

    /// Remove every active body and joint without re-seeding
    pub fn obliterate(&mut self) {
        for id in self.active.constraints.drain(..) {
            self.world.remove_constraint(id);
        }
        for (_, id) in self.active.bodies.drain(..) {
            self.world.remove_body(id);
        }
        self.index = None;
    }

    fn seed(&mut self, pointer: Vec2) {
        if let Err(e) = self.next_stage(pointer) {
            log::error!("Failed to insert anchor stage: {}", e);
        }
    }

    /// Pull the anchor toward the pointer (call once per tick)
    pub fn apply_pointer_force(&mut self, pointer: Vec2) {
        let Some(anchor) = self.anchor() else {
            return;
        };
        let Some(position) = self.world.body_position(anchor) else {
            return;
        };
        let force = self.pull.force(position, pointer, self.active.body_count());
        if force != Vec2::ZERO {
            self.world.apply_force(anchor, position, force);
        }
    }

    /// Hand the world back, e.g. for teardown
    pub fn into_world(self) -> W {
        self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::ragdoll::stage::ragdoll_stages;
    use crate::ragdoll::strategy::{DesignPosition, PointerFollow};
    use crate::sim::World;
    use proptest::prelude::*;

    fn sequencer() -> StageSequencer<World> {
        StageSequencer::new(World::new(0.0, 2), ragdoll_stages(1.0), Vec2::ZERO)
    }

    #[test]
    fn test_construction_inserts_anchor() {
        let seq = sequencer();
        assert_eq!(seq.stage_index(), Some(0));
        assert!(!seq.is_final_stage());
        assert_eq!(seq.world().body_count(), 1);
        assert_eq!(seq.world().constraint_count(), 0);
        let anchor = seq.anchor().unwrap();
        assert_eq!(seq.world().body(anchor).unwrap().label, "handle");
    }

    #[test]
    fn test_advance_to_final_then_stop() {
        let mut seq = sequencer();
        let n = seq.stages().len();
        for expected in 1..n {
            assert_eq!(seq.next_stage(Vec2::ZERO), Ok(expected));
            assert_eq!(seq.world().body_count(), expected + 1);
            assert_eq!(seq.world().constraint_count(), expected);
        }
        assert!(seq.is_final_stage());

        assert_eq!(seq.next_stage(Vec2::ZERO), Err(StageError::AlreadyFinal));
        assert_eq!(seq.stage_index(), Some(n - 1));
        assert_eq!(seq.world().body_count(), n);
        assert_eq!(seq.world().constraint_count(), n - 1);
    }

    #[test]
    fn test_parts_fly_in_from_pointer() {
        let mut seq = sequencer();
        let pointer = Vec2::new(300.0, 200.0);
        seq.next_stage(pointer).unwrap();
        let arm = seq.active().find("right-lower-arm").unwrap();
        assert_eq!(seq.world().body_position(arm), Some(Vec2::new(339.0, 225.0)));
    }

    #[test]
    fn test_design_position_placement() {
        let mut seq = StageSequencer::with_strategies(
            World::new(0.0, 2),
            ragdoll_stages(1.0),
            Box::new(DesignPosition),
            Box::new(NoPull),
            Vec2::new(500.0, 500.0),
        );
        seq.next_stage(Vec2::new(500.0, 500.0)).unwrap();
        let arm = seq.active().find("right-lower-arm").unwrap();
        assert_eq!(seq.world().body_position(arm), Some(Vec2::new(39.0, 25.0)));
    }

    #[test]
    fn test_reset_clears_and_reseeds() {
        let mut seq = sequencer();
        for _ in 0..5 {
            seq.next_stage(Vec2::ZERO).unwrap();
        }
        let old_anchor = seq.anchor();
        seq.reset_stages(Vec2::ZERO);

        assert_eq!(seq.stage_index(), Some(0));
        assert_eq!(seq.world().body_count(), 1);
        assert_eq!(seq.world().constraint_count(), 0);
        assert_ne!(seq.anchor(), old_anchor);

        let n = seq.stages().len();
        for _ in 1..n {
            seq.next_stage(Vec2::ZERO).unwrap();
        }
        assert!(seq.is_final_stage());
        assert!(seq.next_stage(Vec2::ZERO).is_err());
        assert_eq!(seq.stage_index(), Some(n - 1));
    }

    #[test]
    fn test_obliterate_empties_world() {
        let mut seq = sequencer();
        seq.next_stage(Vec2::ZERO).unwrap();
        seq.obliterate();
        assert_eq!(seq.stage_index(), None);
        assert!(!seq.is_final_stage());
        assert!(seq.active().is_empty());
        assert_eq!(seq.world().body_count(), 0);
        assert_eq!(seq.anchor(), None);
        // Pulling a missing anchor is a no-op
        seq.apply_pointer_force(Vec2::ONE);

        // Next stage after obliterate starts over at the anchor
        assert_eq!(seq.next_stage(Vec2::ZERO), Ok(0));
        assert_eq!(seq.world().body_count(), 1);
    }

    #[test]
    fn test_pointer_force_drags_anchor() {
        let mut seq = StageSequencer::with_strategies(
            World::new(0.0, 2),
            ragdoll_stages(1.0),
            Box::new(FlyInFromPointer),
            Box::new(PointerFollow { strength: 0.001 }),
            Vec2::ZERO,
        );
        let anchor = seq.anchor().unwrap();
        let start = seq.world().body_position(anchor).unwrap();
        let pointer = start + Vec2::new(200.0, 0.0);
        for _ in 0..5 {
            seq.apply_pointer_force(pointer);
            seq.world_mut().step(SIM_DT);
        }
        let end = seq.world().body_position(anchor).unwrap();
        assert!(end.x > start.x);
        assert!((end.y - start.y).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_index_never_exceeds_last(advances in 0usize..30) {
            let mut seq = sequencer();
            let last = seq.stages().last_index();
            for _ in 0..advances {
                let _ = seq.next_stage(Vec2::ZERO);
            }
            prop_assert_eq!(seq.stage_index(), Some(advances.min(last)));
            prop_assert_eq!(seq.is_final_stage(), advances >= last);
        }
    }
}
