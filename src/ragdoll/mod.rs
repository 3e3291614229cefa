//! Ragdoll that assembles itself one wrong guess at a time
//!
//! - `stage`: immutable stage descriptors and the built-in eleven stages
//! - `sequencer`: inserts stages into a physics world, one at a time
//! - `strategy`: where parts appear and how the anchor follows the pointer
//! - `simulation`: owned resource with attach/detach/destroy lifecycle

pub mod sequencer;
pub mod simulation;
pub mod stage;
pub mod strategy;

pub use sequencer::{ActiveComposite, StageSequencer};
pub use simulation::RagdollSimulation;
pub use stage::{ANCHOR_LABEL, JointSpec, Stage, StageError, StageList, ragdoll_stages};
pub use strategy::{DesignPosition, FlyInFromPointer, NoPull, Placement, PointerFollow, PointerForce};
