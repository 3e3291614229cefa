//! Stage descriptors
//!
//! A stage is plain data: body descriptions at design-time positions plus
//! joints that name their bodies by label. Live handles only exist once a
//! stage has been inserted into a world.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{BodyDesc, RenderStyle};

/// Label of the anchor body every stage list must start with
pub const ANCHOR_LABEL: &str = "handle";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("stage list is empty")]
    Empty,
    #[error("first stage must start with the `handle` body")]
    MissingAnchor,
    #[error("body label `{0}` is used twice")]
    DuplicateLabel(String),
    #[error("joint refers to body `{0}` which is not added by this or an earlier stage")]
    UnknownBody(String),
    #[error("already at the final stage")]
    AlreadyFinal,
}

/// A joint between two bodies, by label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    pub body_a: String,
    pub point_a: Vec2,
    pub body_b: String,
    pub point_b: Vec2,
    pub length: f32,
    pub stiffness: f32,
}

impl JointSpec {
    /// Joint whose rest length is the anchor distance at design positions
    pub fn between(a: &BodyDesc, point_a: Vec2, b: &BodyDesc, point_b: Vec2, stiffness: f32) -> Self {
        let length = ((a.position + point_a) - (b.position + point_b)).length();
        Self {
            body_a: a.label.clone(),
            point_a,
            body_b: b.label.clone(),
            point_b,
            length,
            stiffness,
        }
    }
}

/// Parts added together on one wrong guess
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub bodies: Vec<BodyDesc>,
    pub joints: Vec<JointSpec>,
}

impl Stage {
    pub fn new(bodies: Vec<BodyDesc>, joints: Vec<JointSpec>) -> Self {
        Self { bodies, joints }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bodies.iter().map(|b| b.label.as_str())
    }
}

/// Validated, immutable reveal sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedStages")]
pub struct StageList {
    stages: Vec<Stage>,
}

/// Wire form of [`StageList`], validated on the way in
#[derive(Deserialize)]
struct UncheckedStages {
    stages: Vec<Stage>,
}

impl TryFrom<UncheckedStages> for StageList {
    type Error = StageError;

    fn try_from(raw: UncheckedStages) -> Result<Self, Self::Error> {
        StageList::new(raw.stages)
    }
}

impl StageList {
    /// Check that stage 0 is the anchor, labels are unique and every joint
    /// only references bodies from its own or an earlier stage.
    pub fn new(stages: Vec<Stage>) -> Result<Self, StageError> {
        let first = stages.first().ok_or(StageError::Empty)?;
        if first.bodies.first().map(|b| b.label.as_str()) != Some(ANCHOR_LABEL) {
            return Err(StageError::MissingAnchor);
        }

        let mut known: HashSet<&str> = HashSet::new();
        for stage in &stages {
            for label in stage.labels() {
                if !known.insert(label) {
                    return Err(StageError::DuplicateLabel(label.to_string()));
                }
            }
            for joint in &stage.joints {
                for label in [&joint.body_a, &joint.body_b] {
                    if !known.contains(label.as_str()) {
                        return Err(StageError::UnknownBody(label.clone()));
                    }
                }
            }
        }

        Ok(Self { stages })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false once validated
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    pub fn last_index(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }
}

const SKIN: &str = "#FFBC42";
const SHIRT: &str = "#E0A423";
/// Joints between limbs; the handle joint is rigid
const LIMB_STIFFNESS: f32 = 0.6;

/// The eleven-stage ragdoll, designed around the origin
pub fn ragdoll_stages(scale: f32) -> StageList {
    let s = scale;
    let at = |x: f32, y: f32| Vec2::new(x * s, y * s);
    let limb = |label: &str, x: f32, y: f32, h: f32| {
        BodyDesc::rectangle(label, at(x, y), 20.0 * s, h * s)
            .with_chamfer([10.0 * s; 4])
            .with_style(RenderStyle::filled(SKIN))
    };

    let head = BodyDesc::rectangle("head", at(0.0, -60.0), 34.0 * s, 40.0 * s)
        .with_chamfer([15.0 * s; 4])
        .with_style(RenderStyle::filled(SKIN));
    let chest = BodyDesc::rectangle("chest", at(0.0, 0.0), 55.0 * s, 80.0 * s)
        .with_chamfer([20.0 * s, 20.0 * s, 26.0 * s, 26.0 * s])
        .with_style(RenderStyle::filled(SHIRT));
    let handle = BodyDesc::rectangle(ANCHOR_LABEL, at(39.0, 50.0), 20.0 * s, 20.0 * s)
        .with_chamfer([10.0 * s; 4])
        .with_style(RenderStyle::hidden());

    let right_upper_arm = limb("right-upper-arm", 39.0, -15.0, 40.0);
    let right_lower_arm = limb("right-lower-arm", 39.0, 25.0, 60.0);
    let left_upper_arm = limb("left-upper-arm", -39.0, -15.0, 40.0);
    let left_lower_arm = limb("left-lower-arm", -39.0, 25.0, 60.0);
    let left_upper_leg = limb("left-upper-leg", -20.0, 57.0, 40.0);
    let left_lower_leg = limb("left-lower-leg", -20.0, 97.0, 60.0);
    let right_upper_leg = limb("right-upper-leg", 20.0, 57.0, 40.0);
    let right_lower_leg = limb("right-lower-leg", 20.0, 97.0, 60.0);

    let handle_joint = JointSpec::between(&handle, at(-10.0, 0.0), &right_lower_arm, at(0.0, 20.0), 1.0);
    let chest_to_right_upper_arm =
        JointSpec::between(&chest, at(24.0, -23.0), &right_upper_arm, at(0.0, -8.0), LIMB_STIFFNESS);
    let chest_to_left_upper_arm =
        JointSpec::between(&chest, at(-24.0, -23.0), &left_upper_arm, at(0.0, -8.0), LIMB_STIFFNESS);
    let chest_to_left_upper_leg =
        JointSpec::between(&chest, at(-10.0, 30.0), &left_upper_leg, at(0.0, -10.0), LIMB_STIFFNESS);
    let chest_to_right_upper_leg =
        JointSpec::between(&chest, at(10.0, 30.0), &right_upper_leg, at(0.0, -10.0), LIMB_STIFFNESS);
    let right_arm = JointSpec::between(
        &right_upper_arm,
        at(0.0, 15.0),
        &right_lower_arm,
        at(0.0, -25.0),
        LIMB_STIFFNESS,
    );
    let left_arm = JointSpec::between(
        &left_upper_arm,
        at(0.0, 15.0),
        &left_lower_arm,
        at(0.0, -25.0),
        LIMB_STIFFNESS,
    );
    let left_leg = JointSpec::between(
        &left_upper_leg,
        at(0.0, 20.0),
        &left_lower_leg,
        at(0.0, -20.0),
        LIMB_STIFFNESS,
    );
    let right_leg = JointSpec::between(
        &right_upper_leg,
        at(0.0, 20.0),
        &right_lower_leg,
        at(0.0, -20.0),
        LIMB_STIFFNESS,
    );
    let neck = JointSpec::between(&head, at(0.0, 25.0), &chest, at(0.0, -35.0), LIMB_STIFFNESS);

    let stages = vec![
        Stage::new(vec![handle], vec![]),
        Stage::new(vec![right_lower_arm], vec![handle_joint]),
        Stage::new(vec![right_upper_arm], vec![right_arm]),
        Stage::new(vec![chest], vec![chest_to_right_upper_arm]),
        Stage::new(vec![right_upper_leg], vec![chest_to_right_upper_leg]),
        Stage::new(vec![left_upper_leg], vec![chest_to_left_upper_leg]),
        Stage::new(vec![left_upper_arm], vec![chest_to_left_upper_arm]),
        Stage::new(vec![head], vec![neck]),
        Stage::new(vec![left_lower_leg], vec![left_leg]),
        Stage::new(vec![left_lower_arm], vec![left_arm]),
        Stage::new(vec![right_lower_leg], vec![right_leg]),
    ];

    debug_assert_eq!(StageList::new(stages.clone()).err(), None);
    StageList { stages }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(label: &str) -> BodyDesc {
        BodyDesc::rectangle(label, Vec2::ZERO, 10.0, 10.0)
    }

    fn joint(a: &str, b: &str) -> JointSpec {
        JointSpec {
            body_a: a.to_string(),
            point_a: Vec2::ZERO,
            body_b: b.to_string(),
            point_b: Vec2::ZERO,
            length: 0.0,
            stiffness: 1.0,
        }
    }

    #[test]
    fn test_ragdoll_order() {
        let stages = ragdoll_stages(1.3);
        assert_eq!(stages.len(), 11);
        let firsts: Vec<&str> = stages
            .iter()
            .map(|s| s.bodies[0].label.as_str())
            .collect();
        assert_eq!(
            firsts,
            [
                "handle",
                "right-lower-arm",
                "right-upper-arm",
                "chest",
                "right-upper-leg",
                "left-upper-leg",
                "left-upper-arm",
                "head",
                "left-lower-leg",
                "left-lower-arm",
                "right-lower-leg",
            ]
        );
        // Every stage after the anchor brings exactly one joint
        assert!(stages.get(0).unwrap().joints.is_empty());
        assert!(stages.iter().skip(1).all(|s| s.bodies.len() == 1 && s.joints.len() == 1));
        assert!(!stages.get(0).unwrap().bodies[0].style.visible);
    }

    #[test]
    fn test_rest_lengths_scale() {
        let small = ragdoll_stages(1.0);
        let big = ragdoll_stages(2.0);
        let a = small.get(1).unwrap().joints[0].length;
        let b = big.get(1).unwrap().joints[0].length;
        assert!((b - 2.0 * a).abs() < 1e-4);
        // handle (29,50) to right-lower-arm anchor (39,45)
        assert!((a - 125f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_deserialize_validates() {
        let err = serde_json::from_str::<StageList>(r#"{"stages":[]}"#).unwrap_err();
        assert!(err.to_string().contains("stage list is empty"));

        let headless = StageList {
            stages: vec![Stage::new(vec![body("chest")], vec![])],
        };
        let json = serde_json::to_string(&headless).unwrap();
        assert!(serde_json::from_str::<StageList>(&json).is_err());

        let stages = ragdoll_stages(1.3);
        let json = serde_json::to_string(&stages).unwrap();
        assert_eq!(serde_json::from_str::<StageList>(&json).unwrap(), stages);
    }

    #[test]
    fn test_validation() {
        assert_eq!(StageList::new(vec![]).unwrap_err(), StageError::Empty);
        assert_eq!(
            StageList::new(vec![Stage::new(vec![body("chest")], vec![])]).unwrap_err(),
            StageError::MissingAnchor
        );
        assert_eq!(
            StageList::new(vec![
                Stage::new(vec![body("handle")], vec![]),
                Stage::new(vec![body("arm")], vec![joint("handle", "leg")]),
                Stage::new(vec![body("leg")], vec![]),
            ])
            .unwrap_err(),
            StageError::UnknownBody("leg".to_string())
        );
        assert_eq!(
            StageList::new(vec![
                Stage::new(vec![body("handle")], vec![]),
                Stage::new(vec![body("handle")], vec![]),
            ])
            .unwrap_err(),
            StageError::DuplicateLabel("handle".to_string())
        );
        // Same-stage references are fine
        assert!(
            StageList::new(vec![
                Stage::new(vec![body("handle")], vec![]),
                Stage::new(vec![body("a"), body("b")], vec![joint("a", "b")]),
            ])
            .is_ok()
        );
    }
}
