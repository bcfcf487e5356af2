use arrayvec::ArrayVec;

use super::{JointKind, JointVariant};
use crate::{
    backend::ConstraintDesc,
    dynamics::{Body, BodyHandle},
    math::{AdjustPrecision, Vec2},
};

/// A fixed joint prevents any relative movement of the attached bodies.
///
/// Both bodies are moved to the anchor when the joint is created. The joint is made of a
/// pivot that keeps the bodies together and a gear with a ratio of 1 that keeps their rotations
/// in sync. Collision between the bodies is disabled when the joint is created.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedJoint {
    /// First body constrained by the joint.
    pub body1: BodyHandle,
    /// Second body constrained by the joint.
    pub body2: BodyHandle,
    /// The world-space point both bodies are attached at.
    pub anchor: Vec2,
}

impl FixedJoint {
    /// Creates a new [`FixedJoint`] between two bodies at a world-space anchor.
    #[inline]
    pub const fn new(body1: BodyHandle, body2: BodyHandle, anchor: Vec2) -> Self {
        Self {
            body1,
            body2,
            anchor,
        }
    }
}

impl JointVariant for FixedJoint {
    const KIND: JointKind = JointKind::Fixed;

    fn bodies(&self) -> [BodyHandle; 2] {
        [self.body1, self.body2]
    }

    fn constraints(&self, [body1, body2]: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2> {
        let mut constraints = ArrayVec::new();
        constraints.push(ConstraintDesc::Pivot {
            anchor1: body1.world_to_local(self.anchor).adjust_precision(),
            anchor2: body2.world_to_local(self.anchor).adjust_precision(),
        });
        constraints.push(ConstraintDesc::Gear {
            phase: 0.0,
            ratio: 1.0,
        });
        constraints
    }

    fn snap_point(&self) -> Option<Vec2> {
        Some(self.anchor)
    }
}
