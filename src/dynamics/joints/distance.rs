use arrayvec::ArrayVec;

use super::{JointKind, JointVariant, single};
use crate::{
    backend::ConstraintDesc,
    dynamics::{Body, BodyHandle},
    math::{AdjustPrecision, Vec2},
};

/// A distance joint keeps two anchors at the distance they had when the joint was created,
/// while allowing the bodies to rotate.
///
/// The distance can be changed after the joint has been created.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceJoint {
    /// First body constrained by the joint.
    pub body1: BodyHandle,
    /// Second body constrained by the joint.
    pub body2: BodyHandle,
    /// The anchor on the first body, in its local space.
    pub anchor1: Vec2,
    /// The anchor on the second body, in its local space.
    pub anchor2: Vec2,
}

impl DistanceJoint {
    /// Creates a new [`DistanceJoint`] between two bodies.
    #[inline]
    pub const fn new(body1: BodyHandle, body2: BodyHandle, anchor1: Vec2, anchor2: Vec2) -> Self {
        Self {
            body1,
            body2,
            anchor1,
            anchor2,
        }
    }
}

impl JointVariant for DistanceJoint {
    const KIND: JointKind = JointKind::Distance;

    fn bodies(&self) -> [BodyHandle; 2] {
        [self.body1, self.body2]
    }

    fn constraints(&self, _bodies: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2> {
        single(ConstraintDesc::Pin {
            anchor1: self.anchor1.adjust_precision(),
            anchor2: self.anchor2.adjust_precision(),
        })
    }
}
