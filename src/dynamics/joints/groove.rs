use arrayvec::ArrayVec;

use super::{JointKind, JointVariant, single};
use crate::{
    backend::ConstraintDesc,
    dynamics::{Body, BodyHandle},
    math::{AdjustPrecision, Vec2},
};

/// A groove joint lets an anchor on the second body slide along a segment on the first body.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct GrooveJoint {
    /// First body constrained by the joint. The groove is attached to this body.
    pub body1: BodyHandle,
    /// Second body constrained by the joint.
    pub body2: BodyHandle,
    /// The start of the groove, in the local space of the first body.
    pub groove_a: Vec2,
    /// The end of the groove, in the local space of the first body.
    pub groove_b: Vec2,
    /// The anchor on the second body, in its local space.
    pub anchor2: Vec2,
}

impl GrooveJoint {
    /// Creates a new [`GrooveJoint`] between two bodies.
    #[inline]
    pub const fn new(
        body1: BodyHandle,
        body2: BodyHandle,
        groove_a: Vec2,
        groove_b: Vec2,
        anchor2: Vec2,
    ) -> Self {
        Self {
            body1,
            body2,
            groove_a,
            groove_b,
            anchor2,
        }
    }
}

impl JointVariant for GrooveJoint {
    const KIND: JointKind = JointKind::Groove;

    fn bodies(&self) -> [BodyHandle; 2] {
        [self.body1, self.body2]
    }

    fn constraints(&self, _bodies: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2> {
        single(ConstraintDesc::Groove {
            groove_a: self.groove_a.adjust_precision(),
            groove_b: self.groove_b.adjust_precision(),
            anchor2: self.anchor2.adjust_precision(),
        })
    }
}
