use arrayvec::ArrayVec;

use super::{JointKind, JointVariant, single};
use crate::{
    backend::ConstraintDesc,
    dynamics::{Body, BodyHandle},
    math::{AdjustPrecision, Vec2},
};

/// A pin joint attaches the bodies at a single point, letting them rotate freely around it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PinJoint {
    /// First body constrained by the joint.
    pub body1: BodyHandle,
    /// Second body constrained by the joint.
    pub body2: BodyHandle,
    /// The world-space point the bodies rotate around.
    pub pivot: Vec2,
}

impl PinJoint {
    /// Creates a new [`PinJoint`] between two bodies around a world-space pivot.
    #[inline]
    pub const fn new(body1: BodyHandle, body2: BodyHandle, pivot: Vec2) -> Self {
        Self {
            body1,
            body2,
            pivot,
        }
    }
}

impl JointVariant for PinJoint {
    const KIND: JointKind = JointKind::Pin;

    fn bodies(&self) -> [BodyHandle; 2] {
        [self.body1, self.body2]
    }

    fn constraints(&self, [body1, body2]: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2> {
        single(ConstraintDesc::Pivot {
            anchor1: body1.world_to_local(self.pivot).adjust_precision(),
            anchor2: body2.world_to_local(self.pivot).adjust_precision(),
        })
    }
}
