use arrayvec::ArrayVec;

use super::{JointKind, JointVariant, single};
use crate::{
    backend::ConstraintDesc,
    dynamics::{Body, BodyHandle},
    math::AdjustPrecision,
};

/// A gear joint keeps the angular velocity ratio of the bodies constant.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct GearJoint {
    /// First body constrained by the joint.
    pub body1: BodyHandle,
    /// Second body constrained by the joint.
    pub body2: BodyHandle,
    /// The angular offset between the bodies in radians.
    pub phase: f32,
    /// The ratio between the angular velocities of the bodies.
    pub ratio: f32,
}

impl GearJoint {
    /// Creates a new [`GearJoint`] between two bodies.
    #[inline]
    pub const fn new(body1: BodyHandle, body2: BodyHandle, phase: f32, ratio: f32) -> Self {
        Self {
            body1,
            body2,
            phase,
            ratio,
        }
    }
}

impl JointVariant for GearJoint {
    const KIND: JointKind = JointKind::Gear;

    fn bodies(&self) -> [BodyHandle; 2] {
        [self.body1, self.body2]
    }

    fn constraints(&self, _bodies: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2> {
        single(ConstraintDesc::Gear {
            phase: self.phase.adjust_precision(),
            ratio: self.ratio.adjust_precision(),
        })
    }
}
