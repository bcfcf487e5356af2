use arrayvec::ArrayVec;

use super::{JointKind, JointVariant, single};
use crate::{
    backend::ConstraintDesc,
    dynamics::{Body, BodyHandle},
    math::AdjustPrecision,
};

/// A motor joint keeps the relative angular velocity of the bodies at a target rate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorJoint {
    /// First body constrained by the joint.
    pub body1: BodyHandle,
    /// Second body constrained by the joint.
    pub body2: BodyHandle,
    /// The target relative angular velocity in radians per second.
    pub rate: f32,
}

impl MotorJoint {
    /// Creates a new [`MotorJoint`] between two bodies.
    #[inline]
    pub const fn new(body1: BodyHandle, body2: BodyHandle, rate: f32) -> Self {
        Self { body1, body2, rate }
    }
}

impl JointVariant for MotorJoint {
    const KIND: JointKind = JointKind::Motor;

    fn bodies(&self) -> [BodyHandle; 2] {
        [self.body1, self.body2]
    }

    fn constraints(&self, _bodies: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2> {
        single(ConstraintDesc::SimpleMotor {
            rate: self.rate.adjust_precision(),
        })
    }
}
