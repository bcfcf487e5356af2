use arrayvec::ArrayVec;

use super::{JointKind, JointVariant, single};
use crate::{
    backend::ConstraintDesc,
    dynamics::{Body, BodyHandle},
    math::AdjustPrecision,
};

/// A rotary spring joint pulls the relative angle of the bodies towards a rest angle.
///
/// The rest angle is the relative rotation of the bodies when the joint is created.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct RotarySpringJoint {
    /// First body constrained by the joint.
    pub body1: BodyHandle,
    /// Second body constrained by the joint.
    pub body2: BodyHandle,
    /// The stiffness of the spring.
    pub stiffness: f32,
    /// The damping of the spring.
    pub damping: f32,
}

impl RotarySpringJoint {
    /// Creates a new [`RotarySpringJoint`] between two bodies.
    #[inline]
    pub const fn new(body1: BodyHandle, body2: BodyHandle, stiffness: f32, damping: f32) -> Self {
        Self {
            body1,
            body2,
            stiffness,
            damping,
        }
    }
}

impl JointVariant for RotarySpringJoint {
    const KIND: JointKind = JointKind::RotarySpring;

    fn bodies(&self) -> [BodyHandle; 2] {
        [self.body1, self.body2]
    }

    fn constraints(&self, [body1, body2]: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2> {
        let rest_angle = body2.rotation() - body1.rotation();
        single(ConstraintDesc::DampedRotarySpring {
            rest_angle: rest_angle.adjust_precision(),
            stiffness: self.stiffness.adjust_precision(),
            damping: self.damping.adjust_precision(),
        })
    }
}
