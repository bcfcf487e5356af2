use arrayvec::ArrayVec;

use super::{JointKind, JointVariant, single};
use crate::{
    backend::ConstraintDesc,
    dynamics::{Body, BodyHandle},
    math::AdjustPrecision,
};

/// A ratchet joint works like a socket wrench: the relative rotation of the bodies can only
/// increase, in clicks of `ratchet` radians.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct RatchetJoint {
    /// First body constrained by the joint.
    pub body1: BodyHandle,
    /// Second body constrained by the joint.
    pub body2: BodyHandle,
    /// The initial offset of the ratchet clicks in radians.
    pub phase: f32,
    /// The distance between clicks in radians.
    pub ratchet: f32,
}

impl RatchetJoint {
    /// Creates a new [`RatchetJoint`] between two bodies.
    #[inline]
    pub const fn new(body1: BodyHandle, body2: BodyHandle, phase: f32, ratchet: f32) -> Self {
        Self {
            body1,
            body2,
            phase,
            ratchet,
        }
    }
}

impl JointVariant for RatchetJoint {
    const KIND: JointKind = JointKind::Ratchet;

    fn bodies(&self) -> [BodyHandle; 2] {
        [self.body1, self.body2]
    }

    fn constraints(&self, _bodies: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2> {
        single(ConstraintDesc::Ratchet {
            phase: self.phase.adjust_precision(),
            ratchet: self.ratchet.adjust_precision(),
        })
    }
}
