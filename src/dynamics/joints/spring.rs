use arrayvec::ArrayVec;

use super::{JointKind, JointVariant, single};
use crate::{
    backend::ConstraintDesc,
    dynamics::{Body, BodyHandle},
    math::{AdjustPrecision, Vec2},
};

/// A spring joint connects two anchors with a damped spring.
///
/// The rest length of the spring is the distance between the anchors when the joint is created.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringJoint {
    /// First body constrained by the joint.
    pub body1: BodyHandle,
    /// Second body constrained by the joint.
    pub body2: BodyHandle,
    /// The anchor on the first body, in its local space.
    pub anchor1: Vec2,
    /// The anchor on the second body, in its local space.
    pub anchor2: Vec2,
    /// The stiffness of the spring.
    pub stiffness: f32,
    /// The damping of the spring.
    pub damping: f32,
}

impl SpringJoint {
    /// Creates a new [`SpringJoint`] between two bodies.
    #[inline]
    pub const fn new(
        body1: BodyHandle,
        body2: BodyHandle,
        anchor1: Vec2,
        anchor2: Vec2,
        stiffness: f32,
        damping: f32,
    ) -> Self {
        Self {
            body1,
            body2,
            anchor1,
            anchor2,
            stiffness,
            damping,
        }
    }

    /// Returns the rest length the spring gets when created between the given bodies.
    pub fn rest_length(&self, [body1, body2]: [&Body; 2]) -> f32 {
        body2
            .local_to_world(self.anchor1)
            .distance(body1.local_to_world(self.anchor2))
    }
}

impl JointVariant for SpringJoint {
    const KIND: JointKind = JointKind::Spring;

    fn bodies(&self) -> [BodyHandle; 2] {
        [self.body1, self.body2]
    }

    fn constraints(&self, bodies: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2> {
        single(ConstraintDesc::DampedSpring {
            anchor1: self.anchor1.adjust_precision(),
            anchor2: self.anchor2.adjust_precision(),
            rest_length: self.rest_length(bodies).adjust_precision(),
            stiffness: self.stiffness.adjust_precision(),
            damping: self.damping.adjust_precision(),
        })
    }
}
