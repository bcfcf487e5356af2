use arrayvec::ArrayVec;

use super::{JointKind, JointVariant, single};
use crate::{
    backend::ConstraintDesc,
    dynamics::{Body, BodyHandle},
    math::AdjustPrecision,
};

/// A rotary limit joint keeps the relative angle of the bodies within a range.
///
/// Without explicit limits, both limits are 0 and the relative rotation is locked.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct RotaryLimitJoint {
    /// First body constrained by the joint.
    pub body1: BodyHandle,
    /// Second body constrained by the joint.
    pub body2: BodyHandle,
    /// The minimum relative angle in radians.
    ///
    /// Default: `0.0`
    pub min: f32,
    /// The maximum relative angle in radians.
    ///
    /// Default: `0.0`
    pub max: f32,
}

impl RotaryLimitJoint {
    /// Creates a new [`RotaryLimitJoint`] between two bodies.
    #[inline]
    pub const fn new(body1: BodyHandle, body2: BodyHandle) -> Self {
        Self {
            body1,
            body2,
            min: 0.0,
            max: 0.0,
        }
    }

    /// Sets the minimum and maximum relative angle in radians.
    #[inline]
    pub const fn with_limits(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

impl JointVariant for RotaryLimitJoint {
    const KIND: JointKind = JointKind::RotaryLimit;

    fn bodies(&self) -> [BodyHandle; 2] {
        [self.body1, self.body2]
    }

    fn constraints(&self, _bodies: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2> {
        single(ConstraintDesc::RotaryLimit {
            min: self.min.adjust_precision(),
            max: self.max.adjust_precision(),
        })
    }
}
