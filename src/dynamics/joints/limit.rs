use arrayvec::ArrayVec;

use super::{JointKind, JointVariant, single};
use crate::{
    backend::ConstraintDesc,
    dynamics::{Body, BodyHandle},
    math::{AdjustPrecision, Vec2},
};

/// A limit joint keeps the distance between two anchors within a range, like a rope with a slack.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct LimitJoint {
    /// First body constrained by the joint.
    pub body1: BodyHandle,
    /// Second body constrained by the joint.
    pub body2: BodyHandle,
    /// The anchor on the first body, in its local space.
    pub anchor1: Vec2,
    /// The anchor on the second body, in its local space.
    pub anchor2: Vec2,
    /// The minimum distance between the anchors.
    ///
    /// Default: `0.0`
    pub min: f32,
    /// The maximum distance between the anchors.
    ///
    /// If `None`, the current distance between the anchors is used when the joint is created.
    pub max: Option<f32>,
}

impl LimitJoint {
    /// Creates a new [`LimitJoint`] between two bodies.
    #[inline]
    pub const fn new(body1: BodyHandle, body2: BodyHandle, anchor1: Vec2, anchor2: Vec2) -> Self {
        Self {
            body1,
            body2,
            anchor1,
            anchor2,
            min: 0.0,
            max: None,
        }
    }

    /// Sets the minimum and maximum distance between the anchors.
    #[inline]
    pub const fn with_limits(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = Some(max);
        self
    }

    /// Returns the maximum distance used when none is given explicitly.
    ///
    /// This is the world-space distance between `anchor1` placed on the second body
    /// and `anchor2` placed on the first body.
    pub fn default_max(&self, [body1, body2]: [&Body; 2]) -> f32 {
        body2
            .local_to_world(self.anchor1)
            .distance(body1.local_to_world(self.anchor2))
    }
}

impl JointVariant for LimitJoint {
    const KIND: JointKind = JointKind::Limit;

    fn bodies(&self) -> [BodyHandle; 2] {
        [self.body1, self.body2]
    }

    fn constraints(&self, bodies: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2> {
        let max = self.max.unwrap_or_else(|| self.default_max(bodies));
        single(ConstraintDesc::Slide {
            anchor1: self.anchor1.adjust_precision(),
            anchor2: self.anchor2.adjust_precision(),
            min: self.min.adjust_precision(),
            max: max.adjust_precision(),
        })
    }
}
