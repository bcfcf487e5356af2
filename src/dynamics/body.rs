//! Rigid bodies that joints can be attached to.

use derive_more::From;

use super::joints::JointHandle;
use crate::{
    backend::RawBody,
    data_structures::arena::Index,
    math::{self, Vec2},
};

/// A handle to a [`Body`] stored in a [`PhysicsContext`](crate::PhysicsContext).
///
/// Handles stay valid until the body is removed, after which they resolve to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, From)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyHandle(pub Index);

/// A rigid body as seen by the joint layer.
///
/// The pose is stored in engine units, with the rotation in radians. The body itself is
/// simulated by the physics backend and referenced through [`Body::raw`].
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    raw: RawBody,
    position: Vec2,
    rotation: f32,
    joints: Vec<JointHandle>,
}

impl Body {
    pub(crate) fn new(raw: RawBody, position: Vec2, rotation: f32) -> Self {
        Self {
            raw,
            position,
            rotation,
            joints: Vec::new(),
        }
    }

    /// Returns the handle of the body in the physics backend.
    #[inline]
    pub fn raw(&self) -> RawBody {
        self.raw
    }

    /// Returns the world-space position of the body.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Returns the rotation of the body in radians.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Returns the joints attached to the body, in the order they were created.
    #[inline]
    pub fn joints(&self) -> &[JointHandle] {
        &self.joints
    }

    /// Transforms a point from the local space of the body into world space.
    #[inline]
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        math::local_to_world(self.position, self.rotation, local)
    }

    /// Transforms a world-space point into the local space of the body.
    #[inline]
    pub fn world_to_local(&self, world: Vec2) -> Vec2 {
        math::world_to_local(self.position, self.rotation, world)
    }

    pub(crate) fn set_pose(&mut self, position: Vec2, rotation: f32) {
        self.position = position;
        self.rotation = rotation;
    }

    pub(crate) fn append_joint(&mut self, joint: JointHandle) {
        self.joints.push(joint);
    }

    pub(crate) fn remove_joint(&mut self, joint: JointHandle) {
        self.joints.retain(|&attached| attached != joint);
    }
}
