use thiserror::Error;

use super::{JointHandle, JointKind};
use crate::{
    backend::{ConstraintKind, ConstraintParam},
    dynamics::{body::BodyHandle, world::WorldHandle},
};

/// An error returned when a joint operation cannot be carried out.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum JointError {
    /// The body does not exist or has been removed.
    #[error("body {0:?} does not exist")]
    NoSuchBody(BodyHandle),
    /// A joint was given the same body twice.
    #[error("a joint cannot connect body {0:?} to itself")]
    SameBody(BodyHandle),
    /// The joint does not exist or has been destroyed.
    #[error("joint {0:?} does not exist")]
    NoSuchJoint(JointHandle),
    /// The world does not exist or has been removed.
    #[error("world {0:?} does not exist")]
    NoSuchWorld(WorldHandle),
    /// The world is already being stepped.
    #[error("world {0:?} is already being stepped")]
    WorldLocked(WorldHandle),
    /// The physics backend failed to create one of the constraints of a joint.
    #[error("the physics backend failed to create a {constraint:?} constraint for a {joint:?} joint")]
    ConstraintCreation {
        /// The kind of joint that was being created.
        joint: JointKind,
        /// The constraint the backend failed to create.
        constraint: ConstraintKind,
    },
    /// The joint does not expose the parameter.
    #[error("{kind:?} joints have no {param:?} parameter")]
    UnsupportedParam {
        /// The kind of the joint.
        kind: JointKind,
        /// The requested parameter.
        param: ConstraintParam,
    },
    /// The joint is already attached to a different world.
    #[error("joint {joint:?} is already attached to world {world:?}")]
    AlreadyInWorld {
        /// The joint that was being attached.
        joint: JointHandle,
        /// The world the joint is attached to.
        world: WorldHandle,
    },
}
