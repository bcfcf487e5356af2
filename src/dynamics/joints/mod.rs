//! **Joints** connect two rigid bodies and restrict their movement relative to each other.
//!
//! A joint is built from one or more constraints created by the [`PhysicsBackend`](crate::backend::PhysicsBackend).
//! The joint owns those constraints: they are created when the joint is created, and freed
//! exactly once when it is destroyed.
//!
//! Below is a table containing all joints that are currently implemented.
//!
//! | Joint                   | Constraints          | Parameters                                 |
//! | ----------------------- | -------------------- | ------------------------------------------ |
//! | [`FixedJoint`]          | Pivot + Gear         | -                                          |
//! | [`PinJoint`]            | Pivot                | -                                          |
//! | [`LimitJoint`]          | Slide                | Anchors, min, max                          |
//! | [`DistanceJoint`]       | Pin                  | Anchors, distance                          |
//! | [`SpringJoint`]         | Damped spring        | Anchors, rest length, stiffness, damping   |
//! | [`GrooveJoint`]         | Groove               | Groove A, groove B, anchor 2               |
//! | [`RotarySpringJoint`]   | Damped rotary spring | Rest angle, stiffness, damping             |
//! | [`RotaryLimitJoint`]    | Rotary limit         | Min, max                                   |
//! | [`RatchetJoint`]        | Ratchet              | Angle, phase, ratchet                      |
//! | [`GearJoint`]           | Gear                 | Phase, ratio                               |
//! | [`MotorJoint`]          | Simple motor         | Rate                                       |
//!
//! Every joint also has a maximum force, which is applied to all of its constraints.
//!
//! # Using Joints
//!
//! Joints are created from a descriptor that names the two bodies and the parameters of the joint.
//!
//! ```
//! use tether2d::prelude::*;
//!
//! let mut context = PhysicsContext::new(HeadlessBackend::new());
//! let world = context.create_world(WorldConfig::default());
//! let body1 = context.insert_body(Vec2::ZERO, 0.0);
//! let body2 = context.insert_body(Vec2::new(0.0, -2.0), 0.0);
//!
//! // Connect the bodies with a spring and simulate it in the world.
//! let spring = context
//!     .create_joint(SpringJoint::new(body1, body2, Vec2::ZERO, Vec2::ZERO, 50.0, 0.5))
//!     .unwrap();
//! context.add_joint(world, spring).unwrap();
//!
//! assert_eq!(context.joint(spring).unwrap().rest_length(), Some(2.0));
//! ```
//!
//! By default, the attached bodies can still collide with each other. This can be changed
//! with [`PhysicsContext::set_joint_collision_enabled`](crate::PhysicsContext::set_joint_collision_enabled).
//! [`FixedJoint`]s disable collision between their bodies when they are created.
//!
//! ## Enabling and Disabling
//!
//! A joint attached to a world is either enabled, in which case its constraints are applied
//! when the world is stepped, or disabled. Changes made while the world is mid-step are
//! delayed until the step has finished.
//!
//! ## Units
//!
//! Parameters are given and returned in engine units: `f32` and [`Vec2`](crate::math::Vec2), with
//! angles in radians. They are converted to the precision of the physics backend when they cross
//! the boundary.

mod error;
mod view;

mod distance;
mod fixed;
mod gear;
mod groove;
mod limit;
mod motor;
mod pin;
mod ratchet;
mod rotary_limit;
mod rotary_spring;
mod spring;

pub use distance::DistanceJoint;
pub use error::JointError;
pub use fixed::FixedJoint;
pub use gear::GearJoint;
pub use groove::GrooveJoint;
pub use limit::LimitJoint;
pub use motor::MotorJoint;
pub use pin::PinJoint;
pub use ratchet::RatchetJoint;
pub use rotary_limit::RotaryLimitJoint;
pub use rotary_spring::RotarySpringJoint;
pub use spring::SpringJoint;
pub use view::{JointMut, JointRef};

use arrayvec::ArrayVec;
use derive_more::From;

use crate::{
    backend::{ConstraintDesc, ConstraintKind, ConstraintParam, RawConstraint},
    data_structures::arena::Index,
    dynamics::{body::Body, body::BodyHandle, world::WorldHandle},
    math::Vec2,
};

/// A handle to a [`Joint`] stored in a [`PhysicsContext`](crate::PhysicsContext).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, From)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct JointHandle(pub Index);

/// The kind of a [`Joint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum JointKind {
    /// See [`FixedJoint`].
    Fixed,
    /// See [`PinJoint`].
    Pin,
    /// See [`LimitJoint`].
    Limit,
    /// See [`DistanceJoint`].
    Distance,
    /// See [`SpringJoint`].
    Spring,
    /// See [`GrooveJoint`].
    Groove,
    /// See [`RotarySpringJoint`].
    RotarySpring,
    /// See [`RotaryLimitJoint`].
    RotaryLimit,
    /// See [`RatchetJoint`].
    Ratchet,
    /// See [`GearJoint`].
    Gear,
    /// See [`MotorJoint`].
    Motor,
}

impl JointKind {
    /// Returns the number of constraints a joint of this kind owns.
    #[inline]
    pub const fn constraint_count(self) -> usize {
        match self {
            Self::Fixed => 2,
            _ => 1,
        }
    }

    /// Returns the kind of the first constraint a joint of this kind owns.
    pub const fn primary_constraint(self) -> ConstraintKind {
        match self {
            Self::Fixed | Self::Pin => ConstraintKind::Pivot,
            Self::Limit => ConstraintKind::Slide,
            Self::Distance => ConstraintKind::Pin,
            Self::Spring => ConstraintKind::DampedSpring,
            Self::Groove => ConstraintKind::Groove,
            Self::RotarySpring => ConstraintKind::DampedRotarySpring,
            Self::RotaryLimit => ConstraintKind::RotaryLimit,
            Self::Ratchet => ConstraintKind::Ratchet,
            Self::Gear => ConstraintKind::Gear,
            Self::Motor => ConstraintKind::SimpleMotor,
        }
    }

    /// Returns `true` if joints of this kind let the parameter be read and written.
    ///
    /// Every joint exposes [`ConstraintParam::MaxForce`]. Fixed and pin joints expose nothing else.
    pub fn exposes(self, param: ConstraintParam) -> bool {
        match self {
            _ if param == ConstraintParam::MaxForce => true,
            Self::Fixed | Self::Pin => false,
            _ => self.primary_constraint().supports(param),
        }
    }
}

/// A joint connecting two bodies.
///
/// Joints are stored in a [`PhysicsContext`](crate::PhysicsContext) and accessed through
/// [`JointRef`] and [`JointMut`] views, which also give access to the parameters of the joint.
#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    pub(crate) body1: BodyHandle,
    pub(crate) body2: BodyHandle,
    pub(crate) world: Option<WorldHandle>,
    pub(crate) enabled: bool,
    pub(crate) collision_enabled: bool,
    pub(crate) destroy_mark: bool,
    pub(crate) tag: i32,
    kind: JointKind,
    pub(crate) constraints: ArrayVec<RawConstraint, 2>,
}

impl Joint {
    pub(crate) fn new(
        kind: JointKind,
        [body1, body2]: [BodyHandle; 2],
        constraints: ArrayVec<RawConstraint, 2>,
    ) -> Self {
        Self {
            body1,
            body2,
            world: None,
            enabled: true,
            collision_enabled: true,
            destroy_mark: false,
            tag: 0,
            kind,
            constraints,
        }
    }

    /// Returns the kind of the joint.
    #[inline]
    pub fn kind(&self) -> JointKind {
        self.kind
    }

    /// Returns the two bodies connected by the joint.
    #[inline]
    pub fn bodies(&self) -> [BodyHandle; 2] {
        [self.body1, self.body2]
    }

    /// Returns the world the joint is attached to.
    #[inline]
    pub fn world(&self) -> Option<WorldHandle> {
        self.world
    }

    /// Returns `true` if the joint is applied when its world is stepped.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` if the two bodies may collide with each other as far as this joint is concerned.
    #[inline]
    pub fn is_collision_enabled(&self) -> bool {
        self.collision_enabled
    }

    /// Returns `true` if the joint will be destroyed when its world finishes the current step.
    #[inline]
    pub fn is_marked_for_destruction(&self) -> bool {
        self.destroy_mark
    }

    /// Returns the user-defined tag of the joint.
    #[inline]
    pub fn tag(&self) -> i32 {
        self.tag
    }

    /// Returns the backend constraints owned by the joint, in the order they were created.
    #[inline]
    pub fn constraints(&self) -> &[RawConstraint] {
        &self.constraints
    }

    /// Returns `true` if the joint connects the given body.
    #[inline]
    pub fn connects(&self, body: BodyHandle) -> bool {
        self.body1 == body || self.body2 == body
    }

    /// Returns the body on the other side of the joint, or `None` if the joint does not connect `body`.
    pub fn other_body(&self, body: BodyHandle) -> Option<BodyHandle> {
        if self.body1 == body {
            Some(self.body2)
        } else if self.body2 == body {
            Some(self.body1)
        } else {
            None
        }
    }
}

/// A trait for descriptors of a specific kind of joint.
pub trait JointVariant {
    /// The kind of joint the descriptor creates.
    const KIND: JointKind;

    /// Returns the two bodies the joint connects.
    fn bodies(&self) -> [BodyHandle; 2];

    /// Returns the constraints the joint is made of, given the current state of its bodies.
    fn constraints(&self, bodies: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2>;

    /// Returns the world-space point the bodies should be moved to before the joint is built.
    fn snap_point(&self) -> Option<Vec2> {
        None
    }
}

/// A descriptor of any kind of joint, passed to [`PhysicsContext::create_joint`](crate::PhysicsContext::create_joint).
#[derive(Clone, Copy, Debug, PartialEq, From)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum JointDesc {
    /// A [`FixedJoint`].
    Fixed(FixedJoint),
    /// A [`PinJoint`].
    Pin(PinJoint),
    /// A [`LimitJoint`].
    Limit(LimitJoint),
    /// A [`DistanceJoint`].
    Distance(DistanceJoint),
    /// A [`SpringJoint`].
    Spring(SpringJoint),
    /// A [`GrooveJoint`].
    Groove(GrooveJoint),
    /// A [`RotarySpringJoint`].
    RotarySpring(RotarySpringJoint),
    /// A [`RotaryLimitJoint`].
    RotaryLimit(RotaryLimitJoint),
    /// A [`RatchetJoint`].
    Ratchet(RatchetJoint),
    /// A [`GearJoint`].
    Gear(GearJoint),
    /// A [`MotorJoint`].
    Motor(MotorJoint),
}

macro_rules! dispatch {
    ($desc:expr, $variant:ident => $body:expr) => {
        match $desc {
            JointDesc::Fixed($variant) => $body,
            JointDesc::Pin($variant) => $body,
            JointDesc::Limit($variant) => $body,
            JointDesc::Distance($variant) => $body,
            JointDesc::Spring($variant) => $body,
            JointDesc::Groove($variant) => $body,
            JointDesc::RotarySpring($variant) => $body,
            JointDesc::RotaryLimit($variant) => $body,
            JointDesc::Ratchet($variant) => $body,
            JointDesc::Gear($variant) => $body,
            JointDesc::Motor($variant) => $body,
        }
    };
}

impl JointDesc {
    /// Returns the kind of joint this describes.
    pub fn kind(&self) -> JointKind {
        fn kind_of<T: JointVariant>(_: &T) -> JointKind {
            T::KIND
        }
        dispatch!(self, joint => kind_of(joint))
    }

    /// Returns the two bodies the joint connects.
    pub fn bodies(&self) -> [BodyHandle; 2] {
        dispatch!(self, joint => joint.bodies())
    }

    /// Returns the constraints the joint is made of, given the current state of its bodies.
    pub fn constraints(&self, bodies: [&Body; 2]) -> ArrayVec<ConstraintDesc, 2> {
        dispatch!(self, joint => joint.constraints(bodies))
    }

    /// Returns the world-space point the bodies should be moved to before the joint is built.
    pub fn snap_point(&self) -> Option<Vec2> {
        dispatch!(self, joint => joint.snap_point())
    }

    /// Returns `true` if the joint should disable collision between its bodies when created.
    pub fn disables_collision(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

/// Returns an [`ArrayVec`] holding a single constraint.
pub(crate) fn single(desc: ConstraintDesc) -> ArrayVec<ConstraintDesc, 2> {
    let mut constraints = ArrayVec::new();
    constraints.push(desc);
    constraints
}
