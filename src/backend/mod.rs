//! The boundary between the joint layer and the external physics engine.
//!
//! The joint layer never solves constraints itself. It asks a [`PhysicsBackend`] to
//! create, parameterize and free opaque constraint handles, to move constraints in
//! and out of a simulation space, and to filter collisions between body pairs.
//!
//! All values crossing this boundary are in physics units ([`Scalar`] and [`Vector`]).
//! Conversion from and to engine units happens in the joint layer.

mod headless;

pub use headless::{HeadlessBackend, HeadlessConstraint};

use crate::math::{Scalar, Vector};
use derive_more::From;

/// An opaque handle to a body owned by the physics backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct RawBody(pub u32);

/// An opaque handle to a constraint owned by the physics backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct RawConstraint(pub u32);

/// An opaque handle to a simulation space owned by the physics backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct RawSpace(pub u32);

/// The constraint primitives a backend must be able to create.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintKind {
    /// Keeps an anchor on each body at the same position.
    Pivot,
    /// Keeps the angular velocity ratio of the bodies constant.
    Gear,
    /// Keeps the distance between two anchors within a range.
    Slide,
    /// Keeps the distance between two anchors fixed.
    Pin,
    /// A damped spring between two anchors.
    DampedSpring,
    /// Keeps an anchor on the second body on a segment of the first body.
    Groove,
    /// A damped spring acting on the relative angle of the bodies.
    DampedRotarySpring,
    /// Keeps the relative angle of the bodies within a range.
    RotaryLimit,
    /// A rotary ratchet, like a socket wrench.
    Ratchet,
    /// Keeps the relative angular velocity of the bodies constant.
    SimpleMotor,
}

impl ConstraintKind {
    /// Returns `true` if constraints of this kind have the given parameter.
    ///
    /// Every constraint supports [`ConstraintParam::MaxForce`].
    pub fn supports(self, param: ConstraintParam) -> bool {
        use ConstraintParam::*;

        if param == MaxForce {
            return true;
        }

        match self {
            Self::Pivot => matches!(param, Anchor1 | Anchor2),
            Self::Gear => matches!(param, Phase | Ratio),
            Self::Slide => matches!(param, Anchor1 | Anchor2 | Min | Max),
            Self::Pin => matches!(param, Anchor1 | Anchor2 | Distance),
            Self::DampedSpring => {
                matches!(param, Anchor1 | Anchor2 | RestLength | Stiffness | Damping)
            }
            Self::Groove => matches!(param, GrooveA | GrooveB | Anchor2),
            Self::DampedRotarySpring => matches!(param, RestAngle | Stiffness | Damping),
            Self::RotaryLimit => matches!(param, Min | Max),
            Self::Ratchet => matches!(param, Angle | Phase | Ratchet),
            Self::SimpleMotor => param == Rate,
        }
    }
}

/// A named parameter of a backend constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintParam {
    /// The maximum force the constraint can apply.
    MaxForce,
    /// The anchor on the first body, in its local space.
    Anchor1,
    /// The anchor on the second body, in its local space.
    Anchor2,
    /// The lower limit of a slide or rotary limit.
    Min,
    /// The upper limit of a slide or rotary limit.
    Max,
    /// The fixed distance of a pin constraint.
    Distance,
    /// The rest length of a damped spring.
    RestLength,
    /// The stiffness of a linear or rotary spring.
    Stiffness,
    /// The damping of a linear or rotary spring.
    Damping,
    /// The start of a groove, in the local space of the first body.
    GrooveA,
    /// The end of a groove, in the local space of the first body.
    GrooveB,
    /// The rest angle of a rotary spring.
    RestAngle,
    /// The current angle of a ratchet.
    Angle,
    /// The angular offset of a ratchet or gear.
    Phase,
    /// The distance between ratchet clicks.
    Ratchet,
    /// The ratio of a gear.
    Ratio,
    /// The target relative angular velocity of a motor.
    Rate,
}

/// The value of a [`ConstraintParam`], in physics units.
#[derive(Clone, Copy, Debug, PartialEq, From)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamValue {
    /// A scalar parameter, such as a force, length or angle.
    Scalar(Scalar),
    /// A vector parameter, such as an anchor point.
    Vector(Vector),
}

impl ParamValue {
    /// Returns the scalar value, or `None` if this is a vector.
    #[inline]
    pub fn as_scalar(self) -> Option<Scalar> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::Vector(_) => None,
        }
    }

    /// Returns the vector value, or `None` if this is a scalar.
    #[inline]
    pub fn as_vector(self) -> Option<Vector> {
        match self {
            Self::Vector(value) => Some(value),
            Self::Scalar(_) => None,
        }
    }
}

/// Describes a constraint to create, in physics units.
///
/// Anchors are expressed in the local space of the body they are attached to.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum ConstraintDesc {
    /// See [`ConstraintKind::Pivot`].
    Pivot { anchor1: Vector, anchor2: Vector },
    /// See [`ConstraintKind::Gear`].
    Gear { phase: Scalar, ratio: Scalar },
    /// See [`ConstraintKind::Slide`].
    Slide {
        anchor1: Vector,
        anchor2: Vector,
        min: Scalar,
        max: Scalar,
    },
    /// See [`ConstraintKind::Pin`].
    ///
    /// The distance is measured by the backend from the anchors at creation time.
    Pin { anchor1: Vector, anchor2: Vector },
    /// See [`ConstraintKind::DampedSpring`].
    DampedSpring {
        anchor1: Vector,
        anchor2: Vector,
        rest_length: Scalar,
        stiffness: Scalar,
        damping: Scalar,
    },
    /// See [`ConstraintKind::Groove`].
    Groove {
        groove_a: Vector,
        groove_b: Vector,
        anchor2: Vector,
    },
    /// See [`ConstraintKind::DampedRotarySpring`].
    DampedRotarySpring {
        rest_angle: Scalar,
        stiffness: Scalar,
        damping: Scalar,
    },
    /// See [`ConstraintKind::RotaryLimit`].
    RotaryLimit { min: Scalar, max: Scalar },
    /// See [`ConstraintKind::Ratchet`].
    ///
    /// The current angle is initialized by the backend from the body rotations.
    Ratchet { phase: Scalar, ratchet: Scalar },
    /// See [`ConstraintKind::SimpleMotor`].
    SimpleMotor { rate: Scalar },
}

impl ConstraintDesc {
    /// Returns the kind of constraint this describes.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Self::Pivot { .. } => ConstraintKind::Pivot,
            Self::Gear { .. } => ConstraintKind::Gear,
            Self::Slide { .. } => ConstraintKind::Slide,
            Self::Pin { .. } => ConstraintKind::Pin,
            Self::DampedSpring { .. } => ConstraintKind::DampedSpring,
            Self::Groove { .. } => ConstraintKind::Groove,
            Self::DampedRotarySpring { .. } => ConstraintKind::DampedRotarySpring,
            Self::RotaryLimit { .. } => ConstraintKind::RotaryLimit,
            Self::Ratchet { .. } => ConstraintKind::Ratchet,
            Self::SimpleMotor { .. } => ConstraintKind::SimpleMotor,
        }
    }

    /// Returns the parameters given explicitly by this description.
    ///
    /// Parameters the backend derives itself, like the distance of a pin, are not included.
    pub fn params(&self) -> Vec<(ConstraintParam, ParamValue)> {
        use ConstraintParam::*;

        match *self {
            Self::Pivot { anchor1, anchor2 } | Self::Pin { anchor1, anchor2 } => {
                vec![(Anchor1, anchor1.into()), (Anchor2, anchor2.into())]
            }
            Self::Gear { phase, ratio } => vec![(Phase, phase.into()), (Ratio, ratio.into())],
            Self::Slide {
                anchor1,
                anchor2,
                min,
                max,
            } => vec![
                (Anchor1, anchor1.into()),
                (Anchor2, anchor2.into()),
                (Min, min.into()),
                (Max, max.into()),
            ],
            Self::DampedSpring {
                anchor1,
                anchor2,
                rest_length,
                stiffness,
                damping,
            } => vec![
                (Anchor1, anchor1.into()),
                (Anchor2, anchor2.into()),
                (RestLength, rest_length.into()),
                (Stiffness, stiffness.into()),
                (Damping, damping.into()),
            ],
            Self::Groove {
                groove_a,
                groove_b,
                anchor2,
            } => vec![
                (GrooveA, groove_a.into()),
                (GrooveB, groove_b.into()),
                (Anchor2, anchor2.into()),
            ],
            Self::DampedRotarySpring {
                rest_angle,
                stiffness,
                damping,
            } => vec![
                (RestAngle, rest_angle.into()),
                (Stiffness, stiffness.into()),
                (Damping, damping.into()),
            ],
            Self::RotaryLimit { min, max } => vec![(Min, min.into()), (Max, max.into())],
            Self::Ratchet { phase, ratchet } => {
                vec![(Phase, phase.into()), (Ratchet, ratchet.into())]
            }
            Self::SimpleMotor { rate } => vec![(Rate, rate.into())],
        }
    }
}

/// The narrow interface of an external physics engine used by the joint layer.
///
/// Implementations own the actual bodies, constraints and spaces. The joint layer only
/// stores the raw handles returned here and guarantees that:
///
/// - every constraint returned by [`create_constraint`](Self::create_constraint)
///   is passed to [`free_constraint`](Self::free_constraint) exactly once,
/// - a constraint is removed from its space before it is freed,
/// - [`step_space`](Self::step_space) is never called while the joint layer is
///   mutating the set of constraints in that space.
pub trait PhysicsBackend {
    /// Creates a body at the given pose and returns its handle.
    fn insert_body(&mut self, position: Vector, rotation: Scalar) -> RawBody;

    /// Removes a body.
    fn remove_body(&mut self, body: RawBody);

    /// Moves a body to the given pose.
    fn set_body_pose(&mut self, body: RawBody, position: Vector, rotation: Scalar);

    /// Creates an empty simulation space.
    fn create_space(&mut self) -> RawSpace;

    /// Removes a simulation space. Constraints still in the space are removed from it, but not freed.
    fn remove_space(&mut self, space: RawSpace);

    /// Advances the simulation of a space by `delta` seconds.
    fn step_space(&mut self, space: RawSpace, delta: Scalar);

    /// Creates a constraint between two bodies.
    ///
    /// Returns `None` if the backend cannot create the constraint.
    fn create_constraint(
        &mut self,
        body1: RawBody,
        body2: RawBody,
        desc: &ConstraintDesc,
    ) -> Option<RawConstraint>;

    /// Frees a constraint created by [`create_constraint`](Self::create_constraint).
    fn free_constraint(&mut self, constraint: RawConstraint);

    /// Reads a constraint parameter.
    ///
    /// Returns `None` if the constraint does not exist or does not have the parameter.
    fn param(&self, constraint: RawConstraint, param: ConstraintParam) -> Option<ParamValue>;

    /// Writes a constraint parameter.
    fn set_param(&mut self, constraint: RawConstraint, param: ConstraintParam, value: ParamValue);

    /// Adds a constraint to the active set of a space, so it is applied when the space is stepped.
    fn add_constraint(&mut self, space: RawSpace, constraint: RawConstraint);

    /// Removes a constraint from the active set of a space.
    fn remove_constraint(&mut self, space: RawSpace, constraint: RawConstraint);

    /// Sets whether the shapes of two bodies may collide with each other.
    fn set_collision_filter(&mut self, body1: RawBody, body2: RawBody, collide: bool);
}
