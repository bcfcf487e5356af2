//! # tether2d
//!
//! **tether2d** is a 2D joint layer for game engines that delegate simulation to an external
//! rigid body physics engine.
//!
//! It provides fixed, pin, limit, distance, spring, groove, rotary spring, rotary limit, ratchet,
//! gear and motor joints. Each joint is built from one or more constraints created by the physics
//! engine, and the crate takes care of the parts around them:
//!
//! - Joint lifecycles tied to the lifecycles of bodies and worlds. Bodies and worlds can be
//!   removed before the joints referring to them.
//! - Delaying changes to the active joints of a world while it is being stepped.
//! - Translating parameters between engine units (`f32` and [`Vec2`](math::Vec2)) and the
//!   precision of the physics engine.
//! - Disabling collision between the bodies of a joint.
//!
//! The physics engine is reached through the [`PhysicsBackend`](backend::PhysicsBackend) trait.
//! [`HeadlessBackend`](backend::HeadlessBackend) is an in-memory implementation that records
//! everything without simulating it.
//!
//! ## Getting Started
//!
//! ```
//! use tether2d::prelude::*;
//!
//! let mut context = PhysicsContext::new(HeadlessBackend::new());
//! let world = context.create_world(WorldConfig::default());
//!
//! let wheel = context.insert_body(Vec2::ZERO, 0.0);
//! let chassis = context.insert_body(Vec2::new(0.0, 1.0), 0.0);
//!
//! let axle = context.create_joint(PinJoint::new(wheel, chassis, Vec2::ZERO))?;
//! let motor = context.create_joint(MotorJoint::new(wheel, chassis, 3.0))?;
//! context.add_joint(world, axle)?;
//! context.add_joint(world, motor)?;
//!
//! context.step_world(world, 1.0 / 60.0)?;
//!
//! context.joint_mut(motor).unwrap().set_rate(-3.0)?;
//! assert_eq!(context.joint(motor).unwrap().rate(), Some(-3.0));
//! # Ok::<(), JointError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `f64` (default): Use `f64` as the precision of the physics backend.
//! - `f32`: Use `f32` as the precision of the physics backend.
//! - `serialize`: Implement `serde::Serialize` and `serde::Deserialize` for plain data types.
//!
//! Exactly one of `f32` and `f64` must be enabled.

#![warn(missing_docs)]

extern crate alloc;

#[cfg(all(feature = "f32", feature = "f64"))]
compile_error!("feature \"f32\" and feature \"f64\" cannot be enabled at the same time");

#[cfg(not(any(feature = "f32", feature = "f64")))]
compile_error!("either feature \"f32\" or feature \"f64\" must be enabled");

pub mod backend;
pub mod data_structures;
pub mod dynamics;
pub mod math;

mod context;

pub use context::PhysicsContext;

#[cfg(test)]
mod tests;

/// Re-exports common types.
pub mod prelude {
    pub use crate::{
        PhysicsContext,
        backend::{HeadlessBackend, PhysicsBackend},
        dynamics::*,
        math::*,
    };
}
