//! Bodies, worlds and the joints connecting them.

pub mod body;
pub mod joints;
pub mod world;

pub use body::{Body, BodyHandle};
pub use joints::*;
pub use world::{PendingOp, PhysicsWorld, WorldConfig, WorldHandle};
