//! Math types and unit conversion used at the boundary with the physics backend.
//!
//! Engine-facing APIs always speak `f32` and [`Vec2`]. The physics backend works in
//! [`Scalar`] and [`Vector`], whose precision is chosen with the `f32` or `f64` feature.
//! Values cross the boundary through [`AdjustPrecision`] (engine to physics)
//! and [`AsF32`] (physics to engine).

#[cfg(feature = "f32")]
mod single;
#[cfg(feature = "f32")]
pub use single::*;

#[cfg(feature = "f64")]
mod double;
#[cfg(feature = "f64")]
pub use double::*;

pub use bevy_math::{DVec2, Rot2, Vec2};

/// Adjust the precision of the math construct to the precision chosen for compilation.
pub trait AdjustPrecision {
    /// A math construct type with the desired precision.
    type Adjusted;
    /// Adjusts the precision of [`self`] to [`Self::Adjusted`](#associatedtype.Adjusted).
    fn adjust_precision(&self) -> Self::Adjusted;
}

impl AdjustPrecision for f32 {
    type Adjusted = Scalar;
    #[allow(clippy::unnecessary_cast)]
    fn adjust_precision(&self) -> Self::Adjusted {
        *self as Scalar
    }
}

impl AdjustPrecision for Vec2 {
    type Adjusted = Vector;
    fn adjust_precision(&self) -> Self::Adjusted {
        #[cfg(feature = "f32")]
        return *self;
        #[cfg(feature = "f64")]
        return self.as_dvec2();
    }
}

/// Adjust the precision down to `f32` regardless of compilation.
pub trait AsF32 {
    /// The `f32` version of a math construct.
    type F32;
    /// Returns the `f32` version of this type.
    fn f32(&self) -> Self::F32;
}

impl AsF32 for f32 {
    type F32 = Self;
    fn f32(&self) -> Self::F32 {
        *self
    }
}

impl AsF32 for f64 {
    type F32 = f32;
    fn f32(&self) -> Self::F32 {
        *self as f32
    }
}

impl AsF32 for Vec2 {
    type F32 = Self;
    fn f32(&self) -> Self::F32 {
        *self
    }
}

impl AsF32 for DVec2 {
    type F32 = Vec2;
    fn f32(&self) -> Self::F32 {
        self.as_vec2()
    }
}

/// Transforms a point from the local space of a body at `position` with `rotation`
/// (in radians) into world space.
#[inline]
pub fn local_to_world(position: Vec2, rotation: f32, local: Vec2) -> Vec2 {
    position + Rot2::radians(rotation) * local
}

/// Transforms a world-space point into the local space of a body at `position`
/// with `rotation` (in radians).
#[inline]
pub fn world_to_local(position: Vec2, rotation: f32, world: Vec2) -> Vec2 {
    Rot2::radians(rotation).inverse() * (world - position)
}
