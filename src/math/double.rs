use bevy_math::DVec2;

/// The vector type used by the physics backend.
pub type Vector = DVec2;

/// The floating point type used by the physics backend.
pub type Scalar = f64;
