use bevy_math::Vec2;

/// The vector type used by the physics backend.
pub type Vector = Vec2;

/// The floating point type used by the physics backend.
pub type Scalar = f32;
