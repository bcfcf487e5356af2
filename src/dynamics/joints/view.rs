//! Views into a [`Joint`] and the parameters of its constraints.

use core::ops::Deref;

use tracing::{trace, warn};

use super::{Joint, JointError, JointHandle};
use crate::{
    backend::{ConstraintParam, ParamValue, PhysicsBackend},
    math::{AdjustPrecision, AsF32, Vec2},
};

/// A read-only view of a [`Joint`], returned by [`PhysicsContext::joint`](crate::PhysicsContext::joint).
///
/// Parameter getters return `None` if the kind of the joint does not expose the parameter.
pub struct JointRef<'a, B: PhysicsBackend> {
    pub(crate) handle: JointHandle,
    pub(crate) joint: &'a Joint,
    pub(crate) backend: &'a B,
}

/// A mutable view of a [`Joint`], returned by [`PhysicsContext::joint_mut`](crate::PhysicsContext::joint_mut).
///
/// Parameter setters return [`JointError::UnsupportedParam`] if the kind of the joint does
/// not expose the parameter.
pub struct JointMut<'a, B: PhysicsBackend> {
    pub(crate) handle: JointHandle,
    pub(crate) joint: &'a mut Joint,
    pub(crate) backend: &'a mut B,
}

impl<B: PhysicsBackend> Deref for JointRef<'_, B> {
    type Target = Joint;

    fn deref(&self) -> &Joint {
        self.joint
    }
}

impl<B: PhysicsBackend> Deref for JointMut<'_, B> {
    type Target = Joint;

    fn deref(&self) -> &Joint {
        &*self.joint
    }
}

macro_rules! impl_param_getters {
    ($view:ident) => {
        impl<B: PhysicsBackend> $view<'_, B> {
            /// Returns the handle of the joint.
            #[inline]
            pub fn handle(&self) -> JointHandle {
                self.handle
            }

            fn read(&self, param: ConstraintParam) -> Option<ParamValue> {
                if !self.joint.kind().exposes(param) {
                    return None;
                }
                let &constraint = self.joint.constraints.first()?;
                self.backend.param(constraint, param)
            }

            fn read_scalar(&self, param: ConstraintParam) -> Option<f32> {
                self.read(param)?.as_scalar().map(|value| value.f32())
            }

            fn read_vector(&self, param: ConstraintParam) -> Option<Vec2> {
                self.read(param)?.as_vector().map(|value| value.f32())
            }

            /// Returns the maximum force the joint can apply, read from its first constraint.
            pub fn max_force(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::MaxForce)
            }

            /// Returns the anchor on the first body, in its local space.
            pub fn anchor1(&self) -> Option<Vec2> {
                self.read_vector(ConstraintParam::Anchor1)
            }

            /// Returns the anchor on the second body, in its local space.
            pub fn anchor2(&self) -> Option<Vec2> {
                self.read_vector(ConstraintParam::Anchor2)
            }

            /// Returns the lower limit of a limit or rotary limit joint.
            pub fn min(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::Min)
            }

            /// Returns the upper limit of a limit or rotary limit joint.
            pub fn max(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::Max)
            }

            /// Returns the distance kept by a distance joint.
            pub fn distance(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::Distance)
            }

            /// Returns the rest length of a spring joint.
            pub fn rest_length(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::RestLength)
            }

            /// Returns the stiffness of a spring or rotary spring joint.
            pub fn stiffness(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::Stiffness)
            }

            /// Returns the damping of a spring or rotary spring joint.
            pub fn damping(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::Damping)
            }

            /// Returns the start of the groove of a groove joint.
            pub fn groove_a(&self) -> Option<Vec2> {
                self.read_vector(ConstraintParam::GrooveA)
            }

            /// Returns the end of the groove of a groove joint.
            pub fn groove_b(&self) -> Option<Vec2> {
                self.read_vector(ConstraintParam::GrooveB)
            }

            /// Returns the rest angle of a rotary spring joint in radians.
            pub fn rest_angle(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::RestAngle)
            }

            /// Returns the current angle of a ratchet joint in radians.
            pub fn angle(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::Angle)
            }

            /// Returns the phase of a ratchet or gear joint in radians.
            pub fn phase(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::Phase)
            }

            /// Returns the distance between the clicks of a ratchet joint in radians.
            pub fn ratchet(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::Ratchet)
            }

            /// Returns the ratio of a gear joint.
            pub fn ratio(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::Ratio)
            }

            /// Returns the target rate of a motor joint in radians per second.
            pub fn rate(&self) -> Option<f32> {
                self.read_scalar(ConstraintParam::Rate)
            }
        }
    };
}

impl_param_getters!(JointRef);
impl_param_getters!(JointMut);

impl<B: PhysicsBackend> JointMut<'_, B> {
    /// Returns a read-only view of the joint.
    pub fn view(&self) -> JointRef<'_, B> {
        JointRef {
            handle: self.handle,
            joint: &*self.joint,
            backend: &*self.backend,
        }
    }

    /// Sets the user-defined tag of the joint.
    #[inline]
    pub fn set_tag(&mut self, tag: i32) {
        self.joint.tag = tag;
    }

    fn write(&mut self, param: ConstraintParam, value: ParamValue) -> Result<(), JointError> {
        let kind = self.joint.kind();
        if !kind.exposes(param) {
            warn!("Tried to set {param:?} on {kind:?} joint {:?}", self.handle);
            return Err(JointError::UnsupportedParam { kind, param });
        }
        if let Some(&constraint) = self.joint.constraints.first() {
            trace!("Setting {param:?} of joint {:?} to {value:?}", self.handle);
            self.backend.set_param(constraint, param, value);
        }
        Ok(())
    }

    fn write_scalar(&mut self, param: ConstraintParam, value: f32) -> Result<(), JointError> {
        self.write(param, value.adjust_precision().into())
    }

    fn write_vector(&mut self, param: ConstraintParam, value: Vec2) -> Result<(), JointError> {
        self.write(param, value.adjust_precision().into())
    }

    /// Sets the maximum force the joint can apply. The value is written to every constraint of the joint.
    pub fn set_max_force(&mut self, force: f32) {
        let value = ParamValue::from(force.adjust_precision());
        trace!("Setting max force of joint {:?} to {force}", self.handle);
        for &constraint in &self.joint.constraints {
            self.backend
                .set_param(constraint, ConstraintParam::MaxForce, value);
        }
    }

    /// Sets the anchor on the first body, in its local space.
    pub fn set_anchor1(&mut self, anchor: Vec2) -> Result<(), JointError> {
        self.write_vector(ConstraintParam::Anchor1, anchor)
    }

    /// Sets the anchor on the second body, in its local space.
    pub fn set_anchor2(&mut self, anchor: Vec2) -> Result<(), JointError> {
        self.write_vector(ConstraintParam::Anchor2, anchor)
    }

    /// Sets the lower limit of a limit or rotary limit joint.
    pub fn set_min(&mut self, min: f32) -> Result<(), JointError> {
        self.write_scalar(ConstraintParam::Min, min)
    }

    /// Sets the upper limit of a limit or rotary limit joint.
    pub fn set_max(&mut self, max: f32) -> Result<(), JointError> {
        self.write_scalar(ConstraintParam::Max, max)
    }

    /// Sets the distance kept by a distance joint.
    pub fn set_distance(&mut self, distance: f32) -> Result<(), JointError> {
        self.write_scalar(ConstraintParam::Distance, distance)
    }

    /// Sets the rest length of a spring joint.
    pub fn set_rest_length(&mut self, rest_length: f32) -> Result<(), JointError> {
        self.write_scalar(ConstraintParam::RestLength, rest_length)
    }

    /// Sets the stiffness of a spring or rotary spring joint.
    pub fn set_stiffness(&mut self, stiffness: f32) -> Result<(), JointError> {
        self.write_scalar(ConstraintParam::Stiffness, stiffness)
    }

    /// Sets the damping of a spring or rotary spring joint.
    pub fn set_damping(&mut self, damping: f32) -> Result<(), JointError> {
        self.write_scalar(ConstraintParam::Damping, damping)
    }

    /// Sets the start of the groove of a groove joint.
    pub fn set_groove_a(&mut self, groove_a: Vec2) -> Result<(), JointError> {
        self.write_vector(ConstraintParam::GrooveA, groove_a)
    }

    /// Sets the end of the groove of a groove joint.
    pub fn set_groove_b(&mut self, groove_b: Vec2) -> Result<(), JointError> {
        self.write_vector(ConstraintParam::GrooveB, groove_b)
    }

    /// Sets the rest angle of a rotary spring joint in radians.
    pub fn set_rest_angle(&mut self, rest_angle: f32) -> Result<(), JointError> {
        self.write_scalar(ConstraintParam::RestAngle, rest_angle)
    }

    /// Sets the current angle of a ratchet joint in radians.
    pub fn set_angle(&mut self, angle: f32) -> Result<(), JointError> {
        self.write_scalar(ConstraintParam::Angle, angle)
    }

    /// Sets the phase of a ratchet or gear joint in radians.
    pub fn set_phase(&mut self, phase: f32) -> Result<(), JointError> {
        self.write_scalar(ConstraintParam::Phase, phase)
    }

    /// Sets the distance between the clicks of a ratchet joint in radians.
    pub fn set_ratchet(&mut self, ratchet: f32) -> Result<(), JointError> {
        self.write_scalar(ConstraintParam::Ratchet, ratchet)
    }

    /// Sets the ratio of a gear joint.
    pub fn set_ratio(&mut self, ratio: f32) -> Result<(), JointError> {
        self.write_scalar(ConstraintParam::Ratio, ratio)
    }

    /// Sets the target rate of a motor joint in radians per second.
    pub fn set_rate(&mut self, rate: f32) -> Result<(), JointError> {
        self.write_scalar(ConstraintParam::Rate, rate)
    }
}
