//! Simulation worlds and their deferred joint operations.
//!
//! A world owns a space in the physics backend and tracks which joints are attached to it
//! and which of those are active. While a world is being stepped it is *locked*, and
//! changes to its active set are queued as [`PendingOp`]s that are applied in order once
//! the step has finished.

use std::collections::VecDeque;

use derive_more::From;
use indexmap::IndexSet;

use super::joints::JointHandle;
use crate::{backend::RawSpace, data_structures::arena::Index};

/// A handle to a [`PhysicsWorld`] stored in a [`PhysicsContext`](crate::PhysicsContext).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, From)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldHandle(pub Index);

/// Configures how a [`PhysicsWorld`] is stepped.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// The number of backend steps each frame is split into.
    ///
    /// A value of 0 is treated as 1.
    ///
    /// Default: `1`
    pub substeps: u32,
    /// A multiplier for the frame delta. A speed of 0 pauses the simulation.
    ///
    /// Default: `1.0`
    pub speed: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            substeps: 1,
            speed: 1.0,
        }
    }
}

impl WorldConfig {
    /// Sets the number of substeps.
    #[inline]
    pub const fn with_substeps(mut self, substeps: u32) -> Self {
        self.substeps = substeps;
        self
    }

    /// Sets the simulation speed.
    #[inline]
    pub const fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

/// A change to the joints of a world that is delayed while the world is locked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingOp {
    /// Add the constraints of the joint to the active set.
    Activate(JointHandle),
    /// Remove the constraints of the joint from the active set.
    Deactivate(JointHandle),
    /// Detach the joint from the world, and destroy it if `destroy` is `true`.
    Remove {
        /// The joint to remove.
        joint: JointHandle,
        /// Whether the joint should be destroyed once it has been removed.
        destroy: bool,
    },
}

impl PendingOp {
    /// Returns the joint the operation applies to.
    #[inline]
    pub fn joint(self) -> JointHandle {
        match self {
            Self::Activate(joint) | Self::Deactivate(joint) | Self::Remove { joint, .. } => joint,
        }
    }
}

/// A simulation world that joints can be attached to.
#[derive(Clone, Debug)]
pub struct PhysicsWorld {
    raw: RawSpace,
    /// How the world is stepped.
    pub config: WorldConfig,
    pub(crate) joints: IndexSet<JointHandle>,
    pub(crate) active: IndexSet<JointHandle>,
    pub(crate) pending: VecDeque<PendingOp>,
    pub(crate) locked: bool,
}

impl PhysicsWorld {
    pub(crate) fn new(raw: RawSpace, config: WorldConfig) -> Self {
        Self {
            raw,
            config,
            joints: IndexSet::new(),
            active: IndexSet::new(),
            pending: VecDeque::new(),
            locked: false,
        }
    }

    /// Returns the handle of the world's space in the physics backend.
    #[inline]
    pub fn raw(&self) -> RawSpace {
        self.raw
    }

    /// Returns the joints attached to the world, in the order they were added.
    pub fn joints(&self) -> impl Iterator<Item = JointHandle> + '_ {
        self.joints.iter().copied()
    }

    /// Returns the joints whose constraints are currently applied when the world is stepped.
    pub fn active_joints(&self) -> impl Iterator<Item = JointHandle> + '_ {
        self.active.iter().copied()
    }

    /// Returns `true` if the joint is attached to the world.
    #[inline]
    pub fn contains(&self, joint: JointHandle) -> bool {
        self.joints.contains(&joint)
    }

    /// Returns `true` if the constraints of the joint are in the active set.
    #[inline]
    pub fn is_active(&self, joint: JointHandle) -> bool {
        self.active.contains(&joint)
    }

    /// Returns `true` if the world is mid-step and delays changes to its joints.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns the operations waiting for the current step to finish.
    pub fn pending(&self) -> impl Iterator<Item = &PendingOp> {
        self.pending.iter()
    }

    /// Returns `true` if a removal of the joint is waiting for the current step to finish.
    pub fn is_removal_pending(&self, joint: JointHandle) -> bool {
        self.pending
            .iter()
            .any(|op| matches!(op, PendingOp::Remove { joint: j, .. } if *j == joint))
    }

    /// Requests an operation on the joints of the world.
    ///
    /// If the world is unlocked, the operation is returned so the caller can apply it
    /// immediately. Otherwise it is queued and `None` is returned. A queued request that is
    /// the opposite of an already queued one cancels it instead of being appended.
    pub(crate) fn request(&mut self, op: PendingOp) -> Option<PendingOp> {
        if !self.locked {
            return Some(op);
        }

        match op {
            PendingOp::Activate(joint) => {
                if !self.cancel(PendingOp::Deactivate(joint)) {
                    self.pending.push_back(op);
                }
            }
            PendingOp::Deactivate(joint) => {
                if !self.cancel(PendingOp::Activate(joint)) {
                    self.pending.push_back(op);
                }
            }
            PendingOp::Remove { joint, destroy } => {
                self.pending.retain(|pending| {
                    !matches!(pending, PendingOp::Activate(j) | PendingOp::Deactivate(j) if *j == joint)
                });

                let queued = self.pending.iter_mut().find_map(|pending| match pending {
                    PendingOp::Remove {
                        joint: queued,
                        destroy,
                    } if *queued == joint => Some(destroy),
                    _ => None,
                });
                match queued {
                    Some(queued_destroy) => *queued_destroy |= destroy,
                    None => self.pending.push_back(op),
                }
            }
        }

        None
    }

    /// Cancels a pending removal of the joint that would not destroy it.
    ///
    /// Returns `true` if such a removal was queued.
    pub(crate) fn cancel_removal(&mut self, joint: JointHandle) -> bool {
        self.cancel(PendingOp::Remove {
            joint,
            destroy: false,
        })
    }

    fn cancel(&mut self, op: PendingOp) -> bool {
        match self.pending.iter().position(|pending| *pending == op) {
            Some(index) => {
                self.pending.remove(index);
                true
            }
            None => false,
        }
    }
}
