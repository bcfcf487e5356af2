//! The [`PhysicsContext`], which owns every body, joint and world.

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::{
    backend::{PhysicsBackend, RawBody, RawConstraint},
    data_structures::arena::Arena,
    dynamics::{
        Body, BodyHandle, Joint, JointDesc, JointError, JointHandle, JointMut, JointRef,
        PendingOp, PhysicsWorld, WorldConfig, WorldHandle,
    },
    math::{AdjustPrecision, Vec2},
};

/// Owns the bodies, joints and worlds of a simulation, along with the [`PhysicsBackend`] simulating them.
///
/// Bodies, joints and worlds refer to each other through handles. Any of them can be removed
/// while others still refer to it, and the stale handle then resolves to nothing.
#[derive(Debug)]
pub struct PhysicsContext<B: PhysicsBackend> {
    backend: B,
    bodies: Arena<Body>,
    joints: Arena<Joint>,
    worlds: Arena<PhysicsWorld>,
    /// Removed bodies whose backend body is kept until their delayed joint destructions finish.
    retired_bodies: Vec<RetiredBody>,
}

#[derive(Debug)]
struct RetiredBody {
    raw: RawBody,
    joints: Vec<JointHandle>,
}

impl<B: PhysicsBackend + Default> Default for PhysicsContext<B> {
    fn default() -> Self {
        Self::new(B::default())
    }
}

impl<B: PhysicsBackend> PhysicsContext<B> {
    /// Creates a new empty [`PhysicsContext`] using the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            bodies: Arena::new(),
            joints: Arena::new(),
            worlds: Arena::new(),
            retired_bodies: Vec::new(),
        }
    }

    /// Returns the physics backend.
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the physics backend mutably.
    ///
    /// Constraints owned by joints must not be freed or moved between spaces through this.
    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consumes the context and returns the physics backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    // Bodies

    /// Creates a body at the given position and rotation in radians.
    pub fn insert_body(&mut self, position: Vec2, rotation: f32) -> BodyHandle {
        let raw = self
            .backend
            .insert_body(position.adjust_precision(), rotation.adjust_precision());
        BodyHandle(self.bodies.insert(Body::new(raw, position, rotation)))
    }

    /// Returns the body with the given handle.
    #[inline]
    pub fn body(&self, body: BodyHandle) -> Option<&Body> {
        self.bodies.get(body.0)
    }

    /// Returns an iterator over all bodies.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter().map(|(index, body)| (BodyHandle(index), body))
    }

    /// Moves a body to the given position and rotation in radians.
    pub fn set_body_pose(
        &mut self,
        body: BodyHandle,
        position: Vec2,
        rotation: f32,
    ) -> Result<(), JointError> {
        let Some(stored) = self.bodies.get_mut(body.0) else {
            return Err(JointError::NoSuchBody(body));
        };
        stored.set_pose(position, rotation);
        self.backend.set_body_pose(
            stored.raw(),
            position.adjust_precision(),
            rotation.adjust_precision(),
        );
        Ok(())
    }

    /// Removes a body, destroying every joint attached to it.
    ///
    /// Joints in a world that is mid-step are destroyed when the step finishes. The handle
    /// stops resolving immediately, but the backend body is only removed once those joints
    /// have been destroyed.
    pub fn remove_body(&mut self, body: BodyHandle) -> Result<(), JointError> {
        let Some(stored) = self.bodies.get(body.0) else {
            warn!("Tried to remove body {body:?} that does not exist");
            return Err(JointError::NoSuchBody(body));
        };

        for joint in stored.joints().to_vec() {
            self.destroy_joint(joint)?;
        }

        let Some(removed) = self.bodies.remove(body.0) else {
            return Err(JointError::NoSuchBody(body));
        };
        if removed.joints().is_empty() {
            self.backend.remove_body(removed.raw());
        } else {
            debug!(
                "Keeping backend body of {body:?} until {} joints are destroyed",
                removed.joints().len()
            );
            self.retired_bodies.push(RetiredBody {
                raw: removed.raw(),
                joints: removed.joints().to_vec(),
            });
        }
        debug!("Removed body {body:?}");
        Ok(())
    }

    // Worlds

    /// Creates a world with its own simulation space in the backend.
    pub fn create_world(&mut self, config: WorldConfig) -> WorldHandle {
        let raw = self.backend.create_space();
        WorldHandle(self.worlds.insert(PhysicsWorld::new(raw, config)))
    }

    /// Returns the world with the given handle.
    #[inline]
    pub fn world(&self, world: WorldHandle) -> Option<&PhysicsWorld> {
        self.worlds.get(world.0)
    }

    /// Returns the world with the given handle mutably, for example to change its [`WorldConfig`].
    #[inline]
    pub fn world_mut(&mut self, world: WorldHandle) -> Option<&mut PhysicsWorld> {
        self.worlds.get_mut(world.0)
    }

    /// Removes a world and its simulation space.
    ///
    /// Attached joints are detached and their constraints deactivated, but the joints stay alive.
    /// Joints whose destruction was delayed by the world are destroyed.
    pub fn remove_world(&mut self, world: WorldHandle) -> Result<(), JointError> {
        let Some(mut removed) = self.worlds.remove(world.0) else {
            warn!("Tried to remove world {world:?} that does not exist");
            return Err(JointError::NoSuchWorld(world));
        };

        let destroyed: Vec<JointHandle> = removed
            .pending
            .drain(..)
            .filter_map(|op| match op {
                PendingOp::Remove {
                    joint,
                    destroy: true,
                } => Some(joint),
                _ => None,
            })
            .collect();

        let raw = removed.raw();
        for joint in removed.active.drain(..) {
            if let Some(stored) = self.joints.get(joint.0) {
                for &constraint in &stored.constraints {
                    self.backend.remove_constraint(raw, constraint);
                }
            }
        }
        for &joint in &removed.joints {
            if let Some(stored) = self.joints.get_mut(joint.0) {
                stored.world = None;
            }
        }
        self.backend.remove_space(raw);

        for joint in destroyed {
            self.release_joint(joint);
        }

        debug!("Removed world {world:?}");
        Ok(())
    }

    /// Attaches a joint to a world. If the joint is enabled, its constraints become active.
    ///
    /// Adding a joint to the world it is already in cancels a delayed removal from that world.
    pub fn add_joint(&mut self, world: WorldHandle, joint: JointHandle) -> Result<(), JointError> {
        if !self.worlds.contains(world.0) {
            warn!("Tried to add joint {joint:?} to world {world:?} that does not exist");
            return Err(JointError::NoSuchWorld(world));
        }
        let Some(stored) = self.joints.get_mut(joint.0) else {
            warn!("Tried to add joint {joint:?} that does not exist to world {world:?}");
            return Err(JointError::NoSuchJoint(joint));
        };
        if stored.destroy_mark {
            warn!("Tried to add joint {joint:?} that is being destroyed to world {world:?}");
            return Err(JointError::NoSuchJoint(joint));
        }

        match stored.world {
            Some(current) if current == world => {
                let enabled = stored.enabled;
                let Some(target) = self.worlds.get_mut(world.0) else {
                    return Err(JointError::NoSuchWorld(world));
                };
                if target.cancel_removal(joint) && enabled != target.is_active(joint) {
                    let op = if enabled {
                        PendingOp::Activate(joint)
                    } else {
                        PendingOp::Deactivate(joint)
                    };
                    self.request(world, op);
                }
                return Ok(());
            }
            Some(current) if self.worlds.contains(current.0) => {
                warn!("Tried to add joint {joint:?} to world {world:?}, but it is in world {current:?}");
                return Err(JointError::AlreadyInWorld {
                    joint,
                    world: current,
                });
            }
            _ => {}
        }

        stored.world = Some(world);
        let enabled = stored.enabled;
        if let Some(target) = self.worlds.get_mut(world.0) {
            target.joints.insert(joint);
        }
        debug!("Added joint {joint:?} to world {world:?}");

        if enabled {
            self.request(world, PendingOp::Activate(joint));
        }
        Ok(())
    }

    /// Detaches a joint from its world without destroying it.
    ///
    /// If the world is mid-step, the joint is detached when the step finishes.
    pub fn remove_joint_from_world(&mut self, joint: JointHandle) -> Result<(), JointError> {
        let Some(stored) = self.joints.get(joint.0) else {
            return Err(JointError::NoSuchJoint(joint));
        };
        if let Some(world) = stored.world {
            self.request(
                world,
                PendingOp::Remove {
                    joint,
                    destroy: false,
                },
            );
        }
        Ok(())
    }

    /// Locks a world, delaying changes to its active joints until [`end_step`](Self::end_step).
    pub fn begin_step(&mut self, world: WorldHandle) -> Result<(), JointError> {
        let target = self
            .worlds
            .get_mut(world.0)
            .ok_or(JointError::NoSuchWorld(world))?;
        target.locked = true;
        Ok(())
    }

    /// Unlocks a world and applies the changes that were delayed while it was locked, in order.
    pub fn end_step(&mut self, world: WorldHandle) -> Result<(), JointError> {
        let target = self
            .worlds
            .get_mut(world.0)
            .ok_or(JointError::NoSuchWorld(world))?;
        target.locked = false;

        let mut drained = 0;
        while let Some(op) = self
            .worlds
            .get_mut(world.0)
            .and_then(|target| target.pending.pop_front())
        {
            self.apply(world, op);
            drained += 1;
        }
        if drained > 0 {
            debug!("Applied {drained} delayed joint operations in world {world:?}");
        }
        Ok(())
    }

    /// Advances a world by `delta` seconds.
    ///
    /// The frame is split into [`WorldConfig::substeps`] backend steps, scaled by [`WorldConfig::speed`].
    /// Joint changes made during the step are applied once it has finished.
    ///
    /// # Errors
    ///
    /// - [`JointError::NoSuchWorld`] if the world does not exist.
    /// - [`JointError::WorldLocked`] if the world is between [`begin_step`](Self::begin_step)
    ///   and [`end_step`](Self::end_step). Nothing is stepped or applied in that case.
    pub fn step_world(&mut self, world: WorldHandle, delta: f32) -> Result<(), JointError> {
        let target = self
            .worlds
            .get(world.0)
            .ok_or(JointError::NoSuchWorld(world))?;
        if target.is_locked() {
            warn!("Tried to step world {world:?} while it is already being stepped");
            return Err(JointError::WorldLocked(world));
        }
        let config = target.config;
        let raw = target.raw();

        self.begin_step(world)?;
        if config.speed != 0.0 {
            let substeps = config.substeps.max(1);
            let substep_delta = (delta * config.speed / substeps as f32).adjust_precision();
            for _ in 0..substeps {
                self.backend.step_space(raw, substep_delta);
            }
        }
        self.end_step(world)
    }

    // Joints

    /// Creates a joint from a descriptor such as a [`PinJoint`](crate::dynamics::PinJoint).
    ///
    /// The joint is registered with both of its bodies, but not attached to any world.
    ///
    /// # Errors
    ///
    /// - [`JointError::NoSuchBody`] if either body does not exist.
    /// - [`JointError::SameBody`] if both bodies are the same.
    /// - [`JointError::ConstraintCreation`] if the backend fails to create a constraint.
    ///   No joint is registered with the bodies in that case, and constraints created so far are freed.
    ///   A [`FixedJoint`](crate::dynamics::FixedJoint) moves both bodies to its anchor before
    ///   creating constraints, so the bodies may have moved even if creation fails.
    pub fn create_joint(&mut self, desc: impl Into<JointDesc>) -> Result<JointHandle, JointError> {
        let desc = desc.into();
        let kind = desc.kind();
        let [body1, body2] = desc.bodies();

        for body in [body1, body2] {
            if !self.bodies.contains(body.0) {
                warn!("Tried to create a {kind:?} joint with body {body:?} that does not exist");
                return Err(JointError::NoSuchBody(body));
            }
        }
        if body1 == body2 {
            warn!("Tried to create a {kind:?} joint connecting body {body1:?} to itself");
            return Err(JointError::SameBody(body1));
        }

        if let Some(point) = desc.snap_point() {
            for body in [body1, body2] {
                let rotation = self.bodies.get(body.0).map_or(0.0, Body::rotation);
                self.set_body_pose(body, point, rotation)?;
            }
        }

        let (Some(stored1), Some(stored2)) = (self.bodies.get(body1.0), self.bodies.get(body2.0))
        else {
            return Err(JointError::NoSuchBody(body1));
        };
        let (raw1, raw2) = (stored1.raw(), stored2.raw());
        let descs = desc.constraints([stored1, stored2]);

        let mut constraints = ArrayVec::<RawConstraint, 2>::new();
        for constraint in &descs {
            let Some(raw) = self.backend.create_constraint(raw1, raw2, constraint) else {
                warn!(
                    "The physics backend failed to create a {:?} constraint for a {kind:?} joint",
                    constraint.kind()
                );
                for created in constraints {
                    self.backend.free_constraint(created);
                }
                return Err(JointError::ConstraintCreation {
                    joint: kind,
                    constraint: constraint.kind(),
                });
            };
            constraints.push(raw);
        }

        let mut joint = Joint::new(kind, [body1, body2], constraints);
        let disable_collision = desc.disables_collision();
        joint.collision_enabled = !disable_collision;

        let handle = JointHandle(self.joints.insert(joint));
        for body in [body1, body2] {
            if let Some(stored) = self.bodies.get_mut(body.0) {
                stored.append_joint(handle);
            }
        }
        if disable_collision {
            self.publish_collision_filter(body1, body2);
        }

        debug!("Created {kind:?} joint {handle:?} between {body1:?} and {body2:?}");
        Ok(handle)
    }

    /// Returns a read-only view of the joint with the given handle.
    pub fn joint(&self, joint: JointHandle) -> Option<JointRef<'_, B>> {
        let stored = self.joints.get(joint.0)?;
        Some(JointRef {
            handle: joint,
            joint: stored,
            backend: &self.backend,
        })
    }

    /// Returns a mutable view of the joint with the given handle.
    pub fn joint_mut(&mut self, joint: JointHandle) -> Option<JointMut<'_, B>> {
        let stored = self.joints.get_mut(joint.0)?;
        Some(JointMut {
            handle: joint,
            joint: stored,
            backend: &mut self.backend,
        })
    }

    /// Returns an iterator over all joints.
    pub fn joints(&self) -> impl Iterator<Item = (JointHandle, &Joint)> {
        self.joints.iter().map(|(index, joint)| (JointHandle(index), joint))
    }

    /// Returns the joints attached to a body. The slice is empty if the body does not exist.
    pub fn joints_of(&self, body: BodyHandle) -> &[JointHandle] {
        match self.bodies.get(body.0) {
            Some(stored) => stored.joints(),
            None => &[],
        }
    }

    /// Returns the joints connecting two bodies.
    pub fn joints_between(
        &self,
        body1: BodyHandle,
        body2: BodyHandle,
    ) -> impl Iterator<Item = JointHandle> + '_ {
        self.joints_of(body1).iter().copied().filter(move |joint| {
            self.joints
                .get(joint.0)
                .is_some_and(|stored| stored.other_body(body1) == Some(body2))
        })
    }

    /// Returns `true` unless a joint between the two bodies has collision disabled.
    pub fn bodies_collide(&self, body1: BodyHandle, body2: BodyHandle) -> bool {
        self.joints_between(body1, body2).all(|joint| {
            self.joints
                .get(joint.0)
                .is_none_or(|stored| stored.collision_enabled)
        })
    }

    /// Enables or disables a joint.
    ///
    /// If the joint is attached to a world, its constraints are added to or removed from the
    /// world's active set. If the world is mid-step, this happens when the step finishes.
    pub fn set_joint_enabled(&mut self, joint: JointHandle, enabled: bool) -> Result<(), JointError> {
        let Some(stored) = self.joints.get_mut(joint.0) else {
            return Err(JointError::NoSuchJoint(joint));
        };
        if stored.enabled == enabled {
            return Ok(());
        }
        stored.enabled = enabled;

        if let Some(world) = stored.world {
            let op = if enabled {
                PendingOp::Activate(joint)
            } else {
                PendingOp::Deactivate(joint)
            };
            self.request(world, op);
        }
        Ok(())
    }

    /// Sets whether the two bodies of a joint may collide with each other.
    pub fn set_joint_collision_enabled(
        &mut self,
        joint: JointHandle,
        enabled: bool,
    ) -> Result<(), JointError> {
        let Some(stored) = self.joints.get_mut(joint.0) else {
            return Err(JointError::NoSuchJoint(joint));
        };
        if stored.collision_enabled == enabled {
            return Ok(());
        }
        stored.collision_enabled = enabled;

        let [body1, body2] = stored.bodies();
        self.publish_collision_filter(body1, body2);
        Ok(())
    }

    /// Destroys a joint, freeing its constraints.
    ///
    /// If the joint is attached to a world that is mid-step, it is marked for destruction and
    /// destroyed when the step finishes.
    pub fn destroy_joint(&mut self, joint: JointHandle) -> Result<(), JointError> {
        let Some(stored) = self.joints.get_mut(joint.0) else {
            warn!("Tried to destroy joint {joint:?} that does not exist");
            return Err(JointError::NoSuchJoint(joint));
        };

        match stored.world.and_then(|world| self.worlds.get(world.0).map(|w| (world, w))) {
            Some((world, target)) => {
                if target.is_locked() {
                    stored.destroy_mark = true;
                }
                self.request(
                    world,
                    PendingOp::Remove {
                        joint,
                        destroy: true,
                    },
                );
            }
            None => self.release_joint(joint),
        }
        Ok(())
    }

    /// Runs an operation on a world now, or queues it if the world is mid-step.
    fn request(&mut self, world: WorldHandle, op: PendingOp) {
        let Some(target) = self.worlds.get_mut(world.0) else {
            return;
        };
        match target.request(op) {
            Some(op) => self.apply(world, op),
            None => debug!("Delaying {op:?} until world {world:?} finishes its step"),
        }
    }

    fn apply(&mut self, world: WorldHandle, op: PendingOp) {
        match op {
            PendingOp::Activate(joint) => self.activate_now(world, joint),
            PendingOp::Deactivate(joint) => self.deactivate_now(world, joint),
            PendingOp::Remove { joint, destroy } => self.remove_now(world, joint, destroy),
        }
    }

    fn activate_now(&mut self, world: WorldHandle, joint: JointHandle) {
        let (Some(target), Some(stored)) = (self.worlds.get_mut(world.0), self.joints.get(joint.0))
        else {
            return;
        };
        if stored.world != Some(world) || !stored.enabled || !target.active.insert(joint) {
            return;
        }
        for &constraint in &stored.constraints {
            self.backend.add_constraint(target.raw(), constraint);
        }
        debug!("Activated joint {joint:?} in world {world:?}");
    }

    fn deactivate_now(&mut self, world: WorldHandle, joint: JointHandle) {
        let Some(target) = self.worlds.get_mut(world.0) else {
            return;
        };
        if !target.active.shift_remove(&joint) {
            return;
        }
        if let Some(stored) = self.joints.get(joint.0) {
            for &constraint in &stored.constraints {
                self.backend.remove_constraint(target.raw(), constraint);
            }
        }
        debug!("Deactivated joint {joint:?} in world {world:?}");
    }

    fn remove_now(&mut self, world: WorldHandle, joint: JointHandle, destroy: bool) {
        self.deactivate_now(world, joint);
        if let Some(target) = self.worlds.get_mut(world.0) {
            target.joints.shift_remove(&joint);
        }
        if let Some(stored) = self.joints.get_mut(joint.0) {
            if stored.world == Some(world) {
                stored.world = None;
            }
        }
        debug!("Removed joint {joint:?} from world {world:?}");

        if destroy {
            self.release_joint(joint);
        }
    }

    /// Detaches a joint from its bodies, restores collision between them and frees its constraints.
    ///
    /// The joint must no longer be active in any world.
    fn release_joint(&mut self, joint: JointHandle) {
        let Some(mut removed) = self.joints.remove(joint.0) else {
            return;
        };
        let kind = removed.kind();

        for body in removed.bodies() {
            if let Some(stored) = self.bodies.get_mut(body.0) {
                stored.remove_joint(joint);
            }
        }

        if !removed.collision_enabled {
            removed.collision_enabled = true;
            self.publish_collision_filter(removed.body1, removed.body2);
        }

        for constraint in removed.constraints {
            self.backend.free_constraint(constraint);
        }
        debug!("Destroyed {kind:?} joint {joint:?}");

        let backend = &mut self.backend;
        self.retired_bodies.retain_mut(|retired| {
            retired.joints.retain(|&other| other != joint);
            if retired.joints.is_empty() {
                backend.remove_body(retired.raw);
                false
            } else {
                true
            }
        });
    }

    /// Sends the current collision rule between two bodies to the backend.
    fn publish_collision_filter(&mut self, body1: BodyHandle, body2: BodyHandle) {
        let (Some(stored1), Some(stored2)) = (self.bodies.get(body1.0), self.bodies.get(body2.0))
        else {
            return;
        };
        let collide = self.bodies_collide(body1, body2);
        self.backend
            .set_collision_filter(stored1.raw(), stored2.raw(), collide);
    }
}
