use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use tracing::warn;

use super::*;
use crate::data_structures::pair_key::PairKey;

/// A constraint stored by the [`HeadlessBackend`].
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessConstraint {
    /// The kind of the constraint.
    pub kind: ConstraintKind,
    /// The bodies connected by the constraint.
    pub bodies: [RawBody; 2],
    /// The space the constraint is currently active in, if any.
    pub space: Option<RawSpace>,
    params: HashMap<ConstraintParam, ParamValue>,
}

impl HeadlessConstraint {
    /// Returns the current value of a parameter.
    pub fn param(&self, param: ConstraintParam) -> Option<ParamValue> {
        self.params.get(&param).copied()
    }
}

#[derive(Clone, Debug, Default)]
struct HeadlessSpace {
    constraints: IndexSet<RawConstraint>,
    steps: u32,
    elapsed: Scalar,
}

/// A [`PhysicsBackend`] that stores bodies, constraints and spaces in memory without simulating them.
///
/// It records everything the joint layer asks of it, which makes it useful for tests,
/// editors and tools that need joints without a solver. Stepping a space only counts
/// steps and accumulates elapsed time.
#[derive(Clone, Debug, Default)]
pub struct HeadlessBackend {
    next_id: u32,
    bodies: HashMap<RawBody, (Vector, Scalar)>,
    spaces: HashMap<RawSpace, HeadlessSpace>,
    constraints: HashMap<RawConstraint, HeadlessConstraint>,
    freed: Vec<RawConstraint>,
    non_colliding: HashSet<PairKey>,
    refused: HashSet<ConstraintKind>,
}

impl HeadlessBackend {
    /// Creates a new empty [`HeadlessBackend`].
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Makes [`create_constraint`](PhysicsBackend::create_constraint) fail for the given kind.
    pub fn refuse(&mut self, kind: ConstraintKind) {
        self.refused.insert(kind);
    }

    /// Undoes [`refuse`](Self::refuse) for the given kind.
    pub fn allow(&mut self, kind: ConstraintKind) {
        self.refused.remove(&kind);
    }

    /// Returns the live constraint with the given handle.
    pub fn constraint(&self, constraint: RawConstraint) -> Option<&HeadlessConstraint> {
        self.constraints.get(&constraint)
    }

    /// Returns the number of live constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Returns every constraint that has been freed, in the order it was freed.
    pub fn freed(&self) -> &[RawConstraint] {
        &self.freed
    }

    /// Returns how many times the given constraint has been freed.
    pub fn free_count(&self, constraint: RawConstraint) -> usize {
        self.freed.iter().filter(|&&freed| freed == constraint).count()
    }

    /// Returns the pose of a body.
    pub fn body_pose(&self, body: RawBody) -> Option<(Vector, Scalar)> {
        self.bodies.get(&body).copied()
    }

    /// Returns the number of live bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns `true` if the space exists.
    pub fn has_space(&self, space: RawSpace) -> bool {
        self.spaces.contains_key(&space)
    }

    /// Returns the constraints active in a space, in the order they were added.
    pub fn space_constraints(&self, space: RawSpace) -> impl Iterator<Item = RawConstraint> + '_ {
        self.spaces
            .get(&space)
            .into_iter()
            .flat_map(|space| space.constraints.iter().copied())
    }

    /// Returns how many times a space has been stepped.
    pub fn space_steps(&self, space: RawSpace) -> u32 {
        self.spaces.get(&space).map_or(0, |space| space.steps)
    }

    /// Returns the total time a space has been stepped by.
    pub fn space_elapsed(&self, space: RawSpace) -> Scalar {
        self.spaces.get(&space).map_or(0.0, |space| space.elapsed)
    }

    /// Returns `false` if collisions between the two bodies are filtered out.
    pub fn collides(&self, body1: RawBody, body2: RawBody) -> bool {
        !self.non_colliding.contains(&PairKey::new(body1.0, body2.0))
    }

    fn local_to_world(&self, body: RawBody, local: Vector) -> Vector {
        let Some(&(position, rotation)) = self.bodies.get(&body) else {
            return local;
        };
        position + Vector::from_angle(rotation).rotate(local)
    }

    fn rotation(&self, body: RawBody) -> Scalar {
        self.bodies.get(&body).map_or(0.0, |&(_, rotation)| rotation)
    }
}

impl PhysicsBackend for HeadlessBackend {
    fn insert_body(&mut self, position: Vector, rotation: Scalar) -> RawBody {
        let body = RawBody(self.next_id());
        self.bodies.insert(body, (position, rotation));
        body
    }

    fn remove_body(&mut self, body: RawBody) {
        if self.bodies.remove(&body).is_none() {
            warn!("Tried to remove body {body:?} that does not exist");
        }
        self.non_colliding.retain(|key| {
            let (id1, id2) = key.get();
            id1 != body.0 && id2 != body.0
        });
    }

    fn set_body_pose(&mut self, body: RawBody, position: Vector, rotation: Scalar) {
        match self.bodies.get_mut(&body) {
            Some(pose) => *pose = (position, rotation),
            None => warn!("Tried to move body {body:?} that does not exist"),
        }
    }

    fn create_space(&mut self) -> RawSpace {
        let space = RawSpace(self.next_id());
        self.spaces.insert(space, HeadlessSpace::default());
        space
    }

    fn remove_space(&mut self, space: RawSpace) {
        let Some(removed) = self.spaces.remove(&space) else {
            warn!("Tried to remove space {space:?} that does not exist");
            return;
        };
        for constraint in removed.constraints {
            if let Some(constraint) = self.constraints.get_mut(&constraint) {
                constraint.space = None;
            }
        }
    }

    fn step_space(&mut self, space: RawSpace, delta: Scalar) {
        match self.spaces.get_mut(&space) {
            Some(space) => {
                space.steps += 1;
                space.elapsed += delta;
            }
            None => warn!("Tried to step space {space:?} that does not exist"),
        }
    }

    fn create_constraint(
        &mut self,
        body1: RawBody,
        body2: RawBody,
        desc: &ConstraintDesc,
    ) -> Option<RawConstraint> {
        let kind = desc.kind();
        if self.refused.contains(&kind)
            || !self.bodies.contains_key(&body1)
            || !self.bodies.contains_key(&body2)
        {
            return None;
        }

        let mut params: HashMap<ConstraintParam, ParamValue> = desc.params().into_iter().collect();
        params.insert(ConstraintParam::MaxForce, Scalar::INFINITY.into());

        match *desc {
            ConstraintDesc::Pin { anchor1, anchor2 } => {
                let distance = self
                    .local_to_world(body1, anchor1)
                    .distance(self.local_to_world(body2, anchor2));
                params.insert(ConstraintParam::Distance, distance.into());
            }
            ConstraintDesc::Ratchet { .. } => {
                let angle = self.rotation(body2) - self.rotation(body1);
                params.insert(ConstraintParam::Angle, angle.into());
            }
            _ => {}
        }

        let constraint = RawConstraint(self.next_id());
        self.constraints.insert(
            constraint,
            HeadlessConstraint {
                kind,
                bodies: [body1, body2],
                space: None,
                params,
            },
        );
        Some(constraint)
    }

    fn free_constraint(&mut self, constraint: RawConstraint) {
        self.freed.push(constraint);

        let Some(removed) = self.constraints.remove(&constraint) else {
            warn!("Tried to free constraint {constraint:?} that does not exist");
            return;
        };
        if let Some(space) = removed.space {
            warn!("Constraint {constraint:?} was freed while still active in {space:?}");
            if let Some(space) = self.spaces.get_mut(&space) {
                space.constraints.shift_remove(&constraint);
            }
        }
    }

    fn param(&self, constraint: RawConstraint, param: ConstraintParam) -> Option<ParamValue> {
        self.constraints.get(&constraint)?.param(param)
    }

    fn set_param(&mut self, constraint: RawConstraint, param: ConstraintParam, value: ParamValue) {
        let Some(stored) = self.constraints.get_mut(&constraint) else {
            warn!("Tried to set {param:?} on constraint {constraint:?} that does not exist");
            return;
        };
        if !stored.kind.supports(param) {
            warn!("{:?} constraints have no {param:?} parameter", stored.kind);
            return;
        }
        stored.params.insert(param, value);
    }

    fn add_constraint(&mut self, space: RawSpace, constraint: RawConstraint) {
        let (Some(stored), Some(target)) = (
            self.constraints.get_mut(&constraint),
            self.spaces.get_mut(&space),
        ) else {
            warn!("Tried to add constraint {constraint:?} to space {space:?}, but one of them does not exist");
            return;
        };
        stored.space = Some(space);
        target.constraints.insert(constraint);
    }

    fn remove_constraint(&mut self, space: RawSpace, constraint: RawConstraint) {
        if let Some(target) = self.spaces.get_mut(&space) {
            target.constraints.shift_remove(&constraint);
        }
        if let Some(stored) = self.constraints.get_mut(&constraint) {
            if stored.space == Some(space) {
                stored.space = None;
            }
        }
    }

    fn set_collision_filter(&mut self, body1: RawBody, body2: RawBody, collide: bool) {
        let key = PairKey::new(body1.0, body2.0);
        if collide {
            self.non_colliding.remove(&key);
        } else {
            self.non_colliding.insert(key);
        }
    }
}
