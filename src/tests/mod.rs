use crate::{
    backend::{ConstraintKind, ConstraintParam, HeadlessBackend, ParamValue, RawBody},
    prelude::*,
};
use approx::assert_relative_eq;

type Context = PhysicsContext<HeadlessBackend>;

fn create_context() -> (Context, BodyHandle, BodyHandle) {
    let mut context = PhysicsContext::new(HeadlessBackend::new());
    let body1 = context.insert_body(Vec2::ZERO, 0.0);
    let body2 = context.insert_body(Vec2::new(3.0, 4.0), 0.0);
    (context, body1, body2)
}

fn every_variant(body1: BodyHandle, body2: BodyHandle) -> Vec<JointDesc> {
    vec![
        FixedJoint::new(body1, body2, Vec2::new(1.0, 1.0)).into(),
        PinJoint::new(body1, body2, Vec2::new(1.5, 2.0)).into(),
        LimitJoint::new(body1, body2, Vec2::ZERO, Vec2::ZERO).into(),
        DistanceJoint::new(body1, body2, Vec2::ZERO, Vec2::ZERO).into(),
        SpringJoint::new(body1, body2, Vec2::ZERO, Vec2::ZERO, 10.0, 0.5).into(),
        GrooveJoint::new(body1, body2, Vec2::NEG_X, Vec2::X, Vec2::ZERO).into(),
        RotarySpringJoint::new(body1, body2, 10.0, 0.5).into(),
        RotaryLimitJoint::new(body1, body2).into(),
        RatchetJoint::new(body1, body2, 0.0, 0.5).into(),
        GearJoint::new(body1, body2, 0.0, 2.0).into(),
        MotorJoint::new(body1, body2, 1.0).into(),
    ]
}

fn raw(context: &Context, body: BodyHandle) -> RawBody {
    context.body(body).unwrap().raw()
}

#[test]
fn invalid_bodies_are_rejected() {
    let (mut context, body1, body2) = create_context();
    let removed = context.insert_body(Vec2::ONE, 0.0);
    context.remove_body(removed).unwrap();

    for desc in every_variant(body1, body1) {
        assert_eq!(
            context.create_joint(desc),
            Err(JointError::SameBody(body1)),
            "{:?}",
            desc.kind()
        );
    }
    for desc in every_variant(body1, removed)
        .into_iter()
        .chain(every_variant(removed, body2))
    {
        assert_eq!(
            context.create_joint(desc),
            Err(JointError::NoSuchBody(removed)),
            "{:?}",
            desc.kind()
        );
    }

    assert_eq!(context.joints().count(), 0);
    assert!(context.joints_of(body1).is_empty());
    assert_eq!(context.backend().constraint_count(), 0);
}

#[test]
fn joints_own_expected_constraints() {
    let (mut context, body1, body2) = create_context();

    for desc in every_variant(body1, body2) {
        let kind = desc.kind();
        let joint = context.create_joint(desc).unwrap();
        let view = context.joint(joint).unwrap();

        let expected = if kind == JointKind::Fixed { 2 } else { 1 };
        assert_eq!(view.constraints().len(), expected, "{kind:?}");
        assert_eq!(view.kind(), kind);
        assert_eq!(view.bodies(), [body1, body2]);
        assert_eq!(view.world(), None);
        assert!(view.is_enabled());

        assert!(context.joints_of(body1).contains(&joint));
        assert!(context.joints_of(body2).contains(&joint));
    }

    assert_eq!(context.joints_between(body1, body2).count(), 11);
    assert_eq!(context.backend().constraint_count(), 12);
}

#[test]
fn max_force_round_trip() {
    let (mut context, body1, body2) = create_context();

    for desc in every_variant(body1, body2) {
        let joint = context.create_joint(desc).unwrap();
        assert_eq!(context.joint(joint).unwrap().max_force(), Some(f32::INFINITY));

        context.joint_mut(joint).unwrap().set_max_force(125.5);
        assert_eq!(
            context.joint(joint).unwrap().max_force(),
            Some(125.5),
            "{:?}",
            desc.kind()
        );

        // The force is written to every constraint of the joint.
        let view = context.joint(joint).unwrap();
        for &constraint in view.constraints() {
            assert_eq!(
                context.backend().param(constraint, ConstraintParam::MaxForce),
                Some(ParamValue::Scalar(125.5 as Scalar))
            );
        }
    }
}

#[test]
fn destroy_frees_constraints_once_and_restores_collision() {
    let (mut context, body1, body2) = create_context();
    let joint = context
        .create_joint(FixedJoint::new(body1, body2, Vec2::ZERO))
        .unwrap();
    let constraints = context.joint(joint).unwrap().constraints().to_vec();
    assert!(!context.backend().collides(raw(&context, body1), raw(&context, body2)));

    context.destroy_joint(joint).unwrap();

    for constraint in constraints {
        assert_eq!(context.backend().free_count(constraint), 1);
    }
    assert!(context.backend().collides(raw(&context, body1), raw(&context, body2)));
    assert!(context.bodies_collide(body1, body2));
    assert!(context.joint(joint).is_none());
    assert!(context.joints_of(body1).is_empty());
    assert!(context.joints_of(body2).is_empty());

    assert_eq!(
        context.destroy_joint(joint),
        Err(JointError::NoSuchJoint(joint))
    );
    assert_eq!(context.backend().freed().len(), 2);
}

#[test]
fn destroy_removes_joint_from_world() {
    let (mut context, body1, body2) = create_context();
    let world = context.create_world(WorldConfig::default());
    let space = context.world(world).unwrap().raw();

    let joint = context
        .create_joint(SpringJoint::new(body1, body2, Vec2::ZERO, Vec2::ZERO, 5.0, 0.1))
        .unwrap();
    context.set_joint_collision_enabled(joint, false).unwrap();
    context.add_joint(world, joint).unwrap();
    let constraint = context.joint(joint).unwrap().constraints()[0];
    assert_eq!(context.backend().space_constraints(space).count(), 1);

    context.destroy_joint(joint).unwrap();

    assert_eq!(context.backend().space_constraints(space).count(), 0);
    assert_eq!(context.backend().free_count(constraint), 1);
    assert!(context.backend().collides(raw(&context, body1), raw(&context, body2)));
    assert!(!context.world(world).unwrap().contains(joint));
}

#[test]
fn limit_max_defaults_to_anchor_distance() {
    let (mut context, body1, body2) = create_context();
    let anchor1 = Vec2::new(1.0, 0.0);
    let anchor2 = Vec2::new(0.0, 1.0);

    // anchor1 on the second body is at (4, 4), anchor2 on the first body is at (0, 1).
    let limit = context
        .create_joint(LimitJoint::new(body1, body2, anchor1, anchor2))
        .unwrap();
    let view = context.joint(limit).unwrap();
    assert_eq!(view.min(), Some(0.0));
    assert_relative_eq!(view.max().unwrap(), 5.0);
    assert_eq!(view.anchor1(), Some(anchor1));
    assert_eq!(view.anchor2(), Some(anchor2));

    let explicit = context
        .create_joint(LimitJoint::new(body1, body2, anchor1, anchor2).with_limits(1.0, 2.0))
        .unwrap();
    let view = context.joint(explicit).unwrap();
    assert_eq!(view.min(), Some(1.0));
    assert_eq!(view.max(), Some(2.0));
}

#[test]
fn rotary_limit_defaults_to_locked() {
    let (mut context, body1, body2) = create_context();

    let locked = context
        .create_joint(RotaryLimitJoint::new(body1, body2))
        .unwrap();
    let view = context.joint(locked).unwrap();
    assert_eq!(view.min(), Some(0.0));
    assert_eq!(view.max(), Some(0.0));

    let limited = context
        .create_joint(RotaryLimitJoint::new(body1, body2).with_limits(-0.5, 0.5))
        .unwrap();
    let view = context.joint(limited).unwrap();
    assert_eq!(view.min(), Some(-0.5));
    assert_eq!(view.max(), Some(0.5));
}

#[test]
fn enable_toggles_are_delayed_until_step_boundary() {
    let (mut context, body1, body2) = create_context();
    let world = context.create_world(WorldConfig::default());
    let space = context.world(world).unwrap().raw();

    let joint = context
        .create_joint(DistanceJoint::new(body1, body2, Vec2::ZERO, Vec2::ZERO))
        .unwrap();
    context.set_joint_enabled(joint, false).unwrap();
    context.add_joint(world, joint).unwrap();
    assert!(context.world(world).unwrap().contains(joint));
    assert!(!context.world(world).unwrap().is_active(joint));

    context.begin_step(world).unwrap();
    context.set_joint_enabled(joint, true).unwrap();
    assert!(!context.world(world).unwrap().is_active(joint));
    assert_eq!(context.backend().space_constraints(space).count(), 0);
    context.end_step(world).unwrap();

    assert!(context.world(world).unwrap().is_active(joint));
    assert_eq!(context.backend().space_constraints(space).count(), 1);

    context.begin_step(world).unwrap();
    context.set_joint_enabled(joint, false).unwrap();
    assert!(context.world(world).unwrap().is_active(joint));
    context.end_step(world).unwrap();

    assert!(!context.world(world).unwrap().is_active(joint));
    assert_eq!(context.backend().space_constraints(space).count(), 0);
}

#[test]
fn opposite_toggles_cancel_within_a_step() {
    let (mut context, body1, body2) = create_context();
    let world = context.create_world(WorldConfig::default());
    let joint = context
        .create_joint(GearJoint::new(body1, body2, 0.0, 1.0))
        .unwrap();
    context.add_joint(world, joint).unwrap();

    context.begin_step(world).unwrap();
    context.set_joint_enabled(joint, false).unwrap();
    context.set_joint_enabled(joint, true).unwrap();
    assert_eq!(context.world(world).unwrap().pending().count(), 0);
    context.end_step(world).unwrap();

    assert!(context.world(world).unwrap().is_active(joint));
}

#[test]
fn fixed_joint_collision() {
    let (mut context, body1, body2) = create_context();
    let anchor = Vec2::new(2.0, -1.0);
    let joint = context
        .create_joint(FixedJoint::new(body1, body2, anchor))
        .unwrap();
    let (raw1, raw2) = (raw(&context, body1), raw(&context, body2));

    // Both bodies are moved to the anchor.
    assert_eq!(context.body(body1).unwrap().position(), anchor);
    assert_eq!(context.body(body2).unwrap().position(), anchor);
    assert_eq!(
        context.backend().body_pose(raw2).map(|(position, _)| position),
        Some(anchor.adjust_precision())
    );

    assert!(!context.joint(joint).unwrap().is_collision_enabled());
    assert!(!context.bodies_collide(body1, body2));
    assert!(!context.backend().collides(raw1, raw2));

    for _ in 0..2 {
        context.set_joint_collision_enabled(joint, true).unwrap();
        assert!(context.joint(joint).unwrap().is_collision_enabled());
        assert!(context.backend().collides(raw1, raw2));
    }
    for _ in 0..2 {
        context.set_joint_collision_enabled(joint, false).unwrap();
        assert!(!context.joint(joint).unwrap().is_collision_enabled());
        assert!(!context.backend().collides(raw1, raw2));
    }
}

#[test]
fn collision_stays_disabled_while_any_joint_disables_it() {
    let (mut context, body1, body2) = create_context();
    let (raw1, raw2) = (raw(&context, body1), raw(&context, body2));
    let pin = context
        .create_joint(PinJoint::new(body1, body2, Vec2::ZERO))
        .unwrap();
    let gear = context
        .create_joint(GearJoint::new(body1, body2, 0.0, 1.0))
        .unwrap();

    context.set_joint_collision_enabled(pin, false).unwrap();
    context.set_joint_collision_enabled(gear, false).unwrap();
    context.set_joint_collision_enabled(pin, true).unwrap();
    assert!(!context.backend().collides(raw1, raw2));

    context.destroy_joint(gear).unwrap();
    assert!(context.backend().collides(raw1, raw2));
}

#[test]
fn refused_constraint_leaves_no_joint() {
    let (mut context, body1, body2) = create_context();
    context.backend_mut().refuse(ConstraintKind::Gear);

    assert_eq!(
        context.create_joint(FixedJoint::new(body1, body2, Vec2::ZERO)),
        Err(JointError::ConstraintCreation {
            joint: JointKind::Fixed,
            constraint: ConstraintKind::Gear,
        })
    );

    // The pivot created before the gear was refused has been freed.
    assert_eq!(context.backend().constraint_count(), 0);
    assert_eq!(context.backend().freed().len(), 1);
    assert_eq!(context.joints().count(), 0);
    assert!(context.joints_of(body1).is_empty());
    assert!(context.joints_of(body2).is_empty());
    assert!(context.backend().collides(raw(&context, body1), raw(&context, body2)));

    // Both bodies were already moved to the anchor.
    assert_eq!(context.body(body2).unwrap().position(), Vec2::ZERO);

    context.backend_mut().allow(ConstraintKind::Gear);
    assert!(
        context
            .create_joint(FixedJoint::new(body1, body2, Vec2::ZERO))
            .is_ok()
    );
}

#[test]
fn destroy_during_step_is_delayed() {
    let (mut context, body1, body2) = create_context();
    let world = context.create_world(WorldConfig::default());
    let space = context.world(world).unwrap().raw();
    let joint = context
        .create_joint(MotorJoint::new(body1, body2, 2.0))
        .unwrap();
    context.add_joint(world, joint).unwrap();
    let constraint = context.joint(joint).unwrap().constraints()[0];

    context.begin_step(world).unwrap();
    context.destroy_joint(joint).unwrap();

    let view = context.joint(joint).unwrap();
    assert!(view.is_marked_for_destruction());
    assert!(context.world(world).unwrap().is_removal_pending(joint));
    assert_eq!(context.backend().space_constraints(space).count(), 1);
    assert_eq!(context.backend().free_count(constraint), 0);

    // A joint being destroyed cannot be attached again.
    assert_eq!(
        context.add_joint(world, joint),
        Err(JointError::NoSuchJoint(joint))
    );

    context.end_step(world).unwrap();

    assert!(context.joint(joint).is_none());
    assert_eq!(context.backend().space_constraints(space).count(), 0);
    assert_eq!(context.backend().free_count(constraint), 1);
    assert!(context.joints_of(body1).is_empty());
}

#[test]
fn removing_world_first_detaches_joints() {
    let (mut context, body1, body2) = create_context();
    let world = context.create_world(WorldConfig::default());
    let space = context.world(world).unwrap().raw();
    let joint = context
        .create_joint(RatchetJoint::new(body1, body2, 0.0, 0.25))
        .unwrap();
    context.add_joint(world, joint).unwrap();

    context.remove_world(world).unwrap();
    assert!(!context.backend().has_space(space));
    assert_eq!(context.joint(joint).unwrap().world(), None);
    assert_eq!(
        context.add_joint(world, joint),
        Err(JointError::NoSuchWorld(world))
    );

    // The joint is destroyed directly, without a world.
    let constraint = context.joint(joint).unwrap().constraints()[0];
    context.destroy_joint(joint).unwrap();
    assert_eq!(context.backend().free_count(constraint), 1);
    assert!(context.joints_of(body2).is_empty());
}

#[test]
fn removing_world_carries_out_delayed_destruction() {
    let (mut context, body1, body2) = create_context();
    let world = context.create_world(WorldConfig::default());
    let doomed = context
        .create_joint(PinJoint::new(body1, body2, Vec2::ZERO))
        .unwrap();
    let survivor = context
        .create_joint(GearJoint::new(body1, body2, 0.0, 1.0))
        .unwrap();
    context.add_joint(world, doomed).unwrap();
    context.add_joint(world, survivor).unwrap();

    context.begin_step(world).unwrap();
    context.destroy_joint(doomed).unwrap();
    context.remove_world(world).unwrap();

    assert!(context.joint(doomed).is_none());
    assert_eq!(context.joint(survivor).unwrap().world(), None);
    assert_eq!(context.backend().freed().len(), 1);
    assert_eq!(context.joints_of(body1), &[survivor]);
}

#[test]
fn removing_body_destroys_its_joints() {
    let (mut context, body1, body2) = create_context();
    let body3 = context.insert_body(Vec2::new(-2.0, 0.0), 0.0);
    let first = context
        .create_joint(PinJoint::new(body1, body2, Vec2::ZERO))
        .unwrap();
    let second = context
        .create_joint(MotorJoint::new(body3, body1, 1.0))
        .unwrap();
    let unrelated = context
        .create_joint(GearJoint::new(body2, body3, 0.0, 1.0))
        .unwrap();

    context.remove_body(body1).unwrap();

    assert!(context.body(body1).is_none());
    assert!(context.joint(first).is_none());
    assert!(context.joint(second).is_none());
    assert!(context.joint(unrelated).is_some());
    assert_eq!(context.joints_of(body2), &[unrelated]);
    assert_eq!(context.backend().body_count(), 2);
    assert_eq!(
        context.remove_body(body1),
        Err(JointError::NoSuchBody(body1))
    );
}

#[test]
fn removing_body_mid_step_delays_joint_destruction() {
    let (mut context, body1, body2) = create_context();
    let world = context.create_world(WorldConfig::default());
    let joint = context
        .create_joint(DistanceJoint::new(body1, body2, Vec2::ZERO, Vec2::ZERO))
        .unwrap();
    context.add_joint(world, joint).unwrap();
    let space = context.world(world).unwrap().raw();
    let constraint = context.joint(joint).unwrap().constraints()[0];
    let raw2 = raw(&context, body2);

    context.begin_step(world).unwrap();
    context.remove_body(body2).unwrap();
    assert!(context.body(body2).is_none());
    assert!(context.joint(joint).unwrap().is_marked_for_destruction());

    // The constraint is still active, so its body must still exist in the backend.
    assert_eq!(
        context.backend().space_constraints(space).collect::<Vec<_>>(),
        vec![constraint]
    );
    assert!(context.backend().body_pose(raw2).is_some());
    assert_eq!(context.backend().body_count(), 2);

    context.end_step(world).unwrap();

    assert!(context.joint(joint).is_none());
    assert!(context.joints_of(body1).is_empty());
    assert_eq!(context.backend().space_constraints(space).count(), 0);
    assert!(context.backend().body_pose(raw2).is_none());
    assert_eq!(context.backend().body_count(), 1);
}

#[test]
fn removed_body_outlives_joints_of_removed_world() {
    let (mut context, body1, body2) = create_context();
    let world = context.create_world(WorldConfig::default());
    let joint = context
        .create_joint(PinJoint::new(body1, body2, Vec2::ZERO))
        .unwrap();
    context.add_joint(world, joint).unwrap();
    let raw1 = raw(&context, body1);

    context.begin_step(world).unwrap();
    context.remove_body(body1).unwrap();
    assert!(context.backend().body_pose(raw1).is_some());

    context.remove_world(world).unwrap();

    assert!(context.joint(joint).is_none());
    assert!(context.backend().body_pose(raw1).is_none());
    assert_eq!(context.backend().body_count(), 1);
}

#[test]
fn springs_measure_initial_state() {
    let mut context = PhysicsContext::new(HeadlessBackend::new());
    let body1 = context.insert_body(Vec2::ZERO, 0.25);
    let body2 = context.insert_body(Vec2::new(0.0, -2.0), 1.0);

    let spring = context
        .create_joint(SpringJoint::new(body1, body2, Vec2::ZERO, Vec2::ZERO, 40.0, 0.3))
        .unwrap();
    let view = context.joint(spring).unwrap();
    assert_relative_eq!(view.rest_length().unwrap(), 2.0);
    assert_eq!(view.stiffness(), Some(40.0));
    assert_eq!(view.damping(), Some(0.3));

    let rotary = context
        .create_joint(RotarySpringJoint::new(body1, body2, 15.0, 0.1))
        .unwrap();
    let view = context.joint(rotary).unwrap();
    assert_relative_eq!(view.rest_angle().unwrap(), 0.75);

    let ratchet = context
        .create_joint(RatchetJoint::new(body1, body2, 0.1, 0.5))
        .unwrap();
    assert_relative_eq!(context.joint(ratchet).unwrap().angle().unwrap(), 0.75);
}

#[test]
fn distance_joint_measures_anchor_distance() {
    let (mut context, body1, body2) = create_context();
    let joint = context
        .create_joint(DistanceJoint::new(body1, body2, Vec2::ZERO, Vec2::ZERO))
        .unwrap();
    assert_relative_eq!(context.joint(joint).unwrap().distance().unwrap(), 5.0);

    context.joint_mut(joint).unwrap().set_distance(2.5).unwrap();
    assert_eq!(context.joint(joint).unwrap().distance(), Some(2.5));
}

#[test]
fn anchor2_setters_write_anchor2() {
    let (mut context, body1, body2) = create_context();
    let anchor1 = Vec2::new(0.5, 0.0);
    let limit = context
        .create_joint(LimitJoint::new(body1, body2, anchor1, Vec2::ZERO))
        .unwrap();
    let spring = context
        .create_joint(SpringJoint::new(body1, body2, anchor1, Vec2::ZERO, 1.0, 0.0))
        .unwrap();

    for joint in [limit, spring] {
        let mut view = context.joint_mut(joint).unwrap();
        view.set_anchor2(Vec2::new(-1.0, 2.0)).unwrap();
        assert_eq!(view.anchor2(), Some(Vec2::new(-1.0, 2.0)));
        assert_eq!(view.anchor1(), Some(anchor1));
    }
}

#[test]
fn parameters_can_be_changed_after_creation() {
    let (mut context, body1, body2) = create_context();
    let ratchet = context
        .create_joint(RatchetJoint::new(body1, body2, 0.0, 0.5))
        .unwrap();
    let gear = context
        .create_joint(GearJoint::new(body1, body2, 0.0, 2.0))
        .unwrap();
    let groove = context
        .create_joint(GrooveJoint::new(body1, body2, Vec2::NEG_X, Vec2::X, Vec2::ZERO))
        .unwrap();

    let mut view = context.joint_mut(ratchet).unwrap();
    view.set_angle(1.5).unwrap();
    view.set_phase(0.25).unwrap();
    view.set_ratchet(0.125).unwrap();
    view.set_tag(7);
    let view = context.joint(ratchet).unwrap();
    assert_eq!(view.angle(), Some(1.5));
    assert_eq!(view.phase(), Some(0.25));
    assert_eq!(view.ratchet(), Some(0.125));
    assert_eq!(view.tag(), 7);

    let mut view = context.joint_mut(gear).unwrap();
    assert_eq!(view.ratio(), Some(2.0));
    view.set_ratio(-1.0).unwrap();
    view.set_phase(0.5).unwrap();
    assert_eq!(view.view().ratio(), Some(-1.0));
    assert_eq!(view.phase(), Some(0.5));

    let mut view = context.joint_mut(groove).unwrap();
    view.set_groove_a(Vec2::new(-2.0, 0.0)).unwrap();
    view.set_groove_b(Vec2::new(2.0, 0.0)).unwrap();
    assert_eq!(view.groove_a(), Some(Vec2::new(-2.0, 0.0)));
    assert_eq!(view.groove_b(), Some(Vec2::new(2.0, 0.0)));
    assert_eq!(view.anchor2(), Some(Vec2::ZERO));
}

#[test]
fn unsupported_params_are_rejected() {
    let (mut context, body1, body2) = create_context();
    let motor = context
        .create_joint(MotorJoint::new(body1, body2, 1.0))
        .unwrap();
    let fixed = context
        .create_joint(FixedJoint::new(body1, body2, Vec2::ZERO))
        .unwrap();

    let mut view = context.joint_mut(motor).unwrap();
    assert_eq!(
        view.set_min(1.0),
        Err(JointError::UnsupportedParam {
            kind: JointKind::Motor,
            param: ConstraintParam::Min,
        })
    );
    assert_eq!(view.min(), None);
    assert_eq!(view.rate(), Some(1.0));

    // Fixed joints only expose their maximum force, even though their pivot has anchors.
    let mut view = context.joint_mut(fixed).unwrap();
    assert_eq!(view.anchor1(), None);
    assert!(view.set_anchor1(Vec2::X).is_err());
    assert_eq!(view.ratio(), None);
}

#[test]
fn re_adding_cancels_delayed_removal() {
    let (mut context, body1, body2) = create_context();
    let world = context.create_world(WorldConfig::default());
    let joint = context
        .create_joint(PinJoint::new(body1, body2, Vec2::ZERO))
        .unwrap();
    context.add_joint(world, joint).unwrap();

    context.begin_step(world).unwrap();
    context.remove_joint_from_world(joint).unwrap();
    assert!(context.world(world).unwrap().is_removal_pending(joint));
    context.add_joint(world, joint).unwrap();
    assert_eq!(context.world(world).unwrap().pending().count(), 0);
    context.end_step(world).unwrap();

    assert_eq!(context.joint(joint).unwrap().world(), Some(world));
    assert!(context.world(world).unwrap().is_active(joint));
}

#[test]
fn joints_belong_to_one_world() {
    let (mut context, body1, body2) = create_context();
    let world1 = context.create_world(WorldConfig::default());
    let world2 = context.create_world(WorldConfig::default());
    let joint = context
        .create_joint(PinJoint::new(body1, body2, Vec2::ZERO))
        .unwrap();

    context.add_joint(world1, joint).unwrap();
    assert_eq!(
        context.add_joint(world2, joint),
        Err(JointError::AlreadyInWorld {
            joint,
            world: world1
        })
    );

    context.remove_joint_from_world(joint).unwrap();
    assert_eq!(context.joint(joint).unwrap().world(), None);
    assert_eq!(context.world(world1).unwrap().joints().count(), 0);
    context.add_joint(world2, joint).unwrap();
    assert!(context.world(world2).unwrap().is_active(joint));
}

#[test]
fn step_world_splits_into_substeps() {
    let (mut context, _, _) = create_context();
    let world = context.create_world(WorldConfig::default().with_substeps(4).with_speed(0.5));
    let space = context.world(world).unwrap().raw();

    context.step_world(world, 1.0).unwrap();
    assert_eq!(context.backend().space_steps(space), 4);
    assert_relative_eq!(context.backend().space_elapsed(space), 0.5);
    assert!(!context.world(world).unwrap().is_locked());

    context.world_mut(world).unwrap().config.speed = 0.0;
    context.step_world(world, 1.0).unwrap();
    assert_eq!(context.backend().space_steps(space), 4);
}

#[test]
fn stepping_a_locked_world_fails() {
    let (mut context, body1, body2) = create_context();
    let world = context.create_world(WorldConfig::default());
    let space = context.world(world).unwrap().raw();
    let joint = context
        .create_joint(MotorJoint::new(body1, body2, 1.0))
        .unwrap();

    context.begin_step(world).unwrap();
    context.add_joint(world, joint).unwrap();
    assert_eq!(
        context.step_world(world, 1.0),
        Err(JointError::WorldLocked(world))
    );

    // The outer step keeps its lock and its queue.
    assert!(context.world(world).unwrap().is_locked());
    assert_eq!(context.backend().space_steps(space), 0);
    assert_eq!(context.backend().space_constraints(space).count(), 0);

    context.end_step(world).unwrap();
    assert_eq!(context.backend().space_constraints(space).count(), 1);
}
