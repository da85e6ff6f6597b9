use std::f32::consts::FRAC_PI_2;

use xpbd_joints::*;

const DT: f32 = 1.0 / 60.0;

fn make_world(gravity: Vec3) -> PhysicsWorld {
    PhysicsWorld::with_config(
        SimulationConfig::default()
            .with_time_step(DT)
            .with_substeps(40)
            .with_gravity(gravity),
    )
    .expect("valid config")
}

fn boxed(position: Vec3, size: Vec3) -> Body {
    let mut body = Body::new(Pose::from_position(position), None);
    body.set_box(size, 1.0).expect("valid box");
    body
}

/// Joint frames whose primary axis points straight down.
fn downward_frame(position: Vec3) -> Pose {
    Pose::new(position, Quat::from_rotation_z(-FRAC_PI_2))
}

#[test]
fn test_fixed_joint_holds_rigidly() {
    let mut world = make_world(Vec3::ZERO);

    let mut a = boxed(Vec3::ZERO, Vec3::splat(0.5));
    let mut b = boxed(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5));
    a.vel = Vec3::new(0.3, 0.1, 0.0);
    b.vel = a.vel;
    let a_id = world.add_body(a);
    let b_id = world.add_body(b);

    let joint_id = world
        .add_joint(Joint::fixed(
            a_id.into(),
            b_id.into(),
            Pose::from_position(Vec3::new(0.5, 0.0, 0.0)),
            Pose::from_position(Vec3::new(-0.5, 0.0, 0.0)),
        ))
        .unwrap();

    for _ in 0..100 {
        world.tick().unwrap();
    }

    let bodies = world.bodies.as_slice();
    let joint = world.joint(joint_id).unwrap();
    let (g0, g1) = joint.global_poses(world.body(a_id), world.body(b_id));

    assert!(joint.position_error(bodies).unwrap() < 1e-4);
    assert!(g0.orientation.angle_between(g1.orientation) < 1e-3);
    // the pair kept moving together
    assert!((bodies[0].pose.position.x - 0.3 * 100.0 * DT).abs() < 1e-3);
}

#[test]
fn test_fixed_joint_to_world_carries_load() {
    let mut world = make_world(Vec3::new(0.0, -10.0, 0.0));
    let id = world.add_body(boxed(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.2, 0.2)));
    let joint_id = world
        .add_joint(Joint::fixed(
            BodyHandle::World,
            id.into(),
            Pose::from_position(Vec3::new(0.5, 0.0, 0.0)),
            Pose::from_position(Vec3::new(-0.5, 0.0, 0.0)),
        ))
        .unwrap();

    for _ in 0..120 {
        world.tick().unwrap();
    }

    let body = world.body(id).unwrap();
    let joint = world.joint(joint_id).unwrap();
    assert!(joint.position_error(world.bodies.as_slice()).unwrap() < 1e-2);
    assert!(body.pose.orientation.angle_between(Quat::IDENTITY) < 5e-2);
    assert!((body.pose.position - Vec3::new(1.0, 0.0, 0.0)).length() < 5e-2);
}

#[test]
fn test_hinge_locked_by_zero_swing_limit_settles() {
    let mut world = make_world(Vec3::new(0.0, -10.0, 0.0));

    // cantilever along +Z, hinge axis along world X
    let id = world.add_body(boxed(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.2, 0.2, 2.0)));
    let joint_id = world
        .add_joint(
            Joint::hinge(
                BodyHandle::World,
                id.into(),
                Pose::IDENTITY,
                Pose::from_position(Vec3::new(0.0, 0.0, -1.0)),
            )
            .with_swing_limit(0.0, 0.0, 0.0)
            .with_damping(1000.0, 1000.0),
        )
        .unwrap();

    for _ in 0..120 {
        world.tick().unwrap();
    }

    let bodies = world.bodies.as_slice();
    let body = &bodies[0];
    let joint = world.joint(joint_id).unwrap();

    assert!(body.omega.length() < 5e-2, "omega = {:?}", body.omega);
    assert!(body.vel.length() < 5e-2, "vel = {:?}", body.vel);
    assert!(joint.swing_angle(bodies).unwrap().abs() < 5e-2);
    assert!(joint.position_error(bodies).unwrap() < 1e-2);
}

#[test]
fn test_hinge_swings_about_its_axis_only() {
    let mut world = make_world(Vec3::new(0.0, -10.0, 0.0));
    let id = world.add_body(boxed(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.2, 0.2, 2.0)));
    let joint_id = world
        .add_joint(Joint::hinge(
            BodyHandle::World,
            id.into(),
            Pose::IDENTITY,
            Pose::from_position(Vec3::new(0.0, 0.0, -1.0)),
        ))
        .unwrap();

    for _ in 0..30 {
        world.tick().unwrap();
    }

    let bodies = world.bodies.as_slice();
    let joint = world.joint(joint_id).unwrap();
    let (g0, g1) = joint.global_poses(None, Some(&bodies[0]));

    assert!(bodies[0].pose.position.y < -0.2, "pendulum should swing down");
    assert!(g0.axis_x().angle_between(g1.axis_x()) < 1e-2);
    assert!(joint.position_error(bodies).unwrap() < 1e-2);
}

#[test]
fn test_spherical_swing_limit_stops_motion() {
    let mut world = make_world(Vec3::ZERO);

    let mut body = boxed(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.2, 2.0, 0.2));
    body.vel = Vec3::new(3.0, 0.0, 0.0);
    let id = world.add_body(body);

    let max_swing = 0.5;
    let joint_id = world
        .add_joint(
            Joint::spherical(
                BodyHandle::World,
                id.into(),
                downward_frame(Vec3::ZERO),
                downward_frame(Vec3::new(0.0, 1.0, 0.0)),
            )
            .with_swing_limit(0.0, max_swing, 0.0),
        )
        .unwrap();

    let mut largest = 0.0_f32;
    for _ in 0..60 {
        world.tick().unwrap();
        let joint = world.joint(joint_id).unwrap();
        largest = largest.max(joint.swing_angle(world.bodies.as_slice()).unwrap());
    }

    assert!(largest > 0.3, "body never swung out: {largest}");
    assert!(largest < max_swing + 0.15, "swing limit exceeded: {largest}");
}

#[test]
fn test_spherical_twist_limit_stops_spin() {
    let mut world = make_world(Vec3::ZERO);

    let mut body = boxed(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.2, 2.0, 0.2));
    body.omega = Vec3::new(0.0, 5.0, 0.0);
    let id = world.add_body(body);

    let limit = 0.2;
    let joint_id = world
        .add_joint(
            Joint::spherical(
                BodyHandle::World,
                id.into(),
                downward_frame(Vec3::ZERO),
                downward_frame(Vec3::new(0.0, 1.0, 0.0)),
            )
            .with_twist_limit(-limit, limit, 0.0),
        )
        .unwrap();

    let mut largest = 0.0_f32;
    for _ in 0..60 {
        world.tick().unwrap();
        let joint = world.joint(joint_id).unwrap();
        let twist = joint.twist_angle(world.bodies.as_slice()).unwrap();
        largest = largest.max(twist.abs());
    }

    assert!(largest > 0.1, "body never twisted: {largest}");
    assert!(largest < limit + 0.1, "twist limit exceeded: {largest}");
}

#[test]
fn test_compliance_allows_static_stretch() {
    let compliance = 1e-3;
    let mut errors = Vec::new();

    for joint_compliance in [0.0, compliance] {
        let mut world = make_world(Vec3::new(0.0, -10.0, 0.0));
        let id = world.add_body(boxed(Vec3::new(0.0, -0.5, 0.0), Vec3::ONE));
        let joint_id = world
            .add_joint(
                Joint::spherical(
                    BodyHandle::World,
                    id.into(),
                    Pose::IDENTITY,
                    Pose::from_position(Vec3::new(0.0, 0.5, 0.0)),
                )
                .with_compliance(joint_compliance)
                .with_damping(0.0, 1000.0),
            )
            .unwrap();

        for _ in 0..180 {
            world.tick().unwrap();
        }
        errors.push(
            world
                .joint(joint_id)
                .unwrap()
                .position_error(world.bodies.as_slice())
                .unwrap(),
        );
    }

    // soft joint: stretch = compliance * m * g = 0.01
    assert!(errors[0] < 1e-3, "rigid joint stretched by {}", errors[0]);
    assert!(
        errors[1] > 0.007 && errors[1] < 0.013,
        "soft joint stretched by {}",
        errors[1]
    );
}

#[test]
fn test_joint_order_is_deterministic() {
    let run = || {
        let mut world = PhysicsWorld::default();
        HangingChain::default()
            .with_objects(6)
            .with_sizes(Vec3::new(0.1, 0.2, 0.1), Vec3::new(0.2, 0.2, 0.2))
            .build(&mut world)
            .unwrap();
        for _ in 0..20 {
            world.tick().unwrap();
        }
        world.bodies.iter().map(|b| b.pose).collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}
