use xpbd_joints::*;

fn main() -> Result<()> {
    let mut engine = PhysicsEngine::new(1.0 / 60.0);
    engine.set_parallel_enabled(true);

    // a fixed anchor with a box swinging below it
    let anchor = engine.add_body(Body::fixed(Pose::from_position(Vec3::new(0.0, 2.0, 0.0)), None));

    let mut bob = Body::new(Pose::from_position(Vec3::new(1.0, 2.0, 0.0)), None);
    bob.set_box(Vec3::new(0.2, 0.2, 0.2), 1.0)?;
    let bob_id = engine.add_body(bob);

    engine.add_joint(Joint::spherical(
        anchor.into(),
        bob_id.into(),
        Pose::IDENTITY,
        Pose::from_position(Vec3::new(-1.0, 0.0, 0.0)),
    ))?;

    let free_id = engine.add_body(Body::new(Pose::from_position(Vec3::new(3.0, 2.0, 0.0)), None));

    for frame in 0..=60 {
        if frame % 10 == 0 {
            let bob = engine.get_body(bob_id).map(|b| b.pose.position);
            let free = engine.get_body(free_id).map(|b| b.pose.position);
            println!("frame {frame:3}: pendulum {bob:?}, free body {free:?}");
        }
        engine.step(1.0 / 60.0)?;
    }

    println!("time in solver: {:?}", engine.world().profile().total_time());
    Ok(())
}
