use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use xpbd_joints::*;

const SECONDS: u32 = 5;

fn main() -> Result<()> {
    let mut world = PhysicsWorld::with_config(SimulationConfig::default().with_parallel(true))?;
    let chain = HangingChain::default();
    let handles = chain.build(&mut world)?;
    println!(
        "hanging chain: {} bodies, {} joints, {} substeps per tick",
        handles.bodies.len(),
        handles.joints.len(),
        world.config().num_substeps
    );

    let buffer = Arc::new(PoseBuffer::new());
    let running = Arc::new(AtomicBool::new(true));

    // stands in for a render thread mirroring poses onto visuals
    let viewer = {
        let buffer = Arc::clone(&buffer);
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut last_tick = 0;
            while running.load(Ordering::Acquire) {
                buffer.with_snapshot(|snapshot| {
                    if snapshot.tick >= last_tick + 60 {
                        last_tick = snapshot.tick;
                        if let Some((visual, pose)) = snapshot.visuals.last() {
                            println!(
                                "tick {:4}: visual {} at {:?}",
                                snapshot.tick, visual.0, pose.position
                            );
                        }
                    }
                });
                thread::sleep(Duration::from_millis(1));
            }
        })
    };

    for _ in 0..SECONDS * 60 {
        world.tick()?;
        buffer.publish(&world);
    }
    running.store(false, Ordering::Release);
    if viewer.join().is_err() {
        eprintln!("viewer thread panicked");
    }

    let bodies = world.bodies.as_slice();
    let worst = handles
        .joints
        .iter()
        .filter_map(|id| world.joint(*id)?.position_error(bodies))
        .fold(0.0_f32, f32::max);
    println!("largest joint separation after {SECONDS}s: {worst:.6}");

    println!("time in solver: {:?}", world.profile().total_time());
    Ok(())
}
