//! Headless avatar session
//!
//! Drives a controller against an in-memory rig for a few seconds of
//! simulated time: idle, a user-picked clip, a burst of speech with a
//! happy face, then back to idle.
//!
//! Run with: cargo run -p mien-runtime --example headless_session

use mien_core::{Channel, MienResult};
use mien_runtime::{init_tracing, AvatarController, ControllerConfig, HeadlessRig, LoggingConfig};
use mien_scene::{AnimationClip, BoundingBox, ClipLibrary, Vec3};
use mien_time::RealtimeClock;

const FPS: f64 = 60.0;

fn roster() -> ClipLibrary {
    [
        AnimationClip::new("Breathing", 4.0),
        AnimationClip::new("Fireball", 2.5),
        AnimationClip::new("Hip Hop Dancing", 8.0),
        AnimationClip::new("Talking", 6.0),
    ]
    .into_iter()
    .collect()
}

fn run(controller: &mut AvatarController<HeadlessRig>, seconds: f64) {
    let frames = (seconds * FPS) as usize;
    for _ in 0..frames {
        let report = controller.update(1.0 / FPS);
        if let Some(channel) = report.face.mouth_selected {
            tracing::debug!(shape = %channel, "mouth shape");
        }
    }
}

fn print_face(controller: &AvatarController<HeadlessRig>) {
    let expressions = controller.expressions();
    let line: Vec<String> = Channel::ALL
        .iter()
        .map(|&c| format!("{}={:.2}", c, expressions.get(c)))
        .collect();
    println!(
        "[{:>6.2}s] {:<16} {}",
        controller.now().as_secs_f64(),
        controller.active_clip(),
        line.join(" ")
    );
}

fn main() -> MienResult<()> {
    init_tracing(&LoggingConfig::default())?;

    let library = roster();
    let rig = HeadlessRig::new(
        &library,
        BoundingBox::from_min_max(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 2.0, 0.5)),
    );
    let config = ControllerConfig {
        seed: Some(7),
        ..Default::default()
    };

    let mut controller = AvatarController::new(rig, library, config)?;
    let framing = controller.frame_avatar()?;
    println!(
        "camera {:?} -> target {:?} (distance {:.2})",
        framing.camera, framing.orbit_target, framing.distance
    );

    let mut wall = RealtimeClock::new();
    let inputs = controller.inputs();

    run(&mut controller, 2.0);
    print_face(&controller);

    controller.select_clip("Hip Hop Dancing")?;
    run(&mut controller, 1.5);
    print_face(&controller);

    inputs.set_speaking(true);
    inputs.set_emotion_target("happy", 0.8)?;
    for _ in 0..6 {
        run(&mut controller, 0.5);
        print_face(&controller);
    }

    inputs.set_speaking(false);
    inputs.set_emotion_target("happy", 0.0)?;
    run(&mut controller, 6.0);
    print_face(&controller);

    controller.orbit_camera_mut().orbit(0.8, 0.1);
    controller.reset_view()?;

    let wall_secs = wall.tick();
    let stats = controller.stats().clone();
    let rig = controller.shutdown();
    println!(
        "{} frames, {} blinks, {} mouth shapes, {} clip switches, {} rig calls in {:.3}s wall time",
        stats.frames,
        stats.blinks,
        stats.mouth_selections,
        stats.clip_switches,
        rig.calls().len(),
        wall_secs
    );

    Ok(())
}
