//=========================================================================
// Orbit Camera Demo
//=========================================================================
//
// Opens a window and orbits a virtual camera from pointer input:
// - Right-button drag rotates (scaled by each sample's delta time)
// - Wheel zooms
// - Left click captures the pointer; Escape releases it
//
// Run with:
//   RUST_LOG=info cargo run --example orbit_camera
//
//=========================================================================

use log::{info, warn};
use pointer_frame::prelude::*;

//=== OrbitCamera =========================================================

/// Spherical camera around the origin.
#[derive(Debug)]
struct OrbitCamera {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl OrbitCamera {
    const ROTATE_RATE: f32 = 0.0001;
    const ZOOM_RATE: f32 = 0.0001;
    const MIN_RADIUS: f32 = 0.5;

    fn new() -> Self {
        Self {
            radius: 5.0,
            phi: 0.0,
            theta: 0.3,
        }
    }

    fn eye(&self) -> (f32, f32, f32) {
        (
            self.radius * self.phi.cos() * self.theta.cos(),
            self.radius * self.theta.sin(),
            -self.radius * self.phi.sin() * self.theta.cos(),
        )
    }
}

impl Simulation for OrbitCamera {
    fn step(&mut self, tick: &FrameTick, events: Vec<PointerEvent>) {
        for event in &events {
            match event {
                PointerEvent::MouseMove(motion) if motion.button_mask.contains(MouseButton::Right) => {
                    let scale = motion.delta_time_ms() * Self::ROTATE_RATE;
                    self.phi += motion.delta_x * scale;
                    self.theta += motion.delta_y * scale;
                }
                PointerEvent::MouseMove(_) => {}
                PointerEvent::Scroll(scroll) => {
                    let zoom = scroll.delta_y * scroll.delta_time_ms() * Self::ZOOM_RATE;
                    self.radius = (self.radius + zoom).max(Self::MIN_RADIUS);
                }
                PointerEvent::Click(click) => {
                    info!("Click {:?} at ({:.1}, {:.1})", click.button, click.x, click.y);
                }
            }
        }

        if !events.is_empty() && tick.index % 60 == 0 {
            info!("Frame {}: eye at {:?}", tick.index, self.eye());
        }
    }

    fn on_shutdown(&mut self) {
        info!("Final camera state: {:?}", self);
    }
}

//=== Entry Point =========================================================

fn main() {
    env_logger::init();

    let result = EngineBuilder::new()
        .with_title("Orbit Camera")
        .with_inner_size(1024, 768)
        .build(OrbitCamera::new())
        .run();

    if let Err(e) = result {
        warn!("Engine stopped with error: {}", e);
        std::process::exit(1);
    }
}
