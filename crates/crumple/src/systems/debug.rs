//! Debug overlay: the containment region and the engine's own hulls.
//!
//! Opt-in through `BinConfig::debug_bounds`. Drawn after the paper so it
//! stays visible on top.

use crate::api::config::Trapezoid;
use crate::core::physics::PhysicsWorld;
use crate::core::registry::BallRegistry;
use crate::systems::vector::{VectorColor, VectorState};

const LINE_WIDTH: f32 = 1.0;
const CORNER_MARK: f32 = 6.0;

/// Outline the containment trapezoid and mark its four corners.
pub fn draw_bounds(bounds: &Trapezoid, vectors: &mut VectorState) {
    let corners = bounds.corners();
    vectors.stroke_polygon(&corners, LINE_WIDTH, VectorColor::RED.with_alpha(0.6));
    for corner in corners {
        vectors.mark(corner, CORNER_MARK, VectorColor::RED);
    }
}

/// Stroke each ball's collider hull where the engine has it.
pub fn draw_colliders(physics: &PhysicsWorld, registry: &BallRegistry, vectors: &mut VectorState) {
    for ball in registry.iter() {
        if let Some(outline) = physics.collider_outline(&ball.body) {
            vectors.stroke_polygon(&outline, LINE_WIDTH, VectorColor::GREEN);
        }
    }
}
