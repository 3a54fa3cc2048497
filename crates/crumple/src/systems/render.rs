//! Per-frame painting of paper balls.
//!
//! The engine only knows each ball as a convex hull. What the user sees is
//! the generated outline plus its creases, carried along by the body's
//! current pose. The renderer re-reads every pose each frame and never
//! writes to the engine.

use glam::Vec2;

use crate::core::physics::PhysicsWorld;
use crate::core::registry::{Ball, BallRegistry};
use crate::systems::vector::{VectorColor, VectorState};

/// Map a body-local point to world space.
#[inline]
pub fn to_world(local: Vec2, position: Vec2, rotation: f32) -> Vec2 {
    position + Vec2::from_angle(rotation).rotate(local)
}

/// Stroke widths and ink for paper balls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperRenderer {
    pub outline_width: f32,
    pub crease_width: f32,
    pub ink: VectorColor,
}

impl Default for PaperRenderer {
    fn default() -> Self {
        Self {
            outline_width: 2.0,
            crease_width: 1.5,
            ink: VectorColor::BLACK,
        }
    }
}

impl PaperRenderer {
    /// Paint every live ball into `vectors`, in registry order.
    /// Balls whose body is gone are skipped.
    pub fn paint(&self, physics: &PhysicsWorld, registry: &BallRegistry, vectors: &mut VectorState) {
        let mut outline = Vec::with_capacity(16);
        for ball in registry.iter() {
            let Some((pos, rot)) = physics.body_position(&ball.body) else {
                continue;
            };
            self.paint_ball(ball, pos, rot, &mut outline, vectors);
        }
    }

    fn paint_ball(
        &self,
        ball: &Ball,
        pos: Vec2,
        rot: f32,
        outline: &mut Vec<Vec2>,
        vectors: &mut VectorState,
    ) {
        outline.clear();
        outline.extend(ball.geometry.vertices.iter().map(|&v| to_world(v, pos, rot)));
        vectors.fill_polygon(outline.as_slice(), ball.color.rgba());
        vectors.stroke_polygon(outline.as_slice(), self.outline_width, self.ink);

        for crease in &ball.geometry.creases {
            vectors.stroke_segment(
                to_world(crease.from, pos, rot),
                to_world(crease.to, pos, rot),
                self.crease_width,
                self.ink,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{BallId, BallPayload, PaperColor};
    use crate::systems::crumple::{crumple, CrumpleParams, PaperMaterial};
    use crate::systems::rng::Rng;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn to_world_rotates_then_translates() {
        let p = to_world(Vec2::new(10.0, 0.0), Vec2::new(100.0, 50.0), FRAC_PI_2);
        assert!((p - Vec2::new(100.0, 60.0)).length() < 1e-4, "{:?}", p);
        assert_eq!(to_world(Vec2::ZERO, Vec2::new(3.0, 4.0), 1.0), Vec2::new(3.0, 4.0));
    }

    fn world_with_ball(color: &str) -> (PhysicsWorld, BallRegistry) {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut registry = BallRegistry::new();
        let geometry = crumple(&mut Rng::new(9), &CrumpleParams::default());
        let material = PaperMaterial::default();
        let body = world
            .create_body(&geometry.body_desc(Vec2::new(150.0, 150.0), &material), material.collider_material())
            .unwrap();
        registry.insert(Ball {
            id: BallId::from("a1"),
            color: PaperColor::parse(color),
            payload: BallPayload::default(),
            geometry,
            body,
        });
        (world, registry)
    }

    #[test]
    fn paint_fills_with_ball_color_and_inks_outline() {
        let (world, registry) = world_with_ball("#FFB7B2");
        let mut vectors = VectorState::new();
        PaperRenderer::default().paint(&world, &registry, &mut vectors);

        let fill = PaperColor::parse("#FFB7B2").rgba();
        let verts = vectors.vertices();
        assert!(!verts.is_empty());
        assert_eq!(verts.len() % 3, 0);
        // Fill comes first, ink strokes after it.
        assert_eq!((verts[0].r, verts[0].g, verts[0].b), (fill.r, fill.g, fill.b));
        let last = verts[verts.len() - 1];
        assert_eq!((last.r, last.g, last.b), (0.0, 0.0, 0.0));
    }

    #[test]
    fn painted_shape_follows_body_pose() {
        let (mut world, registry) = world_with_ball("#B5EAD7");
        let body = registry.get(&BallId::from("a1")).unwrap().body;
        let mut vectors = VectorState::new();
        let renderer = PaperRenderer::default();

        renderer.paint(&world, &registry, &mut vectors);
        let bbox_center = |v: &VectorState| {
            let (min, max) = v.vertices().iter().fold(
                (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
                |(min, max), p| {
                    let p = Vec2::new(p.x, p.y);
                    (min.min(p), max.max(p))
                },
            );
            (min + max) * 0.5
        };
        let before = bbox_center(&vectors);

        world.set_position(&body, Vec2::new(100.0, 200.0));
        vectors.clear();
        renderer.paint(&world, &registry, &mut vectors);
        let after = bbox_center(&vectors);

        let shift = after - before;
        assert!((shift - Vec2::new(-50.0, 50.0)).length() < 0.5, "shift {:?}", shift);
    }

    #[test]
    fn paint_skips_removed_bodies() {
        let (mut world, registry) = world_with_ball("#FFFFFF");
        let body = registry.get(&BallId::from("a1")).unwrap().body;
        world.remove_body(&body);
        let mut vectors = VectorState::new();
        PaperRenderer::default().paint(&world, &registry, &mut vectors);
        assert_eq!(vectors.vertex_count(), 0);
    }
}
