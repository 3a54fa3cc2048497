//! Static slabs around the bin: two slanted sides, a floor and a lid.
//!
//! Each slab is a thick cuboid whose inner face lies exactly on the wall
//! line it stands for, so a fast ball has hundreds of units of solid to
//! cross before it could tunnel out.

use glam::Vec2;

use crate::api::config::WallLayout;
use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial, PhysicsBody, PhysicsWorld};

/// Slab whose inner face runs from `a` to `b`, extending outward along `normal`.
fn slab_on_face(a: Vec2, b: Vec2, normal: Vec2, thickness: f32) -> BodyDesc {
    let along = b - a;
    let dir = along.normalize_or_zero();
    let center = (a + b) * 0.5 + normal * (thickness * 0.5);
    // Local +y runs along the face.
    let rotation = (-dir.x).atan2(dir.y);
    BodyDesc::fixed(ColliderDesc::Cuboid {
        half_width: thickness * 0.5,
        // Overhang past both ends so the corners have no gaps.
        half_height: along.length() * 0.5 + thickness * 0.5,
    })
    .with_position(center)
    .with_rotation(rotation)
}

/// Body descriptions for all four walls: left, right, floor, ceiling.
pub fn wall_descs(layout: &WallLayout, world_width: f32) -> [BodyDesc; 4] {
    let s = &layout.sides;
    let t = layout.thickness;

    let top_left = Vec2::new(s.top_left_x, s.top_y);
    let bottom_left = Vec2::new(s.bottom_left_x, s.bottom_y);
    let left_dir = (bottom_left - top_left).normalize_or_zero();
    let left = slab_on_face(top_left, bottom_left, Vec2::new(-left_dir.y, left_dir.x), t);

    let top_right = Vec2::new(s.top_right_x, s.top_y);
    let bottom_right = Vec2::new(s.bottom_right_x, s.bottom_y);
    let right_dir = (bottom_right - top_right).normalize_or_zero();
    let right = slab_on_face(top_right, bottom_right, Vec2::new(right_dir.y, -right_dir.x), t);

    let span = ColliderDesc::Cuboid {
        half_width: world_width * 0.5 + t,
        half_height: t * 0.5,
    };
    let mid_x = world_width * 0.5;
    let floor = BodyDesc::fixed(span.clone()).with_position(Vec2::new(mid_x, layout.floor_y + t * 0.5));
    let ceiling = BodyDesc::fixed(span).with_position(Vec2::new(mid_x, layout.ceiling_y - t * 0.5));

    [left, right, floor, ceiling]
}

/// Insert the walls into `physics`. Returns the created bodies.
pub fn build_walls(
    physics: &mut PhysicsWorld,
    layout: &WallLayout,
    world_width: f32,
    material: ColliderMaterial,
) -> Vec<PhysicsBody> {
    wall_descs(layout, world_width)
        .iter()
        .filter_map(|desc| {
            let body = physics.create_body(desc, material);
            if body.is_none() {
                log::warn!("wall slab at {:?} is degenerate, skipped", desc.position);
            }
            body
        })
        .collect()
}
