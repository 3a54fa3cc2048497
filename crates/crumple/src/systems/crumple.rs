//! Procedural crumpled-paper geometry.
//!
//! Every ball gets its own jagged outline and a handful of fold lines.
//! Both the single add and the bulk restore build balls through [`crumple`].

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial};
use crate::systems::rng::Rng;

/// Number of folds that meet at the pinch point.
const PINCH_FOLDS: usize = 3;

/// Shape parameters for generated paper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrumpleParams {
    /// Base radius `R` in world units.
    pub radius: f32,
    /// Outline vertex count `K`.
    pub sides: u32,
    /// Per-vertex radius factor is drawn from `[min_scale, max_scale)`.
    pub min_scale: f32,
    pub max_scale: f32,
    /// Pinch point offset per axis is `(u - 0.5) * pinch_spread * R`.
    pub pinch_spread: f32,
    /// Probability of an extra fold across the ball.
    pub cross_fold_chance: f32,
}

impl Default for CrumpleParams {
    fn default() -> Self {
        Self {
            radius: 28.0,
            sides: 10,
            min_scale: 0.8,
            max_scale: 1.2,
            pinch_spread: 0.4,
            cross_fold_chance: 0.4,
        }
    }
}

/// Heavy, sticky, thick paper: barely bounces, grips, and drags through the air.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperMaterial {
    pub restitution: f32,
    pub friction: f32,
    /// Linear and angular damping, per second.
    pub air_drag: f32,
    pub density: f32,
}

impl Default for PaperMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.1,
            friction: 0.5,
            air_drag: 5.0,
            density: 0.002,
        }
    }
}

impl PaperMaterial {
    pub fn collider_material(&self) -> ColliderMaterial {
        ColliderMaterial {
            restitution: self.restitution,
            friction: self.friction,
            density: self.density,
        }
    }
}

/// A fold line in body-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crease {
    pub from: Vec2,
    pub to: Vec2,
}

/// Immutable shape of one paper ball, in body-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperGeometry {
    pub vertices: Vec<Vec2>,
    pub creases: Vec<Crease>,
    /// Initial rotation in radians, `[0, π)`.
    pub rotation: f32,
}

impl PaperGeometry {
    /// Body description for the engine, placed at `position`.
    pub fn body_desc(&self, position: Vec2, material: &PaperMaterial) -> BodyDesc {
        BodyDesc::dynamic(ColliderDesc::ConvexPolygon {
            points: self.vertices.clone(),
        })
        .with_position(position)
        .with_rotation(self.rotation)
        .with_linear_damping(material.air_drag)
        .with_angular_damping(material.air_drag)
        .with_ccd(true)
    }
}

/// Generate one crumpled ball.
pub fn crumple(rng: &mut Rng, params: &CrumpleParams) -> PaperGeometry {
    let sides = params.sides.max(PINCH_FOLDS as u32);
    let step = TAU / sides as f32;

    let vertices: Vec<Vec2> = (0..sides)
        .map(|i| {
            let r = params.radius * rng.range(params.min_scale, params.max_scale);
            Vec2::from_angle(i as f32 * step) * r
        })
        .collect();

    let pinch = Vec2::new(rng.next_f32() - 0.5, rng.next_f32() - 0.5)
        * (params.radius * params.pinch_spread);

    let mut picked: Vec<usize> = Vec::with_capacity(PINCH_FOLDS);
    while picked.len() < PINCH_FOLDS {
        let idx = rng.next_int(sides) as usize;
        if !picked.contains(&idx) {
            picked.push(idx);
        }
    }

    let mut creases: Vec<Crease> = picked
        .iter()
        .map(|&idx| Crease {
            from: vertices[idx],
            to: pinch,
        })
        .collect();

    let a = rng.next_int(sides) as usize;
    let b = (a + sides as usize / 2) % sides as usize;
    if rng.next_f32() < params.cross_fold_chance {
        creases.push(Crease {
            from: vertices[a],
            to: vertices[b],
        });
    }

    PaperGeometry {
        vertices,
        creases,
        rotation: rng.next_f32() * PI,
    }
}
