use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::systems::crumple::{CrumpleParams, PaperMaterial};

/// Width of the canvas the reference layout was drawn for.
pub const REFERENCE_WIDTH: f32 = 300.0;
/// Height of the canvas the reference layout was drawn for.
pub const REFERENCE_HEIGHT: f32 = 350.0;

/// Four-cornered region with horizontal top and bottom edges.
///
/// The left and right edges are straight lines between the top and bottom
/// corners, so the allowed x-range at any height is a linear interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trapezoid {
    pub top_y: f32,
    pub bottom_y: f32,
    pub top_left_x: f32,
    pub top_right_x: f32,
    pub bottom_left_x: f32,
    pub bottom_right_x: f32,
}

impl Default for Trapezoid {
    /// The bin's visible interior: wide at the opening, narrower at the base.
    fn default() -> Self {
        Self {
            top_y: 0.0,
            bottom_y: 250.0,
            top_left_x: 60.0,
            top_right_x: 240.0,
            bottom_left_x: 75.0,
            bottom_right_x: 225.0,
        }
    }
}

impl Trapezoid {
    /// Left and right edge x at height `y`. `y` outside the band extrapolates.
    pub fn edges_at(&self, y: f32) -> (f32, f32) {
        let height = self.bottom_y - self.top_y;
        let t = if height.abs() > f32::EPSILON {
            (y - self.top_y) / height
        } else {
            0.0
        };
        let left = self.top_left_x + (self.bottom_left_x - self.top_left_x) * t;
        let right = self.top_right_x + (self.bottom_right_x - self.top_right_x) * t;
        (left, right)
    }

    /// Whether `p` lies inside, shrunk by `inset` on every side.
    pub fn contains(&self, p: Vec2, inset: f32) -> bool {
        if p.y < self.top_y + inset || p.y > self.bottom_y - inset {
            return false;
        }
        let (left, right) = self.edges_at(p.y);
        p.x >= left + inset && p.x <= right - inset
    }

    /// Corners in drawing order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.top_left_x, self.top_y),
            Vec2::new(self.top_right_x, self.top_y),
            Vec2::new(self.bottom_right_x, self.bottom_y),
            Vec2::new(self.bottom_left_x, self.bottom_y),
        ]
    }

    fn scaled(self, s: Vec2) -> Self {
        Self {
            top_y: self.top_y * s.y,
            bottom_y: self.bottom_y * s.y,
            top_left_x: self.top_left_x * s.x,
            top_right_x: self.top_right_x * s.x,
            bottom_left_x: self.bottom_left_x * s.x,
            bottom_right_x: self.bottom_right_x * s.x,
        }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Inclusive containment. Non-finite points are never contained.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Static walls around the bin. Never drawn; they only stop paper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallLayout {
    /// Inner faces of the side walls (their top and bottom y span the wall height).
    pub sides: Trapezoid,
    /// Top face of the floor.
    pub floor_y: f32,
    /// Bottom face of the lid over the opening.
    pub ceiling_y: f32,
    /// Slab thickness. Thick walls are hard to tunnel through.
    pub thickness: f32,
}

impl Default for WallLayout {
    fn default() -> Self {
        Self {
            sides: Trapezoid {
                top_y: 0.0,
                bottom_y: 350.0,
                top_left_x: 50.0,
                top_right_x: 250.0,
                bottom_left_x: 70.0,
                bottom_right_x: 230.0,
            },
            floor_y: 250.0,
            ceiling_y: 0.0,
            thickness: 500.0,
        }
    }
}

/// Where new paper appears.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnBand {
    pub min_x: f32,
    pub max_x: f32,
    /// Drop height for a single add.
    pub y: f32,
    /// Vertical gap between rows of a bulk restore.
    pub restore_spacing: f32,
}

impl Default for SpawnBand {
    fn default() -> Self {
        Self {
            min_x: 110.0,
            max_x: 190.0,
            y: 10.0,
            restore_spacing: 50.0,
        }
    }
}

/// Everything tunable about a bin session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinConfig {
    /// Canvas width in world units.
    pub world_width: f32,
    /// Canvas height in world units.
    pub world_height: f32,
    /// Fixed simulation step in seconds.
    pub fixed_dt: f32,
    /// Y-down gravity in world units per second squared.
    pub gravity: Vec2,
    /// Region every ball is kept inside.
    pub bounds: Trapezoid,
    pub walls: WallLayout,
    /// Approximate ball footprint used to inset `bounds`.
    pub safety_radius: f32,
    /// Per-axis speed cap in world units per second.
    pub max_speed: f32,
    /// Anything outside this is considered lost and is dropped back in.
    pub outer_bounds: Bounds,
    pub safe_drop: Vec2,
    pub spawn: SpawnBand,
    /// Pointer travel below which a gesture counts as a tap.
    pub tap_threshold: f32,
    /// Fraction of the pointer gap a dragged ball closes per step.
    pub drag_stiffness: f32,
    pub paper: CrumpleParams,
    pub material: PaperMaterial,
    pub seed: u64,
    /// Draw the containment trapezoid and collider outlines.
    pub debug_bounds: bool,
}

impl Default for BinConfig {
    fn default() -> Self {
        Self {
            world_width: REFERENCE_WIDTH,
            world_height: REFERENCE_HEIGHT,
            fixed_dt: 1.0 / 60.0,
            gravity: Vec2::new(0.0, 1000.0),
            bounds: Trapezoid::default(),
            walls: WallLayout::default(),
            safety_radius: 20.0,
            // 15 units per 60 Hz step.
            max_speed: 900.0,
            outer_bounds: Bounds::new(Vec2::new(-100.0, -300.0), Vec2::new(400.0, 450.0)),
            safe_drop: Vec2::new(150.0, 50.0),
            spawn: SpawnBand::default(),
            tap_threshold: 5.0,
            drag_stiffness: 0.2,
            paper: CrumpleParams::default(),
            material: PaperMaterial::default(),
            seed: 0x5EED_BA11,
            debug_bounds: false,
        }
    }
}

impl BinConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The reference layout stretched to a `width` × `height` canvas.
    ///
    /// Positions scale per axis; sizes and speeds scale by the smaller
    /// factor so paper stays round. Pointer thresholds are screen-space and
    /// do not scale.
    pub fn for_canvas(width: f32, height: f32) -> Self {
        let base = Self::default();
        let s = Vec2::new(width / REFERENCE_WIDTH, height / REFERENCE_HEIGHT);
        let k = s.x.min(s.y);
        Self {
            world_width: width,
            world_height: height,
            gravity: base.gravity * k,
            bounds: base.bounds.scaled(s),
            walls: WallLayout {
                sides: base.walls.sides.scaled(s),
                floor_y: base.walls.floor_y * s.y,
                ceiling_y: base.walls.ceiling_y * s.y,
                thickness: base.walls.thickness * k,
            },
            safety_radius: base.safety_radius * k,
            max_speed: base.max_speed * k,
            outer_bounds: Bounds::new(base.outer_bounds.min * s, base.outer_bounds.max * s),
            safe_drop: base.safe_drop * s,
            spawn: SpawnBand {
                min_x: base.spawn.min_x * s.x,
                max_x: base.spawn.max_x * s.x,
                y: base.spawn.y * s.y,
                restore_spacing: base.spawn.restore_spacing * s.y,
            },
            paper: CrumpleParams {
                radius: base.paper.radius * k,
                ..base.paper
            },
            ..base
        }
    }

    /// Check the invariants the containment pass relies on.
    /// Drop point height for the `index`-th ball of a bulk restore.
    ///
    /// Rows run down the inset bounds `restore_spacing` apart, starting at
    /// the top, and wrap back to the top row once the floor is reached. Every
    /// row lies inside the containment area, so nothing is clamped on the
    /// first step.
    pub fn restore_height(&self, index: usize) -> f32 {
        let top = self.bounds.top_y + self.safety_radius;
        let bottom = self.bounds.bottom_y - self.safety_radius;
        let spacing = self.spawn.restore_spacing;
        if !spacing.is_finite() || spacing <= 0.0 || bottom <= top {
            return top;
        }
        let rows = ((bottom - top) / spacing) as usize + 1;
        top + (index % rows) as f32 * spacing
    }

    /// Horizontal range a ball at height `y` may be dropped in.
    pub fn drop_span(&self, y: f32) -> (f32, f32) {
        let (left, right) = self.bounds.edges_at(y);
        let (lo, hi) = (left + self.safety_radius, right - self.safety_radius);
        if lo <= hi {
            (lo, hi)
        } else {
            let mid = (left + right) * 0.5;
            (mid, mid)
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let b = &self.bounds;
        let r = self.safety_radius;
        if !(self.fixed_dt > 0.0) {
            return Err(format!("fixed_dt must be positive, got {}", self.fixed_dt));
        }
        if !(self.max_speed > 0.0) {
            return Err(format!("max_speed must be positive, got {}", self.max_speed));
        }
        if !(r >= 0.0) {
            return Err(format!("safety_radius must be non-negative, got {}", r));
        }
        if !(self.spawn.restore_spacing > 0.0) {
            return Err(format!(
                "spawn.restore_spacing must be positive, got {}",
                self.spawn.restore_spacing
            ));
        }
        if b.bottom_y - b.top_y < 2.0 * r {
            return Err("bounds are shorter than the safety radius allows".to_string());
        }
        let (top_l, top_r) = b.edges_at(b.top_y + r);
        let (bot_l, bot_r) = b.edges_at(b.bottom_y - r);
        if top_r - top_l < 2.0 * r || bot_r - bot_l < 2.0 * r {
            return Err("bounds are narrower than the safety radius allows".to_string());
        }
        if !b.contains(self.safe_drop, r) {
            return Err(format!("safe_drop {:?} is outside the inset bounds", self.safe_drop));
        }
        for corner in b.corners() {
            if !self.outer_bounds.contains(corner) {
                return Err(format!("bounds corner {:?} is outside outer_bounds", corner));
            }
        }
        Ok(())
    }
}
