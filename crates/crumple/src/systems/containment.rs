//! Post-step containment for paper balls.
//!
//! The engine only keeps bodies apart from each other and from the static
//! walls. The bin's visible interior is a trapezoid, and a hard fling can
//! carry a small body through or far past a wall in one step. This pass runs
//! after every integration step and pulls each ball back inside:
//!
//! 1. clamp each velocity component to `±max_speed`;
//! 2. if the ball is outside `outer_bounds` or has a non-finite position
//!    or velocity, drop it at `safe_drop` with zero velocity and stop;
//! 3. clamp `y` into the inset band;
//! 4. clamp `x` between the edges interpolated at the clamped `y`;
//!
//! and any clamp in 3 or 4 also zeroes the velocity.

use glam::Vec2;

use crate::api::config::{BinConfig, Bounds, Trapezoid};
use crate::core::physics::{PhysicsBody, PhysicsWorld};

/// Position and velocity of one body, as read from the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// What a containment pass did to one body, most severe action wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainmentOutcome {
    Untouched,
    SpeedLimited,
    Clamped,
    Recovered,
}

/// Tally of one pass over all balls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainmentReport {
    pub speed_limited: usize,
    pub clamped: usize,
    pub recovered: usize,
}

/// The deterministic correction applied after each simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainmentPolicy {
    pub bounds: Trapezoid,
    pub safety_radius: f32,
    pub max_speed: f32,
    pub outer_bounds: Bounds,
    pub safe_drop: Vec2,
}

impl ContainmentPolicy {
    pub fn from_config(config: &BinConfig) -> Self {
        Self {
            bounds: config.bounds,
            safety_radius: config.safety_radius,
            max_speed: config.max_speed,
            outer_bounds: config.outer_bounds,
            safe_drop: config.safe_drop,
        }
    }

    /// Correct one body. Pure; the engine is not touched.
    pub fn correct(&self, state: BodyState) -> (BodyState, ContainmentOutcome) {
        let mut outcome = ContainmentOutcome::Untouched;
        let mut vel = state.vel;

        let cap = self.max_speed;
        if vel.x.abs() > cap || vel.y.abs() > cap {
            vel = Vec2::new(vel.x.clamp(-cap, cap), vel.y.clamp(-cap, cap));
            outcome = ContainmentOutcome::SpeedLimited;
        }

        let pos = state.pos;
        if !pos.is_finite() || !vel.is_finite() || !self.outer_bounds.contains(pos) {
            let recovered = BodyState {
                pos: self.safe_drop,
                vel: Vec2::ZERO,
            };
            return (recovered, ContainmentOutcome::Recovered);
        }

        let r = self.safety_radius;
        let b = &self.bounds;
        let mut clamped = pos;
        let mut hit = false;

        let (min_y, max_y) = (b.top_y + r, b.bottom_y - r);
        if clamped.y < min_y {
            clamped.y = min_y;
            hit = true;
        } else if clamped.y > max_y {
            clamped.y = max_y;
            hit = true;
        }

        let (left, right) = b.edges_at(clamped.y);
        let (min_x, max_x) = (left + r, right - r);
        if clamped.x < min_x {
            clamped.x = min_x;
            hit = true;
        } else if clamped.x > max_x {
            clamped.x = max_x;
            hit = true;
        }

        if hit {
            return (
                BodyState {
                    pos: clamped,
                    vel: Vec2::ZERO,
                },
                ContainmentOutcome::Clamped,
            );
        }

        (BodyState { pos, vel }, outcome)
    }

    /// Run the pass over `bodies`, writing corrections back to the engine.
    /// Bodies the engine no longer knows are skipped.
    pub fn apply<'a>(
        &self,
        physics: &mut PhysicsWorld,
        bodies: impl IntoIterator<Item = &'a PhysicsBody>,
    ) -> ContainmentReport {
        let mut report = ContainmentReport::default();
        for body in bodies {
            let (Some((pos, _)), Some(vel)) = (physics.body_position(body), physics.velocity(body)) else {
                continue;
            };
            let before = BodyState { pos, vel };
            let (after, outcome) = self.correct(before);
            match outcome {
                ContainmentOutcome::Untouched => continue,
                ContainmentOutcome::SpeedLimited => report.speed_limited += 1,
                ContainmentOutcome::Clamped => report.clamped += 1,
                ContainmentOutcome::Recovered => {
                    log::warn!(
                        "paper ball escaped to {:?} (vel {:?}), dropping it back in",
                        before.pos,
                        before.vel
                    );
                    report.recovered += 1;
                }
            }
            if after.pos != before.pos {
                physics.set_position(body, after.pos);
            }
            physics.set_velocity(body, after.vel);
        }
        if report.clamped > 0 {
            log::debug!("containment clamped {} ball(s)", report.clamped);
        }
        report
    }
}
