//! The bin as its host sees it.
//!
//! `BinSession` owns the physics world, the registry of live balls and the
//! pointer gesture. Everything runs on the caller's thread: the host calls
//! `tick` once per frame, `render` after it, and forwards pointer events as
//! they arrive. Before `start` (or after `stop`) every operation is a no-op.

use glam::Vec2;

use crate::api::config::BinConfig;
use crate::api::types::{BallId, BallPayload, BallSnapshot, BinEvent, CursorHint, NewBall, PaperColor};
use crate::core::physics::{PhysicsBody, PhysicsWorld};
use crate::core::registry::{Ball, BallRegistry};
use crate::core::time::StepClock;
use crate::input::gesture::{Gesture, GestureOutcome};
use crate::systems::containment::{ContainmentPolicy, ContainmentReport};
use crate::systems::crumple::crumple;
use crate::systems::debug;
use crate::systems::render::PaperRenderer;
use crate::systems::rng::Rng;
use crate::systems::vector::VectorState;
use crate::systems::walls::build_walls;

/// State that only exists while the bin is running.
struct LiveBin {
    physics: PhysicsWorld,
    registry: BallRegistry,
    walls: Vec<PhysicsBody>,
    rng: Rng,
    clock: StepClock,
    gesture: Gesture,
    events: Vec<BinEvent>,
    cursor: CursorHint,
    /// Corrections made during the last `tick`.
    corrections: ContainmentReport,
}

impl LiveBin {
    /// The first paper ball under `pos`, with the grabbed point in its local frame.
    fn ball_at(&self, pos: Vec2) -> Option<(BallId, Vec2)> {
        self.physics.bodies_at_point(pos).into_iter().find_map(|body| {
            let ball = self.registry.by_body(&body)?;
            let anchor = self.physics.to_local(&body, pos).unwrap_or(Vec2::ZERO);
            Some((ball.id.clone(), anchor))
        })
    }

    fn discard(&mut self, ball: Ball) {
        self.physics.remove_body(&ball.body);
        self.gesture.release(&ball.id);
    }
}

pub struct BinSession {
    config: BinConfig,
    containment: ContainmentPolicy,
    renderer: PaperRenderer,
    live: Option<LiveBin>,
}

impl BinSession {
    pub fn new(config: BinConfig) -> Self {
        Self {
            containment: ContainmentPolicy::from_config(&config),
            renderer: PaperRenderer::default(),
            config,
            live: None,
        }
    }

    pub fn config(&self) -> &BinConfig {
        &self.config
    }

    /// Build the world and its walls. Calling it again while running does nothing.
    pub fn start(&mut self) {
        if self.live.is_some() {
            log::debug!("bin already running");
            return;
        }
        let mut physics = PhysicsWorld::new(self.config.gravity);
        physics.set_dt(self.config.fixed_dt);
        let walls = build_walls(
            &mut physics,
            &self.config.walls,
            self.config.world_width,
            self.config.material.collider_material(),
        );
        log::info!(
            "bin started: {}x{} world, {} walls, seed {:#x}",
            self.config.world_width,
            self.config.world_height,
            walls.len(),
            self.config.seed
        );
        self.live = Some(LiveBin {
            physics,
            registry: BallRegistry::new(),
            walls,
            rng: Rng::new(self.config.seed),
            clock: StepClock::new(self.config.fixed_dt),
            gesture: Gesture::new(self.config.tap_threshold),
            events: Vec::new(),
            cursor: CursorHint::Default,
            corrections: ContainmentReport::default(),
        });
    }

    /// Tear the world down. Balls, pending events and the gesture are dropped.
    pub fn stop(&mut self) {
        if let Some(live) = self.live.take() {
            log::info!("bin stopped with {} ball(s)", live.registry.len());
        }
    }

    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }

    // -- Registry operations --

    /// Throw a new ball in. An existing ball with the same id is replaced.
    pub fn add(&mut self, ball: NewBall) {
        let Some(live) = self.live.as_mut() else {
            return;
        };
        let spawn = &self.config.spawn;
        let position = match ball.position {
            Some(p) => p,
            None => Vec2::new(live.rng.range(spawn.min_x, spawn.max_x), spawn.y),
        };
        let payload = BallPayload {
            text: ball.text,
            annotation: ball.annotation,
        };
        spawn_ball(&self.config, live, ball.id, PaperColor::parse(&ball.color), payload, position);
    }

    /// Remove every ball. The walls stay.
    pub fn clear(&mut self) {
        let Some(live) = self.live.as_mut() else {
            return;
        };
        let removed = live.physics.remove_dynamic_bodies();
        live.registry.clear();
        live.gesture.reset();
        log::debug!("cleared {} ball(s)", removed);
    }

    /// Remove one ball. Unknown ids are ignored.
    pub fn remove(&mut self, id: &BallId) {
        let Some(live) = self.live.as_mut() else {
            return;
        };
        match live.registry.remove(id) {
            Some(ball) => live.discard(ball),
            None => log::debug!("remove: no ball {}", id),
        }
    }

    /// Replace a ball's color and text. `None` keeps the existing annotation.
    pub fn update(&mut self, id: &BallId, color: &str, text: &str, annotation: Option<String>) {
        let Some(ball) = self.live.as_mut().and_then(|live| live.registry.get_mut(id)) else {
            log::debug!("update: no ball {}", id);
            return;
        };
        ball.color = PaperColor::parse(color);
        ball.payload.text = text.to_string();
        if annotation.is_some() {
            ball.payload.annotation = annotation;
        }
    }

    pub fn update_annotation(&mut self, id: &BallId, annotation: &str) {
        let Some(ball) = self.live.as_mut().and_then(|live| live.registry.get_mut(id)) else {
            log::debug!("update_annotation: no ball {}", id);
            return;
        };
        ball.payload.annotation = Some(annotation.to_string());
    }

    /// Replace every ball with `items`. They are laid out in rows down the
    /// bin, each at a random x within its row, so no two start on top of
    /// each other.
    pub fn restore_many(&mut self, items: Vec<BallSnapshot>) {
        if self.live.is_none() {
            return;
        }
        self.clear();
        let Some(live) = self.live.as_mut() else {
            return;
        };
        let count = items.len();
        for (i, item) in items.into_iter().enumerate() {
            let y = self.config.restore_height(i);
            let (lo, hi) = self.config.drop_span(y);
            let position = Vec2::new(live.rng.range(lo, hi), y);
            let payload = BallPayload {
                text: item.text,
                annotation: item.annotation,
            };
            spawn_ball(&self.config, live, item.id, PaperColor::parse(&item.color), payload, position);
        }
        log::info!("restored {} ball(s)", count);
    }

    // -- Simulation --

    /// Pausing also abandons any gesture in progress. Pointer input is
    /// ignored until the bin resumes.
    pub fn set_paused(&mut self, paused: bool) {
        if let Some(live) = self.live.as_mut() {
            live.clock.set_paused(paused);
            if paused {
                live.gesture.reset();
                live.cursor = CursorHint::Default;
            }
        }
    }

    pub fn is_paused(&self) -> bool {
        self.live.as_ref().is_some_and(|live| live.clock.is_paused())
    }

    /// Advance by `frame_dt` seconds of wall time. Returns the fixed steps run.
    pub fn tick(&mut self, frame_dt: f32) -> u32 {
        let Some(live) = self.live.as_mut() else {
            return 0;
        };
        let steps = live.clock.accumulate(frame_dt);
        live.corrections = ContainmentReport::default();
        for _ in 0..steps {
            if let Some((id, anchor, pointer)) = live.gesture.held() {
                if let Some(ball) = live.registry.get(id) {
                    live.physics
                        .pull_toward(&ball.body, anchor, pointer, self.config.drag_stiffness);
                }
            }
            live.physics.step();
            let report = self.containment.apply(&mut live.physics, live.registry.bodies());
            live.corrections.speed_limited += report.speed_limited;
            live.corrections.clamped += report.clamped;
            live.corrections.recovered += report.recovered;
        }
        steps
    }

    /// What containment corrected during the last `tick`.
    pub fn last_corrections(&self) -> ContainmentReport {
        self.live.as_ref().map(|live| live.corrections).unwrap_or_default()
    }

    // -- Pointer --

    pub fn pointer_down(&mut self, pos: Vec2) {
        let Some(live) = self.live.as_mut().filter(|live| !live.clock.is_paused()) else {
            return;
        };
        let hit = live.ball_at(pos);
        live.cursor = if hit.is_some() {
            CursorHint::Grab
        } else {
            CursorHint::Pointer
        };
        live.gesture.down(pos, hit);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        let Some(live) = self.live.as_mut().filter(|live| !live.clock.is_paused()) else {
            return;
        };
        let hovering = live.ball_at(pos).is_some();
        live.cursor = live.gesture.moved(pos, hovering);
    }

    pub fn pointer_up(&mut self, pos: Vec2) {
        let Some(live) = self.live.as_mut().filter(|live| !live.clock.is_paused()) else {
            return;
        };
        match live.gesture.up(pos) {
            GestureOutcome::BallTap(id) => {
                let Some(ball) = live.registry.get(&id) else {
                    log::debug!("tapped ball {} is gone", id);
                    return;
                };
                let Some((position, _)) = live.physics.body_position(&ball.body) else {
                    return;
                };
                live.events.push(BinEvent::BallSelected {
                    id: ball.id.clone(),
                    text: ball.payload.text.clone(),
                    color: ball.color.as_str().to_string(),
                    position,
                    annotation: ball.payload.annotation.clone(),
                });
            }
            GestureOutcome::EmptyTap => live.events.push(BinEvent::EmptySpaceSelected),
            GestureOutcome::Drag => log::debug!("drag ended at {:?}", pos),
            GestureOutcome::Ignored => {}
        }
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<BinEvent> {
        self.live
            .as_mut()
            .map(|live| std::mem::take(&mut live.events))
            .unwrap_or_default()
    }

    pub fn cursor(&self) -> CursorHint {
        self.live.as_ref().map(|live| live.cursor).unwrap_or_default()
    }

    // -- Rendering --

    /// Repaint the frame into `vectors`. Read-only with respect to the world.
    pub fn render(&self, vectors: &mut VectorState) {
        vectors.clear();
        let Some(live) = self.live.as_ref() else {
            return;
        };
        self.renderer.paint(&live.physics, &live.registry, vectors);
        if self.config.debug_bounds {
            debug::draw_bounds(&self.config.bounds, vectors);
            debug::draw_colliders(&live.physics, &live.registry, vectors);
        }
    }

    // -- Queries --

    pub fn ball_count(&self) -> usize {
        self.live.as_ref().map_or(0, |live| live.registry.len())
    }

    /// Bodies in the engine, walls included.
    pub fn body_count(&self) -> usize {
        self.live.as_ref().map_or(0, |live| live.physics.body_count())
    }

    pub fn dynamic_body_count(&self) -> usize {
        self.live.as_ref().map_or(0, |live| live.physics.dynamic_body_count())
    }

    pub fn wall_count(&self) -> usize {
        self.live.as_ref().map_or(0, |live| live.walls.len())
    }

    pub fn ball(&self, id: &BallId) -> Option<&Ball> {
        self.live.as_ref()?.registry.get(id)
    }

    /// Current position and rotation of a ball.
    pub fn ball_pose(&self, id: &BallId) -> Option<(Vec2, f32)> {
        let live = self.live.as_ref()?;
        let ball = live.registry.get(id)?;
        live.physics.body_position(&ball.body)
    }

    pub fn ball_ids(&self) -> Vec<BallId> {
        self.live
            .as_ref()
            .map(|live| live.registry.iter().map(|b| b.id.clone()).collect())
            .unwrap_or_default()
    }
}

/// Crumple a fresh sheet and put it in the world at `position`.
fn spawn_ball(
    config: &BinConfig,
    live: &mut LiveBin,
    id: BallId,
    color: PaperColor,
    payload: BallPayload,
    position: Vec2,
) {
    let geometry = crumple(&mut live.rng, &config.paper);
    let desc = geometry.body_desc(position, &config.material);
    let Some(body) = live.physics.create_body(&desc, config.material.collider_material()) else {
        log::warn!("ball {} has a degenerate outline, not added", id);
        return;
    };
    let ball = Ball {
        id,
        color,
        payload,
        geometry,
        body,
    };
    if let Some(previous) = live.registry.insert(ball) {
        log::warn!("ball {} already in the bin, replaced", previous.id);
        live.physics.remove_body(&previous.body);
        // A gesture that started on the old ball must not resolve to the new one.
        if live.gesture.candidate() == Some(&previous.id) {
            live.gesture.reset();
        }
    }
}
