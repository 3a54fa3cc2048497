use crumple::{
    BallId, BallSnapshot, BinConfig, BinEvent, BinSession, InputEvent, InputQueue, NewBall,
    VectorState,
};
use glam::Vec2;

/// Wires a `BinSession` to the browser frame loop.
///
/// Pointer events are queued as they arrive and replayed at the start of
/// the next tick, so gesture handling and stepping never interleave.
/// Events produced by the session wait here until the host takes them.
pub struct BinRunner {
    session: BinSession,
    input: InputQueue,
    vectors: VectorState,
    pending: Vec<BinEvent>,
}

impl BinRunner {
    pub fn new(config: BinConfig) -> Self {
        Self {
            session: BinSession::new(config),
            input: InputQueue::new(),
            vectors: VectorState::new(),
            pending: Vec::new(),
        }
    }

    /// Parse and check a host config. Bad JSON or a config that fails
    /// validation falls back to the defaults with a warning.
    pub fn config_from_json(json: &str) -> BinConfig {
        if json.trim().is_empty() {
            return BinConfig::default();
        }
        let config = match BinConfig::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("bad bin config ({}), using defaults", e);
                return BinConfig::default();
            }
        };
        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("invalid bin config ({}), using defaults", e);
                BinConfig::default()
            }
        }
    }

    pub fn session(&self) -> &BinSession {
        &self.session
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn stop(&mut self) {
        self.input.drain();
        self.pending.clear();
        self.vectors.clear();
        self.session.stop();
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: replay input, step the world, repaint.
    pub fn tick(&mut self, dt: f32) {
        for event in self.input.drain() {
            match event {
                InputEvent::PointerDown { x, y } => self.session.pointer_down(Vec2::new(x, y)),
                InputEvent::PointerMove { x, y } => self.session.pointer_move(Vec2::new(x, y)),
                InputEvent::PointerUp { x, y } => self.session.pointer_up(Vec2::new(x, y)),
            }
        }
        self.session.tick(dt);
        self.pending.extend(self.session.drain_events());
        self.session.render(&mut self.vectors);
    }

    // ---- Registry ----

    /// Add a ball at `position`, or in the spawn band when `None`.
    pub fn add(
        &mut self,
        id: &str,
        color: &str,
        text: &str,
        annotation: Option<String>,
        position: Option<Vec2>,
    ) {
        let mut ball = NewBall::new(id, color, text);
        ball.annotation = annotation;
        ball.position = position;
        self.session.add(ball);
    }

    pub fn remove(&mut self, id: &str) {
        self.session.remove(&BallId::from(id));
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }

    pub fn update(&mut self, id: &str, color: &str, text: &str, annotation: Option<String>) {
        self.session.update(&BallId::from(id), color, text, annotation);
    }

    pub fn update_annotation(&mut self, id: &str, annotation: &str) {
        self.session.update_annotation(&BallId::from(id), annotation);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.session.set_paused(paused);
    }

    /// Restore from a JSON array of snapshots. Unparseable input changes nothing.
    pub fn restore_many_json(&mut self, json: &str) {
        match serde_json::from_str::<Vec<BallSnapshot>>(json) {
            Ok(items) => self.session.restore_many(items),
            Err(e) => log::warn!("restore ignored, bad snapshot list: {}", e),
        }
    }

    // ---- Host reads ----

    /// Take pending events as a JSON array.
    pub fn take_events_json(&mut self) -> String {
        let events = std::mem::take(&mut self.pending);
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("could not encode {} event(s): {}", events.len(), e);
            "[]".to_string()
        })
    }

    pub fn cursor(&self) -> &'static str {
        self.session.cursor().as_str()
    }

    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.buffer_ptr()
    }

    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.session.config().world_width
    }

    pub fn world_height(&self) -> f32 {
        self.session.config().world_height
    }
}
