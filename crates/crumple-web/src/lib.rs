//! Browser exports for the paper bin.
//!
//! wasm-bindgen cannot export a stateful struct's lifetime to JS, so the
//! runner lives in a `thread_local!` and every export goes through
//! [`with_runner`]. Calls made before `bin_init` (or after `bin_stop`)
//! do nothing and return a default value.

pub mod runner;

pub use runner::BinRunner;

use std::cell::RefCell;

use crumple::{BinConfig, InputEvent};
use glam::Vec2;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<BinRunner>> = RefCell::new(None);
}

fn with_runner<R: Default>(f: impl FnOnce(&mut BinRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::debug!("bin not initialized, call ignored");
            R::default()
        }
    })
}

fn optional(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn drop_point(x: f32, y: f32) -> Option<Vec2> {
    if x.is_finite() && y.is_finite() {
        Some(Vec2::new(x, y))
    } else {
        None
    }
}

/// Create and start the bin. `config_json` may be empty for the defaults.
#[wasm_bindgen]
pub fn bin_init(config_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let mut config: BinConfig = BinRunner::config_from_json(config_json);
    if config.seed == 0 {
        config.seed = (js_sys::Math::random() * u32::MAX as f64) as u64 | 1;
    }
    let mut runner = BinRunner::new(config);
    runner.start();
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("crumple: initialized");
}

#[wasm_bindgen]
pub fn bin_stop() {
    RUNNER.with(|cell| {
        if let Some(mut runner) = cell.borrow_mut().take() {
            runner.stop();
        }
    });
}

#[wasm_bindgen]
pub fn bin_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn bin_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn bin_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn bin_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

// ---- Registry ----

/// Throw a ball in. An empty `annotation` means none. Pass NaN for `x` or
/// `y` to drop it at a random spot in the spawn band.
#[wasm_bindgen]
pub fn bin_add(id: &str, color: &str, text: &str, annotation: &str, x: f32, y: f32) {
    with_runner(|r| r.add(id, color, text, optional(annotation), drop_point(x, y)));
}

#[wasm_bindgen]
pub fn bin_clear() {
    with_runner(|r| r.clear());
}

#[wasm_bindgen]
pub fn bin_remove(id: &str) {
    with_runner(|r| r.remove(id));
}

/// Update color and text. An empty `annotation` keeps the current one.
#[wasm_bindgen]
pub fn bin_update(id: &str, color: &str, text: &str, annotation: &str) {
    with_runner(|r| r.update(id, color, text, optional(annotation)));
}

#[wasm_bindgen]
pub fn bin_update_annotation(id: &str, annotation: &str) {
    with_runner(|r| r.update_annotation(id, annotation));
}

#[wasm_bindgen]
pub fn bin_set_paused(paused: bool) {
    with_runner(|r| r.set_paused(paused));
}

/// Replace all balls with a JSON array of `{id, color, content, aiReply?}`.
#[wasm_bindgen]
pub fn bin_restore_many(json: &str) {
    with_runner(|r| r.restore_many_json(json));
}

// ---- Data accessors ----

/// Pending selection events as a JSON array. Empty array when none.
#[wasm_bindgen]
pub fn bin_take_events() -> String {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => runner.take_events_json(),
        None => "[]".to_string(),
    })
}

/// CSS cursor name for the canvas.
#[wasm_bindgen]
pub fn bin_cursor() -> String {
    RUNNER.with(|cell| match cell.borrow().as_ref() {
        Some(runner) => runner.cursor().to_string(),
        None => "default".to_string(),
    })
}

#[wasm_bindgen]
pub fn get_vector_vertices_ptr() -> *const f32 {
    RUNNER.with(|cell| match cell.borrow().as_ref() {
        Some(runner) => runner.vector_vertices_ptr(),
        None => std::ptr::null(),
    })
}

#[wasm_bindgen]
pub fn get_vector_vertex_count() -> u32 {
    with_runner(|r| r.vector_vertex_count())
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world_width())
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world_height())
}
