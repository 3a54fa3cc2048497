pub mod api;
pub mod core;
pub mod input;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{BinConfig, Bounds, SpawnBand, Trapezoid, WallLayout};
pub use api::session::BinSession;
pub use api::types::{BallId, BallPayload, BallSnapshot, BinEvent, CursorHint, NewBall, PaperColor};
pub use core::physics::{BodyDesc, BodyTag, BodyType, ColliderDesc, ColliderMaterial, PhysicsBody, PhysicsWorld};
pub use core::registry::{Ball, BallRegistry};
pub use core::time::StepClock;
pub use input::gesture::{Gesture, GestureOutcome};
pub use input::queue::{InputEvent, InputQueue};
pub use systems::containment::{BodyState, ContainmentOutcome, ContainmentPolicy};
pub use systems::crumple::{crumple, Crease, CrumpleParams, PaperGeometry, PaperMaterial};
pub use systems::render::PaperRenderer;
pub use systems::rng::Rng;
pub use systems::vector::{VectorColor, VectorState, VectorVertex};
