pub mod containment;
pub mod crumple;
pub mod debug;
pub mod render;
pub mod rng;
pub mod vector;
pub mod walls;
