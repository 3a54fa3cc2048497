use glam::Vec2;
use rapier2d::prelude::*;

// ---------------------------------------------------------------------------
// Conversion helpers (private) — glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn vec2_to_point(v: Vec2) -> nalgebra::Point2<f32> {
    nalgebra::Point2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// What a body stands for in the bin. Stored in the body's `user_data`
/// so engine-side enumeration can tell walls from paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTag {
    Wall,
    PaperBall,
}

impl BodyTag {
    fn to_user_data(self) -> u128 {
        match self {
            BodyTag::Wall => 1,
            BodyTag::PaperBall => 2,
        }
    }

    fn from_user_data(data: u128) -> Option<Self> {
        match data {
            1 => Some(BodyTag::Wall),
            2 => Some(BodyTag::PaperBall),
            _ => None,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone)]
pub enum ColliderDesc {
    Cuboid { half_width: f32, half_height: f32 },
    /// Convex hull of the given body-local points.
    ConvexPolygon { points: Vec<Vec2> },
}

impl ColliderDesc {
    /// Returns `None` when the polygon is degenerate (fewer than three
    /// non-collinear points).
    fn build_collider(&self) -> Option<ColliderBuilder> {
        match self {
            ColliderDesc::Cuboid { half_width, half_height } => {
                Some(ColliderBuilder::cuboid(*half_width, *half_height))
            }
            ColliderDesc::ConvexPolygon { points } => {
                let points: Vec<_> = points.iter().map(|p| vec2_to_point(*p)).collect();
                ColliderBuilder::convex_hull(&points)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub tag: BodyTag,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub ccd: bool,
    pub collider: ColliderDesc,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl BodyDesc {
    /// Create a dynamic paper-ball body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            tag: BodyTag::PaperBall,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            ccd: false,
            collider,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Create a fixed wall description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            tag: BodyTag::Wall,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            ccd: false,
            collider,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Air drag. Higher values slow the body faster.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }
}

/// Handle pair referencing Rapier internals for one body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Rapier2D behind the handful of operations the bin needs.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    /// Y points down, so positive Y gravity pulls paper toward the bin floor.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Create a rigid body + collider and return handles.
    /// Returns `None` if the collider shape is degenerate; nothing is inserted then.
    pub fn create_body(&mut self, desc: &BodyDesc, material: ColliderMaterial) -> Option<PhysicsBody> {
        let collider = desc
            .collider
            .build_collider()?
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .build();

        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .rotation(desc.rotation)
            .linvel(vec2_to_na(desc.velocity))
            .ccd_enabled(desc.ccd)
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .user_data(desc.tag.to_user_data())
            .build();

        let body_handle = self.bodies.insert(rb);
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);

        Some(PhysicsBody {
            body_handle,
            collider_handle,
        })
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Remove every non-static body, leaving the walls. Returns how many went.
    pub fn remove_dynamic_bodies(&mut self) -> usize {
        let doomed: Vec<PhysicsBody> = self.dynamic_bodies().collect();
        for body in &doomed {
            self.remove_body(body);
        }
        doomed.len()
    }

    /// Advance the simulation by one integration step.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Whether the body is still part of the simulation.
    pub fn contains(&self, body: &PhysicsBody) -> bool {
        self.bodies.contains(body.body_handle)
    }

    pub fn body_tag(&self, body: &PhysicsBody) -> Option<BodyTag> {
        self.bodies
            .get(body.body_handle)
            .and_then(|rb| BodyTag::from_user_data(rb.user_data))
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Option<Vec2> {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
    }

    /// Teleport a body, keeping its rotation.
    pub fn set_position(&mut self, body: &PhysicsBody, pos: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_translation(vec2_to_na(pos), true);
        }
    }

    /// Get the current position and rotation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> Option<(Vec2, f32)> {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
    }

    /// Number of rigid bodies in the simulation, walls included.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn dynamic_body_count(&self) -> usize {
        self.bodies.iter().filter(|(_, rb)| rb.is_dynamic()).count()
    }

    /// Every body that has a collider attached.
    pub fn bodies(&self) -> impl Iterator<Item = PhysicsBody> + '_ {
        self.bodies.iter().filter_map(|(handle, rb)| {
            rb.colliders().first().map(|collider| PhysicsBody {
                body_handle: handle,
                collider_handle: *collider,
            })
        })
    }

    /// Every non-static body that has a collider attached.
    pub fn dynamic_bodies(&self) -> impl Iterator<Item = PhysicsBody> + '_ {
        self.bodies
            .iter()
            .filter(|(_, rb)| rb.is_dynamic())
            .filter_map(|(handle, rb)| {
                rb.colliders().first().map(|collider| PhysicsBody {
                    body_handle: handle,
                    collider_handle: *collider,
                })
            })
    }

    /// Dynamic bodies whose shape contains `point`, in engine order.
    ///
    /// Tests against the body's current pose rather than the collider's
    /// cached one, so a body teleported since the last step is still found
    /// where it now is.
    pub fn bodies_at_point(&self, point: Vec2) -> Vec<PhysicsBody> {
        let pt = vec2_to_point(point);
        self.dynamic_bodies()
            .filter(|body| {
                let (Some(rb), Some(collider)) = (
                    self.bodies.get(body.body_handle),
                    self.colliders.get(body.collider_handle),
                ) else {
                    return false;
                };
                collider.shape().contains_point(rb.position(), &pt)
            })
            .collect()
    }

    /// World-space outline of a body's collider, as the engine sees it.
    /// Returns `None` for a missing body or an unsupported shape.
    pub fn collider_outline(&self, body: &PhysicsBody) -> Option<Vec<Vec2>> {
        let rb = self.bodies.get(body.body_handle)?;
        let collider = self.colliders.get(body.collider_handle)?;
        let shape = collider.shape();
        let local: Vec<nalgebra::Point2<f32>> = if let Some(poly) = shape.as_convex_polygon() {
            poly.points().to_vec()
        } else if let Some(cuboid) = shape.as_cuboid() {
            let h = cuboid.half_extents;
            vec![
                nalgebra::Point2::new(-h.x, -h.y),
                nalgebra::Point2::new(h.x, -h.y),
                nalgebra::Point2::new(h.x, h.y),
                nalgebra::Point2::new(-h.x, h.y),
            ]
        } else {
            return None;
        };
        let iso = rb.position();
        Some(
            local
                .iter()
                .map(|p| {
                    let w = iso * p;
                    Vec2::new(w.x, w.y)
                })
                .collect(),
        )
    }

    /// Convert a world point into the body's local frame.
    pub fn to_local(&self, body: &PhysicsBody, world: Vec2) -> Option<Vec2> {
        let (pos, rot) = self.body_position(body)?;
        Some(Vec2::from_angle(-rot).rotate(world - pos))
    }

    /// Spring-style pull used for pointer dragging.
    ///
    /// Sets the body's velocity so that its `anchor_local` point closes
    /// `stiffness` of the gap to `target` over the next step.
    pub fn pull_toward(&mut self, body: &PhysicsBody, anchor_local: Vec2, target: Vec2, stiffness: f32) {
        let dt = self.integration_parameters.dt;
        if dt <= 0.0 {
            return;
        }
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            let (pos, rot) = na_iso_to_pos_rot(rb.position());
            let anchor = pos + Vec2::from_angle(rot).rotate(anchor_local);
            let vel = (target - anchor) * (stiffness / dt);
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn square(half: f32) -> ColliderDesc {
        ColliderDesc::ConvexPolygon {
            points: vec![
                Vec2::new(-half, -half),
                Vec2::new(half, -half),
                Vec2::new(half, half),
                Vec2::new(-half, half),
            ],
        }
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world
            .create_body(&BodyDesc::dynamic(square(10.0)), ColliderMaterial::default())
            .expect("square is a valid hull");
        assert_eq!(world.body_count(), 1);
        assert!(world.contains(&body));
        world.remove_body(&body);
        assert_eq!(world.body_count(), 0);
        assert!(!world.contains(&body));
    }

    #[test]
    fn degenerate_polygon_is_rejected() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let line = ColliderDesc::ConvexPolygon {
            points: vec![Vec2::ZERO, Vec2::new(10.0, 0.0)],
        };
        assert!(world
            .create_body(&BodyDesc::dynamic(line), ColliderMaterial::default())
            .is_none());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn gravity_affects_dynamic_body() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 100.0));
        world.set_dt(1.0 / 60.0);

        let body = world
            .create_body(&BodyDesc::dynamic(square(5.0)), ColliderMaterial::default())
            .unwrap();

        let (initial_pos, _) = world.body_position(&body).unwrap();
        for _ in 0..10 {
            world.step();
        }
        let (new_pos, _) = world.body_position(&body).unwrap();

        assert!(
            new_pos.y > initial_pos.y,
            "Body should fall: start={}, end={}",
            initial_pos.y,
            new_pos.y
        );
    }

    #[test]
    fn set_velocity_and_position_directly() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world
            .create_body(&BodyDesc::dynamic(square(5.0)), ColliderMaterial::default())
            .unwrap();

        world.set_velocity(&body, Vec2::new(50.0, -30.0));
        let vel = world.velocity(&body).unwrap();
        assert!((vel.x - 50.0).abs() < 0.001);
        assert!((vel.y - (-30.0)).abs() < 0.001);

        world.set_position(&body, Vec2::new(150.0, 50.0));
        let (pos, _) = world.body_position(&body).unwrap();
        assert!((pos - Vec2::new(150.0, 50.0)).length() < 0.001);
    }

    #[test]
    fn fixed_body_does_not_move() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 100.0));
        world.set_dt(1.0 / 60.0);

        let body = world
            .create_body(
                &BodyDesc::fixed(ColliderDesc::Cuboid {
                    half_width: 100.0,
                    half_height: 10.0,
                })
                .with_position(Vec2::new(0.0, 500.0)),
                ColliderMaterial::default(),
            )
            .unwrap();

        for _ in 0..10 {
            world.step();
        }

        let (pos, _) = world.body_position(&body).unwrap();
        assert!((pos.y - 500.0).abs() < 0.001, "Fixed body should not move: y={}", pos.y);
        assert_eq!(world.body_tag(&body), Some(BodyTag::Wall));
    }

    #[test]
    fn body_position_and_rotation() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world
            .create_body(
                &BodyDesc::dynamic(square(5.0))
                    .with_position(Vec2::new(100.0, 200.0))
                    .with_rotation(1.5),
                ColliderMaterial::default(),
            )
            .unwrap();

        let (pos, rot) = world.body_position(&body).unwrap();
        assert!((pos.x - 100.0).abs() < 0.001);
        assert!((pos.y - 200.0).abs() < 0.001);
        assert!((rot - 1.5).abs() < 0.001);
        assert_eq!(world.body_tag(&body), Some(BodyTag::PaperBall));
    }

    #[test]
    fn point_query_ignores_fixed_bodies() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let wall = world
            .create_body(
                &BodyDesc::fixed(ColliderDesc::Cuboid {
                    half_width: 50.0,
                    half_height: 50.0,
                }),
                ColliderMaterial::default(),
            )
            .unwrap();
        let ball = world
            .create_body(
                &BodyDesc::dynamic(square(10.0)).with_position(Vec2::new(200.0, 0.0)),
                ColliderMaterial::default(),
            )
            .unwrap();

        assert!(world.bodies_at_point(Vec2::ZERO).is_empty());
        assert_eq!(world.bodies_at_point(Vec2::new(205.0, 3.0)), vec![ball]);
        assert!(world.bodies_at_point(Vec2::new(230.0, 0.0)).is_empty());
        assert_eq!(world.bodies().count(), 2);
        assert!(world.bodies().any(|b| b == wall));
    }

    #[test]
    fn point_query_follows_teleport_before_step() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let ball = world
            .create_body(&BodyDesc::dynamic(square(10.0)), ColliderMaterial::default())
            .unwrap();
        world.set_position(&ball, Vec2::new(300.0, 300.0));
        assert!(world.bodies_at_point(Vec2::ZERO).is_empty());
        assert_eq!(world.bodies_at_point(Vec2::new(300.0, 300.0)), vec![ball]);
    }

    #[test]
    fn remove_dynamic_bodies_keeps_walls() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world
            .create_body(
                &BodyDesc::fixed(ColliderDesc::Cuboid {
                    half_width: 10.0,
                    half_height: 10.0,
                }),
                ColliderMaterial::default(),
            )
            .unwrap();
        for i in 0..3 {
            world
                .create_body(
                    &BodyDesc::dynamic(square(5.0)).with_position(Vec2::new(i as f32 * 50.0, 100.0)),
                    ColliderMaterial::default(),
                )
                .unwrap();
        }
        assert_eq!(world.dynamic_body_count(), 3);
        assert_eq!(world.remove_dynamic_bodies(), 3);
        assert_eq!(world.dynamic_body_count(), 0);
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn collider_outline_is_in_world_space() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world
            .create_body(
                &BodyDesc::fixed(ColliderDesc::Cuboid {
                    half_width: 10.0,
                    half_height: 5.0,
                })
                .with_position(Vec2::new(100.0, 100.0)),
                ColliderMaterial::default(),
            )
            .unwrap();
        let outline = world.collider_outline(&body).unwrap();
        assert_eq!(outline.len(), 4);
        for p in &outline {
            assert!((p.x - 100.0).abs() <= 10.001, "x out of box: {:?}", p);
            assert!((p.y - 100.0).abs() <= 5.001, "y out of box: {:?}", p);
        }
    }

    #[test]
    fn to_local_undoes_rotation() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world
            .create_body(
                &BodyDesc::dynamic(square(5.0))
                    .with_position(Vec2::new(10.0, 10.0))
                    .with_rotation(std::f32::consts::FRAC_PI_2),
                ColliderMaterial::default(),
            )
            .unwrap();
        // Local +X maps to world +Y after a quarter turn.
        let local = world.to_local(&body, Vec2::new(10.0, 15.0)).unwrap();
        assert!((local - Vec2::new(5.0, 0.0)).length() < 0.001, "local={:?}", local);
    }

    #[test]
    fn pull_toward_moves_anchor_to_target() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(1.0 / 60.0);
        let body = world
            .create_body(&BodyDesc::dynamic(square(5.0)), ColliderMaterial::default())
            .unwrap();

        let target = Vec2::new(100.0, 0.0);
        for _ in 0..60 {
            world.pull_toward(&body, Vec2::ZERO, target, 0.2);
            world.step();
        }
        let (pos, _) = world.body_position(&body).unwrap();
        assert!((pos - target).length() < 5.0, "body should reach the pointer: {:?}", pos);
    }
}
