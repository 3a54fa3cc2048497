use std::collections::HashMap;

use rapier2d::prelude::RigidBodyHandle;

use crate::api::types::{BallId, BallPayload, PaperColor};
use crate::core::physics::PhysicsBody;
use crate::systems::crumple::PaperGeometry;

/// One live paper ball: the note it carries, how it looks, and its body.
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: BallId,
    pub color: PaperColor,
    pub payload: BallPayload,
    pub geometry: PaperGeometry,
    pub body: PhysicsBody,
}

/// Live balls keyed by id, with a reverse index from engine body to id.
///
/// Iteration follows insertion order so painting is stable frame to frame
/// (later balls are drawn on top).
pub struct BallRegistry {
    balls: HashMap<BallId, Ball>,
    by_body: HashMap<RigidBodyHandle, BallId>,
    order: Vec<BallId>,
}

impl BallRegistry {
    pub fn new() -> Self {
        Self {
            balls: HashMap::with_capacity(64),
            by_body: HashMap::with_capacity(64),
            order: Vec::with_capacity(64),
        }
    }

    /// Add a ball. Returns the ball previously stored under the same id.
    pub fn insert(&mut self, ball: Ball) -> Option<Ball> {
        let previous = self.remove(&ball.id);
        self.by_body.insert(ball.body.body_handle, ball.id.clone());
        self.order.push(ball.id.clone());
        self.balls.insert(ball.id.clone(), ball);
        previous
    }

    /// Remove a ball by id. Returns the removed ball if found.
    pub fn remove(&mut self, id: &BallId) -> Option<Ball> {
        let ball = self.balls.remove(id)?;
        self.by_body.remove(&ball.body.body_handle);
        if let Some(idx) = self.order.iter().position(|o| o == id) {
            self.order.remove(idx);
        }
        Some(ball)
    }

    pub fn get(&self, id: &BallId) -> Option<&Ball> {
        self.balls.get(id)
    }

    pub fn get_mut(&mut self, id: &BallId) -> Option<&mut Ball> {
        self.balls.get_mut(id)
    }

    /// The ball a given engine body belongs to, if any.
    pub fn by_body(&self, body: &PhysicsBody) -> Option<&Ball> {
        self.by_body
            .get(&body.body_handle)
            .and_then(|id| self.balls.get(id))
    }

    pub fn contains(&self, id: &BallId) -> bool {
        self.balls.contains_key(id)
    }

    /// Iterate over all balls in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.order.iter().filter_map(|id| self.balls.get(id))
    }

    pub fn bodies(&self) -> impl Iterator<Item = &PhysicsBody> {
        self.iter().map(|ball| &ball.body)
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn clear(&mut self) {
        self.balls.clear();
        self.by_body.clear();
        self.order.clear();
    }
}

impl Default for BallRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::PhysicsWorld;
    use crate::systems::crumple::{crumple, CrumpleParams, PaperMaterial};
    use crate::systems::rng::Rng;
    use glam::Vec2;

    fn make_ball(world: &mut PhysicsWorld, rng: &mut Rng, id: &str) -> Ball {
        let geometry = crumple(rng, &CrumpleParams::default());
        let material = PaperMaterial::default();
        let body = world
            .create_body(&geometry.body_desc(Vec2::new(150.0, 100.0), &material), material.collider_material())
            .unwrap();
        Ball {
            id: BallId::from(id),
            color: PaperColor::parse("#B5EAD7"),
            payload: BallPayload {
                text: format!("note {}", id),
                annotation: None,
            },
            geometry,
            body,
        }
    }

    #[test]
    fn insert_get_and_reverse_lookup() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut rng = Rng::new(1);
        let mut reg = BallRegistry::new();
        let ball = make_ball(&mut world, &mut rng, "a1");
        let body = ball.body;
        assert!(reg.insert(ball).is_none());

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(&BallId::from("a1")).unwrap().payload.text, "note a1");
        assert_eq!(reg.by_body(&body).unwrap().id.as_str(), "a1");
    }

    #[test]
    fn insert_same_id_replaces() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut rng = Rng::new(2);
        let mut reg = BallRegistry::new();
        let first = make_ball(&mut world, &mut rng, "a1");
        let old_body = first.body;
        reg.insert(first);
        let replaced = reg.insert(make_ball(&mut world, &mut rng, "a1")).unwrap();
        assert_eq!(replaced.body, old_body);
        assert_eq!(reg.len(), 1);
        assert!(reg.by_body(&old_body).is_none());
        assert_eq!(reg.iter().count(), 1);
    }

    #[test]
    fn remove_missing_is_none() {
        let mut reg = BallRegistry::new();
        assert!(reg.remove(&BallId::from("zzz")).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut rng = Rng::new(3);
        let mut reg = BallRegistry::new();
        for id in ["c", "a", "b"] {
            reg.insert(make_ball(&mut world, &mut rng, id));
        }
        reg.remove(&BallId::from("a"));
        let ids: Vec<&str> = reg.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
        assert_eq!(reg.bodies().count(), 2);

        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.iter().count(), 0);
    }
}
