//! Tap-versus-drag disambiguation.
//!
//! A pointer gesture is decided purely by how far the pointer travelled
//! between down and up, never by how long it was held.

use glam::Vec2;

use crate::api::types::{BallId, CursorHint};

#[derive(Debug, Clone, PartialEq)]
enum GestureState {
    Idle,
    Tracking {
        start: Vec2,
        /// Latest pointer position; the drag target.
        pointer: Vec2,
        /// First paper ball under the pointer at `down`.
        candidate: Option<BallId>,
        /// Body-local point of the candidate that was grabbed.
        grab_anchor: Option<Vec2>,
    },
}

/// How a completed gesture resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    BallTap(BallId),
    EmptyTap,
    /// Moved too far to be a tap. No semantic event.
    Drag,
    /// `up` without a matching `down`.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Gesture {
    state: GestureState,
    threshold: f32,
}

impl Gesture {
    pub fn new(threshold: f32) -> Self {
        Self {
            state: GestureState::Idle,
            threshold,
        }
    }

    /// Begin a gesture. A second `down` without an `up` restarts tracking.
    pub fn down(&mut self, pos: Vec2, hit: Option<(BallId, Vec2)>) {
        let (candidate, grab_anchor) = match hit {
            Some((id, anchor)) => (Some(id), Some(anchor)),
            None => (None, None),
        };
        self.state = GestureState::Tracking {
            start: pos,
            pointer: pos,
            candidate,
            grab_anchor,
        };
    }

    /// Track the pointer. Hover only drives the cursor.
    pub fn moved(&mut self, pos: Vec2, hovering: bool) -> CursorHint {
        if let GestureState::Tracking { pointer, .. } = &mut self.state {
            *pointer = pos;
        }
        if hovering {
            CursorHint::Grab
        } else {
            CursorHint::Pointer
        }
    }

    /// Finish the gesture and return to idle.
    pub fn up(&mut self, pos: Vec2) -> GestureOutcome {
        let GestureState::Tracking {
            start, candidate, ..
        } = std::mem::replace(&mut self.state, GestureState::Idle)
        else {
            return GestureOutcome::Ignored;
        };
        if start.distance(pos) < self.threshold {
            match candidate {
                Some(id) => GestureOutcome::BallTap(id),
                None => GestureOutcome::EmptyTap,
            }
        } else {
            GestureOutcome::Drag
        }
    }

    /// The ball being dragged, its grab anchor, and where the pointer is.
    pub fn held(&self) -> Option<(&BallId, Vec2, Vec2)> {
        match &self.state {
            GestureState::Tracking {
                pointer,
                candidate: Some(id),
                grab_anchor: Some(anchor),
                ..
            } => Some((id, *anchor, *pointer)),
            _ => None,
        }
    }

    /// The ball the current gesture started on, if any.
    pub fn candidate(&self) -> Option<&BallId> {
        match &self.state {
            GestureState::Tracking { candidate, .. } => candidate.as_ref(),
            GestureState::Idle => None,
        }
    }

    /// Drop the grab on `id` (it left the bin). The gesture keeps tracking.
    pub fn release(&mut self, id: &BallId) {
        if let GestureState::Tracking {
            candidate,
            grab_anchor,
            ..
        } = &mut self.state
        {
            if candidate.as_ref() == Some(id) {
                *grab_anchor = None;
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}
