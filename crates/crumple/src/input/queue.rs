use glam::Vec2;

/// Raw pointer input, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began.
    PointerDown { x: f32, y: f32 },
    /// The touch/cursor moved, pressed or not.
    PointerMove { x: f32, y: f32 },
    /// A touch/click ended.
    PointerUp { x: f32, y: f32 },
}

impl InputEvent {
    pub fn position(&self) -> Vec2 {
        match *self {
            InputEvent::PointerDown { x, y }
            | InputEvent::PointerMove { x, y }
            | InputEvent::PointerUp { x, y } => Vec2::new(x, y),
        }
    }
}

/// Pointer events waiting for the next tick.
/// The host pushes as events arrive; the session drains them in order.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        // Consecutive moves collapse: only the latest hover position matters.
        if let (Some(InputEvent::PointerMove { .. }), InputEvent::PointerMove { .. }) =
            (self.events.last(), event)
        {
            self.events.pop();
        }
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_keeps_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::PointerUp { x: 11.0, y: 20.0 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(
            events,
            vec![
                InputEvent::PointerDown { x: 10.0, y: 20.0 },
                InputEvent::PointerUp { x: 11.0, y: 20.0 },
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn consecutive_moves_collapse() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        q.push(InputEvent::PointerMove { x: 1.0, y: 0.0 });
        q.push(InputEvent::PointerMove { x: 2.0, y: 0.0 });
        q.push(InputEvent::PointerMove { x: 3.0, y: 0.0 });
        q.push(InputEvent::PointerUp { x: 3.0, y: 0.0 });
        q.push(InputEvent::PointerMove { x: 4.0, y: 0.0 });
        let events = q.drain();
        assert_eq!(events.len(), 4);
        assert_eq!(events[1].position(), Vec2::new(3.0, 0.0));
        assert_eq!(events[3].position(), Vec2::new(4.0, 0.0));
    }
}
