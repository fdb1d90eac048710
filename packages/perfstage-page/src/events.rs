use std::rc::Rc;

use crate::document::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerMove,
    Click,
}

/// A user input event, already routed to its target.
#[derive(Debug, Clone, Copy)]
pub struct InputEvent {
    pub kind: EventKind,
    pub target: ElementId,
    pub x: f64,
    pub y: f64,
}

impl InputEvent {
    pub fn pointer_move(target: ElementId, x: f64, y: f64) -> Self {
        Self {
            kind: EventKind::PointerMove,
            target,
            x,
            y,
        }
    }

    pub fn click(target: ElementId, x: f64, y: f64) -> Self {
        Self {
            kind: EventKind::Click,
            target,
            x,
            y,
        }
    }
}

pub type Listener = Rc<dyn Fn(&InputEvent)>;
