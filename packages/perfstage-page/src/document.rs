use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::events::{EventKind, Listener};

new_key_type! {
    pub struct ElementId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Body,
    Heading,
    Paragraph,
    Anchor,
    Button,
}

impl ElementKind {
    /// Hyperlinks are the one target class the scenario trigger ignores.
    pub fn is_hyperlink(self) -> bool {
        matches!(self, Self::Anchor)
    }
}

pub struct Element {
    pub kind: ElementKind,
    pub text: String,
}

pub(crate) struct Document {
    elements: SlotMap<ElementId, Element>,
    body: ElementId,
    listeners: FxHashMap<EventKind, SmallVec<[Listener; 2]>>,
}

impl Document {
    pub fn new() -> Self {
        let mut elements = SlotMap::with_key();
        let body = elements.insert(Element {
            kind: ElementKind::Body,
            text: String::new(),
        });
        Self {
            elements,
            body,
            listeners: FxHashMap::default(),
        }
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn create_element(&mut self, kind: ElementKind, text: String) -> ElementId {
        self.elements.insert(Element { kind, text })
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn set_body_text(&mut self, text: String) {
        // The body always exists; it is created in `new` and never removed.
        if let Some(body) = self.elements.get_mut(self.body) {
            body.text = text;
        }
    }

    pub fn body_text(&self) -> &str {
        self.elements
            .get(self.body)
            .map(|body| body.text.as_str())
            .unwrap_or("")
    }

    pub fn add_listener(&mut self, kind: EventKind, listener: Listener) {
        self.listeners.entry(kind).or_default().push(listener);
    }

    pub fn listeners(&self, kind: EventKind) -> SmallVec<[Listener; 2]> {
        self.listeners.get(&kind).cloned().unwrap_or_default()
    }
}
