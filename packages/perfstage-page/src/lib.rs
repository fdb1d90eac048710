//! Minimal page surface for the perfstage fixture.
//!
//! Just enough document to host the fixture: an element arena, a status line
//! (the body text), and synchronous listener dispatch for pointer and click
//! events. No layout, no styling, no tree; the fixture only needs targets
//! to classify and a place to write its two status messages.

pub mod document;
pub mod events;

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use document::Document;
pub use document::{Element, ElementId, ElementKind};
pub use events::{EventKind, InputEvent, Listener};

#[derive(Debug, Error)]
pub enum PageError {
    #[error("unknown element: {0:?}")]
    UnknownElement(ElementId),
}

/// Cheap clone handle over the document, shared between the event loop
/// callbacks and the scenario driver.
#[derive(Clone)]
pub struct Page {
    document: Rc<RefCell<Document>>,
}

impl Page {
    /// Creates a document holding a single body element with empty text.
    pub fn new() -> Self {
        Self {
            document: Rc::new(RefCell::new(Document::new())),
        }
    }

    /// The body element; default target for scripted input and home of the
    /// status text.
    pub fn body(&self) -> ElementId {
        self.document.borrow().body()
    }

    pub fn create_element(&self, kind: ElementKind, text: impl Into<String>) -> ElementId {
        self.document.borrow_mut().create_element(kind, text.into())
    }

    pub fn element_kind(&self, id: ElementId) -> Result<ElementKind, PageError> {
        self.document
            .borrow()
            .element(id)
            .map(|element| element.kind)
            .ok_or(PageError::UnknownElement(id))
    }

    pub fn element_text(&self, id: ElementId) -> Result<String, PageError> {
        self.document
            .borrow()
            .element(id)
            .map(|element| element.text.clone())
            .ok_or(PageError::UnknownElement(id))
    }

    /// Replaces the body text. The fixture uses this for its idle → running
    /// → done transitions.
    pub fn set_status(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::info!(status = %text, "status updated");
        self.document.borrow_mut().set_body_text(text);
    }

    pub fn status(&self) -> String {
        self.document.borrow().body_text().to_string()
    }

    /// Appends a listener; listeners for a kind run in registration order.
    pub fn add_event_listener(&self, kind: EventKind, listener: Listener) {
        self.document.borrow_mut().add_listener(kind, listener);
    }

    /// Synchronous dispatch: validates the target, then runs every listener
    /// registered for the event's kind. The listener list is snapshotted
    /// first so a listener may mutate the page (or register more listeners)
    /// without tripping over the borrow.
    pub fn dispatch(&self, event: &InputEvent) -> Result<(), PageError> {
        let listeners = {
            let document = self.document.borrow();
            if document.element(event.target).is_none() {
                return Err(PageError::UnknownElement(event.target));
            }
            document.listeners(event.kind)
        };

        tracing::trace!(kind = ?event.kind, "dispatching event");
        for listener in listeners {
            listener(event);
        }
        Ok(())
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
