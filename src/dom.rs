//! The DOM collaborator.
//!
//! The controller never touches a real document. Everything it needs from the
//! host page goes through the [`Dom`] trait: element lookup by selector, class
//! membership, attributes, listener registration, viewport geometry,
//! intersection observation, and custom event emission.
//!
//! The browser binding and the in-memory [`SimDom`](crate::sim::SimDom) are
//! both implementations of this trait, so every transition rule can be
//! exercised without a browser.
//!
//! # Event delivery
//!
//! Listener registration returns a [`ListenerId`]. The host owns the actual
//! dispatch: when an event reaches a registered listener it hands an [`Event`]
//! carrying that id back to the controller, which looks up what the listener
//! was bound for and answers with a [`Disposition`] (prevent default / stop
//! propagation).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to an element in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub usize);

/// Handle returned by [`Dom::listen`], used to detach the listener later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Handle to an intersection observer created by [`Dom::create_observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub u32);

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Element(ElementId),
    Document,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    PointerEnter,
    PointerLeave,
    KeyDown,
    TouchStart,
    TouchMove,
    TouchEnd,
    Resize,
    Scroll,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Click => "click",
            EventKind::PointerEnter => "pointerenter",
            EventKind::PointerLeave => "pointerleave",
            EventKind::KeyDown => "keydown",
            EventKind::TouchStart => "touchstart",
            EventKind::TouchMove => "touchmove",
            EventKind::TouchEnd => "touchend",
            EventKind::Resize => "resize",
            EventKind::Scroll => "scroll",
        };
        f.write_str(name)
    }
}

/// Keys the controller reacts to. Everything else arrives as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other(String),
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Payload carried by an input event.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventDetail {
    #[default]
    None,
    Key(Key),
    /// Horizontal client coordinate of the touch point.
    Touch { x: f64 },
}

/// An event delivered to one registered listener.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub listener: ListenerId,
    pub kind: EventKind,
    /// The element the event originated on, if any (absent for window events).
    pub target: Option<ElementId>,
    pub detail: EventDetail,
}

/// What a handler asks the host to do with the event after it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Disposition {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl Disposition {
    pub const PASS: Disposition = Disposition {
        prevent_default: false,
        stop_propagation: false,
    };

    /// Suppress the default action and keep the event from bubbling further.
    pub const CAPTURE: Disposition = Disposition {
        prevent_default: true,
        stop_propagation: true,
    };

    pub const PREVENT: Disposition = Disposition {
        prevent_default: true,
        stop_propagation: false,
    };

    pub const STOP: Disposition = Disposition {
        prevent_default: false,
        stop_propagation: true,
    };

    /// Combine two dispositions; either flag set on either side stays set.
    pub fn merge(self, other: Disposition) -> Disposition {
        Disposition {
            prevent_default: self.prevent_default || other.prevent_default,
            stop_propagation: self.stop_propagation || other.stop_propagation,
        }
    }
}

/// Notifications the controller publishes for unrelated page code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PageEvent {
    /// Emitted on every committed slide change with the new logical index.
    SlideChange { current_slide: usize },
}

/// One intersection observer callback entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intersection {
    pub target: ElementId,
    pub is_intersecting: bool,
}

/// Capability set the controller consumes from the host document.
///
/// Lookups are optional by contract: a selector that matches nothing yields
/// `None` / an empty list and the caller skips the feature.
pub trait Dom {
    /// First element matching `selector`, in document order.
    fn query(&self, selector: &str) -> Option<ElementId>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// First descendant of `root` matching `selector`.
    fn query_within(&self, root: ElementId, selector: &str) -> Option<ElementId>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool;

    fn has_class(&self, el: ElementId, class: &str) -> bool;
    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);

    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str);
    fn remove_attribute(&mut self, el: ElementId, name: &str);

    fn listen(&mut self, target: Target, kind: EventKind) -> ListenerId;
    fn unlisten(&mut self, id: ListenerId);

    fn viewport_width(&self) -> u32;
    fn scroll_y(&self) -> u32;
    fn supports_touch(&self) -> bool;

    /// Create an intersection observer, or `None` when the host has no
    /// intersection observation capability.
    fn create_observer(&mut self) -> Option<ObserverId>;
    fn observe(&mut self, observer: ObserverId, el: ElementId);
    fn unobserve(&mut self, observer: ObserverId, el: ElementId);

    /// Publish a custom page event (bubbles from the document).
    fn emit(&mut self, event: PageEvent);

    /// Toggle `class` on `el` to match `on`.
    fn set_class(&mut self, el: ElementId, class: &str, on: bool) {
        if on {
            self.add_class(el, class);
        } else {
            self.remove_class(el, class);
        }
    }
}
