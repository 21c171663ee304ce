//! Event dispatch over a [`SimDom`] with a booted [`Site`].
//!
//! Bubbling events (click, keydown, touch) visit the target, then each
//! ancestor, then the document, then the window. At each node every listener
//! registered for the event kind runs in registration order; a listener that
//! asks to stop propagation lets the rest of its node finish but keeps the
//! event from reaching the next node. Listeners detached by an earlier
//! handler in the same dispatch are skipped.

use crate::config::ControllerConfig;
use crate::diagnostics::NavigationTiming;
use crate::dom::{Disposition, Dom, ElementId, Event, EventDetail, EventKind, Intersection, Key, Target};
use crate::sim::{SimClock, SimDom};
use crate::site::{Site, Snapshot};
use tracing::trace;

#[derive(Debug)]
pub struct Page {
    dom: SimDom,
    clock: SimClock,
    site: Site,
}

impl Page {
    pub fn boot(mut dom: SimDom, config: ControllerConfig) -> Self {
        let mut clock = SimClock::new();
        let site = Site::boot(&mut dom, &mut clock, config);
        Self { dom, clock, site }
    }

    pub fn dom(&self) -> &SimDom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut SimDom {
        &mut self.dom
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn snapshot(&self) -> Snapshot {
        self.site.snapshot()
    }

    pub fn find(&self, selector: &str) -> Option<ElementId> {
        self.dom.query(selector)
    }

    pub fn find_all(&self, selector: &str) -> Vec<ElementId> {
        self.dom.query_all(selector)
    }

    pub fn click(&mut self, el: ElementId) -> Disposition {
        let path = self.bubble_path(el);
        self.dispatch(&path, EventKind::Click, Some(el), EventDetail::None)
    }

    /// Pointer moves onto `el`, entering it and every ancestor.
    pub fn hover(&mut self, el: ElementId) {
        let path = self.element_path(el);
        self.dispatch(&path, EventKind::PointerEnter, Some(el), EventDetail::None);
    }

    pub fn unhover(&mut self, el: ElementId) {
        let path = self.element_path(el);
        self.dispatch(&path, EventKind::PointerLeave, Some(el), EventDetail::None);
    }

    pub fn key(&mut self, key: Key) -> Disposition {
        self.dispatch(
            &[Target::Document, Target::Window],
            EventKind::KeyDown,
            None,
            EventDetail::Key(key),
        )
    }

    pub fn resize(&mut self, width: u32) {
        self.dom.set_viewport_width(width);
        self.dispatch(&[Target::Window], EventKind::Resize, None, EventDetail::None);
    }

    pub fn scroll(&mut self, y: u32) {
        self.dom.set_scroll_y(y);
        self.dispatch(&[Target::Window], EventKind::Scroll, None, EventDetail::None);
    }

    /// A one-finger horizontal swipe over `el`. Returns the disposition of
    /// the move phase.
    pub fn swipe(&mut self, el: ElementId, from_x: f64, to_x: f64) -> Disposition {
        let path = self.bubble_path(el);
        self.dispatch(&path, EventKind::TouchStart, Some(el), EventDetail::Touch { x: from_x });
        let moved = self.dispatch(&path, EventKind::TouchMove, Some(el), EventDetail::Touch { x: to_x });
        self.dispatch(&path, EventKind::TouchEnd, Some(el), EventDetail::Touch { x: to_x });
        moved
    }

    /// `el` scrolls into view: every observer watching it is notified.
    pub fn intersect(&mut self, el: ElementId) {
        let entry = Intersection {
            target: el,
            is_intersecting: true,
        };
        for observer in self.dom.observers_of(el) {
            self.site.on_intersections(&mut self.dom, observer, &[entry]);
        }
    }

    /// Let `ms` of virtual time pass, firing due timers in order.
    pub fn advance(&mut self, ms: u64) {
        let until = self.clock.now() + ms;
        while let Some(id) = self.clock.pop_due(until) {
            trace!(?id, at = self.clock.now(), "timer fired");
            self.site.on_timer(&mut self.dom, &mut self.clock, id);
        }
        self.clock.advance_to(until);
    }

    pub fn load(&mut self, timing: Option<&NavigationTiming>) {
        self.site.on_window_load(timing);
    }

    pub fn fault(&mut self, message: &str) {
        self.site.fault(message);
    }

    pub fn reject(&mut self, reason: &str) {
        self.site.rejection(reason);
    }

    fn element_path(&self, el: ElementId) -> Vec<Target> {
        self.dom.path(el).into_iter().map(Target::Element).collect()
    }

    fn bubble_path(&self, el: ElementId) -> Vec<Target> {
        let mut path = self.element_path(el);
        path.push(Target::Document);
        path.push(Target::Window);
        path
    }

    fn dispatch(
        &mut self,
        path: &[Target],
        kind: EventKind,
        origin: Option<ElementId>,
        detail: EventDetail,
    ) -> Disposition {
        let mut result = Disposition::PASS;
        for &node in path {
            for listener in self.dom.listeners_for(node, kind) {
                if !self.dom.is_listening(listener) {
                    continue;
                }
                let event = Event {
                    listener,
                    kind,
                    target: origin,
                    detail: detail.clone(),
                };
                let disposition = self.site.handle_event(&mut self.dom, &mut self.clock, &event);
                result = result.merge(disposition);
            }
            if result.stop_propagation {
                break;
            }
        }
        result
    }
}
