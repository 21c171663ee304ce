//! Reveal-on-scroll: elements fade in the first time they enter the viewport.
//!
//! State lives in two classes. `reveal-pending` hides an element until it is
//! seen; `revealed` replaces it on first intersection and the element is no
//! longer observed. Without intersection observation nothing is hidden.

use crate::dom::{Dom, Intersection, ObserverId};
use tracing::debug;

pub const PENDING_CLASS: &str = "reveal-pending";
pub const REVEALED_CLASS: &str = "revealed";

#[derive(Debug)]
pub struct Reveal {
    observer: Option<ObserverId>,
    revealed: usize,
}

impl Reveal {
    pub fn mount(dom: &mut dyn Dom, selector: &str) -> Option<Self> {
        let targets = dom.query_all(selector);
        if targets.is_empty() {
            debug!(selector, "no reveal targets on page");
            return None;
        }
        let observer = dom.create_observer();
        let mut reveal = Self {
            observer,
            revealed: 0,
        };
        for el in targets {
            match observer {
                Some(observer) => {
                    dom.add_class(el, PENDING_CLASS);
                    dom.observe(observer, el);
                }
                None => {
                    dom.add_class(el, REVEALED_CLASS);
                    reveal.revealed += 1;
                }
            }
        }
        Some(reveal)
    }

    /// Returns `false` if the observer is not this one's.
    pub fn on_intersections(
        &mut self,
        dom: &mut dyn Dom,
        observer: ObserverId,
        entries: &[Intersection],
    ) -> bool {
        if self.observer != Some(observer) {
            return false;
        }
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if dom.has_class(entry.target, PENDING_CLASS) {
                dom.remove_class(entry.target, PENDING_CLASS);
                dom.add_class(entry.target, REVEALED_CLASS);
                self.revealed += 1;
            }
            dom.unobserve(observer, entry.target);
        }
        true
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementId;
    use crate::sim::SimDom;

    fn cards(dom: &mut SimDom, n: usize) -> Vec<ElementId> {
        let body = dom.body();
        (0..n).map(|_| dom.append(body, "div", &["service-card"])).collect()
    }

    #[test]
    fn targets_start_pending_and_observed() {
        let mut dom = SimDom::new(1024);
        let els = cards(&mut dom, 2);
        let reveal = Reveal::mount(&mut dom, ".service-card").unwrap();
        assert_eq!(reveal.revealed(), 0);
        assert!(dom.has_class(els[0], PENDING_CLASS));
        assert_eq!(dom.observed_count(), 2);
    }

    #[test]
    fn first_intersection_reveals_once() {
        let mut dom = SimDom::new(1024);
        let els = cards(&mut dom, 1);
        let mut reveal = Reveal::mount(&mut dom, ".service-card").unwrap();
        let observer = dom.observers_of(els[0])[0];
        let entry = Intersection {
            target: els[0],
            is_intersecting: true,
        };
        reveal.on_intersections(&mut dom, observer, &[entry]);
        reveal.on_intersections(&mut dom, observer, &[entry]);
        assert_eq!(reveal.revealed(), 1);
        assert!(dom.has_class(els[0], REVEALED_CLASS));
        assert!(!dom.has_class(els[0], PENDING_CLASS));
        assert_eq!(dom.observed_count(), 0);
    }

    #[test]
    fn without_observer_everything_is_revealed() {
        let mut dom = SimDom::new(1024);
        dom.set_intersection_observer(false);
        let els = cards(&mut dom, 3);
        let reveal = Reveal::mount(&mut dom, ".service-card").unwrap();
        assert_eq!(reveal.revealed(), 3);
        assert!(els.iter().all(|&el| !dom.has_class(el, PENDING_CLASS)));
    }

    #[test]
    fn empty_selector_match_is_none() {
        let mut dom = SimDom::new(1024);
        assert!(Reveal::mount(&mut dom, ".service-card").is_none());
    }
}
