//! Page bootstrap.
//!
//! [`Site`] is everything the page script starts on DOM ready: the
//! presentation controller, deferred image loading, reveal-on-scroll, and the
//! diagnostics hooks. Each part mounts on its own; a page with no carousel,
//! no deferred images and no reveal targets still boots.

use crate::bindings::Group;
use crate::config::ControllerConfig;
use crate::controller::PresentationStateController;
use crate::diagnostics::{self, ErrorReporter, NavigationTiming, PerformanceMetrics};
use crate::dom::{Disposition, Dom, Event, Intersection, ObserverId};
use crate::lazy::LazyLoader;
use crate::reveal::Reveal;
use crate::state::ViewportMode;
use crate::timer::{Timer, TimerId};
use serde::Serialize;
use tracing::{debug, info};

/// Added to `body` once bootstrap has finished.
pub const BODY_LOADED_CLASS: &str = "loaded";

#[derive(Debug)]
pub struct Site {
    controller: PresentationStateController,
    lazy: Option<LazyLoader>,
    reveal: Option<Reveal>,
    errors: ErrorReporter,
    metrics: Option<PerformanceMetrics>,
}

/// Observable page state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub viewport: ViewportMode,
    pub active_slide: Option<usize>,
    pub slide_count: usize,
    pub auto_advance: bool,
    pub menu_open: bool,
    pub open_submenus: Vec<usize>,
    pub open_dropdowns: Vec<usize>,
    pub dropdown_listeners: usize,
    pub loaded_images: usize,
    pub revealed: usize,
    pub slide_changes: usize,
}

impl Site {
    pub fn boot(dom: &mut dyn Dom, timer: &mut dyn Timer, config: ControllerConfig) -> Self {
        let lazy = LazyLoader::mount(dom, &config.lazy);
        let reveal = Reveal::mount(dom, &config.reveal.selector);
        let controller = PresentationStateController::init(dom, timer, config);

        if let Some(body) = dom.query("body") {
            dom.add_class(body, BODY_LOADED_CLASS);
        }
        info!(
            lazy = lazy.is_some(),
            reveal = reveal.is_some(),
            "site initialized"
        );

        Self {
            controller,
            lazy,
            reveal,
            errors: ErrorReporter::new(),
            metrics: None,
        }
    }

    pub fn controller(&self) -> &PresentationStateController {
        &self.controller
    }

    pub fn errors(&self) -> &ErrorReporter {
        &self.errors
    }

    pub fn metrics(&self) -> Option<&PerformanceMetrics> {
        self.metrics.as_ref()
    }

    pub fn handle_event(
        &mut self,
        dom: &mut dyn Dom,
        timer: &mut dyn Timer,
        event: &Event,
    ) -> Disposition {
        self.controller.handle_event(dom, timer, event)
    }

    pub fn on_timer(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer, id: TimerId) -> bool {
        self.controller.on_timer(dom, timer, id)
    }

    /// Route an observer callback to whichever feature created the observer.
    pub fn on_intersections(
        &mut self,
        dom: &mut dyn Dom,
        observer: ObserverId,
        entries: &[Intersection],
    ) -> bool {
        if let Some(reveal) = self.reveal.as_mut()
            && reveal.on_intersections(dom, observer, entries)
        {
            return true;
        }
        if let Some(lazy) = self.lazy.as_mut()
            && lazy.on_intersections(dom, observer, entries)
        {
            return true;
        }
        debug!(?observer, "intersections for unknown observer");
        false
    }

    /// Window `load`: report navigation timing if the host has it.
    pub fn on_window_load(&mut self, timing: Option<&NavigationTiming>) {
        self.metrics = diagnostics::report_performance(timing);
    }

    pub fn fault(&mut self, message: &str) {
        self.errors.fault(message);
    }

    pub fn rejection(&mut self, reason: &str) {
        self.errors.rejection(reason);
    }

    pub fn teardown(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer) {
        self.controller.teardown(dom, timer);
    }

    pub fn snapshot(&self) -> Snapshot {
        let carousel = self.controller.carousel();
        let menu = self.controller.menu();
        Snapshot {
            viewport: self.controller.mode(),
            active_slide: carousel.map(|c| c.index()),
            slide_count: carousel.map_or(0, |c| c.len()),
            auto_advance: carousel.is_some_and(|c| c.is_auto_armed()),
            menu_open: menu.is_some_and(|m| m.is_open()),
            open_submenus: menu.map(|m| m.open_submenus()).unwrap_or_default(),
            open_dropdowns: self
                .controller
                .dropdowns()
                .map(|d| d.open_indices())
                .unwrap_or_default(),
            dropdown_listeners: self.controller.listener_count(Group::Dropdown),
            loaded_images: self.lazy.as_ref().map_or(0, LazyLoader::loaded),
            revealed: self.reveal.as_ref().map_or(0, Reveal::revealed),
            slide_changes: carousel.map_or(0, |c| c.changes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixture::{PageLayout, standard_page};
    use crate::sim::{SimClock, SimDom};

    #[test]
    fn boot_marks_body_loaded() {
        let mut dom = standard_page(&PageLayout::default(), 1024);
        let mut clock = SimClock::new();
        Site::boot(&mut dom, &mut clock, ControllerConfig::default());
        assert!(dom.has_class(dom.body(), BODY_LOADED_CLASS));
    }

    #[test]
    fn empty_page_boots() {
        let mut dom = SimDom::new(1024);
        let mut clock = SimClock::new();
        let site = Site::boot(&mut dom, &mut clock, ControllerConfig::default());
        let snapshot = site.snapshot();
        assert_eq!(snapshot.active_slide, None);
        assert_eq!(snapshot.slide_count, 0);
        assert!(!snapshot.menu_open);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn snapshot_reflects_boot_state() {
        let mut dom = standard_page(&PageLayout::default(), 500);
        let mut clock = SimClock::new();
        let site = Site::boot(&mut dom, &mut clock, ControllerConfig::default());
        let snapshot = site.snapshot();
        assert_eq!(snapshot.viewport, ViewportMode::Mobile);
        assert_eq!(snapshot.active_slide, Some(0));
        assert_eq!(snapshot.slide_count, 3);
        assert!(snapshot.auto_advance);
        assert_eq!(snapshot.dropdown_listeners, 3);
        assert_eq!(snapshot.loaded_images, 0);
        assert_eq!(snapshot.revealed, 0);
    }

    #[test]
    fn intersections_route_by_observer() {
        let mut dom = standard_page(&PageLayout::default(), 1024);
        let mut clock = SimClock::new();
        let mut site = Site::boot(&mut dom, &mut clock, ControllerConfig::default());

        let img = dom.query("img[data-src]").unwrap();
        let card = dom.query(".service-card").unwrap();
        for el in [img, card] {
            let observer = dom.observers_of(el)[0];
            let entry = Intersection {
                target: el,
                is_intersecting: true,
            };
            assert!(site.on_intersections(&mut dom, observer, &[entry]));
        }
        let snapshot = site.snapshot();
        assert_eq!(snapshot.loaded_images, 1);
        assert_eq!(snapshot.revealed, 1);
    }

    #[test]
    fn window_load_records_metrics() {
        let mut dom = SimDom::new(1024);
        let mut clock = SimClock::new();
        let mut site = Site::boot(&mut dom, &mut clock, ControllerConfig::default());
        site.on_window_load(None);
        assert!(site.metrics().is_none());
        let timing = NavigationTiming {
            fetch_start: 0.0,
            dom_content_loaded_start: 50.0,
            dom_content_loaded_end: 60.0,
            load_event_start: 200.0,
            load_event_end: 210.0,
        };
        site.on_window_load(Some(&timing));
        assert_eq!(site.metrics().map(|m| m.total_load_time), Some(210.0));
    }

    #[test]
    fn faults_are_counted_not_fatal() {
        let mut dom = standard_page(&PageLayout::default(), 1024);
        let mut clock = SimClock::new();
        let mut site = Site::boot(&mut dom, &mut clock, ControllerConfig::default());
        site.fault("ReferenceError: foo is not defined");
        site.rejection("network");
        assert_eq!(site.errors().faults(), 1);
        assert_eq!(site.errors().rejections(), 1);
        assert_eq!(site.snapshot().active_slide, Some(0));
    }
}
