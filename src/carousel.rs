//! Carousel sub-behavior: slide selection, auto-advance, swipe.
//!
//! # Wrap strategies
//!
//! With `cloned_slides = 0` the carousel wraps by modulo: `next()` from the
//! last slide selects the first. With `cloned_slides = k` the markup carries
//! `k` trailing slides duplicating the leading ones; `next()` from the last
//! real slide activates the first clone (so the visual transition keeps moving
//! forward) and a one-shot timer snaps back to the real first slide once the
//! transition has finished. The logical index, indicators, and notifications
//! only ever see real slides.
//!
//! # Auto-advance
//!
//! One interval timer, armed idempotently. Hovering the carousel suspends it,
//! leaving resumes it. Manual navigation restarts it from zero when
//! `restart_on_manual_nav` is set, so a slide picked by hand gets a full
//! interval on screen.

use crate::bindings::{Action, Bindings};
use crate::config::CarouselConfig;
use crate::dom::{Disposition, Dom, ElementId, EventKind, PageEvent, Target};
use crate::state::{ACTIVE_CLASS, SlideSet};
use crate::timer::{Timer, TimerId};
use tracing::{debug, warn};

pub const SLIDE_SELECTOR: &str = ".carousel-slide";
pub const INDICATOR_SELECTOR: &str = ".indicator";
pub const PREV_SELECTOR: &str = ".carousel-btn.prev";
pub const NEXT_SELECTOR: &str = ".carousel-btn.next";
pub const CONTAINER_SELECTOR: &str = ".carousel-container";

/// Which way a navigation moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
    To(i64),
}

#[derive(Debug)]
pub struct Carousel {
    /// Physical slides, clones included.
    slides: SlideSet<ElementId>,
    /// Number of real slides.
    real: usize,
    indicators: Vec<ElementId>,
    config: CarouselConfig,
    autoplay: Option<TimerId>,
    held: bool,
    snap: Option<TimerId>,
    swipe_start: Option<f64>,
    changes: usize,
}

impl Carousel {
    /// Wire up the carousel found in `dom`, if any.
    ///
    /// Returns `None` when the page has no slides. Buttons, indicators, the
    /// hover container and touch support are each optional.
    pub fn mount(
        dom: &mut dyn Dom,
        timer: &mut dyn Timer,
        bindings: &mut Bindings,
        config: &CarouselConfig,
    ) -> Option<Self> {
        let handles = dom.query_all(SLIDE_SELECTOR);
        if handles.is_empty() {
            debug!("no carousel slides on page; carousel disabled");
            return None;
        }

        let clones = if config.cloned_slides >= handles.len() {
            warn!(
                cloned = config.cloned_slides,
                slides = handles.len(),
                "cloned_slides leaves no real slides; falling back to modulo wrap"
            );
            0
        } else {
            config.cloned_slides
        };
        let real = handles.len() - clones;

        let mut indicators = dom.query_all(INDICATOR_SELECTOR);
        if !indicators.is_empty() && indicators.len() != real {
            warn!(
                indicators = indicators.len(),
                slides = real,
                "indicator count does not match slide count; indicators ignored"
            );
            indicators.clear();
        }

        let initial = handles[..real]
            .iter()
            .position(|&s| dom.has_class(s, ACTIVE_CLASS))
            .unwrap_or(0);
        let slides = SlideSet::new(handles, initial)?;

        let mut carousel = Self {
            slides,
            real,
            indicators,
            config: config.clone(),
            autoplay: None,
            held: false,
            snap: None,
            swipe_start: None,
            changes: 0,
        };
        carousel.paint(dom);

        if let Some(prev) = dom.query(PREV_SELECTOR) {
            bindings.bind(dom, Target::Element(prev), EventKind::Click, Action::CarouselPrevious);
        }
        if let Some(next) = dom.query(NEXT_SELECTOR) {
            bindings.bind(dom, Target::Element(next), EventKind::Click, Action::CarouselNext);
        }
        let indicators = carousel.indicators.clone();
        for (i, indicator) in indicators.into_iter().enumerate() {
            bindings.bind(
                dom,
                Target::Element(indicator),
                EventKind::Click,
                Action::CarouselIndicator(i),
            );
        }

        if let Some(container) = dom.query(CONTAINER_SELECTOR) {
            let target = Target::Element(container);
            bindings.bind(dom, target, EventKind::PointerEnter, Action::CarouselHold);
            bindings.bind(dom, target, EventKind::PointerLeave, Action::CarouselRelease);
            if dom.supports_touch() {
                bindings.bind(dom, target, EventKind::TouchStart, Action::SwipeStart);
                bindings.bind(dom, target, EventKind::TouchMove, Action::SwipeMove);
                bindings.bind(dom, target, EventKind::TouchEnd, Action::SwipeEnd);
            }
        }

        carousel.start_auto(timer);
        Some(carousel)
    }

    /// Logical (real-slide) index.
    pub fn index(&self) -> usize {
        self.slides.current() % self.real
    }

    /// Number of real slides.
    pub fn len(&self) -> usize {
        self.real
    }

    pub fn is_empty(&self) -> bool {
        self.real == 0
    }

    pub fn is_auto_armed(&self) -> bool {
        self.autoplay.is_some()
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Slide-change notifications emitted so far.
    pub fn changes(&self) -> usize {
        self.changes
    }

    /// Select a real slide, wrapping out-of-range indices.
    pub fn go_to(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer, index: i64) {
        self.settle(timer);
        let target = index.rem_euclid(self.real as i64) as usize;
        self.commit(dom, target);
    }

    pub fn next(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer) {
        let current = self.index();
        if self.real < self.slides.len() && current == self.real - 1 {
            // Roll onto the first clone and snap back after the transition.
            self.settle(timer);
            self.commit(dom, self.real);
            self.snap = Some(timer.set_timeout(self.config.transition_ms));
        } else {
            self.go_to(dom, timer, current as i64 + 1);
        }
    }

    pub fn previous(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer) {
        let current = self.index() as i64;
        self.go_to(dom, timer, current - 1);
    }

    /// Navigation triggered by the visitor (button, indicator, key, swipe).
    pub fn navigate(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer, step: Step) {
        match step {
            Step::Next => self.next(dom, timer),
            Step::Previous => self.previous(dom, timer),
            Step::To(index) => self.go_to(dom, timer, index),
        }
        if self.config.restart_on_manual_nav && self.autoplay.is_some() {
            self.stop_auto(timer);
            self.start_auto(timer);
        }
    }

    /// Arm auto-advance. Arming an armed timer is a no-op.
    pub fn start_auto(&mut self, timer: &mut dyn Timer) {
        if !self.config.auto_play || self.held || self.autoplay.is_some() {
            return;
        }
        self.autoplay = Some(timer.set_interval(self.config.interval_ms));
    }

    pub fn stop_auto(&mut self, timer: &mut dyn Timer) {
        if let Some(id) = self.autoplay.take() {
            timer.clear(id);
        }
    }

    /// Pointer entered the hold region.
    pub fn hold(&mut self, timer: &mut dyn Timer) {
        self.held = true;
        self.stop_auto(timer);
    }

    /// Pointer left the hold region.
    pub fn release(&mut self, timer: &mut dyn Timer) {
        self.held = false;
        self.start_auto(timer);
    }

    pub fn swipe_start(&mut self, x: f64) {
        self.swipe_start = Some(x);
    }

    /// Finish a gesture. Travel at or below the threshold does nothing.
    pub fn swipe_end(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer, x: f64) {
        let Some(start) = self.swipe_start.take() else {
            return;
        };
        let delta = start - x;
        if delta.abs() <= self.config.swipe_threshold {
            return;
        }
        let step = if delta > 0.0 { Step::Next } else { Step::Previous };
        self.navigate(dom, timer, step);
    }

    /// Touch moves over the carousel must not scroll the page.
    pub fn swipe_move(&self) -> Disposition {
        Disposition::PREVENT
    }

    /// Handle a fired timer. Returns `false` if the id is not ours.
    pub fn on_timer(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer, id: TimerId) -> bool {
        if self.autoplay == Some(id) {
            self.next(dom, timer);
            true
        } else if self.snap == Some(id) {
            self.snap = None;
            self.snap_to_real(dom);
            true
        } else {
            false
        }
    }

    /// Cancel every timer; used on teardown.
    pub fn shutdown(&mut self, timer: &mut dyn Timer) {
        self.stop_auto(timer);
        if let Some(id) = self.snap.take() {
            timer.clear(id);
        }
    }

    /// Finish a pending clone snap before moving on.
    fn settle(&mut self, timer: &mut dyn Timer) {
        if let Some(id) = self.snap.take() {
            timer.clear(id);
        }
    }

    fn snap_to_real(&mut self, dom: &mut dyn Dom) {
        let physical = self.slides.current();
        if physical < self.real {
            return;
        }
        let clone = self.slides.current_handle();
        self.slides.select((physical - self.real) as i64);
        dom.remove_class(clone, ACTIVE_CLASS);
        dom.add_class(self.slides.current_handle(), ACTIVE_CLASS);
    }

    fn commit(&mut self, dom: &mut dyn Dom, physical: usize) {
        let before = self.index();
        let outgoing = self.slides.current_handle();
        if self.slides.select(physical as i64).is_none() {
            return;
        }
        dom.remove_class(outgoing, ACTIVE_CLASS);
        dom.add_class(self.slides.current_handle(), ACTIVE_CLASS);
        self.paint_indicators(dom);

        let after = self.index();
        if after != before {
            self.changes += 1;
            dom.emit(PageEvent::SlideChange {
                current_slide: after,
            });
        }
    }

    /// Make the DOM agree with the state: exactly one active slide/indicator.
    fn paint(&self, dom: &mut dyn Dom) {
        let current = self.slides.current();
        for (i, &slide) in self.slides.handles().iter().enumerate() {
            dom.set_class(slide, ACTIVE_CLASS, i == current);
        }
        self.paint_indicators(dom);
    }

    fn paint_indicators(&self, dom: &mut dyn Dom) {
        let index = self.index();
        for (i, &indicator) in self.indicators.iter().enumerate() {
            dom.set_class(indicator, ACTIVE_CLASS, i == index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixture::{PageLayout, standard_page};
    use crate::sim::{SimClock, SimDom};

    fn mounted(layout: &PageLayout, config: &CarouselConfig) -> (SimDom, SimClock, Carousel) {
        let mut dom = standard_page(layout, 1024);
        let mut clock = SimClock::new();
        let mut bindings = Bindings::new();
        let carousel = Carousel::mount(&mut dom, &mut clock, &mut bindings, config).unwrap();
        (dom, clock, carousel)
    }

    fn active_slides(dom: &SimDom) -> Vec<usize> {
        dom.query_all(SLIDE_SELECTOR)
            .into_iter()
            .enumerate()
            .filter(|(_, s)| dom.has_class(*s, ACTIVE_CLASS))
            .map(|(i, _)| i)
            .collect()
    }

    fn active_indicators(dom: &SimDom) -> Vec<usize> {
        dom.query_all(INDICATOR_SELECTOR)
            .into_iter()
            .enumerate()
            .filter(|(_, s)| dom.has_class(*s, ACTIVE_CLASS))
            .map(|(i, _)| i)
            .collect()
    }

    fn manual() -> CarouselConfig {
        CarouselConfig {
            auto_play: false,
            ..CarouselConfig::default()
        }
    }

    #[test]
    fn mount_without_slides_is_none() {
        let mut dom = SimDom::new(1024);
        let mut clock = SimClock::new();
        let mut bindings = Bindings::new();
        let carousel =
            Carousel::mount(&mut dom, &mut clock, &mut bindings, &CarouselConfig::default());
        assert!(carousel.is_none());
        assert!(bindings.is_empty());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn mount_activates_first_slide_and_indicator() {
        let (dom, _, carousel) = mounted(&PageLayout::default(), &manual());
        assert_eq!(carousel.index(), 0);
        assert_eq!(active_slides(&dom), vec![0]);
        assert_eq!(active_indicators(&dom), vec![0]);
    }

    #[test]
    fn next_three_times_visits_one_two_zero() {
        let (mut dom, mut clock, mut carousel) = mounted(&PageLayout::default(), &manual());
        let mut visited = Vec::new();
        for _ in 0..3 {
            carousel.next(&mut dom, &mut clock);
            visited.push(carousel.index());
            assert_eq!(active_slides(&dom).len(), 1);
            assert_eq!(active_indicators(&dom).len(), 1);
        }
        assert_eq!(visited, vec![1, 2, 0]);
        assert_eq!(active_slides(&dom), vec![0]);
    }

    #[test]
    fn previous_from_zero_wraps_to_last() {
        let (mut dom, mut clock, mut carousel) = mounted(&PageLayout::default(), &manual());
        carousel.previous(&mut dom, &mut clock);
        assert_eq!(carousel.index(), 2);
        assert_eq!(active_indicators(&dom), vec![2]);
    }

    #[test]
    fn go_to_wraps_out_of_range_indices() {
        let (mut dom, mut clock, mut carousel) = mounted(&PageLayout::default(), &manual());
        carousel.go_to(&mut dom, &mut clock, 7);
        assert_eq!(carousel.index(), 1);
        carousel.go_to(&mut dom, &mut clock, -1);
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn every_committed_change_emits_notification() {
        let (mut dom, mut clock, mut carousel) = mounted(&PageLayout::default(), &manual());
        carousel.next(&mut dom, &mut clock);
        carousel.go_to(&mut dom, &mut clock, 1);
        carousel.previous(&mut dom, &mut clock);
        assert_eq!(
            dom.emitted(),
            &[
                PageEvent::SlideChange { current_slide: 1 },
                PageEvent::SlideChange { current_slide: 0 },
            ]
        );
        assert_eq!(carousel.changes(), 2);
    }

    #[test]
    fn indicator_mismatch_is_ignored_not_fatal() {
        let layout = PageLayout {
            indicators: Some(2),
            ..PageLayout::default()
        };
        let (mut dom, mut clock, mut carousel) = mounted(&layout, &manual());
        carousel.next(&mut dom, &mut clock);
        assert_eq!(carousel.index(), 1);
        assert!(active_indicators(&dom).is_empty());
    }

    #[test]
    fn preexisting_active_slide_is_respected() {
        let mut dom = standard_page(&PageLayout::default(), 1024);
        let slides = dom.query_all(SLIDE_SELECTOR);
        dom.remove_class(slides[0], ACTIVE_CLASS);
        dom.add_class(slides[2], ACTIVE_CLASS);
        let mut clock = SimClock::new();
        let mut bindings = Bindings::new();
        let carousel = Carousel::mount(&mut dom, &mut clock, &mut bindings, &manual()).unwrap();
        assert_eq!(carousel.index(), 2);
        assert_eq!(active_slides(&dom), vec![2]);
    }

    #[test]
    fn auto_arm_is_idempotent() {
        let (_, mut clock, mut carousel) =
            mounted(&PageLayout::default(), &CarouselConfig::default());
        assert!(carousel.is_auto_armed());
        carousel.start_auto(&mut clock);
        carousel.start_auto(&mut clock);
        assert_eq!(clock.pending(), 1);
    }

    #[test]
    fn hold_suspends_and_release_resumes() {
        let (_, mut clock, mut carousel) =
            mounted(&PageLayout::default(), &CarouselConfig::default());
        carousel.hold(&mut clock);
        assert!(!carousel.is_auto_armed());
        // Arming while held is refused.
        carousel.start_auto(&mut clock);
        assert_eq!(clock.pending(), 0);
        carousel.release(&mut clock);
        assert!(carousel.is_auto_armed());
    }

    #[test]
    fn manual_navigation_restarts_timer() {
        let (mut dom, mut clock, mut carousel) =
            mounted(&PageLayout::default(), &CarouselConfig::default());
        clock.advance_by(4000);
        carousel.navigate(&mut dom, &mut clock, Step::Next);
        // The fresh interval is due a full period after the click.
        assert!(clock.pop_due(8999).is_none());
        let fired = clock.pop_due(9000).unwrap();
        assert!(carousel.on_timer(&mut dom, &mut clock, fired));
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn manual_navigation_keeps_phase_without_restart() {
        let config = CarouselConfig {
            restart_on_manual_nav: false,
            ..CarouselConfig::default()
        };
        let (mut dom, mut clock, mut carousel) = mounted(&PageLayout::default(), &config);
        clock.advance_by(4000);
        carousel.navigate(&mut dom, &mut clock, Step::Next);
        assert!(clock.pop_due(5000).is_some());
    }

    #[test]
    fn swipe_threshold_is_exclusive() {
        let (mut dom, mut clock, mut carousel) = mounted(&PageLayout::default(), &manual());
        carousel.swipe_start(200.0);
        carousel.swipe_end(&mut dom, &mut clock, 150.0);
        assert_eq!(carousel.index(), 0);

        carousel.swipe_start(200.0);
        carousel.swipe_end(&mut dom, &mut clock, 149.0);
        assert_eq!(carousel.index(), 1);

        carousel.swipe_start(100.0);
        carousel.swipe_end(&mut dom, &mut clock, 200.0);
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn swipe_end_without_start_is_ignored() {
        let (mut dom, mut clock, mut carousel) = mounted(&PageLayout::default(), &manual());
        carousel.swipe_end(&mut dom, &mut clock, 0.0);
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn cloned_slides_roll_forward_then_snap() {
        let layout = PageLayout {
            slides: 3,
            cloned_slides: 1,
            ..PageLayout::default()
        };
        let config = CarouselConfig {
            cloned_slides: 1,
            ..manual()
        };
        let (mut dom, mut clock, mut carousel) = mounted(&layout, &config);
        assert_eq!(carousel.len(), 3);

        carousel.go_to(&mut dom, &mut clock, 2);
        carousel.next(&mut dom, &mut clock);
        // The clone is showing, but logically we are on slide 0.
        assert_eq!(carousel.index(), 0);
        assert_eq!(active_slides(&dom), vec![3]);
        assert_eq!(active_indicators(&dom), vec![0]);

        let snap = clock.pop_due(700).unwrap();
        assert!(carousel.on_timer(&mut dom, &mut clock, snap));
        assert_eq!(active_slides(&dom), vec![0]);
        assert_eq!(
            dom.emitted().last(),
            Some(&PageEvent::SlideChange { current_slide: 0 })
        );
    }

    #[test]
    fn navigation_during_snap_settles_first() {
        let layout = PageLayout {
            slides: 3,
            cloned_slides: 1,
            ..PageLayout::default()
        };
        let config = CarouselConfig {
            cloned_slides: 1,
            ..manual()
        };
        let (mut dom, mut clock, mut carousel) = mounted(&layout, &config);
        carousel.go_to(&mut dom, &mut clock, 2);
        carousel.next(&mut dom, &mut clock);
        carousel.next(&mut dom, &mut clock);
        assert_eq!(carousel.index(), 1);
        assert_eq!(active_slides(&dom), vec![1]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn too_many_clones_falls_back_to_modulo() {
        let config = CarouselConfig {
            cloned_slides: 5,
            ..manual()
        };
        let (mut dom, mut clock, mut carousel) = mounted(&PageLayout::default(), &config);
        assert_eq!(carousel.len(), 3);
        carousel.go_to(&mut dom, &mut clock, 2);
        carousel.next(&mut dom, &mut clock);
        assert_eq!(active_slides(&dom), vec![0]);
    }

    #[test]
    fn foreign_timer_is_not_claimed() {
        let (mut dom, mut clock, mut carousel) = mounted(&PageLayout::default(), &manual());
        let other = clock.set_timeout(10);
        assert!(!carousel.on_timer(&mut dom, &mut clock, other));
    }
}
