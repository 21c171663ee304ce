//! The presentation-state controller.
//!
//! Owns every piece of interactive page state (carousel, menu, submenus,
//! dropdowns, viewport mode, header scroll marker) and routes host events to
//! them through the listener registry. Each feature mounts independently: a
//! page without a carousel still gets a working menu, and so on.
//!
//! # Viewport changes
//!
//! Resizes recompute [`ViewportMode`]. In desktop mode the mobile menu is
//! always closed. Crossing the breakpoint in either direction additionally
//! closes the menu with its submenus and rebinds the dropdowns for the new
//! mode (which closes them too).

use crate::bindings::{Action, Bindings, Group};
use crate::carousel::{Carousel, Step};
use crate::config::ControllerConfig;
use crate::dom::{Disposition, Dom, ElementId, Event, EventDetail, EventKind, Key, Target};
use crate::dropdown::Dropdowns;
use crate::menu::Menu;
use crate::state::ViewportMode;
use crate::timer::{Debounce, Throttle, Timer, TimerId};
use tracing::{debug, info};

pub const HEADER_SELECTOR: &str = ".main-header";
pub const SCROLLED_CLASS: &str = "scrolled";

#[derive(Debug)]
pub struct PresentationStateController {
    config: ControllerConfig,
    bindings: Bindings,
    mode: ViewportMode,
    carousel: Option<Carousel>,
    menu: Option<Menu>,
    dropdowns: Option<Dropdowns>,
    header: Option<ElementId>,
    scroll_throttle: Throttle,
    resize_debounce: Debounce,
}

impl PresentationStateController {
    /// Mount every feature present in `dom` and attach the global listeners.
    pub fn init(dom: &mut dyn Dom, timer: &mut dyn Timer, config: ControllerConfig) -> Self {
        let mode = ViewportMode::from_width(dom.viewport_width(), config.viewport.breakpoint);
        let mut bindings = Bindings::new();

        bindings.bind(dom, Target::Window, EventKind::Resize, Action::Resize);
        bindings.bind(dom, Target::Document, EventKind::KeyDown, Action::Keyboard);

        let header = dom.query(HEADER_SELECTOR);
        if header.is_some() {
            bindings.bind(dom, Target::Window, EventKind::Scroll, Action::Scroll);
        }

        let carousel = Carousel::mount(dom, timer, &mut bindings, &config.carousel);
        let menu = Menu::mount(dom, &mut bindings);
        let dropdowns = Dropdowns::mount(dom, &mut bindings, mode);

        let controller = Self {
            scroll_throttle: Throttle::new(config.header.scroll_throttle_ms),
            resize_debounce: Debounce::new(config.viewport.resize_debounce_ms),
            config,
            bindings,
            mode,
            carousel,
            menu,
            dropdowns,
            header,
        };
        controller.update_header(dom);

        info!(
            %mode,
            carousel = controller.carousel.is_some(),
            menu = controller.menu.is_some(),
            dropdowns = controller.dropdowns.as_ref().map_or(0, Dropdowns::len),
            listeners = controller.bindings.len(),
            "controller initialized"
        );
        controller
    }

    /// Detach every listener and cancel every timer.
    pub fn teardown(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer) {
        self.bindings.unbind_all(dom);
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.shutdown(timer);
        }
        self.scroll_throttle.cancel(timer);
        self.resize_debounce.cancel(timer);
    }

    /// Tear down and mount again from the current document.
    pub fn reinit(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer) {
        self.teardown(dom, timer);
        *self = Self::init(dom, timer, self.config.clone());
    }

    pub fn mode(&self) -> ViewportMode {
        self.mode
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn dropdowns(&self) -> Option<&Dropdowns> {
        self.dropdowns.as_ref()
    }

    pub fn listener_count(&self, group: Group) -> usize {
        self.bindings.count(group)
    }

    /// Route an event delivered to one of our listeners.
    pub fn handle_event(
        &mut self,
        dom: &mut dyn Dom,
        timer: &mut dyn Timer,
        event: &Event,
    ) -> Disposition {
        let Some(action) = self.bindings.action(event.listener) else {
            debug!(listener = ?event.listener, kind = %event.kind, "event for unknown listener");
            return Disposition::PASS;
        };

        match action {
            Action::CarouselPrevious => self.navigate(dom, timer, Step::Previous),
            Action::CarouselNext => self.navigate(dom, timer, Step::Next),
            Action::CarouselIndicator(i) => self.navigate(dom, timer, Step::To(i as i64)),
            Action::CarouselHold => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.hold(timer);
                }
            }
            Action::CarouselRelease => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.release(timer);
                }
            }
            Action::SwipeStart => {
                if let (Some(carousel), EventDetail::Touch { x }) =
                    (self.carousel.as_mut(), &event.detail)
                {
                    carousel.swipe_start(*x);
                }
            }
            Action::SwipeMove => {
                if let Some(carousel) = self.carousel.as_ref() {
                    return carousel.swipe_move();
                }
            }
            Action::SwipeEnd => {
                if let (Some(carousel), EventDetail::Touch { x }) =
                    (self.carousel.as_mut(), &event.detail)
                {
                    carousel.swipe_end(dom, timer, *x);
                }
            }
            Action::MenuToggle => {
                if let Some(menu) = self.menu.as_mut() {
                    return menu.toggle(dom);
                }
            }
            Action::SubmenuToggle(i) => {
                if let Some(menu) = self.menu.as_mut() {
                    return menu.toggle_submenu(dom, i);
                }
            }
            Action::MenuOutsideClick => {
                if let Some(menu) = self.menu.as_mut() {
                    menu.outside_click(dom, event.target);
                }
            }
            Action::DropdownEnter(i) => {
                if let Some(dropdowns) = self.dropdowns.as_mut() {
                    dropdowns.enter(dom, i);
                }
            }
            Action::DropdownLeave(i) => {
                if let Some(dropdowns) = self.dropdowns.as_mut() {
                    dropdowns.leave(dom, i);
                }
            }
            Action::DropdownToggle(i) => {
                if let Some(dropdowns) = self.dropdowns.as_mut() {
                    return dropdowns.toggle(dom, i);
                }
            }
            Action::DropdownOutsideClick => {
                if let Some(dropdowns) = self.dropdowns.as_mut() {
                    dropdowns.outside_click(dom, event.target);
                }
            }
            Action::Keyboard => {
                if let EventDetail::Key(key) = &event.detail {
                    self.on_key(dom, timer, key);
                }
            }
            Action::Resize => {
                if self.resize_debounce.call(timer) {
                    self.apply_viewport(dom);
                }
            }
            Action::Scroll => {
                if self.scroll_throttle.call(timer) {
                    self.update_header(dom);
                }
            }
        }
        Disposition::PASS
    }

    /// Handle a fired timer. Returns `false` if no feature owns it.
    pub fn on_timer(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer, id: TimerId) -> bool {
        if let Some(carousel) = self.carousel.as_mut()
            && carousel.on_timer(dom, timer, id)
        {
            return true;
        }
        if self.resize_debounce.fire(id) {
            self.apply_viewport(dom);
            return true;
        }
        if self.scroll_throttle.fire(id) {
            self.update_header(dom);
            return true;
        }
        false
    }

    fn navigate(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer, step: Step) {
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.navigate(dom, timer, step);
        }
    }

    fn on_key(&mut self, dom: &mut dyn Dom, timer: &mut dyn Timer, key: &Key) {
        match key {
            Key::ArrowLeft => self.navigate(dom, timer, Step::Previous),
            Key::ArrowRight => self.navigate(dom, timer, Step::Next),
            Key::Escape => {
                if let Some(menu) = self.menu.as_mut() {
                    menu.close(dom);
                }
            }
            Key::Other(_) => {}
        }
    }

    fn apply_viewport(&mut self, dom: &mut dyn Dom) {
        let mode = ViewportMode::from_width(dom.viewport_width(), self.config.viewport.breakpoint);
        let crossed = mode != self.mode;

        if (crossed || !mode.is_mobile())
            && let Some(menu) = self.menu.as_mut()
        {
            menu.close(dom);
        }

        if crossed {
            info!(from = %self.mode, to = %mode, "viewport mode changed");
            self.mode = mode;
            if let Some(dropdowns) = self.dropdowns.as_mut() {
                dropdowns.bind(dom, &mut self.bindings, mode);
            }
        }
    }

    fn update_header(&self, dom: &mut dyn Dom) {
        if let Some(header) = self.header {
            let scrolled = dom.scroll_y() > self.config.header.scrolled_offset;
            dom.set_class(header, SCROLLED_CLASS, scrolled);
        }
    }
}
