//! Hamburger menu and nested submenus.
//!
//! The menu is a single open flag mirrored onto the nav container and its
//! trigger. Submenus form one accordion: opening a submenu closes its
//! siblings, and closing the menu closes every submenu.
//!
//! Outside clicks are judged by two independent rules, both evaluated on
//! every document click:
//!
//! 1. outside both the nav container and the trigger → close the menu;
//! 2. outside the trigger → close each submenu the click did not land in.

use crate::bindings::{Action, Bindings};
use crate::dom::{Disposition, Dom, ElementId, EventKind, Target};
use crate::state::{ACTIVE_CLASS, Accordion};
use tracing::debug;

pub const TOGGLE_SELECTOR: &str = ".mobile-menu-toggle";
pub const NAV_SELECTOR: &str = ".main-nav";
pub const SUBMENU_SELECTOR: &str = ".has-submenu";
pub const SUBMENU_LINK_SELECTOR: &str = ".submenu-link";

#[derive(Debug, Clone, Copy)]
struct MenuParts {
    trigger: ElementId,
    container: ElementId,
}

#[derive(Debug)]
pub struct Menu {
    parts: Option<MenuParts>,
    open: bool,
    submenus: Vec<ElementId>,
    submenu_state: Accordion,
}

impl Menu {
    /// Wire up the menu and submenus. Returns `None` when the page has
    /// neither a complete menu (trigger + container) nor any submenu.
    pub fn mount(dom: &mut dyn Dom, bindings: &mut Bindings) -> Option<Self> {
        let parts = match (dom.query(TOGGLE_SELECTOR), dom.query(NAV_SELECTOR)) {
            (Some(trigger), Some(container)) => Some(MenuParts { trigger, container }),
            _ => {
                debug!("menu trigger or container missing; menu disabled");
                None
            }
        };

        let mut submenus = Vec::new();
        for item in dom.query_all(SUBMENU_SELECTOR) {
            match dom.query_within(item, SUBMENU_LINK_SELECTOR) {
                Some(link) => {
                    bindings.bind(
                        dom,
                        Target::Element(link),
                        EventKind::Click,
                        Action::SubmenuToggle(submenus.len()),
                    );
                    submenus.push(item);
                }
                None => debug!(?item, "submenu without a link skipped"),
            }
        }

        if parts.is_none() && submenus.is_empty() {
            return None;
        }

        if let Some(parts) = parts {
            bindings.bind(
                dom,
                Target::Element(parts.trigger),
                EventKind::Click,
                Action::MenuToggle,
            );
        }
        bindings.bind(dom, Target::Document, EventKind::Click, Action::MenuOutsideClick);

        let menu = Self {
            parts,
            open: false,
            submenu_state: Accordion::new(submenus.len()),
            submenus,
        };
        menu.paint(dom);
        menu.paint_submenus(dom);
        Some(menu)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn has_menu(&self) -> bool {
        self.parts.is_some()
    }

    pub fn open_submenus(&self) -> Vec<usize> {
        self.submenu_state.open_indices()
    }

    pub fn submenu_count(&self) -> usize {
        self.submenus.len()
    }

    /// Trigger activation. Stops propagation so the document-level outside
    /// click rule never sees the same click.
    pub fn toggle(&mut self, dom: &mut dyn Dom) -> Disposition {
        if self.parts.is_none() {
            return Disposition::PASS;
        }
        if self.open {
            self.close(dom);
        } else {
            self.open = true;
            self.paint(dom);
        }
        Disposition::STOP
    }

    /// Close the menu and every submenu.
    pub fn close(&mut self, dom: &mut dyn Dom) {
        self.open = false;
        self.paint(dom);
        self.close_submenus(dom);
    }

    pub fn close_submenus(&mut self, dom: &mut dyn Dom) {
        self.submenu_state.close_all();
        self.paint_submenus(dom);
    }

    /// Submenu link activation: accordion flip, link navigation suppressed.
    pub fn toggle_submenu(&mut self, dom: &mut dyn Dom, index: usize) -> Disposition {
        self.submenu_state.toggle_exclusive(index);
        self.paint_submenus(dom);
        Disposition::PREVENT
    }

    /// Document-level click; see the module docs for the two rules.
    pub fn outside_click(&mut self, dom: &mut dyn Dom, target: Option<ElementId>) {
        let in_trigger = self
            .parts
            .is_some_and(|p| lands_in(&*dom, p.trigger, target));

        if let Some(parts) = self.parts
            && self.open
            && !in_trigger
            && !lands_in(&*dom, parts.container, target)
        {
            self.close(dom);
        }

        if !in_trigger {
            for (i, &item) in self.submenus.iter().enumerate() {
                if self.submenu_state.is_open(i) && !lands_in(&*dom, item, target) {
                    self.submenu_state.set(i, false);
                }
            }
            self.paint_submenus(dom);
        }
    }

    fn paint(&self, dom: &mut dyn Dom) {
        if let Some(parts) = self.parts {
            dom.set_class(parts.container, ACTIVE_CLASS, self.open);
            dom.set_class(parts.trigger, ACTIVE_CLASS, self.open);
            dom.set_attribute(
                parts.trigger,
                "aria-expanded",
                if self.open { "true" } else { "false" },
            );
        }
    }

    fn paint_submenus(&self, dom: &mut dyn Dom) {
        for (i, &item) in self.submenus.iter().enumerate() {
            dom.set_class(item, ACTIVE_CLASS, self.submenu_state.is_open(i));
        }
    }
}

fn lands_in(dom: &dyn Dom, container: ElementId, target: Option<ElementId>) -> bool {
    target.is_some_and(|t| dom.contains(container, t))
}
