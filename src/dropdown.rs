//! Navigation dropdowns with viewport-dependent interaction.
//!
//! | Mode | Open | Close | Siblings |
//! |------|------|-------|----------|
//! | desktop | pointer enters the dropdown | pointer leaves it | independent |
//! | mobile | toggle activation | toggle again, or click outside | accordion |
//!
//! Switching modes goes through [`Dropdowns::bind`], which detaches every
//! dropdown listener before attaching the new mode's set, so repeated
//! breakpoint crossings never accumulate handlers.

use crate::bindings::{Action, Bindings, Group};
use crate::dom::{Disposition, Dom, ElementId, EventKind, Target};
use crate::state::{ACTIVE_CLASS, Accordion, ViewportMode};
use tracing::debug;

pub const DROPDOWN_SELECTOR: &str = ".dropdown";
pub const DROPDOWN_TOGGLE_SELECTOR: &str = ".dropdown-toggle";
pub const DROPDOWN_MENU_SELECTOR: &str = ".dropdown-menu";

#[derive(Debug, Clone, Copy)]
struct DropdownParts {
    root: ElementId,
    toggle: ElementId,
}

#[derive(Debug)]
pub struct Dropdowns {
    items: Vec<DropdownParts>,
    state: Accordion,
    mode: ViewportMode,
}

impl Dropdowns {
    /// Collect complete dropdowns (root + toggle + menu) and bind them for
    /// `mode`. Returns `None` when there are none.
    pub fn mount(dom: &mut dyn Dom, bindings: &mut Bindings, mode: ViewportMode) -> Option<Self> {
        let items: Vec<DropdownParts> = dom
            .query_all(DROPDOWN_SELECTOR)
            .into_iter()
            .filter_map(|root| {
                let toggle = dom.query_within(root, DROPDOWN_TOGGLE_SELECTOR);
                let menu = dom.query_within(root, DROPDOWN_MENU_SELECTOR);
                match (toggle, menu) {
                    (Some(toggle), Some(_)) => Some(DropdownParts { root, toggle }),
                    _ => {
                        debug!(?root, "dropdown without toggle or menu skipped");
                        None
                    }
                }
            })
            .collect();
        if items.is_empty() {
            debug!("no dropdowns on page");
            return None;
        }

        let mut dropdowns = Self {
            state: Accordion::new(items.len()),
            items,
            mode,
        };
        dropdowns.bind(dom, bindings, mode);
        Some(dropdowns)
    }

    pub fn mode(&self) -> ViewportMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn open_indices(&self) -> Vec<usize> {
        self.state.open_indices()
    }

    /// Close everything and (re)attach listeners for `mode`.
    pub fn bind(&mut self, dom: &mut dyn Dom, bindings: &mut Bindings, mode: ViewportMode) {
        let removed = bindings.unbind_group(dom, Group::Dropdown);
        self.close_all(dom);
        self.mode = mode;

        match mode {
            ViewportMode::Desktop => {
                for (i, parts) in self.items.iter().enumerate() {
                    let target = Target::Element(parts.root);
                    bindings.bind(dom, target, EventKind::PointerEnter, Action::DropdownEnter(i));
                    bindings.bind(dom, target, EventKind::PointerLeave, Action::DropdownLeave(i));
                }
            }
            ViewportMode::Mobile => {
                for (i, parts) in self.items.iter().enumerate() {
                    bindings.bind(
                        dom,
                        Target::Element(parts.toggle),
                        EventKind::Click,
                        Action::DropdownToggle(i),
                    );
                }
                bindings.bind(
                    dom,
                    Target::Document,
                    EventKind::Click,
                    Action::DropdownOutsideClick,
                );
            }
        }
        debug!(%mode, removed, bound = bindings.count(Group::Dropdown), "dropdowns bound");
    }

    /// Desktop hover-in.
    pub fn enter(&mut self, dom: &mut dyn Dom, index: usize) {
        self.state.set(index, true);
        self.paint(dom);
    }

    /// Desktop hover-out.
    pub fn leave(&mut self, dom: &mut dyn Dom, index: usize) {
        self.state.set(index, false);
        self.paint(dom);
    }

    /// Mobile toggle activation: accordion flip. The click neither follows
    /// the toggle's link nor reaches the outside-click rule.
    pub fn toggle(&mut self, dom: &mut dyn Dom, index: usize) -> Disposition {
        self.state.toggle_exclusive(index);
        self.paint(dom);
        Disposition::CAPTURE
    }

    /// Mobile document click: close every dropdown the click is not inside.
    pub fn outside_click(&mut self, dom: &mut dyn Dom, target: Option<ElementId>) {
        for (i, parts) in self.items.iter().enumerate() {
            let inside = target.is_some_and(|t| dom.contains(parts.root, t));
            if !inside {
                self.state.set(i, false);
            }
        }
        self.paint(dom);
    }

    pub fn close_all(&mut self, dom: &mut dyn Dom) {
        self.state.close_all();
        self.paint(dom);
    }

    fn paint(&self, dom: &mut dyn Dom) {
        for (i, parts) in self.items.iter().enumerate() {
            dom.set_class(parts.root, ACTIVE_CLASS, self.state.is_open(i));
        }
    }
}
