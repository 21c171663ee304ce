//! Listener registry.
//!
//! Every listener the controller attaches is recorded here together with the
//! [`Action`] it stands for. Incoming events are resolved by [`ListenerId`],
//! and whole feature groups can be detached by id without touching the
//! markup, which is what makes dropdown rebinding on a breakpoint crossing
//! exact: the old mode's listeners are removed before the new ones go in.

use crate::dom::{Dom, EventKind, ListenerId, Target};

/// What a registered listener does when its event arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CarouselPrevious,
    CarouselNext,
    CarouselIndicator(usize),
    /// Pointer entered the carousel: suspend auto-advance.
    CarouselHold,
    /// Pointer left the carousel: resume auto-advance.
    CarouselRelease,
    SwipeStart,
    SwipeMove,
    SwipeEnd,
    MenuToggle,
    SubmenuToggle(usize),
    MenuOutsideClick,
    DropdownEnter(usize),
    DropdownLeave(usize),
    DropdownToggle(usize),
    DropdownOutsideClick,
    Keyboard,
    Resize,
    Scroll,
}

/// Feature a listener belongs to, for group detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Carousel,
    Menu,
    Dropdown,
    Global,
}

impl Action {
    pub fn group(self) -> Group {
        match self {
            Action::CarouselPrevious
            | Action::CarouselNext
            | Action::CarouselIndicator(_)
            | Action::CarouselHold
            | Action::CarouselRelease
            | Action::SwipeStart
            | Action::SwipeMove
            | Action::SwipeEnd => Group::Carousel,
            Action::MenuToggle | Action::SubmenuToggle(_) | Action::MenuOutsideClick => {
                Group::Menu
            }
            Action::DropdownEnter(_)
            | Action::DropdownLeave(_)
            | Action::DropdownToggle(_)
            | Action::DropdownOutsideClick => Group::Dropdown,
            Action::Keyboard | Action::Resize | Action::Scroll => Group::Global,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    id: ListenerId,
    action: Action,
}

/// Registered listeners in registration order.
#[derive(Debug, Default)]
pub struct Bindings {
    entries: Vec<Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener on the host and remember what it is for.
    pub fn bind(
        &mut self,
        dom: &mut dyn Dom,
        target: Target,
        kind: EventKind,
        action: Action,
    ) -> ListenerId {
        let id = dom.listen(target, kind);
        self.entries.push(Binding { id, action });
        id
    }

    pub fn action(&self, id: ListenerId) -> Option<Action> {
        self.entries.iter().find(|b| b.id == id).map(|b| b.action)
    }

    /// Detach every listener in `group`. Returns how many were removed.
    pub fn unbind_group(&mut self, dom: &mut dyn Dom, group: Group) -> usize {
        let before = self.entries.len();
        self.entries.retain(|b| {
            if b.action.group() == group {
                dom.unlisten(b.id);
                false
            } else {
                true
            }
        });
        before - self.entries.len()
    }

    /// Detach everything.
    pub fn unbind_all(&mut self, dom: &mut dyn Dom) {
        for binding in self.entries.drain(..) {
            dom.unlisten(binding.id);
        }
    }

    pub fn count(&self, group: Group) -> usize {
        self.entries
            .iter()
            .filter(|b| b.action.group() == group)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
