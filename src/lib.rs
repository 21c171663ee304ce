//! # Site Controls
//!
//! The interactive presentation state of a single-page marketing site: a
//! hero carousel, a hamburger menu with nested submenus, navigation dropdowns
//! that behave differently on desktop and mobile, a header that reacts to
//! scrolling, reveal-on-scroll animation state and deferred image loading.
//!
//! # Architecture: State Behind Two Collaborators
//!
//! The controller never touches a browser. Everything it needs from the host
//! goes through two traits:
//!
//! ```text
//!   host page ──events──▶  Site / PresentationStateController
//!       ▲                        │
//!       └──── Dom (classes, listeners, observers) + Timer ◀┘
//! ```
//!
//! - [`dom::Dom`]: selector lookup, class and attribute mutation, listener
//!   registration, viewport geometry, intersection observation, custom events.
//! - [`timer::Timer`]: cancelable interval and one-shot callbacks.
//!
//! The host delivers events by listener id and timers by timer id; the
//! controller answers with a [`dom::Disposition`]. The [`sim`] module is an
//! in-memory host, so every transition is tested without a browser, and the
//! CLI replays scripted interactions against it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | DOM collaborator trait, handles, events, dispositions |
//! | [`timer`] | Timer collaborator trait, debounce and throttle |
//! | [`state`] | Pure state: viewport mode, slide set, accordion |
//! | [`bindings`] | Listener registry with per-feature detach |
//! | [`carousel`] | Slides, auto-advance, swipe, cloned-slide looping |
//! | [`menu`] | Hamburger menu and submenu accordion |
//! | [`dropdown`] | Hover (desktop) / click (mobile) dropdowns |
//! | [`controller`] | Event routing, keyboard, resize, header scroll |
//! | [`lazy`] | Deferred image loading |
//! | [`reveal`] | Reveal-on-scroll state classes |
//! | [`diagnostics`] | Load metrics and fault logging |
//! | [`site`] | Page bootstrap wiring everything together |
//! | [`sim`] | In-memory DOM, virtual clock, event dispatch, page fixture |
//! | [`script`] | Interaction scripts replayed against [`sim::Page`] |
//! | [`config`] | `site-controls.toml` loading, merging, validation |
//! | [`output`] | CLI output: trace text, config listing, HTML report |
//!
//! # Design Decisions
//!
//! ## State Classes Only
//!
//! Open/closed and active/inactive are expressed purely as the `active`
//! class (plus `scrolled`, `revealed`, `loaded`). The controller sets no
//! visual properties; stylesheets react to the classes.
//!
//! ## Explicit Listener Bookkeeping
//!
//! Every listener the controller attaches is recorded with the action it
//! triggers and the feature that owns it. Switching dropdowns between hover
//! and click mode detaches exactly the dropdown group before attaching the
//! new set, so crossing the breakpoint any number of times never leaves a
//! stale or duplicate handler.
//!
//! ## Nothing Is Fatal
//!
//! Missing markup disables one feature and is logged at `debug`. Out-of-range
//! slide indices wrap. Page faults are logged. One broken feature never stops
//! the others from mounting.

pub mod bindings;
pub mod carousel;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod dom;
pub mod dropdown;
pub mod lazy;
pub mod menu;
pub mod output;
pub mod reveal;
pub mod script;
pub mod sim;
pub mod site;
pub mod state;
pub mod timer;
