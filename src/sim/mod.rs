//! In-memory host for the controller.
//!
//! [`SimDom`] and [`SimClock`] implement the DOM and timer collaborators;
//! [`Page`] boots a [`Site`](crate::site::Site) on them and dispatches events
//! the way a browser would. [`fixture`] builds the canonical page markup.

pub mod clock;
pub mod dom;
pub mod fixture;
pub mod page;

pub use clock::SimClock;
pub use dom::SimDom;
pub use page::Page;
