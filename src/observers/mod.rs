//! Passive interaction observers.
//!
//! Each observer turns a host signal into an event-specific payload and a
//! guard decision; the session wires their output into the emitter. All
//! guard state lives on the observer structs, owned by the session.

pub mod click;
pub mod form;
pub mod frame;
pub mod lifecycle;
pub mod scroll;

pub use click::{classify_click, ClickCategory, ClickTarget};
pub use form::{FormMeta, FormObserver};
pub use lifecycle::LifecycleObserver;
pub use scroll::{ScrollObserver, SCROLL_MILESTONES};
