//! Change propagation between open displays.
//!
//! After any state-changing write, the writer publishes a typed event on a
//! best-effort, at-most-once, unordered channel scoped to the local
//! session. Receivers invalidate and re-read the store; nothing in the
//! engine depends on an event being delivered.

pub mod channel;
pub mod models;

pub use channel::{EventBus, EventSubscriber};
pub use models::{ChangeEvent, EventKind};
