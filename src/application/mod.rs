//! Application layer: the form engine and the workflows around it.
//!
//! The engine owns the per-user sessions and drives them through the domain
//! rules; commits go out through the [`RecordSink`] and [`Notifier`] seams,
//! which the infrastructure layer implements.

pub mod clock;
pub mod commit;
pub mod events;
pub mod form;
pub mod prompts;
pub mod registry;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::{Clock, SystemClock};
pub use commit::{CommitError, CommitPipeline, CommitReceipt, Notifier, NotifyError, RecordSink, SinkError};
pub use events::{ChatInfo, Inbound, Keyboard, MenuAction, Prompt};
pub use form::{FormEngine, FormError};
pub use registry::SessionRegistry;
pub use state::*;
