//! Domain types and models

pub mod actor;
pub mod event;

pub use actor::{Actor, ActorRole};
pub use event::{
    CanonicalEvent, EventKind, EventOrigin, EventPatch, LocalEventDraft, RawExternalEvent,
    SyncReport,
};
