//! Startup reconciliation between the local store and the remote authority

pub mod engine;

pub use engine::{RunMode, SyncEngine, SyncReport};
