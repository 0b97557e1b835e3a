//! Service layer for cardbank
//!
//! Business logic on top of the local store: password checks, balance rules,
//! and best-effort mirroring of successful mutations to the remote authority.

pub mod teller;

pub use teller::Teller;
