//! Remote account authority client
//!
//! The core consumes the remote service through the narrow [`RemoteClient`]
//! trait; [`client::HttpRemoteClient`] speaks the JSON-over-HTTP(S) protocol
//! the authority implements. Passwords never cross the wire.

pub mod client;
pub mod protocol;

pub use client::{HttpRemoteClient, RemoteClient};
pub use protocol::RemoteAccount;
