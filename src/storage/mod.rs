//! Storage layer for cardbank
//!
//! Three pieces, composed bottom-up:
//!
//! - [`card_file::CardStore`]: one encrypted file per account on disk
//! - [`hash_index::HashIndex`]: chained hash table caching loaded accounts
//! - [`local::LocalStore`]: write-through façade unifying the two

pub mod card_file;
pub mod hash_index;
pub mod local;

pub use card_file::CardStore;
pub use hash_index::HashIndex;
pub use local::LocalStore;
