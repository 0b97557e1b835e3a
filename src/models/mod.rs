//! Core data models for cardbank

pub mod account;
pub mod ids;

pub use account::{Account, PASSWORD_MAX, PASSWORD_MIN, PASSWORD_SENTINEL};
pub use ids::AccountId;
