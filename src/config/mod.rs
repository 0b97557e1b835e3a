//! Configuration and path management for cardbank

pub mod paths;
pub mod settings;

pub use paths::CardPaths;
pub use settings::ServerSettings;
