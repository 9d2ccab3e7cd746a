pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod format;
pub mod graph;
pub mod session;

pub use error::GraphError;
