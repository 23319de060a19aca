pub mod aggregate;
pub mod config;
pub mod error;
pub mod github;
pub mod logging;
pub mod server;
