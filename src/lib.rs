pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod graphql;
pub mod logging;
pub mod metrics;
pub mod server;
pub mod store;
