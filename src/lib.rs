// Library exports for the writers hub.
// The binary and the integration tests both build on these modules.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod format;
pub mod gate;
pub mod graphql;
pub mod paths;
pub mod posts;
pub mod routes;
pub mod session;
pub mod state;
