// Library exports for healthlog
// This allows integration tests to drive the router and the stores directly

pub mod auth;
pub mod chart;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod forms;
pub mod routes;
pub mod state;
