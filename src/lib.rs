// Library crate shared by the binary and the integration tests.

pub mod audit;
pub mod config;
pub mod error;
pub mod probe;
pub mod routes;
pub mod screenshots;
pub mod server;
pub mod state;
