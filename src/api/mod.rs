//! HTTP server and route handlers

pub mod routes;
pub mod server;

pub use server::*;
