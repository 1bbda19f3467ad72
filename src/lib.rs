//! Timetable - class scheduling with role-gated editing
//!
//! This is the library interface for Timetable: the signed-token codec and
//! role gate, the class schedule, the book catalog and the web UI that ties
//! them together.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod schedule;
pub mod ui;

pub use config::Config;
pub use error::Error;
pub use library::Library;
pub use schedule::Schedule;
