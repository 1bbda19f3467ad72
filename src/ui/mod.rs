//! Web UI rendering

mod pages;

pub use pages::*;
