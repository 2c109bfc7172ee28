//! Face Sorter TUI Library
//!
//! Exposes modules for testing

pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod services;
pub mod workflow;
