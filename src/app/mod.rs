//! App Orchestration Methods
//!
//! This module contains App implementation methods grouped by domain.
//! Each submodule orchestrates between:
//! - Workflow state (in src/workflow.rs and src/model/)
//! - The background API service
//! - Logic (pure functions in src/logic/)
//!
//! Methods are kept as `impl App` but organized by functional domain.

pub(crate) mod downloads;
pub(crate) mod preview;
pub(crate) mod selection;
