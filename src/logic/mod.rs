//! Business Logic
//!
//! This module contains pure business logic functions that can be unit tested:
//! - errors: Error message extraction and notification text
//! - formatting: Sizes, scores and progress labels
//! - preview: Preview list caps, image types, URL escaping
//! - selection: Glob expansion of candidate images

pub mod errors;
pub mod formatting;
pub mod preview;
pub mod selection;
