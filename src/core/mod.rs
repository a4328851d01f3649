//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - The merge request/record/error model
//! - Approximate token estimation for split decisions
//! - Path display helpers

pub mod model;
pub mod paths;
pub mod tokenizer;
