//! CLI module for layerbudget
//!
//! Handles command-line argument parsing and terminal rendering.

pub mod args;
pub mod report;

pub use args::{Args, Commands, Verbosity};
