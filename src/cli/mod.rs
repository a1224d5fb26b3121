//! Command-line interface helpers.

pub mod commands;
