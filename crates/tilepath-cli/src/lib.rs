//! Tilepath CLI library.
//!
//! This crate provides the subcommand handlers for the `tilepath` binary,
//! along with terminal styling and output formatting.

pub mod commands;
pub mod output;
pub mod terminal;
