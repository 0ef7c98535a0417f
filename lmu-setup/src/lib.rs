//! Command-line support for the Le Mans Ultimate setup engine.
//!
//! The engine in `setup-core` never touches the filesystem. This crate adds
//! the pieces that do, plus terminal rendering:
//!
//! - [`config`] — load reference tables, with per-file overrides from a directory
//! - [`scan`] — index the setups of the simulator's Settings directory
//! - [`report`] — colored text output for every subcommand

pub mod config;
pub mod report;
pub mod scan;
