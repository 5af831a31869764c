//! Human-readable output for the non-server commands

pub mod console;
