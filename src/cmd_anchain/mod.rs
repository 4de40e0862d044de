//! Subcommand modules for the `anchain` binary.

pub mod agp;
pub mod hits;
