//! autobindings CLI library.
//!
//! Exposes the command implementations and output formatters so they can be
//! tested without spawning the binary.

pub mod commands;
pub mod formatters;
