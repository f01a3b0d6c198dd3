//! Command implementations for the autobindings CLI.
//!
//! Each command resolves its inputs, runs the generator, and formats its
//! summary according to the requested output format.

pub mod generate;
