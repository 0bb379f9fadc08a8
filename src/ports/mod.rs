//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the generators and an external
//! system. Implementations live in `src/adapters/`.

pub mod command_line;

pub use command_line::{Arg, Artifact, CommandArgs, CommandFuture, CommandLine, ImageAttributes};
