//! Command-line interface module
//!
//! Commands, flag parsing and the per-invocation context

pub mod command;
pub mod context;
pub mod flags;

pub use command::*;
pub use context::*;
pub use flags::Flags;
