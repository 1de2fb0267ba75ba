//! Positional argument module
//!
//! Declares argument shapes, validates their ordering and binds raw tokens
//! to typed values.

pub mod argument;
pub mod binder;
pub mod list;
pub mod validation;

pub use argument::*;
pub use binder::BoundArguments;
pub use list::ArgumentList;
pub use validation::{max_tokens, validate_arguments};
