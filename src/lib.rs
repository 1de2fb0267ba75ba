//! `argspec` - declarative command-line commands
//!
//! This library declares positional arguments, flags and subcommand trees,
//! validates the declarations up front, binds raw tokens to typed values and
//! dispatches to a handler or a subcommand.
//!
//! ```
//! use argspec::{ArgOptions, Command, from_str, required};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let add = Command::<i64>::builder("add")
//!     .argument(from_str::<i64>().required("left"))
//!     .argument(from_str::<i64>().optional(ArgOptions::<i64>::named("right").default_value(1)))
//!     .handler_sync(|invocation| {
//!         let left = invocation.args.get::<i64>(0).copied().unwrap_or_default();
//!         let right = invocation.args.get::<i64>(1).copied().unwrap_or_default();
//!         Ok(left + right)
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(add.exec(["41"]).await.unwrap(), Some(42));
//! # });
//! ```

pub mod args;
pub mod cli;
pub mod error;
pub mod system;
pub mod utils;

pub use args::{
    ArgKind, ArgOptions, Argument, ArgumentList, BoundArguments, Choices, Value, from_str,
    max_tokens, optional, path, path_with_home, required, rest, string, validate_arguments,
};
pub use clap::{Arg, ArgAction};
pub use cli::{Command, CommandBuilder, Context, Flags, Handler, Invocation};
pub use error::ArgError;
pub use futures::future::{BoxFuture, FutureExt};
