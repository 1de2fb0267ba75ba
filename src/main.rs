//! # `argspec`
//!
//! A small command-line tool built on the `argspec` library. It exists to show
//! (and exercise) argument declarations, choices, defaults, rest arguments,
//! nested subcommands and the per-invocation context.
//!
//! ## Usage
//!
//! ```sh
//! argspec greet Ada               # Hello, Ada!
//! argspec greet --shout Ada Hi    # HI, ADA!
//! argspec sum 1 2 -3              # 0
//! argspec pick green              # green
//! argspec where ~/notes           # /home/you/notes
//! argspec dirs home               # /home/you
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use anyhow::anyhow;
use argspec::error::{ArgError, report};
use argspec::{
    Arg, ArgAction, ArgOptions, Command, CommandBuilder, FutureExt as _, from_str, optional, path,
    required,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn greet() -> CommandBuilder<String> {
    Command::builder("greet")
        .about("Greet someone")
        .argument(required(("name", "Who to greet")))
        .argument(optional(
            ArgOptions::<String>::named("greeting")
                .description("Greeting to use")
                .default_value("Hello".to_owned()),
        ))
        .flag(
            Arg::new("shout")
                .short('s')
                .long("shout")
                .action(ArgAction::SetTrue)
                .env("ARGSPEC_SHOUT")
                .help("Print the greeting in upper case"),
        )
        .handler_sync(|invocation| {
            let name = invocation
                .args
                .value_of::<String>("name")
                .ok_or_else(|| anyhow!("name was not bound"))?;
            let greeting = invocation
                .args
                .value_of::<String>("greeting")
                .map_or("Hello", String::as_str);

            let line = format!("{greeting}, {name}!");
            if invocation.flags.get_flag("shout") {
                return Ok(line.to_uppercase());
            }
            Ok(line)
        })
}

fn sum() -> CommandBuilder<String> {
    Command::builder("sum")
        .about("Add integers")
        .argument(from_str::<i64>().rest(("numbers", "Integers to add")))
        .handler_sync(|invocation| {
            let total: i64 = invocation.args.get_many::<i64>(0).into_iter().sum();
            Ok(total.to_string())
        })
}

fn pick() -> CommandBuilder<String> {
    Command::builder("pick")
        .about("Pick a color")
        .argument(required(
            ArgOptions::<String>::named("color")
                .description("One of red, green or blue")
                .choices(["red", "green", "blue"]),
        ))
        .handler_sync(|invocation| {
            Ok(invocation
                .args
                .get::<String>(0)
                .cloned()
                .unwrap_or_default())
        })
}

fn locate() -> CommandBuilder<String> {
    Command::builder("where")
        .about("Resolve a path against the home and current directories")
        .argument(
            path().optional(ArgOptions::<PathBuf>::named("path").description("Path to resolve")),
        )
        .handler(|invocation| {
            async move {
                let ctx = &invocation.ctx;
                let resolved = match invocation.args.get::<PathBuf>(0) {
                    Some(path) => ctx.resolve_path(path),
                    None => ctx.resolve_path("."),
                };
                Ok(resolved.display().to_string())
            }
            .boxed()
        })
}

fn directories() -> CommandBuilder<String> {
    let show = |name: &'static str, about: &'static str| {
        Command::builder(name)
            .about(about)
            .handler_sync(move |invocation| {
                let ctx = &invocation.ctx;
                let dir = match name {
                    "home" => ctx.home_dir(),
                    "config" => ctx.config_dir(),
                    _ => ctx.current_dir(),
                };
                dir.map(|dir| dir.display().to_string())
                    .ok_or_else(|| anyhow!("{} directory is unknown", ctx.command().name()))
            })
    };

    Command::builder("dirs")
        .about("Show the directories handlers receive")
        .subcommand(show("home", "Home directory"))
        .subcommand(show("config", "Configuration directory"))
        .subcommand(show("cwd", "Current directory"))
}

fn app() -> Result<Command<String>, ArgError> {
    Command::builder("argspec")
        .about("Declarative command-line commands, demonstrated")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(greet())
        .subcommand(sum())
        .subcommand(pick())
        .subcommand(locate())
        .subcommand(directories())
        .build()
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let app = match app() {
        Ok(app) => app,
        Err(err) => {
            error!("{}", err);
            std::process::exit(err.exit_code());
        }
    };

    match app.exec_env().await {
        Ok(Some(output)) => println!("{output}"),
        Ok(None) => {}
        Err(err) => std::process::exit(report(&err)),
    }
}
