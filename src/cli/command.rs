//! Commands: argument lists, flags and a handler or subcommands

use super::context::Context;
use super::flags::Flags;
use crate::args::{Argument, ArgumentList, BoundArguments};
use crate::error::ArgError;
use crate::system::{RealSystem, System};
use anyhow::{Result, anyhow};
use clap::Arg;
use clap::error::ErrorKind;
use futures::future::{BoxFuture, FutureExt as _};
use std::ffi::OsString;
use std::fmt;
use tracing::debug;

/// Everything a handler receives for one invocation
pub struct Invocation<'a, T> {
    /// Bound positional arguments
    pub args: BoundArguments,
    /// Bound flag values
    pub flags: Flags,
    /// Environment and the executing command
    pub ctx: Context<'a, T>,
}

/// Boxed command handler
pub type Handler<T> =
    Box<dyn for<'a> Fn(Invocation<'a, T>) -> BoxFuture<'a, Result<T>> + Send + Sync>;

enum Action<T> {
    Handler(Handler<T>),
    Subcommands(Vec<Command<T>>),
}

/// An invokable command
///
/// Built once through [`CommandBuilder`], then executed any number of times.
/// Each `exec` is independent: it binds its own arguments and builds its own
/// [`Context`].
pub struct Command<T = ()> {
    name: String,
    path: String,
    about: Option<String>,
    version: Option<String>,
    arguments: ArgumentList,
    flags: Vec<Arg>,
    action: Action<T>,
}

/// Builder for [`Command`]
///
/// `build` checks that exactly one of a handler or subcommands was given and
/// validates the argument list, so a malformed definition never runs.
pub struct CommandBuilder<T = ()> {
    name: String,
    about: Option<String>,
    version: Option<String>,
    arguments: Vec<Argument>,
    flags: Vec<Arg>,
    handler: Option<Handler<T>>,
    subcommands: Vec<CommandBuilder<T>>,
}

fn boxed_handler<T, F>(handler: F) -> Handler<T>
where
    F: for<'a> Fn(Invocation<'a, T>) -> BoxFuture<'a, Result<T>> + Send + Sync + 'static,
{
    Box::new(handler)
}

impl<T> CommandBuilder<T> {
    #[inline]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            about: None,
            version: None,
            arguments: Vec::new(),
            flags: Vec::new(),
            handler: None,
            subcommands: Vec::new(),
        }
    }

    /// One-line description shown in help and in the parent's command list
    #[must_use]
    #[inline]
    pub fn about<S: Into<String>>(mut self, about: S) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Version printed by `--version`, inherited by subcommands without one
    #[must_use]
    #[inline]
    pub fn version<S: Into<String>>(mut self, version: S) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    #[inline]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    #[inline]
    pub fn arguments<I: IntoIterator<Item = Argument>>(mut self, arguments: I) -> Self {
        self.arguments.extend(arguments);
        self
    }

    #[must_use]
    #[inline]
    pub fn flag(mut self, flag: Arg) -> Self {
        self.flags.push(flag);
        self
    }

    #[must_use]
    #[inline]
    pub fn flags<I: IntoIterator<Item = Arg>>(mut self, flags: I) -> Self {
        self.flags.extend(flags);
        self
    }

    #[must_use]
    #[inline]
    pub fn subcommand(mut self, subcommand: Self) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Validate the definition and produce the command
    ///
    /// # Errors
    ///
    /// Returns `ArgError::Definition` if:
    /// - Both a handler and subcommands were given, or neither
    /// - Two subcommands share a name
    /// - The argument ordering is illegal (in this command or any subcommand)
    #[inline]
    pub fn build(self) -> Result<Command<T>, ArgError> {
        self.build_under(None, None)
    }

    fn build_under(
        self,
        parent_path: Option<&str>,
        inherited_version: Option<&str>,
    ) -> Result<Command<T>, ArgError> {
        let path = match parent_path {
            Some(parent) => format!("{parent} {}", self.name),
            None => self.name.clone(),
        };
        let version = self
            .version
            .or_else(|| inherited_version.map(str::to_owned));

        let action = match (self.handler, self.subcommands.is_empty()) {
            (Some(_), false) => {
                return Err(ArgError::definition(format!(
                    "command '{path}' declares both a handler and subcommands"
                )));
            }
            (None, true) => {
                return Err(ArgError::definition(format!(
                    "command '{path}' declares neither a handler nor subcommands"
                )));
            }
            (Some(handler), true) => Action::Handler(handler),
            (None, false) => {
                let mut children: Vec<Command<T>> = Vec::with_capacity(self.subcommands.len());
                for child in self.subcommands {
                    if children.iter().any(|built| built.name == child.name) {
                        return Err(ArgError::definition(format!(
                            "command '{path}' declares subcommand '{}' twice",
                            child.name
                        )));
                    }
                    children.push(child.build_under(Some(&path), version.as_deref())?);
                }
                Action::Subcommands(children)
            }
        };

        let arguments = ArgumentList::new(self.arguments).map_err(|err| match err {
            ArgError::Definition { message } => {
                ArgError::definition(format!("command '{path}': {message}"))
            }
            other => other,
        })?;

        Ok(Command {
            name: self.name,
            path,
            about: self.about,
            version,
            arguments,
            flags: self.flags,
            action,
        })
    }
}

impl<T: Send + 'static> CommandBuilder<T> {
    /// Run `handler` when this command is invoked
    ///
    /// ```
    /// use argspec::{Command, FutureExt as _};
    ///
    /// let command = Command::<usize>::builder("count")
    ///     .argument(argspec::rest("items"))
    ///     .handler(|invocation| async move { Ok(invocation.args.len()) }.boxed())
    ///     .build()
    ///     .unwrap();
    /// # let _ = command;
    /// ```
    #[must_use]
    #[inline]
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: for<'a> Fn(Invocation<'a, T>) -> BoxFuture<'a, Result<T>> + Send + Sync + 'static,
    {
        self.handler = Some(boxed_handler(handler));
        self
    }

    /// Run a synchronous `handler` when this command is invoked
    #[must_use]
    #[inline]
    pub fn handler_sync<F>(mut self, handler: F) -> Self
    where
        F: Fn(Invocation<'_, T>) -> Result<T> + Send + Sync + 'static,
    {
        self.handler = Some(boxed_handler(move |invocation: Invocation<'_, T>| {
            let output = handler(invocation);
            async move { output }.boxed()
        }));
        self
    }
}

impl<T> Command<T> {
    /// Start declaring a command
    #[inline]
    pub fn builder<S: Into<String>>(name: S) -> CommandBuilder<T> {
        CommandBuilder::new(name)
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Space separated names from the root command down to this one
    #[must_use]
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    #[inline]
    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    #[inline]
    pub const fn arguments(&self) -> &ArgumentList {
        &self.arguments
    }

    #[must_use]
    #[inline]
    pub fn flags(&self) -> &[Arg] {
        &self.flags
    }

    #[must_use]
    #[inline]
    pub const fn has_handler(&self) -> bool {
        matches!(self.action, Action::Handler(_))
    }

    /// Child commands, empty for a command with a handler
    #[must_use]
    #[inline]
    pub fn subcommands(&self) -> &[Self] {
        match &self.action {
            Action::Subcommands(children) => children,
            Action::Handler(_) => &[],
        }
    }

    #[must_use]
    #[inline]
    pub fn subcommand(&self, name: &str) -> Option<&Self> {
        self.subcommands().iter().find(|child| child.name == name)
    }

    /// Usage line, built from the arguments' display forms
    #[must_use]
    pub fn usage(&self) -> String {
        let mut usage = format!("{} [OPTIONS]", self.path);

        let arguments = self.arguments.usage();
        if !arguments.is_empty() {
            usage.push(' ');
            usage.push_str(&arguments);
        }
        if !self.subcommands().is_empty() {
            usage.push_str(" <COMMAND>");
        }
        usage
    }

    /// Full help text as `--help` would print it
    #[must_use]
    #[inline]
    pub fn render_help(&self) -> String {
        self.to_clap().render_help().to_string()
    }
}

impl<T: Send + 'static> Command<T> {
    /// Execute with explicit tokens against the real environment
    ///
    /// Resolves to `Ok(None)` when `--version` was requested and printed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Flag parsing fails, or help was requested (`clap::Error`)
    /// - Binding fails (`ArgError`)
    /// - The handler, a parser or a default supplier fails
    #[inline]
    pub async fn exec<I, S>(&self, tokens: I) -> Result<Option<T>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exec_with(&RealSystem, tokens).await
    }

    /// Execute with the process arguments, minus the program name
    ///
    /// # Errors
    ///
    /// Returns an error if a process argument is not valid UTF-8, otherwise
    /// see [`Command::exec`].
    #[inline]
    pub async fn exec_env(&self) -> Result<Option<T>> {
        let tokens = utf8_tokens(std::env::args_os().skip(1))?;
        self.exec(tokens).await
    }

    /// Execute with explicit tokens against `system`
    ///
    /// # Errors
    ///
    /// See [`Command::exec`].
    #[inline]
    pub async fn exec_with<I, S>(&self, system: &dyn System, tokens: I) -> Result<Option<T>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        self.run(system, tokens).await
    }

    async fn run(&self, system: &dyn System, tokens: Vec<String>) -> Result<Option<T>> {
        debug!("Executing '{}' with {} tokens", self.path, tokens.len());

        let parsed = match self.parse_flags(tokens) {
            Ok(parsed) => parsed,
            Err(err) if err.kind() == ErrorKind::DisplayVersion => {
                err.print()?;
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let args = self.arguments.bind(parsed.positionals).await?;
        let ctx = Context::new(system, self);

        if let Some((name, tokens)) = parsed.subcommand {
            let child = self
                .subcommand(&name)
                .ok_or_else(|| anyhow!("'{}' has no subcommand '{name}'", self.path))?;
            debug!("Dispatching '{}' to '{}'", self.path, child.path);
            return Box::pin(child.run(system, tokens)).await;
        }

        let Action::Handler(handler) = &self.action else {
            return Err(anyhow!("'{}' requires a subcommand", self.path));
        };

        debug!("Running handler of '{}'", self.path);
        let output = handler(Invocation {
            args,
            flags: parsed.flags,
            ctx,
        })
        .await?;
        Ok(Some(output))
    }
}

/// Convert raw process arguments, refusing any that are not valid UTF-8
fn utf8_tokens<I: IntoIterator<Item = OsString>>(args: I) -> Result<Vec<String>> {
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            arg.into_string().map_err(|raw| {
                anyhow!(
                    "argument #{} is not valid UTF-8: {}",
                    index + 1,
                    raw.to_string_lossy()
                )
            })
        })
        .collect()
}

impl<T> fmt::Debug for Command<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("path", &self.path)
            .field("version", &self.version)
            .field("arguments", &self.arguments)
            .field(
                "flags",
                &self.flags.iter().map(Arg::get_id).collect::<Vec<_>>(),
            )
            .field(
                "subcommands",
                &self.subcommands().iter().map(Self::name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
