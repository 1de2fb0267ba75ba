//! Flag parsing through clap
//!
//! A `Command` is translated into a `clap::Command` for every invocation.
//! Clap handles the user's flags, help and version output; positional tokens
//! are collected raw by a hidden catch-all argument and bound afterwards by
//! the argument binder. Subcommands are registered as stubs that forward all
//! of their tokens untouched to the child command.

use super::command::Command;
use clap::{Arg, ArgAction, ArgMatches};
use std::any::Any;

/// Raw positional tokens of the current command
const POSITIONALS: &str = "argspec-positionals";

/// Tokens following a subcommand name, passed on to the child command
const FORWARDED: &str = "argspec-forwarded";

/// Flag values bound during one invocation
///
/// Accessors never panic: an unknown id or a type mismatch reads as absent.
#[derive(Debug, Clone)]
pub struct Flags {
    matches: ArgMatches,
}

impl Flags {
    /// Value of a `SetTrue`/`SetFalse` flag, `false` when unknown
    #[must_use]
    #[inline]
    pub fn get_flag(&self, id: &str) -> bool {
        self.get_one::<bool>(id).copied().unwrap_or(false)
    }

    /// Number of occurrences of a `Count` flag
    #[must_use]
    #[inline]
    pub fn get_count(&self, id: &str) -> u8 {
        self.get_one::<u8>(id).copied().unwrap_or(0)
    }

    #[must_use]
    #[inline]
    pub fn get_one<T: Any + Clone + Send + Sync + 'static>(&self, id: &str) -> Option<&T> {
        self.matches.try_get_one::<T>(id).ok().flatten()
    }

    #[must_use]
    #[inline]
    pub fn get_many<T: Any + Clone + Send + Sync + 'static>(&self, id: &str) -> Vec<&T> {
        self.matches
            .try_get_many::<T>(id)
            .ok()
            .flatten()
            .map(|values| values.collect())
            .unwrap_or_default()
    }

    /// Whether the flag was given (or has a default)
    #[must_use]
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.matches.try_contains_id(id).unwrap_or(false)
    }

    /// The underlying clap matches
    #[must_use]
    #[inline]
    pub const fn matches(&self) -> &ArgMatches {
        &self.matches
    }
}

/// Index of the first token belonging to the subcommand `name`
///
/// `parsed` is the number of values the stub collected. The stub's values are
/// always a suffix of `tokens`, except that clap drops one `--` directly after
/// the subcommand name.
fn forwarded_start(tokens: &[String], name: &str, parsed: usize) -> usize {
    let start = tokens.len().saturating_sub(parsed);
    let escaped = start
        .checked_sub(2)
        .and_then(|at| tokens.get(at..start))
        .is_some_and(|pair| matches!(pair, [first, second] if first == name && second == "--"));
    if escaped { start - 1 } else { start }
}

/// Result of running the flag parser over a token list
#[derive(Debug)]
pub(crate) struct ParsedFlags {
    pub positionals: Vec<String>,
    pub flags: Flags,
    pub subcommand: Option<(String, Vec<String>)>,
}

impl<T> Command<T> {
    /// Build the clap command describing this command's flags and usage
    pub(crate) fn to_clap(&self) -> clap::Command {
        let mut cmd = clap::Command::new(self.name().to_owned())
            .bin_name(self.path().to_owned())
            .no_binary_name(true)
            .disable_help_subcommand(true)
            .override_usage(self.usage())
            .args(self.flags().iter().cloned());

        if let Some(about) = self.about() {
            cmd = cmd.about(about.to_owned());
        }
        if let Some(version) = self.version() {
            cmd = cmd.version(version.to_owned());
        }
        if let Some(section) = self.arguments().help_section() {
            cmd = cmd.after_help(section);
        }

        if self.subcommands().is_empty() || !self.arguments().is_empty() {
            cmd = cmd.arg(
                Arg::new(POSITIONALS)
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .allow_negative_numbers(true)
                    .hide(true),
            );
        }

        if !self.subcommands().is_empty() {
            cmd = cmd
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand_precedence_over_arg(true);

            for child in self.subcommands() {
                let mut stub = clap::Command::new(child.name().to_owned())
                    .disable_help_flag(true)
                    .disable_version_flag(true)
                    .arg(
                        Arg::new(FORWARDED)
                            .num_args(1..)
                            .action(ArgAction::Append)
                            .trailing_var_arg(true)
                            .allow_hyphen_values(true)
                            .hide(true),
                    );
                if let Some(about) = child.about() {
                    stub = stub.about(about.to_owned());
                }
                cmd = cmd.subcommand(stub);
            }
        }

        cmd
    }

    /// Run the flag parser, splitting tokens into positionals, flags and
    /// the selected subcommand
    ///
    /// The child receives the raw tail of `tokens`, not what the stub parsed,
    /// so a `--` right after the subcommand name reaches the child intact.
    pub(crate) fn parse_flags(&self, tokens: Vec<String>) -> Result<ParsedFlags, clap::Error> {
        let mut matches = self.to_clap().try_get_matches_from(&tokens)?;

        let subcommand = matches.remove_subcommand().map(|(name, mut child)| {
            let parsed = child
                .try_remove_many::<String>(FORWARDED)
                .ok()
                .flatten()
                .map_or(0, Iterator::count);
            let start = forwarded_start(&tokens, &name, parsed);
            let forwarded = tokens.get(start..).map(<[String]>::to_vec).unwrap_or_default();
            (name, forwarded)
        });

        let positionals: Vec<String> = matches
            .try_remove_many::<String>(POSITIONALS)
            .ok()
            .flatten()
            .map(|values| values.collect())
            .unwrap_or_default();

        Ok(ParsedFlags {
            positionals,
            flags: Flags { matches },
            subcommand,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|token| (*token).to_owned()).collect()
    }

    #[test]
    fn forwarded_tail_follows_the_subcommand_name() {
        assert_eq!(forwarded_start(&tokens(&["say", "a", "b"]), "say", 2), 1);
        assert_eq!(forwarded_start(&tokens(&["-v", "say"]), "say", 0), 2);
    }

    #[test]
    fn forwarded_tail_keeps_an_escape_dropped_by_clap() {
        assert_eq!(forwarded_start(&tokens(&["say", "--", "-x"]), "say", 1), 1);
        assert_eq!(forwarded_start(&tokens(&["say", "--"]), "say", 0), 1);
        assert_eq!(forwarded_start(&tokens(&["say", "--", "--"]), "say", 1), 1);
    }
}
