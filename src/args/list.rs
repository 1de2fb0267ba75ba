//! Validated, ordered argument lists

use super::argument::Argument;
use super::validation::{max_tokens, validate_arguments};
use crate::error::ArgError;
use std::fmt::Write as _;

/// Ordered sequence of arguments that passed validation
///
/// The only way to get one is [`ArgumentList::new`], so anything holding an
/// `ArgumentList` can rely on the ordering invariant. Ids are the positions in
/// the list.
#[derive(Debug, Default)]
pub struct ArgumentList {
    arguments: Vec<Argument>,
}

impl ArgumentList {
    /// Validate `arguments` and stamp their ids
    ///
    /// # Errors
    ///
    /// Returns `ArgError::Definition` if the ordering is illegal.
    #[inline]
    pub fn new(mut arguments: Vec<Argument>) -> Result<Self, ArgError> {
        validate_arguments(&arguments)?;

        for (id, argument) in arguments.iter_mut().enumerate() {
            argument.id = Some(id);
        }

        Ok(Self { arguments })
    }

    #[must_use]
    #[inline]
    pub const fn empty() -> Self {
        Self {
            arguments: Vec::new(),
        }
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.arguments.iter()
    }

    #[must_use]
    #[inline]
    pub fn get(&self, id: usize) -> Option<&Argument> {
        self.arguments.get(id)
    }

    /// Find an argument by its declared name
    #[must_use]
    #[inline]
    pub fn find(&self, name: &str) -> Option<&Argument> {
        self.arguments
            .iter()
            .find(|argument| argument.name() == Some(name))
    }

    /// Maximum number of positional tokens, `None` when a rest argument exists
    #[must_use]
    #[inline]
    pub fn max_tokens(&self) -> Option<usize> {
        max_tokens(&self.arguments)
    }

    /// Display forms of the visible arguments, space separated
    #[must_use]
    #[inline]
    pub fn usage(&self) -> String {
        self.arguments
            .iter()
            .filter(|argument| !argument.is_hidden())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// "Arguments:" help section, `None` when nothing visible is described
    #[must_use]
    pub fn help_section(&self) -> Option<String> {
        let described: Vec<(String, &str)> = self
            .arguments
            .iter()
            .filter(|argument| !argument.is_hidden())
            .filter_map(|argument| {
                argument
                    .description()
                    .map(|description| (argument.to_string(), description))
            })
            .collect();

        if described.is_empty() {
            return None;
        }

        let width = described
            .iter()
            .map(|(display, _)| display.len())
            .max()
            .unwrap_or(0);

        let mut section = String::from("Arguments:");
        for (display, description) in described {
            let _ = write!(section, "\n  {display:<width$}  {description}");
        }
        Some(section)
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.arguments.iter()
    }
}
