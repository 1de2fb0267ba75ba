//! Structural validation of argument definitions

use super::argument::Argument;
use crate::error::ArgError;

/// Which kind of argument the walk has reached so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Required,
    Optional,
    Rest,
}

/// Validate the ordering of an argument sequence
///
/// Arguments must come as zero or more required, then zero or more optional,
/// then at most one rest argument, which must be last.
///
/// # Errors
///
/// Returns `ArgError::Definition` if:
/// - Any argument follows a rest argument
/// - A required argument follows an optional or rest argument
#[inline]
pub fn validate_arguments(arguments: &[Argument]) -> Result<(), ArgError> {
    let mut mode = Mode::Required;

    for (index, argument) in arguments.iter().enumerate() {
        if mode == Mode::Rest {
            return Err(ArgError::definition(format!(
                "argument #{} {argument} follows a rest argument: rest must be last",
                index + 1
            )));
        }

        if argument.is_rest() {
            mode = Mode::Rest;
        } else if argument.is_required() {
            if mode != Mode::Required {
                return Err(ArgError::definition(format!(
                    "argument #{} {argument}: required may not follow optional",
                    index + 1
                )));
            }
        } else {
            mode = Mode::Optional;
        }
    }

    Ok(())
}

/// Maximum number of positional tokens the arguments accept
///
/// `None` means unbounded, which is the case as soon as a rest argument is
/// declared.
#[must_use]
#[inline]
pub fn max_tokens(arguments: &[Argument]) -> Option<usize> {
    if arguments.iter().any(Argument::is_rest) {
        return None;
    }
    Some(arguments.len())
}
