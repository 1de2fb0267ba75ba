//! Error handling module
//!
//! Defines the argument error kinds and the top-level reporting glue that
//! turns any error coming out of `exec` into a process exit code.

pub mod types;

pub use types::*;

use tracing::error;

/// Exit code for an error returned by `Command::exec`
///
/// `ArgError` kinds carry their own codes, `clap` errors use clap's codes
/// (0 for help, 2 for usage errors) and anything else maps to 1.
#[must_use]
#[inline]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(arg_error) = err.downcast_ref::<ArgError>() {
        return arg_error.exit_code();
    }
    err.downcast_ref::<clap::Error>()
        .map_or(1, clap::Error::exit_code)
}

/// Print an error the way its kind expects and return the exit code
///
/// Flag errors and help output go through clap's renderer, everything else
/// is logged.
#[inline]
pub fn report(err: &anyhow::Error) -> i32 {
    if let Some(clap_error) = err.downcast_ref::<clap::Error>() {
        if clap_error.print().is_err() {
            error!("{}", clap_error);
        }
        return clap_error.exit_code();
    }

    error!("{:#}", err);
    exit_code(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_errors_keep_their_exit_codes() {
        let err = anyhow::Error::from(ArgError::definition("rest must be last"));
        assert_eq!(exit_code(&err), 70);

        let err = anyhow::Error::from(ArgError::missing_required(vec!["<NAME>".to_owned()]));
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn other_errors_exit_with_one() {
        let err = anyhow::anyhow!("handler failed");
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn context_does_not_hide_error_kind() {
        let err = anyhow::Error::from(ArgError::unexpected_arguments(vec!["extra".to_owned()]))
            .context("while running build");
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn error_messages_use_display_forms() {
        let err = ArgError::invalid_choice(
            "<MODE>",
            "c",
            vec!["a".to_owned(), "b".to_owned()],
        );
        assert_eq!(
            err.to_string(),
            "Invalid choice 'c' for <MODE>, expected one of: a, b"
        );

        let err = ArgError::missing_required(vec!["<SRC>".to_owned(), "<DEST>".to_owned()]);
        assert_eq!(err.to_string(), "Missing required arguments: <SRC>, <DEST>");
    }
}
