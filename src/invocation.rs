//! Splitting the tool's own command line at the separator.

use thiserror::Error;

/// Token separating descriptors from the arguments to parse.
pub const SEPARATOR: &str = "--";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvocationError {
    #[error("command line is malformed, missing '--' separator")]
    MissingSeparator,
}

/// Split argv at the first separator after the program path.
///
/// Returns everything before the separator (program path included) and the
/// raw tokens after it, or `None` for the tokens when there is no separator.
pub fn split_at_separator(argv: &[String]) -> (&[String], Option<&[String]>) {
    match argv.iter().skip(1).position(|a| a == SEPARATOR) {
        Some(pos) => (&argv[..pos + 1], Some(&argv[pos + 2..])),
        None => (argv, None),
    }
}

/// Like [`split_at_separator`], but a missing separator is an error.
pub fn require_separator(argv: &[String]) -> Result<(&[String], &[String]), InvocationError> {
    match split_at_separator(argv) {
        (head, Some(tokens)) => Ok((head, tokens)),
        (_, None) => Err(InvocationError::MissingSeparator),
    }
}
