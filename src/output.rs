//! Temporary file generation with shell assignment statements.

use crate::parser::Value;
use crate::projector::Options;
use anyhow::Result;
use std::borrow::Cow;
use std::io::Write;
use std::path::PathBuf;
use tempfile::Builder;
use tracing::debug;

/// Characters that never need quoting in a shell word.
fn is_shell_safe(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | ',' | '+' | '=' | '@' | '%' | '^')
}

/// Quote a word for a shell assignment if it needs it.
///
/// Safe words are left bare. Anything else is wrapped in double quotes,
/// escaping: $, `, \ and "
fn quote_word(value: &str) -> Cow<'_, str> {
    if !value.is_empty() && value.chars().all(is_shell_safe) {
        return Cow::Borrowed(value);
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '$' | '`' | '\\' | '"') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Format one assignment line, without the trailing newline.
fn assignment(name: &str, value: &Value) -> String {
    match value {
        Value::List(items) => {
            let mut line = format!("{}=(", name);
            for item in items {
                line.push_str(&quote_word(item));
                line.push(' ');
            }
            line.push(')');
            line
        }
        Value::Bool(b) => format!("{}={}", name, b),
        Value::Str(s) => format!("{}={}", name, quote_word(s)),
        Value::Null => format!("{}=", name),
    }
}

/// Render the options as shell assignments, one line per option.
pub fn generate_output_string(options: &Options) -> String {
    let mut output = String::new();
    for (name, value) in options.iter() {
        output.push_str(&assignment(name, value));
        output.push('\n');
    }
    output
}

/// Write the options to a new temporary file and return its path.
///
/// The file is written and closed before this returns, even when there is
/// nothing to write. It stays on disk; removing it is up to the caller.
pub fn generate_output(options: &Options) -> Result<PathBuf> {
    let mut file = Builder::new()
        .prefix("parse-args-")
        .suffix(".sh")
        .tempfile()?;

    file.write_all(generate_output_string(options).as_bytes())?;
    file.flush()?;

    // Persist the file (don't delete on drop)
    let path = file.into_temp_path().keep()?;
    debug!(path = %path.display(), entries = options.len(), "wrote assignments");
    Ok(path)
}
