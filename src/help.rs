//! Usage synopsis for compiled parsers.

use crate::compiler::ArgParser;
use crate::descriptor::{Descriptor, Modifier};

/// Render one rule the way it appears in the usage line.
fn usage_item(rule: &Descriptor) -> String {
    let name = &rule.name;
    match rule.modifier {
        Modifier::Plain => format!("[--{name} <{name}>]"),
        Modifier::Toggle => format!("[--{name}]"),
        Modifier::Required => format!("--{name} <{name}>"),
        Modifier::Positional => format!("<{name}>"),
        Modifier::Optional => format!("[{name}]"),
        Modifier::Variadic => format!("[{name}]..."),
    }
}

/// Generate the usage line for a parser, including the trailing newline.
///
/// Flags are listed first in descriptor order, then positionals in binding
/// order.
pub fn generate_usage(parser: &ArgParser) -> String {
    let mut parts = vec!["[-h]".to_string()];
    parts.extend(parser.flags().map(usage_item));
    parts.extend(parser.positionals().map(usage_item));

    format!("Usage: {}\n", parts.join(" "))
}
