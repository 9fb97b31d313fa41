//! parse-args - typed argument declarations for shell scripts.
//!
//! This library compiles option descriptors (`name`, `name-`, `name!`,
//! `name+`, `name?`, `name*`) into a parser, projects the parsed result down
//! to the options that were supplied, and writes them out as shell
//! assignments for the calling script to source.

pub mod compiler;
pub mod descriptor;
pub mod help;
pub mod invocation;
pub mod output;
pub mod parser;
pub mod projector;

pub use compiler::{compile, ArgParser, FlagMatch};
pub use descriptor::{Arity, Descriptor, Modifier, Shape};
pub use help::generate_usage;
pub use invocation::{require_separator, split_at_separator, InvocationError, SEPARATOR};
pub use output::{generate_output, generate_output_string};
pub use parser::{ParseError, ParseOutcome, ParsedArgs, Value};
pub use projector::{project, Options};
