//! Argument parsing for target scripts.

use crate::compiler::{ArgParser, FlagMatch};
use crate::descriptor::{Arity, Descriptor};
use crate::help::generate_usage;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during argument parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("the following arguments are required: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error("argument {0}: expected one argument")]
    MissingValue(String),

    #[error("argument {0}: ignored explicit argument '{1}'")]
    UnexpectedValue(String, String),

    #[error("ambiguous option: {0} could match {}", .1.join(", "))]
    AmbiguousOption(String, Vec<String>),

    #[error("unrecognized arguments: {}", .0.join(" "))]
    Unrecognized(Vec<String>),
}

/// A parsed argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Not supplied
    Null,
    Bool(bool),
    Str(String),
    List(Vec<String>),
}

impl Value {
    /// Whether the value counts as supplied: `true`, a non-empty string or a
    /// non-empty list.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    fn default_for(rule: &Descriptor) -> Value {
        match rule.shape().arity {
            Arity::Zero => Value::Bool(false),
            Arity::ZeroOrMore => Value::List(Vec::new()),
            Arity::One | Arity::ZeroOrOne => Value::Null,
        }
    }
}

/// Values of every rule after a successful parse, in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    values: Vec<(String, Value)>,
}

impl ParsedArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    fn set(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.values.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        }
    }
}

impl<const N: usize> From<[(&str, Value); N]> for ParsedArgs {
    fn from(pairs: [(&str, Value); N]) -> Self {
        ParsedArgs {
            values: pairs
                .into_iter()
                .map(|(n, v)| (n.to_string(), v))
                .collect(),
        }
    }
}

/// Outcome of parsing arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Successfully parsed arguments.
    Parsed(ParsedArgs),
    /// User requested help (-h or --help).
    Help,
}

impl ArgParser {
    /// Parse raw tokens, reporting violations as errors.
    ///
    /// Returns `ParseOutcome::Help` if -h/--help appears before any `--`.
    pub fn try_parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParseOutcome, ParseError> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();

        for token in tokens.iter().take_while(|t| **t != "--") {
            if *token == "-h" {
                return Ok(ParseOutcome::Help);
            }
            if let Some(name) = long_flag_name(token) {
                if self.match_flag(name) == FlagMatch::Help {
                    return Ok(ParseOutcome::Help);
                }
            }
        }

        let mut state = State::new(self);
        state.parse(&tokens).map(ParseOutcome::Parsed)
    }

    /// Parse raw tokens, terminating the process on a usage violation.
    ///
    /// On error the usage line and `ERROR: <message>` go to stderr and the
    /// process exits with status 1. A help request prints the usage line and
    /// exits with status 1 as well.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> ParsedArgs {
        match self.try_parse(tokens) {
            Ok(ParseOutcome::Parsed(parsed)) => parsed,
            Ok(ParseOutcome::Help) => {
                eprint!("{}", generate_usage(self));
                std::process::exit(1);
            }
            Err(err) => {
                eprint!("{}", generate_usage(self));
                eprintln!("ERROR: {}", err);
                std::process::exit(1);
            }
        }
    }
}

/// The flag name of a `--name` or `--name=value` token.
fn long_flag_name(token: &str) -> Option<&str> {
    let option_str = token.strip_prefix("--")?;
    Some(option_str.split_once('=').map_or(option_str, |(name, _)| name))
}

/// Whether a token is read as a flag rather than a value.
///
/// Anything spelling a known long flag (or a prefix of one) is a flag. Of
/// the remaining dash tokens, negative numbers and tokens containing a space
/// are values.
fn is_flag_like(parser: &ArgParser, token: &str) -> bool {
    if token.len() < 2 || !token.starts_with('-') {
        return false;
    }
    if let Some(name) = long_flag_name(token) {
        if parser.match_flag(name) != FlagMatch::Unknown {
            return true;
        }
    }
    !is_negative_number(token) && !token.contains(' ')
}

fn is_negative_number(token: &str) -> bool {
    token.strip_prefix('-').is_some_and(|digits| {
        digits.chars().all(|c| c.is_ascii_digit() || c == '.') && digits.parse::<f64>().is_ok()
    })
}

/// Per-call parser state.
struct State<'a> {
    parser: &'a ArgParser,
    results: ParsedArgs,
    seen: HashSet<&'a str>,
    positional_tokens: Vec<String>,
    unrecognized: Vec<String>,
}

impl<'a> State<'a> {
    fn new(parser: &'a ArgParser) -> Self {
        let values = parser
            .rules()
            .iter()
            .map(|r| (r.name.clone(), Value::default_for(r)))
            .collect();

        Self {
            parser,
            results: ParsedArgs { values },
            seen: HashSet::new(),
            positional_tokens: Vec::new(),
            unrecognized: Vec::new(),
        }
    }

    fn parse(&mut self, tokens: &[&str]) -> Result<ParsedArgs, ParseError> {
        let mut tokens_iter = tokens.iter().copied();
        let mut parsing_options = true;

        while let Some(token) = tokens_iter.next() {
            if parsing_options && token == "--" {
                // Stop parsing options, everything after is positional
                parsing_options = false;
                continue;
            }

            if parsing_options && is_flag_like(self.parser, token) {
                if token.starts_with("--") {
                    self.parse_long_option(token, &mut tokens_iter)?;
                } else {
                    // Only -h has a short spelling, and it was handled up front
                    self.unrecognized.push(token.to_string());
                }
            } else {
                self.positional_tokens.push(token.to_string());
            }
        }

        self.bind_positionals();
        self.validate_required()?;

        if !self.unrecognized.is_empty() {
            return Err(ParseError::Unrecognized(std::mem::take(
                &mut self.unrecognized,
            )));
        }

        Ok(std::mem::take(&mut self.results))
    }

    fn parse_long_option<'t>(
        &mut self,
        token: &str,
        tokens_iter: &mut impl Iterator<Item = &'t str>,
    ) -> Result<(), ParseError> {
        let option_str = &token[2..]; // Strip "--"

        // Check for --option=value format
        let (name, inline_value) = match option_str.split_once('=') {
            Some((n, v)) => (n, Some(v)),
            None => (option_str, None),
        };

        let parser = self.parser;
        let rule = match parser.match_flag(name) {
            FlagMatch::Rule(rule) => rule,
            FlagMatch::Ambiguous(candidates) => {
                return Err(ParseError::AmbiguousOption(format!("--{}", name), candidates));
            }
            // help requests are answered before the scan
            FlagMatch::Help | FlagMatch::Unknown => {
                self.unrecognized.push(token.to_string());
                return Ok(());
            }
        };

        let value = match rule.shape().arity {
            Arity::Zero => {
                if let Some(v) = inline_value {
                    return Err(ParseError::UnexpectedValue(rule.flag(), v.to_string()));
                }
                Value::Bool(true)
            }
            _ => {
                let value = match inline_value {
                    Some(v) => v,
                    None => tokens_iter
                        .next()
                        .filter(|next| *next != "--" && !is_flag_like(parser, next))
                        .ok_or_else(|| ParseError::MissingValue(rule.flag()))?,
                };
                Value::Str(value.to_string())
            }
        };

        self.seen.insert(rule.name.as_str());
        self.results.set(&rule.name, value);
        Ok(())
    }

    /// Hand positional tokens to positional rules in order.
    ///
    /// Optional and variadic rules only take tokens that later rules don't
    /// need to meet their minimum. Tokens nobody takes are unrecognized.
    fn bind_positionals(&mut self) {
        let parser = self.parser;
        let rules: Vec<&'a Descriptor> = parser.positionals().collect();
        let tokens = std::mem::take(&mut self.positional_tokens);

        // reserved[i] = tokens needed by rules after i
        let mut reserved = vec![0usize; rules.len() + 1];
        for i in (0..rules.len()).rev() {
            reserved[i] = reserved[i + 1] + rules[i].shape().arity.min();
        }

        let mut cursor = 0;
        for (i, &rule) in rules.iter().enumerate() {
            let available = tokens.len() - cursor;
            let spare = available.saturating_sub(reserved[i + 1]);

            let take = match rule.shape().arity {
                Arity::One => available.min(1),
                Arity::ZeroOrOne => spare.min(1),
                Arity::ZeroOrMore => spare,
                Arity::Zero => 0,
            };
            let taken = &tokens[cursor..cursor + take];
            cursor += take;

            debug!(name = %rule.name, tokens = ?taken, "bound positional");

            match rule.shape().arity {
                Arity::ZeroOrMore => {
                    self.results.set(&rule.name, Value::List(taken.to_vec()));
                }
                _ => {
                    if let Some(token) = taken.first() {
                        self.results.set(&rule.name, Value::Str(token.clone()));
                    }
                }
            }
            if take > 0 {
                self.seen.insert(rule.name.as_str());
            }
        }

        self.unrecognized.extend(tokens[cursor..].iter().cloned());
    }

    fn validate_required(&self) -> Result<(), ParseError> {
        let missing: Vec<String> = self
            .parser
            .rules()
            .iter()
            .filter(|r| r.shape().required && !self.seen.contains(r.name.as_str()))
            .map(Descriptor::display_name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ParseError::MissingRequired(missing))
        }
    }
}
