//! Option descriptors: the mini-syntax scripts use to declare their arguments.
//!
//! A descriptor is a bare identifier optionally followed by one modifier
//! character, e.g. `verbose-`, `out!`, `input+` or `files*`.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static DESCRIPTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)([-!?+*])?").expect("static regex must compile"));

/// The trailing modifier of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// No modifier: optional `--name <value>`
    Plain,
    /// `-`: boolean `--name` switch
    Toggle,
    /// `!`: mandatory `--name <value>`
    Required,
    /// `+`: mandatory positional
    Positional,
    /// `?`: positional that may be omitted
    Optional,
    /// `*`: positional collecting any number of values
    Variadic,
}

/// How many values an argument consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Zero,
    One,
    ZeroOrOne,
    ZeroOrMore,
}

impl Arity {
    /// Smallest number of tokens that satisfies this arity.
    pub fn min(self) -> usize {
        match self {
            Arity::One => 1,
            Arity::Zero | Arity::ZeroOrOne | Arity::ZeroOrMore => 0,
        }
    }
}

/// The shape a modifier gives to an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub positional: bool,
    pub arity: Arity,
    pub required: bool,
}

impl Modifier {
    fn from_char(c: Option<char>) -> Option<Modifier> {
        match c {
            None => Some(Modifier::Plain),
            Some('-') => Some(Modifier::Toggle),
            Some('!') => Some(Modifier::Required),
            Some('+') => Some(Modifier::Positional),
            Some('?') => Some(Modifier::Optional),
            Some('*') => Some(Modifier::Variadic),
            Some(_) => None,
        }
    }

    /// The one place where a modifier is turned into flag/positional, arity
    /// and requiredness.
    pub fn shape(self) -> Shape {
        let (positional, arity, required) = match self {
            Modifier::Plain => (false, Arity::One, false),
            Modifier::Toggle => (false, Arity::Zero, false),
            Modifier::Required => (false, Arity::One, true),
            Modifier::Positional => (true, Arity::One, true),
            Modifier::Optional => (true, Arity::ZeroOrOne, false),
            Modifier::Variadic => (true, Arity::ZeroOrMore, false),
        };
        Shape {
            positional,
            arity,
            required,
        }
    }
}

/// A parsed option descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Bare option name, also the key of the shell variable
    pub name: String,
    pub modifier: Modifier,
}

impl Descriptor {
    /// Parse a descriptor string.
    ///
    /// Only the start of the string is matched: characters after the
    /// identifier and its optional modifier are ignored. Returns `None` when
    /// the string does not start with an identifier.
    pub fn parse(s: &str) -> Option<Descriptor> {
        let caps = DESCRIPTOR.captures(s)?;
        let name = caps.get(1)?.as_str().to_string();
        let modifier = Modifier::from_char(caps.get(2).and_then(|m| m.as_str().chars().next()))?;
        Some(Descriptor { name, modifier })
    }

    pub fn shape(&self) -> Shape {
        self.modifier.shape()
    }

    /// The flag spelling used on the command line (`--name`).
    pub fn flag(&self) -> String {
        format!("--{}", self.name)
    }

    /// How the argument is named in error messages.
    pub fn display_name(&self) -> String {
        if self.shape().positional {
            self.name.clone()
        } else {
            self.flag()
        }
    }
}

/// Parse a list of descriptor strings, dropping the ones that don't match.
///
/// Dropped entries produce no diagnostic beyond a debug log line.
pub fn parse_descriptors<S: AsRef<str>>(descriptors: &[S]) -> Vec<Descriptor> {
    descriptors
        .iter()
        .filter_map(|raw| {
            let raw = raw.as_ref();
            let parsed = Descriptor::parse(raw);
            if parsed.is_none() {
                debug!(descriptor = raw, "skipping descriptor without a leading identifier");
            }
            parsed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Descriptor {
        Descriptor::parse(s).unwrap()
    }

    #[test]
    fn test_plain_descriptor() {
        let d = parse("foo");
        assert_eq!(d.name, "foo");
        assert_eq!(d.modifier, Modifier::Plain);
    }

    #[test]
    fn test_each_modifier() {
        assert_eq!(parse("v-").modifier, Modifier::Toggle);
        assert_eq!(parse("needs!").modifier, Modifier::Required);
        assert_eq!(parse("bar+").modifier, Modifier::Positional);
        assert_eq!(parse("qufix?").modifier, Modifier::Optional);
        assert_eq!(parse("pos*").modifier, Modifier::Variadic);
    }

    #[test]
    fn test_modifier_strips_from_name() {
        assert_eq!(parse("out_file!").name, "out_file");
        assert_eq!(parse("pos*").name, "pos");
    }

    #[test]
    fn test_shapes() {
        assert_eq!(
            Modifier::Plain.shape(),
            Shape {
                positional: false,
                arity: Arity::One,
                required: false
            }
        );
        assert_eq!(Modifier::Toggle.shape().arity, Arity::Zero);
        assert!(Modifier::Required.shape().required);
        assert!(!Modifier::Required.shape().positional);

        let positional = Modifier::Positional.shape();
        assert!(positional.positional && positional.required);
        assert_eq!(positional.arity, Arity::One);

        let optional = Modifier::Optional.shape();
        assert!(optional.positional && !optional.required);
        assert_eq!(optional.arity, Arity::ZeroOrOne);

        let variadic = Modifier::Variadic.shape();
        assert!(variadic.positional && !variadic.required);
        assert_eq!(variadic.arity, Arity::ZeroOrMore);
    }

    #[test]
    fn test_trailing_characters_ignored() {
        let d = parse("foo!x");
        assert_eq!(d.name, "foo");
        assert_eq!(d.modifier, Modifier::Required);

        // a hyphen right after the name is read as the toggle modifier
        let d = parse("dry-run");
        assert_eq!(d.name, "dry");
        assert_eq!(d.modifier, Modifier::Toggle);
    }

    #[test]
    fn test_unicode_word_characters() {
        assert_eq!(parse("größe").name, "größe");
    }

    #[test]
    fn test_non_identifier_is_rejected() {
        assert!(Descriptor::parse("").is_none());
        assert!(Descriptor::parse("--qufix*").is_none());
        assert!(Descriptor::parse("+bar").is_none());
        assert!(Descriptor::parse(" foo").is_none());
    }

    #[test]
    fn test_parse_descriptors_silently_skips_malformed() {
        let parsed = parse_descriptors(&["foo", "!!", "bar+", "-x"]);
        let names: Vec<_> = parsed.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["foo", "bar"]);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(parse("needs!").display_name(), "--needs");
        assert_eq!(parse("bar+").display_name(), "bar");
        assert_eq!(parse("verbose-").flag(), "--verbose");
    }

    #[test]
    fn test_arity_min() {
        assert_eq!(Arity::One.min(), 1);
        assert_eq!(Arity::ZeroOrOne.min(), 0);
        assert_eq!(Arity::ZeroOrMore.min(), 0);
        assert_eq!(Arity::Zero.min(), 0);
    }
}
