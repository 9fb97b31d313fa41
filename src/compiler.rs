//! Compile descriptor lists into an argument parser.

use crate::descriptor::{parse_descriptors, Descriptor};
use tracing::debug;

/// A parser built from a descriptor list.
///
/// Holds one rule per descriptor, in descriptor order. The parser is never
/// mutated after construction; each parse call keeps its own state.
#[derive(Debug, Clone)]
pub struct ArgParser {
    rules: Vec<Descriptor>,
}

/// What a long flag spelling (without the leading `--`) refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagMatch<'a> {
    Rule(&'a Descriptor),
    /// The built-in `--help`
    Help,
    /// A prefix shared by several flags, spelled `--name`
    Ambiguous(Vec<String>),
    Unknown,
}

impl ArgParser {
    /// All rules, in descriptor order.
    pub fn rules(&self) -> &[Descriptor] {
        &self.rules
    }

    /// Rules introduced by `--name`.
    pub fn flags(&self) -> impl Iterator<Item = &Descriptor> {
        self.rules.iter().filter(|r| !r.shape().positional)
    }

    /// Rules bound by position, in binding order.
    pub fn positionals(&self) -> impl Iterator<Item = &Descriptor> {
        self.rules.iter().filter(|r| r.shape().positional)
    }

    /// Resolve `--name` by exact name first, then by unique prefix.
    pub fn match_flag(&self, name: &str) -> FlagMatch<'_> {
        let help = self.builtin_long_help();

        if let Some(rule) = self.flags().find(|r| r.name == name) {
            return FlagMatch::Rule(rule);
        }
        if help && name == "help" {
            return FlagMatch::Help;
        }
        if name.is_empty() {
            return FlagMatch::Unknown;
        }

        let mut candidates: Vec<&Descriptor> = Vec::new();
        for rule in self.flags().filter(|r| r.name.starts_with(name)) {
            if !candidates.iter().any(|c| c.name == rule.name) {
                candidates.push(rule);
            }
        }
        let help_matches = help && "help".starts_with(name);

        match (candidates.as_slice(), help_matches) {
            ([], false) => FlagMatch::Unknown,
            ([], true) => FlagMatch::Help,
            ([rule], false) => FlagMatch::Rule(*rule),
            _ => {
                let mut spellings: Vec<String> = candidates.iter().map(|r| r.flag()).collect();
                if help_matches {
                    spellings.push("--help".to_string());
                }
                FlagMatch::Ambiguous(spellings)
            }
        }
    }

    /// Whether `--help` is still the built-in help request.
    pub(crate) fn builtin_long_help(&self) -> bool {
        !self.flags().any(|r| r.name == "help")
    }
}

/// Build a parser from descriptor strings.
///
/// Descriptors that don't start with an identifier are skipped.
pub fn compile<S: AsRef<str>>(descriptors: &[S]) -> ArgParser {
    let rules = parse_descriptors(descriptors);

    for rule in &rules {
        let shape = rule.shape();
        debug!(
            name = %rule.name,
            positional = shape.positional,
            required = shape.required,
            arity = ?shape.arity,
            "registered argument"
        );
    }

    ArgParser { rules }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Modifier;

    fn matched_name(parser: &ArgParser, name: &str) -> Option<String> {
        match parser.match_flag(name) {
            FlagMatch::Rule(rule) => Some(rule.name.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_compile_keeps_descriptor_order() {
        let parser = compile(&["foo", "needs!", "bar+", "qufix?"]);
        let names: Vec<_> = parser.rules().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["foo", "needs", "bar", "qufix"]);
    }

    #[test]
    fn test_flags_and_positionals_split() {
        let parser = compile(&["foo", "bar+", "v-", "baz*", "needs!"]);
        let flags: Vec<_> = parser.flags().map(|r| r.name.as_str()).collect();
        let positionals: Vec<_> = parser.positionals().map(|r| r.name.as_str()).collect();
        assert_eq!(flags, vec!["foo", "v", "needs"]);
        assert_eq!(positionals, vec!["bar", "baz"]);
    }

    #[test]
    fn test_compile_skips_malformed() {
        let parser = compile(&["--bad", "good-", "?"]);
        assert_eq!(parser.rules().len(), 1);
        assert_eq!(parser.rules()[0].modifier, Modifier::Toggle);
    }

    #[test]
    fn test_compile_empty() {
        let parser = compile::<&str>(&[]);
        assert!(parser.rules().is_empty());
    }

    #[test]
    fn test_match_flag_exact() {
        let parser = compile(&["out", "input+"]);
        assert_eq!(matched_name(&parser, "out").as_deref(), Some("out"));
        assert_eq!(parser.match_flag("input"), FlagMatch::Unknown);
    }

    #[test]
    fn test_match_flag_unique_prefix() {
        let parser = compile(&["foo", "bar-"]);
        assert_eq!(matched_name(&parser, "fo").as_deref(), Some("foo"));
        assert_eq!(matched_name(&parser, "b").as_deref(), Some("bar"));
    }

    #[test]
    fn test_match_flag_exact_beats_prefix() {
        let parser = compile(&["foobar", "foo"]);
        assert_eq!(matched_name(&parser, "foo").as_deref(), Some("foo"));
    }

    #[test]
    fn test_match_flag_ambiguous_prefix() {
        let parser = compile(&["foo", "fab"]);
        assert_eq!(
            parser.match_flag("f"),
            FlagMatch::Ambiguous(vec!["--foo".to_string(), "--fab".to_string()])
        );
    }

    #[test]
    fn test_match_flag_duplicate_names_not_ambiguous() {
        let parser = compile(&["foo", "foo!"]);
        assert_eq!(matched_name(&parser, "fo").as_deref(), Some("foo"));
    }

    #[test]
    fn test_match_flag_help() {
        let parser = compile(&["foo"]);
        assert_eq!(parser.match_flag("help"), FlagMatch::Help);
        assert_eq!(parser.match_flag("he"), FlagMatch::Help);
        assert_eq!(parser.match_flag(""), FlagMatch::Unknown);

        let parser = compile(&["helper"]);
        assert_eq!(parser.match_flag("help"), FlagMatch::Help);
        assert_eq!(
            parser.match_flag("hel"),
            FlagMatch::Ambiguous(vec!["--helper".to_string(), "--help".to_string()])
        );
    }

    #[test]
    fn test_help_descriptor_takes_over_long_help() {
        assert!(compile(&["foo"]).builtin_long_help());
        assert!(!compile(&["help-"]).builtin_long_help());
        assert_eq!(
            matched_name(&compile(&["help-"]), "help").as_deref(),
            Some("help")
        );
    }
}
