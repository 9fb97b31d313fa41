//! Projection of parsed results down to the options that were supplied.

use crate::descriptor::parse_descriptors;
use crate::parser::{ParsedArgs, Value};

/// Supplied options keyed by bare name, in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    entries: Vec<(String, Value)>,
}

impl Options {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Keep only the truthy values of the named options.
///
/// `false`, null and empty values are left out: consumers test whether a
/// variable is set, not what it holds. Descriptors that don't parse, and
/// names the parsed result doesn't know, are skipped.
pub fn project<S: AsRef<str>>(descriptors: &[S], parsed: &ParsedArgs) -> Options {
    let mut options = Options::default();

    for descriptor in parse_descriptors(descriptors) {
        if options.contains(&descriptor.name) {
            continue;
        }
        if let Some(value) = parsed.get(&descriptor.name) {
            if value.is_truthy() {
                options.entries.push((descriptor.name, value.clone()));
            }
        }
    }

    options
}
