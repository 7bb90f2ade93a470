//! Ordered, case-insensitive pattern tables.
//!
//! Every extraction task owns one [`RuleTable`]. Rules are evaluated in the
//! order they were declared; see [`RuleTable::first_match`] for the
//! single-valued fields and [`RuleTable::all_matches`] for multi-valued ones.

use crate::ExtractError;
use regex::{Captures, Regex, RegexBuilder};

/// Turns a match into a field value. `None` means the match was found but
/// could not be converted.
pub type Setter<T> = fn(&Captures<'_>) -> Option<T>;

/// A matched substring and its byte offset in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub text: String,
}

pub struct Rule<T> {
    name: &'static str,
    regex: Regex,
    setter: Setter<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleHit<T> {
    pub rule: &'static str,
    /// Capture group 1 when the pattern has one, the whole match otherwise.
    pub span: MatchSpan,
    pub value: Option<T>,
}

impl<T> Rule<T> {
    fn hit(&self, caps: &Captures<'_>) -> Option<RuleHit<T>> {
        let matched = caps.get(1).or_else(|| caps.get(0))?;
        Some(RuleHit {
            rule: self.name,
            span: MatchSpan {
                start: matched.start(),
                text: matched.as_str().to_string(),
            },
            value: (self.setter)(caps),
        })
    }
}

pub struct RuleTable<T> {
    rules: Vec<Rule<T>>,
}

impl<T> RuleTable<T> {
    pub fn compile(entries: &[(&'static str, &str, Setter<T>)]) -> Result<Self, ExtractError> {
        let rules = entries
            .iter()
            .map(|(name, pattern, setter)| -> Result<Rule<T>, ExtractError> {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ExtractError::Pattern {
                        name: *name,
                        source,
                    })?;
                Ok(Rule {
                    name: *name,
                    regex,
                    setter: *setter,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// The first rule (in declared order) whose pattern matches anywhere in
    /// `text` is authoritative. Later rules are never consulted once one
    /// matches, even when its setter yields `None`.
    pub fn first_match(&self, text: &str) -> Option<RuleHit<T>> {
        self.rules
            .iter()
            .find_map(|rule| rule.regex.captures(text).and_then(|caps| rule.hit(&caps)))
    }

    /// Every match of every rule, grouped by rule in declared order.
    pub fn all_matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = RuleHit<T>> + 'a {
        self.rules.iter().flat_map(move |rule| {
            rule.regex
                .captures_iter(text)
                .filter_map(move |caps| rule.hit(&caps))
        })
    }
}

/// Setter returning capture group 1, trimmed.
pub(crate) fn group_text(caps: &Captures<'_>) -> Option<String> {
    caps.get(1)
        .map(|m| m.as_str().trim().to_string())
        .filter(|text| !text.is_empty())
}
