//! # Replacement Table
//!
//! Maps placeholder tokens (`${first_name}`, `{ID}`, any literal string) to the
//! producers that generate their values. Tokens are matched against templates
//! by plain substring containment.
//!
//! Iteration order is longest token first, ties broken lexicographically, so
//! a template containing `IDX` is never mangled by a shorter `ID` entry that
//! happens to be a substring of it.

use std::sync::LazyLock;

use rand::RngCore;
use regex::Regex;
use tracing::warn;

use crate::generate::providers;
use crate::generate::value::Value;

/// Syntax of the placeholders the default registry uses. Only consulted when
/// checking templates for unknown placeholders.
static PLACEHOLDER_SYNTAX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[A-Za-z0-9_.:-]+\}").unwrap());

/// A value producer. Takes the caller's random source so that a seeded run is
/// reproducible end to end.
pub type Producer = Box<dyn Fn(&mut dyn RngCore) -> Value + Send + Sync>;

#[derive(Default)]
pub struct Replacements {
    /// Kept sorted: longest token first, then lexicographic.
    entries: Vec<(String, Producer)>,
}

impl Replacements {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-populated with the built-in `${...}` producers.
    pub fn with_defaults() -> Self {
        let mut replacements = Self::new();
        providers::register_defaults(&mut replacements);
        replacements
    }

    /// Register `producer` under `token`, replacing any producer already
    /// registered for the same token.
    ///
    /// An empty token matches nowhere and is not registered.
    pub fn insert<F>(&mut self, token: impl Into<String>, producer: F)
    where
        F: Fn(&mut dyn RngCore) -> Value + Send + Sync + 'static,
    {
        let token = token.into();
        if token.is_empty() {
            warn!("Ignoring producer registered under an empty token");
            return;
        }
        let producer: Producer = Box::new(producer);
        match self
            .entries
            .binary_search_by(|(existing, _)| order(existing, &token))
        {
            Ok(idx) => self.entries[idx].1 = producer,
            Err(idx) => self.entries.insert(idx, (token, producer)),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries
            .binary_search_by(|(existing, _)| order(existing, token))
            .is_ok()
    }

    /// Registered tokens in substitution order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(token, _)| token.as_str())
    }

    /// `(token, producer)` pairs in substitution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Producer)> {
        self.entries.iter().map(|(token, p)| (token.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `${...}` placeholders in `template` that have no registered producer,
    /// deduplicated, in order of first appearance.
    pub fn unknown_placeholders(&self, template: &str) -> Vec<String> {
        let mut unknown: Vec<String> = Vec::new();
        for m in PLACEHOLDER_SYNTAX.find_iter(template) {
            let token = m.as_str();
            if !self.contains(token) && !unknown.iter().any(|u| u == token) {
                unknown.push(token.to_string());
            }
        }
        unknown
    }
}

impl std::fmt::Debug for Replacements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replacements")
            .field("tokens", &self.tokens().collect::<Vec<_>>())
            .finish()
    }
}

fn order(a: &str, b: &str) -> std::cmp::Ordering {
    b.len().cmp(&a.len()).then_with(|| a.cmp(b))
}
