//! The mutable list of arguments still waiting to be bound.

use std::{env, ops::Range};

use crate::descriptor::FieldDescriptor;

/// Returns `true` when `token` begins with at least one dash.
///
/// # Examples
/// ```
/// use argot_core::tokens::is_marker;
///
/// assert!(is_marker("--verbose"));
/// assert!(is_marker("-v"));
/// assert!(!is_marker("verbose"));
/// ```
#[must_use]
pub fn is_marker(token: &str) -> bool {
    token.starts_with('-')
}

/// Strips every leading dash from `token`.
///
/// # Examples
/// ```
/// use argot_core::tokens::option_text;
///
/// assert_eq!(option_text("---name"), "name");
/// assert_eq!(option_text("name"), "name");
/// ```
#[must_use]
pub fn option_text(token: &str) -> &str {
    token.trim_start_matches('-')
}

/// Ordered arguments not yet consumed by a binder.
///
/// A list is created fresh for every binding pass and handed to each binder
/// in turn through `&mut`, so consumption is always visible to the next one.
///
/// # Examples
/// ```
/// use argot_core::{FieldDescriptor, TokenList};
///
/// let mut tokens = TokenList::from(["-n", "7", "file.txt"]);
/// let marker = tokens.find_marker(&FieldDescriptor::option("name"));
/// assert_eq!(marker, Some(0));
/// tokens.drain(0..2);
/// assert_eq!(tokens.as_slice(), ["file.txt"]);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenList {
    tokens: Vec<String>,
}

impl TokenList {
    /// Creates a list from any sequence of string-like values.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a list from the process arguments, excluding the program path.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(env::args().skip(1))
    }

    /// Returns the number of remaining tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` when every token has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the remaining tokens.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    /// Returns the token at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Returns the index of the first marker token matching `descriptor`.
    #[must_use]
    pub fn find_marker(&self, descriptor: &FieldDescriptor) -> Option<usize> {
        self.tokens
            .iter()
            .position(|token| is_marker(token) && descriptor.matches_marker(option_text(token)))
    }

    /// Returns the index of the first marker token at or after `start`, or
    /// the list length when there is none.
    #[must_use]
    pub fn next_marker_from(&self, start: usize) -> usize {
        self.tokens
            .iter()
            .enumerate()
            .skip(start)
            .find_map(|(index, token)| is_marker(token).then_some(index))
            .unwrap_or(self.tokens.len())
    }

    /// Returns the tokens in `range`, clamped to the list bounds.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> &[String] {
        let end = range.end.min(self.tokens.len());
        let start = range.start.min(end);
        self.tokens.get(start..end).unwrap_or_default()
    }

    /// Removes and returns the token at `index`.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.tokens.len()).then(|| self.tokens.remove(index))
    }

    /// Removes the tokens in `range` (clamped to the list bounds) and returns
    /// them in order.
    pub fn drain(&mut self, range: Range<usize>) -> Vec<String> {
        let end = range.end.min(self.tokens.len());
        let start = range.start.min(end);
        self.tokens.drain(start..end).collect()
    }

    /// Returns the last remaining token.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Removes and returns the last remaining token.
    pub fn pop_last(&mut self) -> Option<String> {
        self.tokens.pop()
    }

    /// Removes and returns every remaining token.
    pub fn take_all(&mut self) -> Vec<String> {
        std::mem::take(&mut self.tokens)
    }

    /// Consumes the list, returning the unconsumed tokens.
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.tokens
    }
}

impl<S: Into<String>> FromIterator<S> for TokenList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for TokenList {
    fn from(tokens: [S; N]) -> Self {
        Self::new(tokens)
    }
}

impl From<Vec<String>> for TokenList {
    fn from(tokens: Vec<String>) -> Self {
        Self { tokens }
    }
}
