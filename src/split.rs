//! Escape-aware splitting of delimited configuration values.
//!
//! Used for values such as NFS export lists where a delimiter may appear
//! inside a token, either escaped (`a\,b`) or as part of a real path name.

use thiserror::Error;

use crate::common::paths::{is_dir, is_file};

/// Escape marker used by [`split_valid_paths`].
pub const PATH_ESCAPE: char = '\\';

/// Errors raised when delimiter/escape characters come from untyped input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    #[error("{what} must be exactly one character, got {value:?}")]
    NotSingleChar { what: &'static str, value: String },

    #[error("delimiter and escape marker must differ (both {0:?})")]
    SameChar(char),
}

/// A validated delimiter/escape pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub delim: char,
    pub escape: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            delim: ',',
            escape: PATH_ESCAPE,
        }
    }
}

impl Delimiters {
    /// Build a pair from strings, as they arrive from the CLI or a config file.
    pub fn new(delim: &str, escape: &str) -> Result<Self, SplitError> {
        let delim = single_char("delimiter", delim)?;
        let escape = single_char("escape marker", escape)?;
        if delim == escape {
            return Err(SplitError::SameChar(delim));
        }
        Ok(Self { delim, escape })
    }

    pub fn split(&self, input: &str) -> Vec<String> {
        split_escaped(input, self.delim, self.escape)
    }

    pub fn split_valid_paths(&self, input: &str) -> Vec<String> {
        split_valid_paths_with(input, self.delim, self.escape, path_exists)
    }
}

fn single_char(what: &'static str, value: &str) -> Result<char, SplitError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(SplitError::NotSingleChar {
            what,
            value: value.to_string(),
        }),
    }
}

/// Split `input` at every delimiter not preceded by `escape`.
///
/// The escape marker is dropped and the character after it is kept
/// literally. The remainder after the last split always forms the final
/// token, so `"a,"` yields `["a", ""]` and `""` yields `[""]`.
///
/// The first character of the input is never a split point: `","` yields
/// `[","]`, matching existing configuration files.
pub fn split_escaped(input: &str, delim: char, escape: char) -> Vec<String> {
    let (mut tokens, rest) = scan(input, delim, escape, |_| true);
    tokens.push(rest);
    tokens
}

/// Split `input` at unescaped delimiters, but only where the text
/// accumulated so far names an existing file or directory.
///
/// Delimiters that follow a non-existent prefix are kept in the token, so
/// `/srv/a,b,/home` splits into `["/srv/a,b", "/home"]` when `/srv/a,b`
/// exists and `/srv/a` does not. Never yields empty tokens.
pub fn split_valid_paths(input: &str, delim: char) -> Vec<String> {
    split_valid_paths_with(input, delim, PATH_ESCAPE, path_exists)
}

/// [`split_valid_paths`] with an explicit escape marker and existence check.
pub fn split_valid_paths_with<F>(input: &str, delim: char, escape: char, exists: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let (mut tokens, rest) = scan(input, delim, escape, |token| !token.is_empty() && exists(token));
    if !rest.is_empty() {
        tokens.push(rest);
    }
    tokens
}

fn path_exists(path: &str) -> bool {
    is_dir(path) || is_file(path)
}

/// Returns the completed tokens and the unfinished remainder.
fn scan<F>(input: &str, delim: char, escape: char, accept: F) -> (Vec<String>, String)
where
    F: Fn(&str) -> bool,
{
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars();
    let mut leading = true;

    while let Some(c) = chars.next() {
        if c == escape {
            // A trailing escape has nothing to protect and stays literal.
            current.push(chars.next().unwrap_or(c));
        } else if c == delim && !leading && accept(&current) {
            tokens.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
        leading = false;
    }

    (tokens, current)
}
