// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rich config diagnostics.
//!
//! Figment reports deserialization problems as a flat error chain; this
//! module turns each entry into a miette diagnostic that points at the
//! offending line of the TOML file and, for misspelled keys, proposes the
//! closest valid key by Jaro-Winkler similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity floor below which no key suggestion is offered. At 0.75 a
/// transposition like `tokne` still maps to `token` but unrelated keys
/// stay quiet.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// One reportable configuration problem.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no config section declares.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(unfurlbot::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The misspelled or stray key.
        key: String,
        /// Closest valid key, when one is similar enough.
        suggestion: Option<String>,
        /// Comma-joined keys the section accepts.
        valid_keys: String,
        /// Where the key sits in the TOML source, when locatable.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// The TOML file the span indexes into.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value whose TOML type does not match the model.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(unfurlbot::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path of the mistyped key.
        key: String,
        /// Found-versus-expected description.
        detail: String,
        /// The type the model wants.
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A key the service cannot run without.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(unfurlbot::config::missing_key),
        help("add `{key} = <value>` to your unfurlbot.toml or set the matching UNFURLBOT_ variable")
    )]
    MissingKey {
        /// Dotted path of the absent key.
        key: String,
    },

    /// A well-typed value that fails a semantic check.
    #[error("validation error: {message}")]
    #[diagnostic(code(unfurlbot::config::validation))]
    Validation {
        /// What the value violates.
        message: String,
    },

    /// Anything figment reports that has no dedicated variant.
    #[error("configuration error: {0}")]
    #[diagnostic(code(unfurlbot::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(candidate) => format!("did you mean `{candidate}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Split a `figment::Error` into per-problem [`ConfigError`]s.
///
/// Figment bundles every deserialization failure into one error value; each
/// is classified separately so a config file with three typos produces three
/// spanned reports in a single run.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|entry| classify_entry(entry, toml_sources))
        .collect()
}

fn classify_entry(
    entry: figment::error::Error,
    toml_sources: &[(String, String)],
) -> ConfigError {
    use figment::error::Kind;

    match &entry.kind {
        Kind::UnknownField(field, accepted) => {
            let accepted: Vec<&str> = accepted.to_vec();
            let (span, src) = locate_in_sources(&entry, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, &accepted),
                valid_keys: accepted.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: field.clone().into_owned(),
        },
        Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
            key: dotted_path(&entry),
            detail: format!("found {actual}, expected {expected}"),
            expected: expected.to_string(),
            span: None,
            src: None,
        },
        _ => ConfigError::Other(entry.to_string()),
    }
}

fn dotted_path(entry: &figment::error::Error) -> String {
    entry
        .path
        .iter()
        .map(|segment| segment.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Resolve a figment error to a span inside one of the loaded TOML files.
///
/// Only file-backed providers carry a usable source; env-var errors come
/// back without a span and render as plain messages.
fn locate_in_sources(
    entry: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let file = entry
        .metadata
        .as_ref()
        .and_then(|metadata| metadata.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let Some(file) = file else {
        return (None, None);
    };

    let section: Vec<String> = entry.path.iter().map(|s| s.to_string()).collect();
    for (path, content) in toml_sources {
        if *path != file {
            continue;
        }
        if let Some(offset) = find_key_offset(content, &section, field) {
            return (
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(path, content.clone())),
            );
        }
    }

    (None, None)
}

/// Byte offset of `field` within `content`, scoped to the `[section]` named
/// by the first path segment (or the whole file for top-level keys).
///
/// The match must start a line and be terminated by `=` or whitespace so a
/// field named `token` never lands inside `bot_token`.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let scope_start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
    };

    let mut line_start = scope_start;
    for line in content[scope_start..].lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix(field)
            && matches!(rest.as_bytes().first(), Some(b'=' | b' ' | b'\t'))
        {
            return Some(line_start + (line.len() - trimmed.len()));
        }
        line_start += line.len() + 1;
    }

    None
}

/// Closest valid key to `unknown`, or `None` when nothing clears the
/// similarity floor.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr through miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_token_for_transposed_typo() {
        let valid = &["token", "api_url", "debounce_seconds"];
        assert_eq!(suggest_key("tokne", valid), Some("token".to_string()));
    }

    #[test]
    fn suggests_proxy_url_over_other_urls() {
        let valid = &["proxy_url", "root_url", "projects", "timeout_seconds"];
        assert_eq!(
            suggest_key("proxy_ulr", valid),
            Some("proxy_url".to_string())
        );
    }

    #[test]
    fn distant_typo_gets_no_suggestion() {
        let valid = &["token", "api_url", "debounce_seconds"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn key_offset_points_at_the_key_inside_its_section() {
        let content = "[slack]\ntokne = \"xoxb\"\n";
        let path = vec!["slack".to_string()];
        let offset = find_key_offset(content, &path, "tokne").unwrap();
        assert_eq!(&content[offset..offset + 5], "tokne");
    }

    #[test]
    fn key_offset_does_not_match_a_suffix_of_a_longer_key() {
        let content = "[slack]\nbot_token = \"x\"\ntoken = \"y\"\n";
        let path = vec!["slack".to_string()];
        let offset = find_key_offset(content, &path, "token").unwrap();
        assert_eq!(&content[offset..offset + 9], "token = \"");
    }

    #[test]
    fn top_level_key_searches_from_the_start() {
        let content = "naem = \"x\"\n[slack]\n";
        assert_eq!(find_key_offset(content, &[], "naem"), Some(0));
    }
}
