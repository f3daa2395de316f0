// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into rich miette diagnostics.
//! Errors that originate in a TOML file get a source span pointing at the
//! offending key; errors that originate in the `PARLEY_*` environment layer
//! get the variable name in the help text instead, since there is no file
//! to point at. Unknown keys get a "did you mean?" suggestion via
//! Jaro-Winkler string similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// 0.75 catches common typos like `naem` -> `name` and
/// `smtp_hots` -> `smtp_host` while filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Prefix of the environment override layer.
const ENV_PREFIX: &str = "PARLEY_";

/// A configuration error with rich diagnostic information.
///
/// Each variant carries enough context for miette to render an Elm-style
/// error message with source spans, suggestions, and valid key listings.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no section of the schema accepts.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(parley::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys, env_var.as_deref()))
    )]
    UnknownKey {
        /// The key as written.
        key: String,
        /// Closest valid key, when one is similar enough.
        suggestion: Option<String>,
        /// Comma-joined valid keys for the section.
        valid_keys: String,
        /// The misspelled environment variable, when the key came from the
        /// `PARLEY_*` layer rather than a file.
        env_var: Option<String>,
        /// Where the key sits in the TOML source.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// Content of the file the key came from.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value whose type does not match the schema.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(parley::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path of the mistyped key.
        key: String,
        /// What was found versus what was wanted.
        detail: String,
        /// The expected type, for the help line.
        expected: String,
        /// Where the value sits in the TOML source.
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        /// Content of the file the value came from.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A key the schema requires but no layer supplied.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(parley::config::missing_key),
        help("add `{key} = <value>` to your parley.toml, or set {env_var}")
    )]
    MissingKey {
        /// The key that must be supplied.
        key: String,
        /// The environment variable that would also satisfy it.
        env_var: String,
    },

    /// A well-formed value that fails a semantic check.
    #[error("validation error: {message}")]
    #[diagnostic(code(parley::config::validation))]
    Validation {
        /// Human-readable reason the value was rejected.
        message: String,
    },

    /// Fallback for figment errors with no richer mapping.
    #[error("configuration error: {0}")]
    #[diagnostic(code(parley::config::other))]
    Other(String),
}

/// The `PARLEY_*` environment variable overriding a key.
///
/// `path` is the section path, e.g. `["mailer"]` with key `smtp_host`
/// maps to `PARLEY_MAILER_SMTP_HOST`.
pub fn env_var_name(path: &[String], key: &str) -> String {
    let mut var = String::from(ENV_PREFIX);
    for segment in path {
        var.push_str(&segment.to_uppercase());
        var.push('_');
    }
    var.push_str(&key.to_uppercase());
    var
}

fn unknown_key_help(
    suggestion: Option<&str>,
    valid_keys: &str,
    env_var: Option<&str>,
) -> String {
    let mut help = match suggestion {
        Some(s) => format!("did you mean `{s}`? "),
        None => String::new(),
    };
    if let Some(var) = env_var {
        help.push_str(&format!("this key was set via the {var} environment variable. "));
    }
    help.push_str(&format!("valid keys: {valid_keys}"));
    help
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// A figment error can hold several underlying errors; each becomes one
/// diagnostic. Unknown-field errors get a suggestion and, depending on the
/// layer they came from, either a TOML source span or an environment
/// variable hint.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();

    for error in err {
        let path: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();

        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let suggestion = suggest_key(field, &valid_keys);
                let valid_keys_str = valid_keys.join(", ");

                let (span, src) = if from_env_layer(&error) {
                    (None, None)
                } else {
                    locate_in_toml(&error, &path, field, toml_sources)
                };
                let env_var = from_env_layer(&error).then(|| env_var_name(&path, field));

                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion,
                    valid_keys: valid_keys_str,
                    env_var,
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => {
                let field = field.clone().into_owned();
                let env_var = env_var_name(&path, &field);
                ConfigError::MissingKey {
                    key: field,
                    env_var,
                }
            }
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
                span: None,
                src: None,
            },
            _ => ConfigError::Other(format!("{error}")),
        };

        errors.push(config_error);
    }

    errors
}

/// Whether the error originated in the environment override layer.
///
/// Figment's `Env` provider has no file source; its metadata names the
/// provider as environment variables.
fn from_env_layer(error: &figment::error::Error) -> bool {
    let Some(metadata) = error.metadata.as_ref() else {
        return false;
    };
    let file_sourced = matches!(metadata.source, Some(figment::Source::File(_)));
    !file_sourced && metadata.name.contains("environment")
}

/// Resolve a TOML source span for an error, when its provider was a file
/// we have the content of.
fn locate_in_toml(
    error: &figment::error::Error,
    path: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let source_path = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let source = source_path.as_ref().and_then(|wanted| {
        toml_sources
            .iter()
            .find(|(p, _)| p == wanted)
            .map(|(p, content)| (p.as_str(), content.as_str()))
    });

    match source {
        Some((file, content)) => match toml_key_offset(content, path, field) {
            Some(offset) => {
                let span = SourceSpan::new(offset.into(), field.len());
                let named = NamedSource::new(file, content.to_string());
                (Some(span), Some(named))
            }
            None => (None, None),
        },
        None => (None, None),
    }
}

/// Byte offset of a key in TOML content, scoped to a section path.
///
/// For `path = ["agent"]` and `field = "naem"`, finds the `[agent]` header
/// and then the first line after it whose key is `naem`. Top-level fields
/// search from the start of the content.
pub fn toml_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let search_start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
    };

    let mut offset = search_start;
    for line in content[search_start..].lines() {
        let key = line.split(['=', '#']).next().unwrap_or("").trim();
        if key == field {
            let indent = line.len() - line.trim_start().len();
            return Some(offset + indent);
        }
        offset += line.len() + 1;
    }

    None
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
///
/// Returns the best match above the similarity threshold, or `None` if
/// no valid key is close enough to the unknown key.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
