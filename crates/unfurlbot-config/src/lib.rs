// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration for the unfurl service.
//!
//! TOML files from the XDG hierarchy plus `UNFURLBOT_` environment
//! overrides, deserialized into strict models (`deny_unknown_fields`) and
//! checked by semantic validation. Failures render as miette diagnostics
//! with source spans and typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use unfurlbot_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Service: {}", config.app.name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::UnfurlbotConfig;

/// Loads from the XDG hierarchy and environment, then validates.
///
/// Figment failures are converted into spanned diagnostics before being
/// returned, so a caller can hand the error list straight to
/// [`render_errors`]. Validation problems come back through the same
/// error type.
pub fn load_and_validate() -> Result<UnfurlbotConfig, Vec<ConfigError>> {
    validated(loader::load_config(), read_candidate_files)
}

/// Loads from one TOML string and validates. No files, no environment.
pub fn load_and_validate_str(toml_content: &str) -> Result<UnfurlbotConfig, Vec<ConfigError>> {
    validated(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn validated(
    loaded: Result<UnfurlbotConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<UnfurlbotConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Re-reads whichever candidate config files exist so diagnostics can show
/// the offending line. Relative candidates are keyed by their absolute
/// path, matching how figment reports file sources.
fn read_candidate_files() -> Vec<(String, String)> {
    loader::config_file_candidates()
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            let key = if path.is_relative() {
                match std::env::current_dir() {
                    Ok(dir) => dir.join(&path).display().to_string(),
                    Err(_) => path.display().to_string(),
                }
            } else {
                path.display().to_string()
            };
            Some((key, content))
        })
        .collect()
}
