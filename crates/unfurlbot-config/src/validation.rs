// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: required credentials, a parseable listen address, and
//! well-formed project codes.

use crate::diagnostic::ConfigError;
use crate::model::UnfurlbotConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &UnfurlbotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` is not one of {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.app.workers == 0 {
        errors.push(ConfigError::Validation {
            message: "app.workers must be at least 1".to_string(),
        });
    }

    if config.app.listen_addr.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.listen_addr `{}` is not a valid socket address",
                config.app.listen_addr
            ),
        });
    }

    match &config.slack.token {
        Some(token) if !token.trim().is_empty() => {}
        _ => errors.push(ConfigError::MissingKey {
            key: "slack.token".to_string(),
        }),
    }

    if !config.redis.url.starts_with("redis://") && !config.redis.url.starts_with("rediss://") {
        errors.push(ConfigError::Validation {
            message: format!(
                "redis.url `{}` must start with redis:// or rediss://",
                config.redis.url
            ),
        });
    }

    match &config.jira.proxy_url {
        Some(url) if !url.trim().is_empty() => {}
        _ => errors.push(ConfigError::MissingKey {
            key: "jira.proxy_url".to_string(),
        }),
    }

    match &config.jira.token {
        Some(token) if !token.trim().is_empty() => {}
        _ => errors.push(ConfigError::MissingKey {
            key: "jira.token".to_string(),
        }),
    }

    if config.jira.projects.is_empty() {
        errors.push(ConfigError::Validation {
            message: "jira.projects must name at least one project code".to_string(),
        });
    }
    for project in &config.jira.projects {
        if project.is_empty() || !project.chars().all(|c| c.is_ascii_uppercase()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "jira project code `{project}` must be uppercase ASCII letters"
                ),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
