// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./unfurlbot.toml` > `~/.config/unfurlbot/unfurlbot.toml`
//! > `/etc/unfurlbot/unfurlbot.toml` with environment variable overrides via
//! `UNFURLBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::UnfurlbotConfig;

/// Config file locations in merge order, lowest precedence first.
pub(crate) fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("/etc/unfurlbot/unfurlbot.toml")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("unfurlbot/unfurlbot.toml"));
    }
    candidates.push(PathBuf::from("unfurlbot.toml"));
    candidates
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/unfurlbot/unfurlbot.toml` (system-wide)
/// 3. `~/.config/unfurlbot/unfurlbot.toml` (user XDG config)
/// 4. `./unfurlbot.toml` (local directory)
/// 5. `UNFURLBOT_*` environment variables
pub fn load_config() -> Result<UnfurlbotConfig, figment::Error> {
    let mut figment = Figment::new().merge(Serialized::defaults(UnfurlbotConfig::default()));
    for candidate in config_file_candidates() {
        figment = figment.merge(Toml::file(candidate));
    }
    figment.merge(env_provider()).extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<UnfurlbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(UnfurlbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<UnfurlbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(UnfurlbotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `UNFURLBOT_JIRA_PROXY_URL` must map to
/// `jira.proxy_url`, not `jira.proxy.url`.
fn env_provider() -> Env {
    Env::prefixed("UNFURLBOT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: UNFURLBOT_SLACK_DEBOUNCE_SECONDS -> "slack_debounce_seconds"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("app_", "app.", 1)
            .replacen("slack_", "slack.", 1)
            .replacen("filter_", "filter.", 1)
            .replacen("redis_", "redis.", 1)
            .replacen("jira_", "jira.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_string_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[slack]
token = "xoxb-123"
debounce_seconds = 60

[jira]
projects = ["DM"]
"#,
        )
        .unwrap();
        assert_eq!(config.slack.token.as_deref(), Some("xoxb-123"));
        assert_eq!(config.slack.debounce_seconds, 60);
        assert_eq!(config.jira.projects, ["DM"]);
        // Untouched sections keep their defaults.
        assert_eq!(config.app.workers, 2);
    }

    #[test]
    fn later_layers_override_earlier_ones() {
        // Same layering the env provider participates in.
        let config: UnfurlbotConfig = Figment::new()
            .merge(Serialized::defaults(UnfurlbotConfig::default()))
            .merge(Toml::string("[slack]\ntoken = \"xoxb-from-file\"\n"))
            .merge(("slack.token", "xoxb-from-env"))
            .extract()
            .unwrap();
        assert_eq!(config.slack.token.as_deref(), Some("xoxb-from-env"));
    }

    #[test]
    fn env_keys_map_underscored_names_to_the_right_section() {
        // UNFURLBOT_JIRA_PROXY_URL must become jira.proxy_url, with only
        // the first underscore read as a section separator.
        let config: UnfurlbotConfig = Figment::new()
            .merge(Serialized::defaults(UnfurlbotConfig::default()))
            .merge(("jira.proxy_url", "https://proxy.example.org"))
            .merge(("filter.max_age_seconds", 0u64))
            .extract()
            .unwrap();
        assert_eq!(
            config.jira.proxy_url.as_deref(),
            Some("https://proxy.example.org")
        );
        assert_eq!(config.filter.max_age_seconds, 0);
    }

    #[test]
    fn missing_config_file_is_silently_skipped() {
        let config = load_config_from_path(Path::new("/nonexistent/unfurlbot.toml")).unwrap();
        assert_eq!(config.app.name, "unfurlbot");
    }
}
