// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the unfurl bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

use unfurlbot_core::TimestampSource;

/// Top-level unfurlbot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections have defaults; required credentials are checked
/// during validation rather than deserialization so every problem is
/// reported in one pass.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UnfurlbotConfig {
    /// Service identity and runtime settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Slack API settings.
    #[serde(default)]
    pub slack: SlackConfig,

    /// Trigger-message staleness filtering.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Redis debounce store settings.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Jira issue domain settings.
    #[serde(default)]
    pub jira: JiraConfig,
}

/// Service identity and runtime configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Service name used in logs and the health endpoint.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of messages processed concurrently.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Address the HTTP server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
            workers: default_workers(),
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_app_name() -> String {
    "unfurlbot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_workers() -> usize {
    2
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

/// Slack API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SlackConfig {
    /// Bot user OAuth token. Required.
    #[serde(default)]
    pub token: Option<String>,

    /// Slack Web API base URL.
    #[serde(default = "default_slack_api_url")]
    pub api_url: String,

    /// Debounce window in seconds: at most one unfurl per conversation and
    /// identifier within this window. `0` disables debouncing.
    #[serde(default = "default_debounce_seconds")]
    pub debounce_seconds: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_slack_api_url(),
            debounce_seconds: default_debounce_seconds(),
        }
    }
}

fn default_slack_api_url() -> String {
    "https://slack.com/api".to_string()
}

fn default_debounce_seconds() -> u64 {
    300
}

/// Trigger-message staleness filtering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Maximum trigger-message age in seconds before it is discarded.
    /// `0` disables the staleness filter.
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: u64,

    /// Which timestamp the age check reads: the triggering message's own
    /// (`trigger`) or the thread root's (`thread`).
    #[serde(default)]
    pub timestamp_source: TimestampSource,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_age_seconds: default_max_age_seconds(),
            timestamp_source: TimestampSource::default(),
        }
    }
}

fn default_max_age_seconds() -> u64 {
    300
}

/// Redis debounce store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RedisConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379/0".to_string()
}

/// Jira issue domain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JiraConfig {
    /// Base URL of the Jira data proxy issues are fetched through. Required.
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// Jira instance root used to build browse links.
    #[serde(default = "default_jira_root_url")]
    pub root_url: String,

    /// Project codes whose issue keys get unfurled.
    #[serde(default = "default_jira_projects")]
    pub projects: Vec<String>,

    /// Per-request timeout for proxy fetches, in seconds.
    #[serde(default = "default_jira_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Bearer token for the data proxy. Required.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            proxy_url: None,
            root_url: default_jira_root_url(),
            projects: default_jira_projects(),
            timeout_seconds: default_jira_timeout_seconds(),
            token: None,
        }
    }
}

fn default_jira_root_url() -> String {
    "https://jira.example.org".to_string()
}

fn default_jira_projects() -> Vec<String> {
    vec!["DM".to_string(), "RFC".to_string()]
}

fn default_jira_timeout_seconds() -> u64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = UnfurlbotConfig::default();
        assert_eq!(config.app.name, "unfurlbot");
        assert_eq!(config.app.workers, 2);
        assert_eq!(config.app.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.slack.api_url, "https://slack.com/api");
        assert_eq!(config.slack.debounce_seconds, 300);
        assert_eq!(config.filter.max_age_seconds, 300);
        assert_eq!(config.filter.timestamp_source, TimestampSource::Trigger);
        assert_eq!(config.redis.url, "redis://localhost:6379/0");
        assert_eq!(config.jira.projects, ["DM", "RFC"]);
        assert_eq!(config.jira.timeout_seconds, 20);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml_str = r#"
[slack]
token = "xoxb-123"
debounce_secnods = 60
"#;
        assert!(toml::from_str::<UnfurlbotConfig>(toml_str).is_err());
    }

    #[test]
    fn timestamp_source_deserializes_from_lowercase() {
        let toml_str = r#"
[filter]
timestamp_source = "thread"
"#;
        let config: UnfurlbotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.filter.timestamp_source, TimestampSource::Thread);
    }
}
