// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the unfurlbot configuration system.

use unfurlbot_config::diagnostic::{ConfigError, suggest_key};
use unfurlbot_config::model::UnfurlbotConfig;
use unfurlbot_config::{load_and_validate_str, load_config_from_str};

use unfurlbot_core::TimestampSource;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_unfurlbot_config() {
    let toml = r#"
[app]
name = "unfurlbot-dev"
log_level = "debug"
workers = 4
listen_addr = "0.0.0.0:8080"

[slack]
token = "xoxb-123"
api_url = "https://slack.example.org/api"
debounce_seconds = 120

[filter]
max_age_seconds = 600
timestamp_source = "thread"

[redis]
url = "redis://cache.example.org:6379/2"

[jira]
proxy_url = "https://proxy.example.org/jira-data-proxy"
root_url = "https://jira.example.org"
projects = ["DM", "RFC", "LDM"]
timeout_seconds = 10
token = "gt-abc"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.name, "unfurlbot-dev");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.app.workers, 4);
    assert_eq!(config.app.listen_addr, "0.0.0.0:8080");
    assert_eq!(config.slack.token.as_deref(), Some("xoxb-123"));
    assert_eq!(config.slack.api_url, "https://slack.example.org/api");
    assert_eq!(config.slack.debounce_seconds, 120);
    assert_eq!(config.filter.max_age_seconds, 600);
    assert_eq!(config.filter.timestamp_source, TimestampSource::Thread);
    assert_eq!(config.redis.url, "redis://cache.example.org:6379/2");
    assert_eq!(
        config.jira.proxy_url.as_deref(),
        Some("https://proxy.example.org/jira-data-proxy")
    );
    assert_eq!(config.jira.projects, ["DM", "RFC", "LDM"]);
    assert_eq!(config.jira.timeout_seconds, 10);
    assert_eq!(config.jira.token.as_deref(), Some("gt-abc"));
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.name, "unfurlbot");
    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.app.workers, 2);
    assert!(config.slack.token.is_none());
    assert_eq!(config.slack.debounce_seconds, 300);
    assert_eq!(config.filter.max_age_seconds, 300);
    assert_eq!(config.filter.timestamp_source, TimestampSource::Trigger);
    assert_eq!(config.redis.url, "redis://localhost:6379/0");
    assert!(config.jira.proxy_url.is_none());
    assert_eq!(config.jira.projects, ["DM", "RFC"]);
    assert_eq!(config.jira.timeout_seconds, 20);
}

/// Unknown field in [slack] produces an error mentioning the bad key.
#[test]
fn unknown_field_in_slack_produces_error() {
    let toml = r#"
[slack]
tokne = "xoxb"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("tokne"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[kafka]
brokers = ["localhost:9092"]
"#;

    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("kafka"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unknown key "tokne" in [slack] produces suggestion plus valid key list.
#[test]
fn diagnostic_tokne_suggests_token() {
    let toml = r#"
[slack]
tokne = "xoxb"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "tokne"
                && suggestion.as_deref() == Some("token")
                && valid_keys.contains("api_url")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error for 'tokne' with suggestion 'token', got: {errors:?}"
    );
}

/// Unknown key with no close match does NOT produce a suggestion.
#[test]
fn diagnostic_no_suggestion_for_distant_typo() {
    let valid_keys = &["token", "api_url", "debounce_seconds"];
    assert!(suggest_key("zzzzzz", valid_keys).is_none());
}

/// Invalid type (string where number expected) produces a clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[slack]
debounce_seconds = "not_a_number"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("debounce_seconds"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// ConfigError implements miette::Diagnostic (can be rendered).
#[test]
fn config_error_implements_diagnostic() {
    use miette::Diagnostic;

    let error = ConfigError::UnknownKey {
        key: "tokne".to_string(),
        suggestion: Some("token".to_string()),
        valid_keys: "token, api_url, debounce_seconds".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some(), "should have diagnostic code");

    let help = error.help().expect("should have help text").to_string();
    assert!(
        help.contains("did you mean `token`"),
        "help should contain suggestion, got: {help}"
    );
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::GraphicalReportHandler;

    let error = ConfigError::UnknownKey {
        key: "tokne".to_string(),
        suggestion: Some("token".to_string()),
        valid_keys: "token, api_url, debounce_seconds".to_string(),
        span: None,
        src: None,
    };

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("tokne"), "rendered report should mention the key");
}

/// load_and_validate_str with complete TOML returns Ok config.
#[test]
fn load_and_validate_complete_toml() {
    let toml = r#"
[slack]
token = "xoxb-123"

[jira]
proxy_url = "https://proxy.example.org"
token = "gt-abc"
"#;

    let config = load_and_validate_str(toml).expect("complete TOML should validate");
    assert_eq!(config.slack.token.as_deref(), Some("xoxb-123"));
}

/// Defaults alone fail validation: the required credentials are absent.
#[test]
fn defaults_alone_fail_validation() {
    let errors = load_and_validate_str("").expect_err("missing credentials should fail");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::MissingKey { key } if key == "slack.token")));
}

/// Validation catches an empty project list.
#[test]
fn validation_catches_empty_projects() {
    let toml = r#"
[slack]
token = "xoxb-123"

[jira]
proxy_url = "https://proxy.example.org"
token = "gt-abc"
projects = []
"#;

    let errors = load_and_validate_str(toml).expect_err("empty projects should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("jira.projects"))
    }));
}

/// Figment env-style dot notation merges into nested sections.
#[test]
fn dot_notation_merges_into_sections() {
    use figment::{Figment, providers::Serialized};

    let config: UnfurlbotConfig = Figment::new()
        .merge(Serialized::defaults(UnfurlbotConfig::default()))
        .merge(("slack.debounce_seconds", 30u64))
        .extract()
        .expect("should merge override");

    assert_eq!(config.slack.debounce_seconds, 30);
}
