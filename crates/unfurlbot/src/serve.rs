// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `unfurlbot serve` command implementation.
//!
//! Wires the configured domains, the Redis debounce store, and the Slack
//! dispatcher into the processing pipeline, then runs the HTTP ingest
//! server and the worker loop until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{error, info};

use unfurlbot_cache::RedisDebounceStore;
use unfurlbot_config::UnfurlbotConfig;
use unfurlbot_core::UnfurlbotError;
use unfurlbot_jira::{JiraIssueClient, JiraKeyExtractor, JiraUnfurler};
use unfurlbot_pipeline::{
    ChannelSource, DomainUnfurler, MessageSource, ProcessorSettings, UnfurlProcessor,
};
use unfurlbot_slack::SlackClient;

use crate::ingest::{self, IngestState};
use crate::shutdown;

/// Events buffered between the ingest endpoint and the worker loop before
/// the endpoint starts answering 503.
const INGEST_QUEUE_DEPTH: usize = 256;

/// Runs the `unfurlbot serve` command.
///
/// Connects external collaborators first so misconfiguration fails the
/// process before the ingest endpoint starts accepting events. Supports
/// graceful shutdown via signal handlers.
pub async fn run_serve(config: UnfurlbotConfig) -> Result<(), UnfurlbotError> {
    init_tracing(&config.app.log_level);

    info!(
        name = config.app.name.as_str(),
        version = env!("CARGO_PKG_VERSION"),
        "starting unfurlbot serve"
    );

    let http = reqwest::Client::builder()
        .user_agent(concat!("unfurlbot/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| UnfurlbotError::Internal(format!("http client initialization failed: {e}")))?;

    let debounce = Arc::new(RedisDebounceStore::connect(&config.redis.url).await?);
    info!(url = config.redis.url.as_str(), "debounce store connected");

    let slack_token = require(&config.slack.token, "slack.token")?;
    let dispatcher = Arc::new(SlackClient::new(
        http.clone(),
        slack_token,
        &config.slack.api_url,
    ));

    let jira_proxy_url = require(&config.jira.proxy_url, "jira.proxy_url")?;
    let jira_token = require(&config.jira.token, "jira.token")?;
    let jira = JiraUnfurler::new(
        JiraKeyExtractor::new(&config.jira.root_url, &config.jira.projects)?,
        JiraIssueClient::new(
            http,
            jira_proxy_url,
            &config.jira.root_url,
            jira_token,
            Duration::from_secs(config.jira.timeout_seconds),
        ),
    );
    info!(
        projects = config.jira.projects.join(",").as_str(),
        "jira domain registered"
    );

    let unfurlers: Vec<Arc<dyn DomainUnfurler>> = vec![Arc::new(jira)];
    let processor = Arc::new(UnfurlProcessor::new(
        unfurlers,
        debounce,
        dispatcher,
        ProcessorSettings {
            max_message_age: Duration::from_secs(config.filter.max_age_seconds),
            timestamp_source: config.filter.timestamp_source,
            debounce_ttl: Duration::from_secs(config.slack.debounce_seconds),
        },
    ));

    let (queue, source) = ChannelSource::new(INGEST_QUEUE_DEPTH);
    let cancel = shutdown::install_signal_handler();

    let app = ingest::router(IngestState {
        queue,
        service_name: config.app.name.clone(),
    });
    let listener = tokio::net::TcpListener::bind(&config.app.listen_addr)
        .await
        .map_err(|e| {
            UnfurlbotError::Internal(format!(
                "failed to bind to {}: {e}",
                config.app.listen_addr
            ))
        })?;
    info!(addr = config.app.listen_addr.as_str(), "ingest server listening");

    let server_cancel = cancel.clone();
    let server = tokio::spawn(async move {
        let shutdown = async move { server_cancel.cancelled().await };
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            error!(error = %e, "ingest server error");
        }
    });

    run_worker_loop(source, processor, config.app.workers, cancel.clone()).await;

    cancel.cancel();
    let _ = server.await;
    info!("unfurlbot serve shutdown complete");
    Ok(())
}

/// Consumes queued trigger messages until cancellation or queue closure.
///
/// At most `workers` messages are processed concurrently; tokens within a
/// message are already handled sequentially by the processor. Messages
/// already handed to a worker when cancellation fires run to completion
/// before this function returns.
async fn run_worker_loop(
    mut source: ChannelSource,
    processor: Arc<UnfurlProcessor>,
    workers: usize,
    cancel: tokio_util::sync::CancellationToken,
) {
    let permits = workers.max(1) as u32;
    let semaphore = Arc::new(Semaphore::new(permits as usize));

    loop {
        let message = tokio::select! {
            next = source.next_message() => match next {
                Ok(Some(message)) => message,
                Ok(None) => {
                    info!("ingest queue closed, worker loop ending");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "message source failed, worker loop ending");
                    break;
                }
            },
            _ = cancel.cancelled() => {
                info!("worker loop shutting down");
                break;
            }
        };

        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            // Closed semaphores cannot happen here; bail instead of panicking.
            Err(_) => break,
        };
        let processor = processor.clone();
        tokio::spawn(async move {
            processor.process_message(&message).await;
            drop(permit);
        });
    }

    // Reacquiring every permit waits out the in-flight workers, so a
    // message mid-dispatch is posted before the runtime goes away.
    let _ = semaphore.acquire_many(permits).await;
}

fn require<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str, UnfurlbotError> {
    value
        .as_deref()
        .ok_or_else(|| UnfurlbotError::Config(format!("{key} is required")))
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    // Every workspace crate shares the `unfurlbot` target prefix apart
    // from the underscore spelling, so list them explicitly.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "unfurlbot={l},unfurlbot_pipeline={l},unfurlbot_slack={l},\
             unfurlbot_jira={l},unfurlbot_cache={l},warn",
            l = log_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
