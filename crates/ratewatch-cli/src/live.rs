//! `live` and `history` command handlers.
//!
//! Both open one browser session, reuse it for every member, and close it at
//! the end. A member whose published or live lookup fails still produces a
//! result; nothing one member does aborts the batch.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use ratewatch_api::{ApiError, PublishedClient, PublishedMember};
use ratewatch_core::{cutoff_date, AppConfig, RatingSnapshot};
use ratewatch_crawler::{BrowserOptions, CrawlOptions, LiveCrawler, WebDriverSession};

use crate::output::{self, OutputMode};
use crate::LiveArgs;

/// Bound on one WebDriver round trip; navigation blocks until the page loads.
const SESSION_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Published and live ratings for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MemberRatings {
    pub id: String,
    pub name: String,
    pub published: RatingSnapshot,
    pub live: RatingSnapshot,
}

/// Run the `live` command.
///
/// # Errors
///
/// Returns an error if ids cannot be gathered, the published-ratings client
/// cannot be built, or results cannot be written.
pub(crate) async fn run_live(config: &AppConfig, args: &LiveArgs) -> anyhow::Result<()> {
    let ids = crate::ids::gather_ids(&args.ids, args.input.as_deref(), Path::new("."))?;
    let mode = OutputMode::select(args.wants_csv(), ids.len());
    let cutoff = cutoff_date();
    let client = build_published_client(config)?;

    tracing::info!(members = ids.len(), %cutoff, ?mode, "starting live run");

    let mut crawler = match start_crawler(config).await {
        Ok(crawler) => Some(crawler),
        Err(e) => {
            tracing::error!("live crawl unavailable, reporting published ratings only: {e:#}");
            None
        }
    };

    let mut results = Vec::with_capacity(ids.len());
    for (index, id) in ids.iter().enumerate() {
        tracing::info!(
            person_id = %id,
            progress = %format_args!("{}/{}", index + 1, ids.len()),
            "processing member"
        );
        let member = fetch_published(&client, id).await;
        let live = match crawler.as_mut() {
            Some(crawler) => crawler.crawl(id, &member.ratings, cutoff).await.live,
            None => member.ratings.clone(),
        };
        results.push(MemberRatings {
            id: id.clone(),
            name: member.name,
            published: member.ratings,
            live,
        });
    }

    if let Some(crawler) = crawler {
        close_session(crawler).await;
    }

    match mode {
        OutputMode::Csv => output::write_live_csv(std::io::stdout().lock(), &results)?,
        OutputMode::Table => print!("{}", output::render_table(&results)),
        OutputMode::File => {
            let file = std::fs::File::create(&args.output)
                .with_context(|| format!("failed to create {}", args.output.display()))?;
            output::write_comparison_csv(file, &results)?;
            println!(
                "Saved {} records to '{}'",
                results.len(),
                args.output.display()
            );
        }
    }

    Ok(())
}

/// Run the `history` command: crawl one member and print the per-event
/// breakdown.
///
/// # Errors
///
/// Returns an error if the client or the browser session cannot be started.
pub(crate) async fn run_history(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let client = build_published_client(config)?;
    let cutoff = cutoff_date();
    let member = fetch_published(&client, id).await;

    let mut crawler = start_crawler(config).await?;
    let report = crawler.crawl(id, &member.ratings, cutoff).await;
    close_session(crawler).await;

    print!("{}", output::render_history(&member.name, &report));
    Ok(())
}

pub(crate) fn build_published_client(config: &AppConfig) -> anyhow::Result<PublishedClient> {
    PublishedClient::new(
        &config.api_url,
        &config.site_url,
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_ms,
    )
    .context("failed to build published-ratings client")
}

/// Published record for `id`; failures degrade to [`PublishedMember::unknown`].
pub(crate) async fn fetch_published(client: &PublishedClient, id: &str) -> PublishedMember {
    match client.fetch_member(id).await {
        Ok(member) => member,
        Err(ApiError::NotFound { .. }) => {
            tracing::warn!(person_id = id, "member not found in published ratings");
            PublishedMember::unknown()
        }
        Err(e) => {
            tracing::warn!(person_id = id, error = %e, "published ratings unavailable");
            PublishedMember::unknown()
        }
    }
}

async fn start_crawler(config: &AppConfig) -> anyhow::Result<LiveCrawler<WebDriverSession>> {
    let options = CrawlOptions::from_config(config).context("invalid crawl configuration")?;
    let browser = BrowserOptions {
        headless: config.headless,
        user_agent: config.user_agent.clone(),
        ..BrowserOptions::default()
    };
    let session = WebDriverSession::start(&config.webdriver_url, &browser, SESSION_COMMAND_TIMEOUT)
        .await
        .with_context(|| format!("failed to start browser session at {}", config.webdriver_url))?;
    Ok(LiveCrawler::new(session, options))
}

async fn close_session(crawler: LiveCrawler<WebDriverSession>) {
    let mut session = crawler.into_driver();
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "failed to close browser session");
    }
}
