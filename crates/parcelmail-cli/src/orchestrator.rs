//! Pipeline orchestration: month windows → token collection → checkpoint
//! → detail extraction → flattening → workbook export.
//!
//! One unit of work failing (a window, a token) never aborts the run;
//! the remaining units proceed and the failure is logged.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use parcelmail_auditor::{AuditorError, RecordDetailExtractor};
use parcelmail_browser::{BrowserError, BrowserSession, PageActions};
use parcelmail_core::{
    dedup_tokens, month_windows, AppConfig, BrowserSettings, DateWindow, RetryPolicy,
};
use parcelmail_export::{flatten, read_tokens, rotate_outputs, write_tokens, write_workbook};
use parcelmail_recorder::{build_search_url, ResultListPaginator};
use std::path::Path;
use tracing::{info, warn};

/// Source of browser sessions for the pipeline.
///
/// The production provider launches Chromium over CDP; scenario tests
/// substitute scripted pages.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The session type handed to the paginator and extractor.
    type Session: PageActions;

    /// Open a fresh session.
    async fn open(&self, settings: &BrowserSettings) -> parcelmail_browser::Result<Self::Session>;

    /// Tear a session down, best-effort.
    async fn close(&self, session: Self::Session);
}

/// Launches real Chromium sessions.
pub struct CdpSessionProvider;

#[async_trait]
impl SessionProvider for CdpSessionProvider {
    type Session = BrowserSession;

    async fn open(&self, settings: &BrowserSettings) -> parcelmail_browser::Result<BrowserSession> {
        BrowserSession::open(settings).await
    }

    async fn close(&self, session: BrowserSession) {
        session.close().await;
    }
}

/// Run the whole pipeline for `[start, end]` in the working directory.
pub async fn run(config: &AppConfig, start: NaiveDate, end: NaiveDate) -> Result<()> {
    let cwd = std::env::current_dir().context("resolving working directory")?;
    run_with(config, start, end, &cwd, &CdpSessionProvider).await
}

/// Pipeline body, parameterized over the session source and the
/// directory output files land in.
pub async fn run_with<S: SessionProvider>(
    config: &AppConfig,
    start: NaiveDate,
    end: NaiveDate,
    out_dir: &Path,
    sessions: &S,
) -> Result<()> {
    let retry = RetryPolicy::from_settings(&config.retry);
    let windows = month_windows(start, end);
    info!(windows = windows.len(), "chunked date range into month windows");

    // Phase 1: collect parcel tokens, one fresh browser session per window
    let mut raw_tokens: Vec<String> = Vec::new();
    for window in &windows {
        info!("collecting window {window}");
        match collect_window_tokens(config, &retry, window, sessions).await {
            Ok(tokens) => {
                info!(count = tokens.len(), "window {window} collected");
                raw_tokens.extend(tokens);
            }
            Err(e) => warn!("window {window} failed, continuing: {e}"),
        }
    }

    // Checkpoint the deduplicated token set, then reload it so a rerun
    // after a crash between phases starts from the same file
    let tokens_path = out_dir.join(&config.export.tokens_file);
    let deduped = dedup_tokens(&raw_tokens);
    write_tokens(&tokens_path, &deduped).context("writing token checkpoint")?;

    let reloaded = read_tokens(&tokens_path).context("reading token checkpoint")?;
    let parcels = dedup_tokens(&reloaded);
    info!(count = parcels.len(), "tokens ready for detail extraction");

    // Phase 2: one shared session across all detail lookups
    let session = retry
        .run("browser launch", BrowserError::is_transient, || {
            sessions.open(&config.browser)
        })
        .await
        .context("launching detail-extraction browser")?;

    let mut records = Vec::new();
    for parcel in &parcels {
        info!("processing record {parcel}");
        let result = retry
            .run("detail extraction", AuditorError::is_transient, || {
                let extractor = RecordDetailExtractor::new(&session, &config.auditor);
                async move { extractor.extract(parcel.as_str()).await }
            })
            .await;
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!("extraction failed for {parcel}, continuing: {e}"),
        }
    }
    sessions.close(session).await;

    // Phase 3: flatten and export
    let rows = flatten(&records);
    rotate_outputs(out_dir, &config.export).context("rotating previous outputs")?;
    let output_path = out_dir.join(&config.export.output_file);
    write_workbook(&output_path, &rows).context("writing workbook")?;

    info!(
        rows = rows.len(),
        "run complete, output at {}",
        output_path.display()
    );
    Ok(())
}

/// Collect one window's tokens with a dedicated browser session. The
/// session is closed on every path out.
async fn collect_window_tokens<S: SessionProvider>(
    config: &AppConfig,
    retry: &RetryPolicy,
    window: &DateWindow,
    sessions: &S,
) -> Result<Vec<String>> {
    let url = build_search_url(&config.recorder, window).context("building search url")?;
    info!("search url: {url}");

    let session = retry
        .run("browser launch", BrowserError::is_transient, || {
            sessions.open(&config.browser)
        })
        .await
        .context("launching pagination browser")?;

    let tokens = match session.navigate(&url).await {
        Ok(()) => {
            ResultListPaginator::new(&session, &config.recorder)
                .collect_window()
                .await
        }
        Err(e) => {
            warn!("navigation failed for window {window}: {e}");
            Vec::new()
        }
    };

    sessions.close(session).await;
    Ok(tokens)
}
