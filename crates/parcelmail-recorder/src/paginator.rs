//! State machine over the recorder's paginated search-results list.
//!
//! Pagination is best-effort per window: transient row failures skip the
//! row, losing page state aborts the window, and the partial token set is
//! returned rather than an error.

use parcelmail_browser::{BrowserError, Lookup, PageActions};
use parcelmail_core::RecorderSettings;
use std::time::Duration;

/// Marker rendered when a search matches nothing.
pub const NO_RESULTS_MARKER: &str = r#"//h3[text() =" No Results Found "]"#;
/// Total-record-count caption, format "... of <N> ...".
pub const RESULT_TOTALS: &str = r#"//span[@aria-label="Search Result Totals"]"#;
/// Rows of the results table.
pub const RESULT_ROWS: &str = r#"//div[@data-tourid="searchResults"]//table/tbody/tr"#;
/// Parcel-id cells in a row's detail panel.
pub const PIN_CELLS: &str = r#"//table[@class="css-1uz5dol"]/tbody/tr/td[7]"#;
/// Control returning from a row's detail panel to the list.
pub const BACK_BUTTON: &str = r#"//button[@class="css-1ihxvt8"]"#;
/// Pagination advance control.
pub const NEXT_BUTTON: &str = r#"//button[@aria-label="next page"]"#;

/// How often the initial load poll re-queries the page.
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    AwaitingLoad,
    HasRows,
    NoResults,
    Exhausted,
}

/// Walks one window's search results, clicking each row open to read its
/// parcel-id cells and advancing pages until the next control disables.
pub struct ResultListPaginator<'a, P: PageActions + ?Sized> {
    page: &'a P,
    settings: &'a RecorderSettings,
}

impl<'a, P: PageActions + ?Sized> ResultListPaginator<'a, P> {
    pub fn new(page: &'a P, settings: &'a RecorderSettings) -> Self {
        Self { page, settings }
    }

    /// Collect every parcel token reachable from the current results page.
    ///
    /// Never fails: any unrecoverable condition ends pagination and the
    /// tokens gathered so far are the result for this window.
    pub async fn collect_window(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut state = PageState::AwaitingLoad;
        let mut page_number = 1u32;

        loop {
            state = match state {
                PageState::AwaitingLoad => self.await_load().await,
                PageState::HasRows => {
                    self.log_result_total().await;
                    tracing::info!(page_number, "processing results page");
                    let next = self.collect_page(&mut tokens).await;
                    page_number += 1;
                    next
                }
                PageState::NoResults => {
                    tracing::info!("no results for this window");
                    break;
                }
                PageState::Exhausted => break,
            };
        }

        tracing::info!(count = tokens.len(), "window pagination finished");
        tokens
    }

    /// Wait for either the no-results marker or rows. The portal's
    /// server-side search can take minutes to render, so rows are polled
    /// under the long results timeout; the marker probe stops after its
    /// own shorter timeout.
    async fn await_load(&self) -> PageState {
        let start = tokio::time::Instant::now();
        let marker_deadline =
            start + Duration::from_secs(self.settings.no_results_timeout_secs);
        let deadline = start + Duration::from_secs(self.settings.results_timeout_secs);
        loop {
            if tokio::time::Instant::now() < marker_deadline {
                match self.page.count(NO_RESULTS_MARKER).await {
                    Ok(n) if n > 0 => return PageState::NoResults,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("probing for results failed: {e}");
                        return PageState::Exhausted;
                    }
                }
            }
            match self.page.count(RESULT_ROWS).await {
                Ok(n) if n > 0 => return PageState::HasRows,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("probing for result rows failed: {e}");
                    return PageState::Exhausted;
                }
            }
            if tokio::time::Instant::now() >= deadline {
                tracing::warn!("results never rendered, giving up on this window");
                return PageState::Exhausted;
            }
            tokio::time::sleep(LOAD_POLL_INTERVAL).await;
        }
    }

    /// Log the portal's total-record count. Diagnostic only; the count
    /// never gates the pagination loop.
    async fn log_result_total(&self) {
        match self.page.text(RESULT_TOTALS).await {
            Ok(Lookup::Found(text)) => match parse_result_total(&text) {
                Some(total) => tracing::info!(total, "result totals: {text}"),
                None => tracing::warn!("unparseable result totals: {text}"),
            },
            Ok(Lookup::NotFound) => tracing::warn!("result totals caption not found"),
            Err(e) => tracing::warn!("reading result totals failed: {e}"),
        }
    }

    /// Process every row on the current page, then advance. Returns the
    /// state to continue from.
    async fn collect_page(&self, tokens: &mut Vec<String>) -> PageState {
        let row_count = match self.page.count(RESULT_ROWS).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("counting result rows failed: {e}");
                return PageState::Exhausted;
            }
        };

        for index in 0..row_count {
            if !self.open_row(index).await {
                continue;
            }

            match self
                .page
                .wait_for(
                    PIN_CELLS,
                    Duration::from_secs(self.settings.row_panel_timeout_secs),
                )
                .await
            {
                Ok(Lookup::Found(())) => match self.page.text_all(PIN_CELLS).await {
                    Ok(pins) => {
                        tracing::debug!(row = index + 1, pins = pins.len(), "collected row pins");
                        tokens.extend(pins);
                    }
                    Err(e) => tracing::warn!("reading pins for row {} failed: {e}", index + 1),
                },
                Ok(Lookup::NotFound) => {
                    tracing::warn!("identifier cells never rendered for row {}", index + 1);
                }
                Err(e) => {
                    tracing::warn!("waiting for row {} panel failed: {e}", index + 1);
                }
            }

            // Losing the back control means the list page itself is gone;
            // there is no safe way to keep iterating rows.
            if !self.go_back().await {
                tracing::warn!("back control missing, aborting pagination for this window");
                return PageState::Exhausted;
            }
        }

        self.advance().await
    }

    /// Click row `index` open, retrying once after a short pause on a
    /// transient fault. Settles after the click so the panel can render.
    async fn open_row(&self, index: usize) -> bool {
        for attempt in 0..2 {
            match self.page.click_nth(RESULT_ROWS, index).await {
                Ok(()) => {
                    tokio::time::sleep(Duration::from_millis(self.settings.row_settle_ms)).await;
                    return true;
                }
                Err(e) if e.is_transient() && attempt == 0 => {
                    tracing::warn!("row {} click failed, pausing and retrying: {e}", index + 1);
                    tokio::time::sleep(Duration::from_millis(self.settings.stale_pause_ms)).await;
                }
                Err(e) => {
                    tracing::warn!("skipping row {}: {e}", index + 1);
                    return false;
                }
            }
        }
        false
    }

    /// Return from a row panel to the list. False means the control was
    /// never found or could not be clicked.
    async fn go_back(&self) -> bool {
        let wait = self
            .page
            .wait_for(
                BACK_BUTTON,
                Duration::from_secs(self.settings.back_timeout_secs),
            )
            .await;
        match wait {
            Ok(Lookup::Found(())) => {}
            Ok(Lookup::NotFound) => return false,
            Err(e) => {
                tracing::warn!("waiting for back control failed: {e}");
                return false;
            }
        }
        match self.page.click(BACK_BUTTON).await {
            Ok(()) => {
                tokio::time::sleep(Duration::from_millis(self.settings.nav_settle_ms)).await;
                true
            }
            Err(e) => {
                tracing::warn!("back click failed: {e}");
                false
            }
        }
    }

    /// Move to the next page if the next control exists and is enabled.
    async fn advance(&self) -> PageState {
        let wait = self
            .page
            .wait_for(
                NEXT_BUTTON,
                Duration::from_secs(self.settings.next_timeout_secs),
            )
            .await;
        match wait {
            Ok(Lookup::Found(())) => {}
            Ok(Lookup::NotFound) => {
                tracing::info!("next control absent, pagination complete");
                return PageState::Exhausted;
            }
            Err(e) => {
                tracing::warn!("waiting for next control failed: {e}");
                return PageState::Exhausted;
            }
        }

        match self.next_disabled().await {
            Ok(true) => {
                tracing::info!("next control disabled, pagination complete");
                PageState::Exhausted
            }
            Ok(false) => match self.page.click(NEXT_BUTTON).await {
                Ok(()) => {
                    tokio::time::sleep(Duration::from_millis(self.settings.nav_settle_ms)).await;
                    // The new page renders asynchronously too; go back to
                    // the load wait rather than counting rows immediately
                    PageState::AwaitingLoad
                }
                Err(e) => {
                    tracing::warn!("next click failed: {e}");
                    PageState::Exhausted
                }
            },
            Err(e) => {
                tracing::warn!("reading next control state failed: {e}");
                PageState::Exhausted
            }
        }
    }

    /// Disabled via the plain attribute or the accessibility one.
    async fn next_disabled(&self) -> Result<bool, BrowserError> {
        if self.page.attr(NEXT_BUTTON, "disabled").await?.is_found() {
            return Ok(true);
        }
        let aria = self.page.attr(NEXT_BUTTON, "aria-disabled").await?;
        Ok(aria == Lookup::Found("true".to_string()))
    }
}

/// Pull the record count out of a totals caption like
/// "Showing 1 - 50 of 1,234 results".
pub fn parse_result_total(text: &str) -> Option<u64> {
    let after_of = text.rsplit("of").next()?;
    let raw = after_of.split_whitespace().next()?;
    raw.replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parcelmail_browser::Result as BrowserResult;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockRow {
        pins: Vec<&'static str>,
        /// Click attempts that fail before one succeeds
        click_failures: u32,
    }

    fn row(pins: &[&'static str]) -> MockRow {
        MockRow {
            pins: pins.to_vec(),
            click_failures: 0,
        }
    }

    struct MockState {
        current_page: usize,
        open_row: Option<usize>,
    }

    struct MockPortal {
        pages: Vec<Vec<MockRow>>,
        no_results: bool,
        back_missing: bool,
        state: Mutex<MockState>,
        /// Remaining intercepted clicks per (page, row)
        click_budgets: Mutex<HashMap<(usize, usize), u32>>,
        /// Row-count polls that report zero before a page renders
        render_delays: Mutex<HashMap<usize, u32>>,
    }

    impl MockPortal {
        fn new(pages: Vec<Vec<MockRow>>) -> Self {
            let mut budgets = HashMap::new();
            for (p, rows) in pages.iter().enumerate() {
                for (r, row) in rows.iter().enumerate() {
                    if row.click_failures > 0 {
                        budgets.insert((p, r), row.click_failures);
                    }
                }
            }
            Self {
                pages,
                no_results: false,
                back_missing: false,
                state: Mutex::new(MockState {
                    current_page: 0,
                    open_row: None,
                }),
                click_budgets: Mutex::new(budgets),
                render_delays: Mutex::new(HashMap::new()),
            }
        }

        fn delay_page_render(&self, page: usize, polls: u32) {
            self.render_delays.lock().unwrap().insert(page, polls);
        }

        fn empty() -> Self {
            let mut portal = Self::new(Vec::new());
            portal.no_results = true;
            portal
        }

        fn on_last_page(&self) -> bool {
            let state = self.state.lock().unwrap();
            state.current_page + 1 >= self.pages.len()
        }
    }

    #[async_trait]
    impl PageActions for MockPortal {
        async fn navigate(&self, _url: &str) -> BrowserResult<()> {
            Ok(())
        }

        async fn wait_for(
            &self,
            xpath: &str,
            _timeout: Duration,
        ) -> BrowserResult<Lookup<()>> {
            let present = match xpath {
                PIN_CELLS => {
                    let state = self.state.lock().unwrap();
                    state
                        .open_row
                        .is_some_and(|i| !self.pages[state.current_page][i].pins.is_empty())
                }
                BACK_BUTTON => !self.back_missing,
                NEXT_BUTTON => !self.pages.is_empty(),
                _ => self.count(xpath).await? > 0,
            };
            Ok(if present {
                Lookup::Found(())
            } else {
                Lookup::NotFound
            })
        }

        async fn count(&self, xpath: &str) -> BrowserResult<usize> {
            Ok(match xpath {
                NO_RESULTS_MARKER => usize::from(self.no_results),
                RESULT_ROWS => {
                    let page = self.state.lock().unwrap().current_page;
                    let mut delays = self.render_delays.lock().unwrap();
                    if let Some(remaining) = delays.get_mut(&page) {
                        if *remaining > 0 {
                            *remaining -= 1;
                            return Ok(0);
                        }
                    }
                    self.pages.get(page).map_or(0, Vec::len)
                }
                _ => 0,
            })
        }

        async fn text(&self, xpath: &str) -> BrowserResult<Lookup<String>> {
            Ok(match xpath {
                RESULT_TOTALS => Lookup::Found("Showing 1 - 50 of 1,234 results".to_string()),
                _ => Lookup::NotFound,
            })
        }

        async fn text_all(&self, xpath: &str) -> BrowserResult<Vec<String>> {
            if xpath != PIN_CELLS {
                return Ok(Vec::new());
            }
            let state = self.state.lock().unwrap();
            let pins = match state.open_row {
                Some(i) => &self.pages[state.current_page][i].pins,
                None => return Ok(Vec::new()),
            };
            Ok(pins.iter().map(|p| (*p).to_string()).collect())
        }

        async fn attr(&self, xpath: &str, name: &str) -> BrowserResult<Lookup<String>> {
            if xpath == NEXT_BUTTON && name == "aria-disabled" {
                let value = if self.on_last_page() { "true" } else { "false" };
                return Ok(Lookup::Found(value.to_string()));
            }
            Ok(Lookup::NotFound)
        }

        async fn click(&self, xpath: &str) -> BrowserResult<()> {
            let mut state = self.state.lock().unwrap();
            match xpath {
                BACK_BUTTON => state.open_row = None,
                NEXT_BUTTON => {
                    state.current_page += 1;
                    state.open_row = None;
                }
                _ => {}
            }
            Ok(())
        }

        async fn click_nth(&self, xpath: &str, index: usize) -> BrowserResult<()> {
            assert_eq!(xpath, RESULT_ROWS);
            let state = self.state.lock().unwrap();
            let current_page = state.current_page;
            drop(state);

            // Simulating intercepted clicks requires interior mutability on
            // the failure budget, so the counter lives in a separate lock.
            let remaining = {
                let budget = self.click_budgets.lock().unwrap();
                budget.get(&(current_page, index)).copied().unwrap_or(0)
            };
            if remaining > 0 {
                let mut budget = self.click_budgets.lock().unwrap();
                budget.insert((current_page, index), remaining - 1);
                return Err(parcelmail_browser::BrowserError::Interaction(
                    "click intercepted".to_string(),
                ));
            }
            self.state.lock().unwrap().open_row = Some(index);
            Ok(())
        }

        async fn fill(&self, _xpath: &str, _value: &str) -> BrowserResult<()> {
            Ok(())
        }
    }

    fn fast_settings() -> RecorderSettings {
        RecorderSettings {
            results_timeout_secs: 1,
            row_panel_timeout_secs: 1,
            back_timeout_secs: 1,
            next_timeout_secs: 1,
            row_settle_ms: 0,
            nav_settle_ms: 0,
            stale_pause_ms: 0,
            ..RecorderSettings::default()
        }
    }

    #[tokio::test]
    async fn test_visits_every_page_and_collects_in_order() {
        let portal = MockPortal::new(vec![
            vec![row(&["010-000001"]), row(&["010-000002", "010-000003"])],
            vec![row(&["020-000001"])],
            vec![row(&["030-000001"])],
        ]);
        let settings = fast_settings();
        let tokens = ResultListPaginator::new(&portal, &settings)
            .collect_window()
            .await;
        assert_eq!(
            tokens,
            vec![
                "010-000001",
                "010-000002",
                "010-000003",
                "020-000001",
                "030-000001"
            ]
        );
        assert!(portal.on_last_page());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_rendering_next_page_still_collected() {
        let portal = MockPortal::new(vec![
            vec![row(&["010-000001"])],
            vec![row(&["020-000001"])],
        ]);
        // Page 2 reports zero rows for the first few polls after the
        // next click, like a page still rendering server-side results
        portal.delay_page_render(1, 3);

        let settings = RecorderSettings {
            results_timeout_secs: 10,
            ..fast_settings()
        };
        let tokens = ResultListPaginator::new(&portal, &settings)
            .collect_window()
            .await;
        assert_eq!(tokens, vec!["010-000001", "020-000001"]);
        assert!(portal.on_last_page());
    }

    #[tokio::test]
    async fn test_no_results_yields_empty_window() {
        let portal = MockPortal::empty();
        let settings = fast_settings();
        let tokens = ResultListPaginator::new(&portal, &settings)
            .collect_window()
            .await;
        assert!(tokens.is_empty());
    }

    #[tokio::test]
    async fn test_missing_back_control_aborts_window() {
        let mut portal = MockPortal::new(vec![
            vec![row(&["010-000001"]), row(&["010-000002"])],
            vec![row(&["020-000001"])],
        ]);
        portal.back_missing = true;
        let settings = fast_settings();
        let tokens = ResultListPaginator::new(&portal, &settings)
            .collect_window()
            .await;
        // First row's pins are kept; the rest of the window is abandoned
        assert_eq!(tokens, vec!["010-000001"]);
        assert!(!portal.on_last_page());
    }

    #[tokio::test]
    async fn test_pinless_row_is_skipped() {
        let portal = MockPortal::new(vec![vec![
            row(&["010-000001"]),
            row(&[]),
            row(&["010-000003"]),
        ]]);
        let settings = fast_settings();
        let tokens = ResultListPaginator::new(&portal, &settings)
            .collect_window()
            .await;
        assert_eq!(tokens, vec!["010-000001", "010-000003"]);
    }

    #[tokio::test]
    async fn test_intercepted_click_retried_once_then_skipped() {
        let portal = MockPortal::new(vec![vec![
            MockRow {
                pins: vec!["010-000001"],
                click_failures: 1,
            },
            MockRow {
                pins: vec!["010-000002"],
                click_failures: 5,
            },
            row(&["010-000003"]),
        ]]);
        let settings = fast_settings();
        let tokens = ResultListPaginator::new(&portal, &settings)
            .collect_window()
            .await;
        // One failure recovers on the retry; five failures exhaust it
        assert_eq!(tokens, vec!["010-000001", "010-000003"]);
    }

    #[test]
    fn test_parse_result_total() {
        assert_eq!(
            parse_result_total("Showing 1 - 50 of 1,234 results"),
            Some(1234)
        );
        assert_eq!(parse_result_total("1 of 7"), Some(7));
        assert_eq!(parse_result_total("no totals here"), None);
        assert_eq!(parse_result_total(""), None);
    }
}
