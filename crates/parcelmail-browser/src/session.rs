use crate::actions::{Lookup, PageActions};
use crate::error::{BrowserError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::page::Page;
use futures_util::stream::StreamExt;
use parcelmail_core::BrowserSettings;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::task::JoinHandle;

/// How often element-presence polls re-query the DOM.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A live Chromium session with one page.
///
/// Owns the browser process and its CDP event loop. All page queries go
/// through injected `document.evaluate` snippets so the portals' XPath
/// locators can be used verbatim.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    nav_timeout: Duration,
}

impl BrowserSession {
    /// Launch Chromium and open a blank page.
    ///
    /// Downloads are directed into the working directory so any export the
    /// portals trigger lands next to the output files.
    pub async fn open(settings: &BrowserSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(settings.window_width, settings.window_height)
            .arg("--disable-logging")
            .arg("--start-maximized");
        if !settings.headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| BrowserError::LaunchError(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::LaunchError(e.to_string()))?;

        // Drive the CDP event loop for the lifetime of the session
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        if let Ok(cwd) = std::env::current_dir() {
            let params = SetDownloadBehaviorParams::builder()
                .behavior(SetDownloadBehaviorBehavior::Allow)
                .download_path(cwd.display().to_string())
                .build()
                .map_err(BrowserError::ChromiumError)?;
            if let Err(e) = page.execute(params).await {
                tracing::warn!("could not set download directory: {e}");
            }
        }

        tracing::info!(headless = settings.headless, "browser session started");

        Ok(Self {
            browser,
            page,
            handler_task,
            nav_timeout: Duration::from_secs(settings.navigation_timeout_secs),
        })
    }

    /// Shut the browser down. Failures during teardown are logged, not
    /// returned; the session is unusable either way.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("browser close failed: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("browser wait failed: {e}");
        }
        self.handler_task.abort();
        tracing::info!("browser session closed");
    }

    /// Evaluate a JS expression on the page and deserialize its result.
    async fn eval<T: DeserializeOwned>(&self, js: String) -> Result<T> {
        self.page
            .evaluate(js)
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::ScriptError(e.to_string()))
    }

    /// Quote a string as a JS literal.
    fn js_string(value: &str) -> String {
        serde_json::Value::String(value.to_string()).to_string()
    }

    /// Wrap a snippet body in an IIFE that has `snap`, an ordered XPath
    /// snapshot for `xpath`, in scope.
    fn snapshot_js(xpath: &str, body: &str) -> String {
        format!(
            "(() => {{ const snap = document.evaluate({xpath}, document, null, \
             XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); {body} }})()",
            xpath = Self::js_string(xpath),
        )
    }
}

#[async_trait::async_trait]
impl PageActions for BrowserSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        tracing::debug!("navigating to {url}");
        let goto = self.page.goto(url);
        match tokio::time::timeout(self.nav_timeout, goto).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::NavigationError(e.to_string())),
            Err(_) => Err(BrowserError::Timeout(format!("navigation to {url}"))),
        }
    }

    async fn wait_for(&self, xpath: &str, timeout: Duration) -> Result<Lookup<()>> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.count(xpath).await? > 0 {
                return Ok(Lookup::Found(()));
            }
            if tokio::time::Instant::now() >= deadline {
                return Ok(Lookup::NotFound);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn count(&self, xpath: &str) -> Result<usize> {
        let js = Self::snapshot_js(xpath, "return snap.snapshotLength;");
        self.eval(js).await
    }

    async fn text(&self, xpath: &str) -> Result<Lookup<String>> {
        let js = Self::snapshot_js(
            xpath,
            "if (snap.snapshotLength === 0) return null; \
             return (snap.snapshotItem(0).textContent || '').trim();",
        );
        let value: Option<String> = self.eval(js).await?;
        Ok(match value {
            Some(text) => Lookup::Found(text),
            None => Lookup::NotFound,
        })
    }

    async fn text_all(&self, xpath: &str) -> Result<Vec<String>> {
        let js = Self::snapshot_js(
            xpath,
            "const out = []; \
             for (let i = 0; i < snap.snapshotLength; i++) {\
               out.push((snap.snapshotItem(i).textContent || '').trim());\
             } \
             return out;",
        );
        self.eval(js).await
    }

    async fn attr(&self, xpath: &str, name: &str) -> Result<Lookup<String>> {
        let body = format!(
            "if (snap.snapshotLength === 0) return null; \
             return snap.snapshotItem(0).getAttribute({name});",
            name = Self::js_string(name),
        );
        let js = Self::snapshot_js(xpath, &body);
        let value: Option<String> = self.eval(js).await?;
        Ok(match value {
            Some(text) => Lookup::Found(text),
            None => Lookup::NotFound,
        })
    }

    async fn click(&self, xpath: &str) -> Result<()> {
        self.click_nth(xpath, 0).await
    }

    async fn click_nth(&self, xpath: &str, index: usize) -> Result<()> {
        let body = format!(
            "const el = snap.snapshotItem({index}); \
             if (!el) return false; \
             try {{ el.scrollIntoView({{block: 'center'}}); el.click(); return true; }} \
             catch (e) {{ return false; }}",
        );
        let js = Self::snapshot_js(xpath, &body);
        let clicked: bool = self.eval(js).await?;
        if clicked {
            Ok(())
        } else {
            Err(BrowserError::Interaction(format!(
                "click failed on {xpath}[{index}]"
            )))
        }
    }

    async fn fill(&self, xpath: &str, value: &str) -> Result<()> {
        let body = format!(
            "const el = snap.snapshotItem(0); \
             if (!el) return false; \
             try {{ \
               el.focus(); el.value = {value}; \
               el.dispatchEvent(new Event('input', {{bubbles: true}})); \
               el.dispatchEvent(new Event('change', {{bubbles: true}})); \
               return true; \
             }} catch (e) {{ return false; }}",
            value = Self::js_string(value),
        );
        let js = Self::snapshot_js(xpath, &body);
        let filled: bool = self.eval(js).await?;
        if filled {
            Ok(())
        } else {
            Err(BrowserError::Interaction(format!(
                "fill failed on {xpath}"
            )))
        }
    }
}
