//! Headless browser driving via chromiumoxide.
//!
//! [`Browser`] is the capability the browser tool depends on; [`ChromiumBrowser`]
//! implements it by launching a headless Chromium on first use.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use tokio::sync::OnceCell;

use crate::types::{OpenPowerError, OpenPowerResult};

/// Default time allowed for a page to load.
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// A browser engine able to load pages.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Load `url` and return the page title.
    async fn navigate(&self, url: &str) -> OpenPowerResult<String>;
    /// Load `url` and return a PNG screenshot of the viewport.
    async fn screenshot(&self, url: &str) -> OpenPowerResult<Vec<u8>>;
}

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("OPENPOWER_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".openpower/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".openpower/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".openpower/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".openpower/chromium/chrome-linux64/chrome"),
                home.join(".openpower/chromium/chrome"),
            ]
        };
        if let Some(found) = candidates.into_iter().find(|c| c.exists()) {
            return Some(found);
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Chromium-backed [`Browser`]. The process is launched lazily, once.
pub struct ChromiumBrowser {
    executable: Option<PathBuf>,
    navigation_timeout: Duration,
    browser: OnceCell<CdpBrowser>,
}

impl ChromiumBrowser {
    /// Use an explicit executable, or discover one with [`find_chromium`] at launch.
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self {
            executable,
            navigation_timeout: Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
            browser: OnceCell::new(),
        }
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn is_launched(&self) -> bool {
        self.browser.initialized()
    }

    async fn browser(&self) -> OpenPowerResult<&CdpBrowser> {
        self.browser.get_or_try_init(|| self.launch()).await
    }

    async fn launch(&self) -> OpenPowerResult<CdpBrowser> {
        let chrome_path = self
            .executable
            .clone()
            .or_else(find_chromium)
            .ok_or_else(|| {
                OpenPowerError::Browser(
                    "Chromium not found. Set OPENPOWER_CHROMIUM_PATH or install Chrome.".to_string(),
                )
            })?;

        tracing::info!("Launching Chromium from {}", chrome_path.display());

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| OpenPowerError::Browser(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = CdpBrowser::launch(config)
            .await
            .map_err(|e| OpenPowerError::Browser(format!("failed to launch Chromium: {e}")))?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Chromium handler event error: {e}");
                }
            }
        });

        Ok(browser)
    }

    /// Open a fresh page and load `url` into it.
    async fn open(&self, url: &str) -> OpenPowerResult<Page> {
        let browser = self.browser().await?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| OpenPowerError::Browser(format!("failed to create new page: {e}")))?;

        let loaded = tokio::time::timeout(self.navigation_timeout, async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        })
        .await;

        let failure = match loaded {
            Ok(Ok(())) => return Ok(page),
            Ok(Err(e)) => format!("navigation to {url} failed: {e}"),
            Err(_) => format!(
                "navigation to {url} timed out after {}ms",
                self.navigation_timeout.as_millis()
            ),
        };

        close(page).await;
        Err(OpenPowerError::Browser(failure))
    }
}

async fn close(page: Page) {
    if let Err(e) = page.close().await {
        tracing::debug!("Failed to close page: {e}");
    }
}

#[async_trait]
impl Browser for ChromiumBrowser {
    async fn navigate(&self, url: &str) -> OpenPowerResult<String> {
        let page = self.open(url).await?;
        let title = page.get_title().await;
        close(page).await;

        let title = title.map_err(|e| OpenPowerError::Browser(format!("failed to read title: {e}")))?;
        Ok(title.unwrap_or_default())
    }

    async fn screenshot(&self, url: &str) -> OpenPowerResult<Vec<u8>> {
        let page = self.open(url).await?;
        let image = page.screenshot(ScreenshotParams::builder().build()).await;
        close(page).await;

        image.map_err(|e| OpenPowerError::Browser(format!("screenshot failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_executable_reports_browser_error() {
        let browser = ChromiumBrowser::new(Some(PathBuf::from("/nonexistent/chrome")));
        let err = browser.navigate("about:blank").await.unwrap_err();
        assert!(matches!(err, OpenPowerError::Browser(_)));
        assert!(!browser.is_launched());
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_navigate_and_screenshot() {
        let browser = ChromiumBrowser::new(None);

        let title = browser
            .navigate("data:text/html,<title>Hello</title><h1>World</h1>")
            .await
            .expect("navigation failed");
        assert_eq!(title, "Hello");
        assert!(browser.is_launched());

        let png = browser
            .screenshot("data:text/html,<h1>World</h1>")
            .await
            .expect("screenshot failed");
        assert_eq!(&png[..4], b"\x89PNG");
    }
}
