//! Playwright-backed browser session.

use anyhow::{Context, Result};
use async_trait::async_trait;
use playwright::api::{Browser, BrowserContext, Page, Viewport};
use playwright::Playwright;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::driver::traits::{BrowserDriver, Selector};

/// Web browser type
#[derive(Debug, Clone, Copy, Default)]
pub enum BrowserType {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserType::Chromium),
            "firefox" => Ok(BrowserType::Firefox),
            "webkit" | "safari" => Ok(BrowserType::Webkit),
            other => anyhow::bail!("Unknown browser: {}", other),
        }
    }
}

/// Web driver configuration
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    pub browser_type: BrowserType,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        let headless = std::env::var("QUIZ_HEADLESS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        Self {
            browser_type: BrowserType::Chromium,
            headless,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

/// Browser session driven through Playwright
pub struct WebDriver {
    #[allow(dead_code)]
    playwright: Arc<Playwright>,
    browser: Arc<Browser>,
    #[allow(dead_code)]
    context: Arc<BrowserContext>,
    page: Arc<Mutex<Page>>,
    config: WebDriverConfig,
    closed: AtomicBool,
}

impl WebDriver {
    pub async fn new(config: WebDriverConfig) -> Result<Self> {
        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;

        let browser = match config.browser_type {
            BrowserType::Chromium => {
                let args: Vec<String> = [
                    "--no-sandbox",
                    "--disable-setuid-sandbox",
                    "--disable-dev-shm-usage",
                    "--disable-gpu",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect();

                playwright
                    .chromium()
                    .launcher()
                    .headless(config.headless)
                    .args(&args)
                    .launch()
                    .await
                    .context("Failed to launch Chromium")?
            }
            BrowserType::Firefox => {
                playwright
                    .firefox()
                    .launcher()
                    .headless(config.headless)
                    .launch()
                    .await
                    .context("Failed to launch Firefox")?
            }
            BrowserType::Webkit => {
                playwright
                    .webkit()
                    .launcher()
                    .headless(config.headless)
                    .launch()
                    .await
                    .context("Failed to launch WebKit")?
            }
        };

        let context = browser.context_builder().build().await?;
        let page = context.new_page().await?;

        page.set_viewport_size(Viewport {
            width: config.viewport_width as i32,
            height: config.viewport_height as i32,
        })
        .await?;

        Ok(Self {
            playwright: Arc::new(playwright),
            browser: Arc::new(browser),
            context: Arc::new(context),
            page: Arc::new(Mutex::new(page)),
            config,
            closed: AtomicBool::new(false),
        })
    }

    /// Convert a Selector to a Playwright selector string
    fn to_playwright(selector: &Selector) -> String {
        match selector {
            Selector::Id(id) => format!("#{}", id),
            Selector::Tag(tag) => tag.clone(),
            Selector::Css(css) => css.clone(),
            Selector::Text(text) => format!("text=\"{}\"", text),
        }
    }
}

#[async_trait]
impl BrowserDriver for WebDriver {
    fn session_name(&self) -> String {
        format!("{:?}", self.config.browser_type)
    }

    async fn goto(&self, url: &str) -> Result<()> {
        let page = self.page.lock().await;
        page.goto_builder(url)
            .goto()
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        let page = self.page.lock().await;
        let title: String = page.evaluate("() => document.title", ()).await?;
        Ok(title)
    }

    async fn current_url(&self) -> Result<String> {
        let page = self.page.lock().await;
        let url: String = page.evaluate("() => window.location.href", ()).await?;
        Ok(url)
    }

    async fn click(&self, selector: &Selector) -> Result<()> {
        let page = self.page.lock().await;
        let sel = Self::to_playwright(selector);
        page.click_builder(&sel)
            .click()
            .await
            .with_context(|| format!("Failed to click: {}", sel))?;
        Ok(())
    }

    async fn select_value(&self, selector: &Selector, value: &str) -> Result<()> {
        let page = self.page.lock().await;
        let sel = Self::to_playwright(selector);
        let js = r#"(el, value) => {
            el.value = value;
            el.dispatchEvent(new Event('change', { bubbles: true }));
            return el.value;
        }"#;
        let applied: String = page
            .evaluate_on_selector(&sel, js, Some(value.to_string()))
            .await
            .with_context(|| format!("Failed to select {:?} on {}", value, sel))?;
        if applied != value {
            anyhow::bail!("Select {} does not accept value {:?}", sel, value);
        }
        Ok(())
    }

    async fn is_visible(&self, selector: &Selector) -> Result<bool> {
        let page = self.page.lock().await;
        let sel = Self::to_playwright(selector);
        match page.query_selector(&sel).await? {
            Some(el) => Ok(el.is_visible().await?),
            None => Ok(false),
        }
    }

    async fn wait_for_element(&self, selector: &Selector, timeout_ms: u64) -> Result<bool> {
        let page = self.page.lock().await;
        let sel = Self::to_playwright(selector);

        let result = page
            .wait_for_selector_builder(&sel)
            .timeout(timeout_ms as f64)
            .wait_for_selector()
            .await;

        Ok(result.is_ok())
    }

    async fn element_text(&self, selector: &Selector) -> Result<String> {
        let page = self.page.lock().await;
        let sel = Self::to_playwright(selector);
        let js = "el => el.innerText || el.textContent || ''";

        match page
            .evaluate_on_selector::<String, String>(&sel, js, None)
            .await
        {
            Ok(text) => Ok(text),
            Err(_) => Ok(String::new()),
        }
    }

    async fn count(&self, selector: &Selector) -> Result<usize> {
        let page = self.page.lock().await;
        let sel = Self::to_playwright(selector);
        let elements = page.query_selector_all(&sel).await?;
        Ok(elements.len())
    }

    async fn take_screenshot(&self, path: &Path) -> Result<()> {
        let page = self.page.lock().await;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        page.screenshot_builder()
            .path(path.to_path_buf())
            .screenshot()
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        // Idempotent: the first caller wins, later calls are no-ops.
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.browser.close().await.context("Failed to close browser")?;
        Ok(())
    }
}
