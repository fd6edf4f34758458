use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Element selector for page elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Select by element id
    Id(String),
    /// Select by tag name
    Tag(String),
    /// Select by CSS selector
    Css(String),
    /// Select by visible text
    Text(String),
}

impl Selector {
    pub fn id(id: &str) -> Self {
        Selector::Id(id.to_string())
    }

    pub fn tag(tag: &str) -> Self {
        Selector::Tag(tag.to_string())
    }

    pub fn css(css: &str) -> Self {
        Selector::Css(css.to_string())
    }

    pub fn text(text: &str) -> Self {
        Selector::Text(text.to_string())
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{}", id),
            Selector::Tag(tag) => write!(f, "{}", tag),
            Selector::Css(css) => write!(f, "{}", css),
            Selector::Text(text) => write!(f, "text={:?}", text),
        }
    }
}

/// Browser-agnostic session interface
///
/// The runner only talks to the browser through this trait, so the flow logic
/// can be exercised against a scripted in-memory driver in tests while the
/// real runs use the Playwright-backed implementation.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Human-readable session identifier (browser name)
    fn session_name(&self) -> String;

    /// Navigate to an absolute URL
    async fn goto(&self, url: &str) -> Result<()>;

    /// Current document title
    async fn title(&self) -> Result<String>;

    /// Current location
    async fn current_url(&self) -> Result<String>;

    /// Click the first element matching the selector
    async fn click(&self, selector: &Selector) -> Result<()>;

    /// Set the value of a `<select>` control and fire its change event
    async fn select_value(&self, selector: &Selector, value: &str) -> Result<()>;

    /// Whether the first matching element exists and is visible
    async fn is_visible(&self, selector: &Selector) -> Result<bool>;

    /// Wait until an element matching the selector is present
    ///
    /// Returns true if the element appeared within `timeout_ms`, false if the
    /// wait expired. Transport-level failures are errors.
    async fn wait_for_element(&self, selector: &Selector, timeout_ms: u64) -> Result<bool>;

    /// Text content of the first matching element, empty string if absent
    async fn element_text(&self, selector: &Selector) -> Result<String>;

    /// Number of elements matching the selector
    async fn count(&self, selector: &Selector) -> Result<usize>;

    /// Save a PNG screenshot of the current viewport
    async fn take_screenshot(&self, path: &Path) -> Result<()>;

    /// Release the browser session; must be safe to call more than once
    async fn close(&self) -> Result<()>;
}
