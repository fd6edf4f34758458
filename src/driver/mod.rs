pub mod traits;
pub mod web;

pub use traits::{BrowserDriver, Selector};
pub use web::{BrowserType, WebDriver, WebDriverConfig};
