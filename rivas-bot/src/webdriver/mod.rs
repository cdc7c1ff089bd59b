//! W3C WebDriver implementation of the browser capability.
//!
//! Used by the binary to drive a real Chrome or Firefox through
//! chromedriver/geckodriver. Matchers are translated into XPath or CSS
//! locators; waits are polling loops bounded by the caller's timeout.

mod client;
mod locator;
mod types;

pub use client::{WebDriverBrowser, WebDriverConfig, WebDriverSession};
pub use locator::{Locator, locate, xpath_literal};
