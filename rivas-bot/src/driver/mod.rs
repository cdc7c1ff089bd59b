//! Browser automation capability.
//!
//! The orchestrator only needs a handful of operations from a browser:
//! open a page, act on an element, probe whether something is visible,
//! wait for the page to settle, and take a screenshot. This module defines
//! that capability as a pair of traits so the booking flow can run against
//! a real WebDriver endpoint or a scripted mock.
//!
//! Every operation that waits takes an explicit timeout. There is no other
//! cancellation mechanism.

mod chain;
mod error;
mod matcher;
pub mod mock;

use std::path::Path;
use std::time::Duration;

pub use chain::{ChainExhausted, FallbackChain, Strategy};
pub use error::DriverError;
pub use matcher::{Action, Matcher, Role};

/// Something that can create fresh, isolated browser sessions.
#[allow(async_fn_in_trait)]
pub trait Browser {
    type Session: Session;

    /// Start a new session. Each booking attempt gets its own.
    async fn open_session(&self) -> Result<Self::Session, DriverError>;
}

/// One exclusive browser context.
///
/// Sessions must be released with [`Session::close`] once the attempt is
/// over, whatever its result.
#[allow(async_fn_in_trait)]
pub trait Session {
    /// Load `url` and wait for the document to be parsed.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), DriverError>;

    /// URL of the page currently shown.
    async fn current_url(&mut self) -> Result<String, DriverError>;

    /// Wait for the first visible element matching `matcher` and act on it.
    async fn act(
        &mut self,
        matcher: &Matcher,
        action: &Action,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    /// Whether an element matching `matcher` becomes visible within `timeout`.
    async fn is_visible(&mut self, matcher: &Matcher, timeout: Duration)
    -> Result<bool, DriverError>;

    /// Wait until the page stops loading resources.
    async fn wait_for_quiescence(&mut self, timeout: Duration) -> Result<(), DriverError>;

    /// Save a screenshot of the current page to `path`, overwriting it.
    async fn capture_evidence(&mut self, path: &Path) -> Result<(), DriverError>;

    /// Tear the session down.
    async fn close(self) -> Result<(), DriverError>
    where
        Self: Sized;
}
