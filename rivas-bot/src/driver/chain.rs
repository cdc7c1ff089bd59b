//! Ordered fallback chains of element matchers.
//!
//! Login forms on the booking site are not consistently labelled, so some
//! steps try a precise lookup first and fall back to a looser positional
//! one. Each strategy carries its own timeout; the first one that succeeds
//! wins.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use super::error::DriverError;
use super::matcher::{Action, Matcher};
use super::Session;

/// One lookup strategy with its own bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    pub matcher: Matcher,
    pub timeout: Duration,
}

/// An ordered list of strategies, tried in sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain {
    strategies: Vec<Strategy>,
}

impl FallbackChain {
    /// Create a chain with a single primary strategy.
    pub fn new(matcher: Matcher, timeout: Duration) -> Self {
        Self {
            strategies: vec![Strategy { matcher, timeout }],
        }
    }

    /// Append a fallback strategy.
    pub fn or(mut self, matcher: Matcher, timeout: Duration) -> Self {
        self.strategies.push(Strategy { matcher, timeout });
        self
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Perform `action` using the first strategy that succeeds.
    ///
    /// Returns the matcher that worked, or every strategy's failure if
    /// none did.
    pub async fn act<S: Session>(
        &self,
        session: &mut S,
        action: &Action,
    ) -> Result<&Matcher, ChainExhausted> {
        let mut failures = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            match session
                .act(&strategy.matcher, action, strategy.timeout)
                .await
            {
                Ok(()) => return Ok(&strategy.matcher),
                Err(e) => {
                    debug!(matcher = %strategy.matcher, error = %e, "strategy failed, trying next");
                    failures.push((strategy.matcher.clone(), e));
                }
            }
        }

        Err(ChainExhausted { failures })
    }
}

/// Every strategy in a chain failed.
#[derive(Debug)]
pub struct ChainExhausted {
    pub failures: Vec<(Matcher, DriverError)>,
}

impl fmt::Display for ChainExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {} strategies failed", self.failures.len())?;
        for (i, (matcher, err)) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{matcher}: {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ChainExhausted {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{MockBrowser, MockEvent};
    use crate::driver::Browser;

    fn chain() -> FallbackChain {
        FallbackChain::new(Matcher::label("Usuario"), Duration::from_secs(2))
            .or(Matcher::css("input[type='text']"), Duration::from_secs(4))
    }

    #[tokio::test]
    async fn primary_strategy_wins() {
        let browser = MockBrowser::new();
        let mut session = browser.open_session().await.unwrap();

        let chain = chain();
        let used = chain
            .act(&mut session, &Action::Fill("ana".into()))
            .await
            .unwrap();

        assert_eq!(used, &Matcher::label("Usuario"));
        assert_eq!(browser.acted_on(), vec![Matcher::label("Usuario")]);
    }

    #[tokio::test]
    async fn falls_back_when_primary_missing() {
        let browser = MockBrowser::new().with_missing(Matcher::label("Usuario"));
        let mut session = browser.open_session().await.unwrap();

        let chain = chain();
        let used = chain
            .act(&mut session, &Action::Fill("ana".into()))
            .await
            .unwrap();

        assert_eq!(used, &Matcher::css("input[type='text']"));
        assert!(browser.events().contains(&MockEvent::Acted {
            matcher: Matcher::css("input[type='text']"),
            action: Action::Fill("ana".into()),
        }));
    }

    #[tokio::test]
    async fn exhausted_chain_reports_every_failure() {
        let browser = MockBrowser::new()
            .with_missing(Matcher::label("Usuario"))
            .with_missing(Matcher::css("input[type='text']"));
        let mut session = browser.open_session().await.unwrap();

        let chain = chain();
        let err = chain
            .act(&mut session, &Action::Click)
            .await
            .unwrap_err();

        assert_eq!(err.failures.len(), 2);
        let msg = err.to_string();
        assert!(msg.starts_with("all 2 strategies failed: label~\"Usuario\""));
        assert!(msg.contains("; css=input[type='text']"));
    }

    #[test]
    fn builder_keeps_order() {
        let chain = chain();
        let timeouts: Vec<_> = chain.strategies().iter().map(|s| s.timeout).collect();
        assert_eq!(
            timeouts,
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }
}
