//! Post-submission confirmation detection.
//!
//! The booking site has no single reliable "done" page, so we probe a few
//! texts that only appear after a successful reservation. Probes run in
//! order and stop at the first hit.

use std::time::Duration;

use tracing::debug;

use crate::config::{FacilityConfig, StepTimeouts};
use crate::driver::{Matcher, Session};

/// What the detector saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// This indicator was visible.
    Confirmed(Matcher),
    /// No indicator was visible.
    Ambiguous,
}

/// Probes an ordered list of success indicators.
#[derive(Debug, Clone)]
pub struct ConfirmationDetector {
    indicators: Vec<Matcher>,
    probe_timeout: Duration,
}

impl ConfirmationDetector {
    pub fn new(indicators: Vec<Matcher>, probe_timeout: Duration) -> Self {
        Self {
            indicators,
            probe_timeout,
        }
    }

    /// Detector for the facility's confirmation texts.
    pub fn for_facility(facility: &FacilityConfig, timeouts: &StepTimeouts) -> Self {
        let indicators = facility
            .confirmation_texts
            .iter()
            .map(Matcher::text_contains)
            .collect();
        Self::new(indicators, timeouts.indicator)
    }

    pub fn indicators(&self) -> &[Matcher] {
        &self.indicators
    }

    /// Probe each indicator in order; the first visible one wins.
    ///
    /// A probe that errors counts as "not visible".
    pub async fn detect<S: Session>(&self, session: &mut S) -> Detection {
        for indicator in &self.indicators {
            match session.is_visible(indicator, self.probe_timeout).await {
                Ok(true) => return Detection::Confirmed(indicator.clone()),
                Ok(false) => debug!(%indicator, "indicator not visible"),
                Err(e) => debug!(%indicator, error = %e, "indicator probe failed"),
            }
        }
        Detection::Ambiguous
    }
}
