//! Booking attempts: the orchestrator state machine, confirmation
//! detection and the per-attempt outcome.

mod confirmation;
mod error;
mod orchestrator;
mod outcome;


pub use confirmation::{ConfirmationDetector, Detection};
pub use error::{BookingError, BookingStep};
pub use orchestrator::{AttemptState, ERROR_EVIDENCE, Orchestrator, UNCONFIRMED_EVIDENCE};
pub use outcome::Outcome;
