//! Domain types for the booking bot.
//!
//! These are small immutable values that flow from the date policy into
//! the reservation orchestrator. Validated types enforce their invariants
//! at construction time.

mod slot_time;
mod target;

pub use slot_time::{InvalidSlotTime, SlotTime};
pub use target::{Decision, EndpointClass, Target};
