//! Court booking bot for the Rivas municipal sports centre.
//!
//! Decides which slot to book on a given day (weekday evening, weekend or
//! holiday morning, or nothing on August Sundays), then drives the booking
//! website through a browser, retrying once if the attempt fails.

pub mod booking;
pub mod cli;
pub mod config;
pub mod domain;
pub mod driver;
pub mod holidays;
pub mod policy;
pub mod retry;
pub mod webdriver;
