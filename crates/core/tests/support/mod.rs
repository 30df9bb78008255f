//! Shared test helpers for `calbridge-core` integration tests.
//!
//! Lightweight in-memory implementations of the ports so tests can focus on
//! behaviour instead of wiring.

#![allow(dead_code)]

pub mod calendar;
pub mod credentials;

use std::sync::{Arc, Mutex};

use calbridge_core::Clock;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Clock pinned to a settable instant.
#[derive(Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(now)) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
}
