//! Shared test helpers for in-memory integration tests.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use taskboard::task::{adapters::memory::InMemoryTaskRepository, services::TaskService};

/// Clock advancing one second per reading from a fixed start.
#[derive(Debug)]
pub struct TickingClock {
    next_micros: AtomicI64,
}

impl TickingClock {
    /// Instant of the first reading.
    pub fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0)
            .single()
            .expect("valid start instant")
    }
}

impl Default for TickingClock {
    fn default() -> Self {
        Self {
            next_micros: AtomicI64::new(Self::start().timestamp_micros()),
        }
    }
}

impl Clock for TickingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let step = TimeDelta::seconds(1)
            .num_microseconds()
            .expect("one second fits");
        let micros = self.next_micros.fetch_add(step, Ordering::SeqCst);
        DateTime::from_timestamp_micros(micros).expect("timestamp in range")
    }
}

/// Service type used across in-memory tests.
pub type TestService = TaskService<InMemoryTaskRepository, TickingClock>;

/// Provides a fresh in-memory repository for each test.
#[fixture]
pub fn repo() -> InMemoryTaskRepository {
    InMemoryTaskRepository::new()
}

/// Provides a service over a fresh repository with a ticking clock.
#[fixture]
pub fn service() -> TestService {
    TaskService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(TickingClock::default()),
    )
}
