use std::{
    fmt,
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

/// Monotonic milliseconds since an arbitrary process-local epoch.
pub type Timestamp = u64;

pub fn diff_msec(lhs: Timestamp, rhs: Timestamp) -> i64 {
    lhs as i64 - rhs as i64
}

pub trait Clock: fmt::Debug + Send + Sync {
    fn now_ms(&self) -> Timestamp;
}

static MONOTONIC_EPOCH: OnceLock<Instant> = OnceLock::new();

fn monotonic_ms() -> Timestamp {
    MONOTONIC_EPOCH
        .get_or_init(Instant::now)
        .elapsed()
        .as_millis() as Timestamp
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        monotonic_ms()
    }
}

/// Settable clock for exercising timeout and scheduler paths.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now)),
        }
    }

    pub fn advance_ms(&self, delta: u64) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn set_ms(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
