use crate::system::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Unset,
    Set,
    Expired,
}

/// One-shot timer. Once a set deadline has been observed to pass the timer
/// latches in `Expired` until the next `set`/`unset`.
#[derive(Debug, Default, Clone)]
pub struct Timer {
    deadline: Option<Timestamp>,
    expired: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, now: Timestamp, delay_ms: u64) {
        self.deadline = Some(now.saturating_add(delay_ms));
        self.expired = false;
    }

    pub fn unset(&mut self) {
        self.deadline = None;
        self.expired = false;
    }

    pub fn state(&mut self, now: Timestamp) -> TimerState {
        if self.expired {
            return TimerState::Expired;
        }
        match self.deadline {
            None => TimerState::Unset,
            Some(deadline) if now >= deadline => {
                self.expired = true;
                self.deadline = None;
                TimerState::Expired
            }
            Some(_) => TimerState::Set,
        }
    }
}
