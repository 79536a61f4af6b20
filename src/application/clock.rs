// Wall-clock abstraction
use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};

/// Wall-clock time source. Callers rely on it never going backwards.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// India Standard Time, UTC+05:30.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// Reads UTC and shifts it by a fixed offset, so readings never step back
/// at daylight-saving transitions of the host's zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `None` when the offset is a day or more either way.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::new)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::with_offset_minutes(DEFAULT_UTC_OFFSET_MINUTES).unwrap_or(Self::new(Utc.fix()))
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}
