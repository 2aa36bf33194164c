use chrono::{SecondsFormat, Utc};

/// Source of the `genesis_time` string filled in during completion
pub trait Clock {
    /// Current time as the string to store in `genesis_time`
    fn now(&self) -> String;
}

/// Wall clock, rendered as RFC3339 UTC with nanosecond precision
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

/// Clock that always returns the same string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl FixedClock {
    /// Clock pinned to `time`
    pub fn new(time: impl Into<String>) -> Self {
        Self(time.into())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_rfc3339_utc() {
        let now = SystemClock.now();
        assert!(now.ends_with('Z'), "{now}");
        assert!(chrono::DateTime::parse_from_rfc3339(&now).is_ok(), "{now}");
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new("2024-01-15T00:00:00Z");
        assert_eq!(clock.now(), "2024-01-15T00:00:00Z");
        assert_eq!(clock.now(), clock.now());
    }
}
