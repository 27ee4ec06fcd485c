use std::time::Duration;

/// Length of the "wait it out" delay.
pub const DELAY_SECONDS: u32 = 20 * 60;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Presentation timer for the DELAY step. Counts down to zero and stays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// One second passes. Returns true only on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn mm_ss(&self) -> String {
        format_mm_ss(self.remaining)
    }
}

pub fn format_mm_ss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_zero() {
        let mut c = Countdown::new(2);
        assert!(!c.tick());
        assert!(c.tick());
        assert!(!c.tick());
        assert_eq!(c.remaining(), 0);
        assert!(c.is_expired());
    }

    #[test]
    fn formats_minutes() {
        assert_eq!(Countdown::new(DELAY_SECONDS).mm_ss(), "20:00");
        assert_eq!(format_mm_ss(65), "01:05");
    }
}
