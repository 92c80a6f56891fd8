/// Milliseconds since the Unix epoch, UTC.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn millis(self) -> i64 {
        self.0
    }

    /// Whole days (fractional) since the epoch.
    pub fn days(self) -> f64 {
        self.0 as f64 / MILLIS_PER_DAY
    }
}

pub const MILLIS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

#[cfg(test)]
mod tests {
    use super::{MILLIS_PER_DAY, Timestamp};

    #[test]
    fn days_counts_from_epoch() {
        assert_eq!(Timestamp(0).days(), 0.0);
        assert_eq!(Timestamp(MILLIS_PER_DAY as i64).days(), 1.0);
        assert_eq!(Timestamp(-(MILLIS_PER_DAY as i64) / 2).days(), -0.5);
    }

    #[test]
    fn ordering_follows_millis() {
        assert!(Timestamp(5) < Timestamp(6));
        assert_eq!(Timestamp(7).millis(), 7);
    }
}
