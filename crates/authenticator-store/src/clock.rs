//! Wall-clock helpers: the current Unix time and UTC calendar fields.

/// Seconds since the Unix epoch, or `0` if the system clock is before it.
#[must_use]
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// A UTC timestamp broken into calendar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcDateTime {
    pub year: u64,
    pub month: u64,
    pub day: u64,
    pub hour: u64,
    pub minute: u64,
    pub second: u64,
}

impl UtcDateTime {
    /// Split epoch seconds into UTC calendar fields (valid for years 1970–9999).
    #[allow(clippy::arithmetic_side_effects)]
    #[must_use]
    pub const fn from_unix(epoch_secs: u64) -> Self {
        // Howard Hinnant's `civil_from_days`.
        let total_days = epoch_secs / 86_400;
        let secs_of_day = epoch_secs % 86_400;

        // Days since 0000-03-01.
        let z = total_days + 719_468;
        let era = z / 146_097;
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let y = yoe + era * 400;

        Self {
            year: if month <= 2 { y + 1 } else { y },
            month,
            day: doy - (153 * mp + 2) / 5 + 1,
            hour: secs_of_day / 3600,
            minute: (secs_of_day % 3600) / 60,
            second: secs_of_day % 60,
        }
    }

    /// Compact `yyyyMMdd-HHmmss` stamp used in file names.
    #[must_use]
    pub fn compact(&self) -> String {
        format!(
            "{:04}{:02}{:02}-{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
