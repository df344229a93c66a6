use crate::domain::model::ProgressSnapshot;
use crate::domain::ports::Clock;
use crate::utils::error::{PulseError, Result};
use chrono::{Local, NaiveDate, Utc};

/// Reads the wall clock, in local time or UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    utc: bool,
}

impl SystemClock {
    pub fn local() -> Self {
        Self { utc: false }
    }

    pub fn utc() -> Self {
        Self { utc: true }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Result<NaiveDate> {
        let today = if self.utc {
            Utc::now().date_naive()
        } else {
            Local::now().date_naive()
        };
        // An unset RTC reports the epoch
        if NaiveDate::from_ymd_opt(1970, 1, 1) == Some(today) {
            return Err(PulseError::ClockError {
                message: "system clock reports 1970-01-01; the clock is not set".to_string(),
            });
        }
        Ok(today)
    }
}

/// Always reports the same date. Used for `--date` replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    pub fn parse(value: &str) -> Result<Self> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|e| PulseError::InvalidConfigValueError {
                field: "date".to_string(),
                value: value.to_string(),
                reason: format!("Expected YYYY-MM-DD: {}", e),
            })
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Result<NaiveDate> {
        Ok(self.0)
    }
}

pub struct DateProgressCalculator<C: Clock> {
    clock: C,
}

impl<C: Clock> DateProgressCalculator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn current(&self) -> Result<ProgressSnapshot> {
        let today = self.clock.today()?;
        let snapshot = ProgressSnapshot::for_date(today);
        tracing::debug!(
            "Progress for {}: day {}/{} ({:.1}%)",
            today,
            snapshot.day_of_year,
            snapshot.days_in_year,
            snapshot.percentage_complete
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn year_of_snapshots(year: i32) -> Vec<ProgressSnapshot> {
        let mut date = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        let mut snapshots = Vec::new();
        while date.year() == year {
            snapshots.push(ProgressSnapshot::for_date(date));
            date = date.succ_opt().unwrap();
        }
        snapshots
    }

    #[test]
    fn test_days_add_up_for_every_date() {
        for year in [1900, 2000, 2023, 2024, 2100] {
            let snapshots = year_of_snapshots(year);
            assert_eq!(snapshots.len() as u32, snapshots[0].days_in_year);
            for snapshot in snapshots {
                assert_eq!(
                    snapshot.day_of_year + snapshot.days_remaining,
                    snapshot.days_in_year,
                    "invariant broken on {}",
                    snapshot.date
                );
            }
        }
    }

    #[test]
    fn test_percentage_is_monotonic_and_resets() {
        for year in [2023, 2024] {
            let snapshots = year_of_snapshots(year);
            for pair in snapshots.windows(2) {
                assert!(pair[1].percentage_complete >= pair[0].percentage_complete);
                assert!((0.0..=100.0).contains(&pair[1].percentage_complete));
            }
        }

        let dec_31 = ProgressSnapshot::for_date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        let jan_1 = ProgressSnapshot::for_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(jan_1.percentage_complete < dec_31.percentage_complete);
        assert_eq!(jan_1.day_of_year, 1);
    }

    #[test]
    fn test_calculator_uses_clock() {
        let clock = FixedClock::parse("2023-05-03").unwrap();
        let snapshot = DateProgressCalculator::new(clock).current().unwrap();
        assert_eq!(snapshot.year, 2023);
        assert_eq!(snapshot.days_remaining, 242);
    }

    #[test]
    fn test_fixed_clock_rejects_bad_dates() {
        assert!(FixedClock::parse("2023-02-29").is_err());
        assert!(FixedClock::parse("03/05/2023").is_err());
        assert!(FixedClock::parse(" 2024-02-29 ").is_ok());
    }

    #[test]
    fn test_system_clock_reports_a_date() {
        assert!(SystemClock::utc().today().is_ok());
    }
}
