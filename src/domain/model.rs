use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Year-completion statistics for a single calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub date: NaiveDate,
    pub year: i32,
    /// 1-based ordinal of `date` within its year.
    pub day_of_year: u32,
    pub days_in_year: u32,
    /// Rounded to one decimal place.
    pub percentage_complete: f64,
    pub days_remaining: u32,
    pub weeks_remaining: u32,
    pub months_remaining: u32,
}

impl ProgressSnapshot {
    pub fn for_date(date: NaiveDate) -> Self {
        let year = date.year();
        let day_of_year = date.ordinal();
        let days_in_year = days_in_year(year);
        let days_remaining = days_in_year - day_of_year;
        let raw_percentage = day_of_year as f64 / days_in_year as f64 * 100.0;

        Self {
            date,
            year,
            day_of_year,
            days_in_year,
            percentage_complete: (raw_percentage * 10.0).round() / 10.0,
            days_remaining,
            weeks_remaining: days_remaining / 7,
            months_remaining: 12 - date.month(),
        }
    }

    pub fn is_leap_year(&self) -> bool {
        self.days_in_year == 366
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Post body ready for the publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPost {
    pub text: String,
}

impl ComposedPost {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Truncates to `limit` characters, ending in `...` when shortened.
    pub fn fit_to(self, limit: usize) -> Self {
        if self.char_count() <= limit {
            return self;
        }
        let keep = limit.saturating_sub(3);
        let mut text: String = self.text.chars().take(keep).collect();
        text.push_str("...");
        Self { text }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: &'static str,
}

impl ChartImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: "year_progress_chart.png".to_string(),
            mime: "image/png",
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReceipt {
    pub post_id: String,
    pub screen_name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Published(PublishReceipt),
    DryRun { saved_chart: Option<String> },
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub snapshot: ProgressSnapshot,
    pub text: String,
    pub chart_bytes: usize,
    pub outcome: RunOutcome,
}
