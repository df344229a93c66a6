use crate::domain::model::{ComposedPost, ProgressSnapshot};

pub const DEFAULT_HASHTAGS: &[&str] = &[
    "#YearProgress",
    "#Motivation",
    "#Goals",
    "#TimeManagement",
    "#Productivity",
];

const CLOSING_LINE: &str = "What will you accomplish with the time left? 💪";

/// `(threshold, emoji, line)`, checked top-down with `percentage >= threshold`.
const MILESTONES: &[(f64, &str, &str)] = &[
    (95.0, "🎊", "Almost there! Final sprint time!"),
    (90.0, "🎯", "We're in the final stretch!"),
    (75.0, "🍂", "Fourth quarter energy!"),
    (50.0, "⚡", "Past the halfway mark!"),
    (25.0, "🌸", "Building momentum!"),
];

const OPENING_MILESTONE: (&str, &str) = ("🚀", "The year is just beginning!");

pub fn milestone(percentage: f64) -> (&'static str, &'static str) {
    MILESTONES
        .iter()
        .find(|(threshold, _, _)| percentage >= *threshold)
        .map(|(_, emoji, line)| (*emoji, *line))
        .unwrap_or(OPENING_MILESTONE)
}

pub fn time_context(snapshot: &ProgressSnapshot) -> String {
    match snapshot.weeks_remaining {
        0..=2 => format!("Just {} days left!", snapshot.days_remaining),
        3..=4 => format!("Only {} weeks remaining!", snapshot.weeks_remaining),
        weeks => format!("About {} weeks left to go!", weeks),
    }
}

#[derive(Debug, Clone)]
pub struct MessageComposer {
    hashtags: Vec<String>,
}

impl Default for MessageComposer {
    fn default() -> Self {
        Self::new(DEFAULT_HASHTAGS.iter().map(|tag| tag.to_string()).collect())
    }
}

impl MessageComposer {
    /// The `#{year}` tag is inserted after the first configured tag.
    pub fn new(hashtags: Vec<String>) -> Self {
        Self { hashtags }
    }

    fn hashtag_line(&self, year: i32) -> String {
        let mut tags: Vec<String> = self
            .hashtags
            .iter()
            .map(|tag| {
                if tag.starts_with('#') {
                    tag.clone()
                } else {
                    format!("#{}", tag)
                }
            })
            .collect();
        let year_tag = format!("#{}", year);
        if !tags.contains(&year_tag) {
            tags.insert(tags.len().min(1), year_tag);
        }
        tags.join(" ")
    }

    pub fn compose(&self, snapshot: &ProgressSnapshot) -> ComposedPost {
        let (emoji, motivation) = milestone(snapshot.percentage_complete);

        let text = format!(
            "{emoji} {year} Progress Update\n\
             \n\
             📊 {pct:.1}% of the year complete\n\
             📅 {days} days remaining\n\
             ⏰ {context}\n\
             \n\
             {motivation}\n\
             \n\
             {closing}\n\
             \n\
             {tags}",
            emoji = emoji,
            year = snapshot.year,
            pct = snapshot.percentage_complete,
            days = snapshot.days_remaining,
            context = time_context(snapshot),
            motivation = motivation,
            closing = CLOSING_LINE,
            tags = self.hashtag_line(snapshot.year),
        );

        ComposedPost::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snapshot(y: i32, m: u32, d: u32) -> ProgressSnapshot {
        ProgressSnapshot::for_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_message_contains_values_verbatim() {
        let composer = MessageComposer::default();
        let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        while date <= NaiveDate::from_ymd_opt(2024, 12, 31).unwrap() {
            let snap = ProgressSnapshot::for_date(date);
            let post = composer.compose(&snap);
            assert!(post.text.contains(&format!("{:.1}% of the year complete", snap.percentage_complete)));
            assert!(post.text.contains(&format!("📅 {} days remaining", snap.days_remaining)));
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_day_123_message() {
        let post = MessageComposer::default().compose(&snapshot(2023, 5, 3));
        assert!(post.text.starts_with("🌸 2023 Progress Update"));
        assert!(post.text.contains("📊 33.7% of the year complete"));
        assert!(post.text.contains("📅 242 days remaining"));
        assert!(post.text.contains("⏰ About 34 weeks left to go!"));
        assert!(post.text.contains("Building momentum!"));
        assert!(post.text.ends_with(
            "#YearProgress #2023 #Motivation #Goals #TimeManagement #Productivity"
        ));
    }

    #[test]
    fn test_milestone_buckets() {
        assert_eq!(milestone(0.3).1, "The year is just beginning!");
        assert_eq!(milestone(25.0).1, "Building momentum!");
        assert_eq!(milestone(50.0).1, "Past the halfway mark!");
        assert_eq!(milestone(74.9).1, "Past the halfway mark!");
        assert_eq!(milestone(75.0).1, "Fourth quarter energy!");
        assert_eq!(milestone(90.0).1, "We're in the final stretch!");
        assert_eq!(milestone(100.0).0, "🎊");
    }

    #[test]
    fn test_time_context_thresholds() {
        // 20 days left -> 2 weeks
        assert_eq!(time_context(&snapshot(2023, 12, 11)), "Just 20 days left!");
        // 30 days left -> 4 weeks
        assert_eq!(time_context(&snapshot(2023, 12, 1)), "Only 4 weeks remaining!");
        assert_eq!(time_context(&snapshot(2023, 12, 31)), "Just 0 days left!");
    }

    #[test]
    fn test_custom_hashtags_keep_year_tag() {
        let composer = MessageComposer::new(vec!["Progress".to_string(), "#Rust".to_string()]);
        let post = composer.compose(&snapshot(2025, 6, 1));
        assert!(post.text.ends_with("#Progress #2025 #Rust"));

        let empty = MessageComposer::new(vec![]).compose(&snapshot(2025, 6, 1));
        assert!(empty.text.ends_with("#2025"));
    }

    #[test]
    fn test_default_message_fits_a_post() {
        let composer = MessageComposer::default();
        for (m, d) in [(1, 1), (6, 30), (12, 31)] {
            assert!(composer.compose(&snapshot(2024, m, d)).char_count() <= 280);
        }
    }
}
