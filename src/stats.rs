//! Descriptive statistics over engagement samples
//!
//! Upstream counters arrive as locale-formatted strings where `万` marks a
//! ×10,000 magnitude ("1.2万" = 12000) and missing values mean zero. All
//! rounding is half-up.

use crate::types::{Engagement, PostSummary};

/// The magnitude suffix used by the upstream locale (×10,000).
const WAN_SUFFIX: char = '万';

/// Parse a locale-formatted count into an integer.
///
/// Empty or unparseable input yields 0; a `万` suffix multiplies the numeric
/// prefix by 10,000; the result is rounded half-up.
pub fn parse_count(value: &str) -> i64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0;
    }

    let (digits, factor) = match trimmed.strip_suffix(WAN_SUFFIX) {
        Some(prefix) => (prefix, 10_000.0),
        None => (trimmed, 1.0),
    };

    match digits.parse::<f64>() {
        Ok(n) => (n * factor).round() as i64,
        Err(_) => 0,
    }
}

/// Engagement field a statistic is computed over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngagementField {
    /// Like count
    Likes,
    /// Comment count
    Comments,
    /// Collect count
    Collects,
    /// Synthetic composite: likes + comments + collects
    Interaction,
}

impl EngagementField {
    /// Numeric value of this field for one engagement record.
    pub fn value(&self, engagement: &Engagement) -> i64 {
        match self {
            EngagementField::Likes => parse_count(&engagement.likes),
            EngagementField::Comments => parse_count(&engagement.comments),
            EngagementField::Collects => parse_count(&engagement.collects),
            EngagementField::Interaction => {
                parse_count(&engagement.likes)
                    + parse_count(&engagement.comments)
                    + parse_count(&engagement.collects)
            }
        }
    }
}

/// Median of the values, sorted ascending.
///
/// Odd length: the middle value. Even length: the half-up-rounded average of
/// the two middle values. Empty input yields 0.
pub fn median(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 != 0 {
        sorted[mid]
    } else {
        round_half_up(sorted[mid - 1] + sorted[mid], 2)
    }
}

/// Half-up-rounded arithmetic mean. Empty input yields 0.
pub fn average(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    round_half_up(values.iter().sum(), values.len() as i64)
}

/// Median of an engagement field over a post sample.
pub fn sample_median(sample: &[PostSummary], field: EngagementField) -> i64 {
    let values: Vec<i64> = sample.iter().map(|p| field.value(&p.engagement)).collect();
    median(&values)
}

/// Average of an engagement field over a post sample.
pub fn sample_average(sample: &[PostSummary], field: EngagementField) -> i64 {
    let values: Vec<i64> = sample.iter().map(|p| field.value(&p.engagement)).collect();
    average(&values)
}

/// The `n` most recent posts, ordered by publish time descending.
pub fn most_recent(mut sample: Vec<PostSummary>, n: usize) -> Vec<PostSummary> {
    sample.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    sample.truncate(n);
    sample
}

/// `numerator / denominator` rounded half-up, for non-negative counts.
fn round_half_up(numerator: i64, denominator: i64) -> i64 {
    (numerator as f64 / denominator as f64).round() as i64
}
