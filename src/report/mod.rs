//! Dashboards over the record files.
//!
//! Every report follows the same pipeline: parse each record's date, keep
//! the rows inside an inclusive date range, then group and aggregate.
//!
//! | Module       | Report                                             |
//! |--------------|----------------------------------------------------|
//! | `production` | formula counts, rework and stock KPIs per employee |
//! | `costs`      | incident cost totals by time, employee, type       |
//! | `render`     | terminal tables and bars for both                  |

pub mod costs;
pub mod production;
pub mod render;

use std::collections::{BTreeMap, HashMap};
use std::ops::AddAssign;

use chrono::{Datelike, Duration, NaiveDate};
use pharmalog_common::{FormulaRecord, IncidentRecord, ParseEnumError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ValidationError;

pub use costs::CostReport;
pub use production::ProductionReport;

/// Width of a time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    /// Weeks end on Sunday; the bucket is labelled with that Sunday.
    Week,
    /// Labelled with the last day of the month.
    Month,
}

impl Granularity {
    /// Label of the bucket containing `date`.
    pub fn bucket(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                let to_sunday = 6 - date.weekday().num_days_from_monday();
                date + Duration::days(i64::from(to_sunday))
            }
            Granularity::Month => month_end(date),
        }
    }

    /// Label of the bucket following `bucket`.
    pub fn next(self, bucket: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => bucket + Duration::days(1),
            Granularity::Week => bucket + Duration::days(7),
            Granularity::Month => month_end(month_end(bucket) + Duration::days(1)),
        }
    }
}

fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first - Duration::days(1))
        .unwrap_or(date)
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "d" | "dia" => Ok(Granularity::Day),
            "week" | "w" | "semana" => Ok(Granularity::Week),
            "month" | "m" | "mes" | "mês" => Ok(Granularity::Month),
            _ => Err(ParseEnumError {
                kind: "grouping",
                value: s.to_string(),
                expected: "day, week, month",
            }),
        }
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Report parameters; unset bounds default to the oldest/newest record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ReportFilter {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub group: Option<Granularity>,
}

impl ReportFilter {
    /// Both bounds given with `start` after `end` is refused.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => {
                Err(ValidationError::InvertedRange { start, end })
            }
            _ => Ok(()),
        }
    }
}

/// Records that carry a calendar date.
pub trait Dated {
    fn record_date(&self) -> Option<NaiveDate>;
}

impl Dated for FormulaRecord {
    fn record_date(&self) -> Option<NaiveDate> {
        self.parsed_date()
    }
}

impl Dated for IncidentRecord {
    fn record_date(&self) -> Option<NaiveDate> {
        self.parsed_date()
    }
}

/// The rows that fall inside a report's date range.
#[derive(Debug)]
pub struct Selection<'a, T> {
    pub range: DateRange,
    pub rows: Vec<(NaiveDate, &'a T)>,
    /// Records skipped because their date could not be parsed
    pub skipped: usize,
}

/// Filter `records` to the inclusive range described by `filter`.
pub fn select<'a, T: Dated>(
    records: &'a [T],
    filter: &ReportFilter,
    today: NaiveDate,
) -> Selection<'a, T> {
    let mut dated = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for record in records {
        match record.record_date() {
            Some(date) => dated.push((date, record)),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "records with an unreadable date were left out of the report");
    }

    let min = dated.iter().map(|(d, _)| *d).min();
    let max = dated.iter().map(|(d, _)| *d).max();
    let range = DateRange {
        start: filter.start.or(min).unwrap_or(today),
        end: filter.end.or(max).unwrap_or(today),
    };
    dated.retain(|(date, _)| range.contains(*date));

    Selection {
        range,
        rows: dated,
        skipped,
    }
}

/// A label with how many rows carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub label: String,
    pub count: u64,
}

/// A label with a summed monetary value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Amount {
    pub label: String,
    pub value: f64,
}

/// One bucket of a time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point<V> {
    pub date: NaiveDate,
    pub value: V,
}

/// Count occurrences of each label, most frequent first, ties by label.
pub fn count_by<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<Count> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut out: Vec<Count> = counts
        .into_iter()
        .map(|(label, count)| Count {
            label: label.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    out
}

/// Sum values per label.
pub fn sum_by<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Vec<Amount> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for (label, value) in pairs {
        *sums.entry(label).or_default() += value;
    }
    sums.into_iter()
        .map(|(label, value)| Amount {
            label: label.to_string(),
            value,
        })
        .collect()
}

/// Aggregate dated values into contiguous buckets; empty buckets hold `V::default()`.
pub fn series<V>(
    values: impl IntoIterator<Item = (NaiveDate, V)>,
    group: Granularity,
) -> Vec<Point<V>>
where
    V: Default + AddAssign + Copy,
{
    let mut buckets: BTreeMap<NaiveDate, V> = BTreeMap::new();
    for (date, value) in values {
        *buckets.entry(group.bucket(date)).or_default() += value;
    }
    let (Some(first), Some(last)) = (
        buckets.keys().next().copied(),
        buckets.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut cursor = first;
    while cursor <= last {
        out.push(Point {
            date: cursor,
            value: buckets.get(&cursor).copied().unwrap_or_default(),
        });
        cursor = group.next(cursor);
    }
    out
}
