//! Time buckets for the sales chart.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use crate::StorefrontError;

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketMode {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl BucketMode {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Daily => "daily", Self::Weekly => "weekly", Self::Monthly => "monthly" }
    }

    /// Dataset label shown above the chart.
    pub fn chart_label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily Sales (৳)",
            Self::Weekly => "Weekly Sales (৳)",
            Self::Monthly => "Monthly Sales (৳)",
        }
    }

    pub fn bucket_for(&self, date: Option<NaiveDate>) -> BucketKey {
        let Some(date) = date else { return BucketKey::Invalid };
        match self {
            Self::Daily => BucketKey::Day(date),
            Self::Weekly => {
                let back = u64::from(date.weekday().num_days_from_sunday());
                BucketKey::Week(date.checked_sub_days(Days::new(back)).unwrap_or(date))
            }
            Self::Monthly => BucketKey::Month(date.month0()),
        }
    }
}

impl FromStr for BucketMode {
    type Err = StorefrontError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(StorefrontError::InvalidBucketMode(s.to_string())),
        }
    }
}

impl fmt::Display for BucketMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Ordering follows the calendar. Months ignore the year, so the same month
/// of different years shares one bucket. `Invalid` sorts after everything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketKey {
    Day(NaiveDate),
    /// Sunday that starts the week.
    Week(NaiveDate),
    /// Zero-based month.
    Month(u32),
    Invalid,
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(d) | Self::Week(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Month(m) => f.write_str(MONTHS.get(*m as usize).copied().unwrap_or("Invalid Date")),
            Self::Invalid => f.write_str("Invalid Date"),
        }
    }
}
