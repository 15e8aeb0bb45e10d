//! The `MonthKey` used to bucket transactions by calendar month.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A calendar month, written as a zero-padded `YYYY-MM` string.
///
/// Ordering is chronological, which is also the lexicographic ordering of the string form.
///
/// ```
/// # use fin::model::MonthKey;
/// # use chrono::NaiveDate;
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// let key = MonthKey::of(date);
/// assert_eq!(key.to_string(), "2024-03");
/// assert_eq!(key.previous().to_string(), "2024-02");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Returns `None` if `month` is not in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month that `date` falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The calendar month immediately before this one.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Long label such as `January 2024`.
    pub fn long_name(&self) -> String {
        match self.first_day() {
            Some(d) => d.format("%B %Y").to_string(),
            None => self.to_string(),
        }
    }

    /// Short chart label such as `Jan 24`.
    pub fn short_name(&self) -> String {
        match self.first_day() {
            Some(d) => d.format("%b %y").to_string(),
            None => self.to_string(),
        }
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("Invalid month '{s}', expected YYYY-MM"))?;
        anyhow::ensure!(
            year.len() == 4 && month.len() == 2,
            "Invalid month '{s}', expected YYYY-MM"
        );
        let year: i32 = year
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid year in month '{s}'"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid month number in month '{s}'"))?;
        MonthKey::new(year, month)
            .ok_or_else(|| anyhow::anyhow!("Month number out of range in '{s}'"))
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MonthKey::from_str(&s).map_err(serde::de::Error::custom)
    }
}
