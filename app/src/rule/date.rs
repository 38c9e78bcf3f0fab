use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use derive_more::derive::{Display, Error};

/// Calendar date of a holiday, written as `YYYY-MM-DD` in the holiday calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
#[display("{}", _0.format("%Y-%m-%d"))]
pub struct RuleDate(NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RuleDateError {
    #[display("expected YYYY-MM-DD")]
    Format,
    /// Three integers that name no real day, e.g. `2024-02-30`. Caught here instead of being
    /// sent to SmartThings as a rule that can never fire.
    #[display("not a calendar date")]
    NoSuchDay,
}

impl RuleDate {
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl FromStr for RuleDate {
    type Err = RuleDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(RuleDateError::Format);
        };

        let year: i32 = year.trim().parse().map_err(|_| RuleDateError::Format)?;
        let month: u32 = month.trim().parse().map_err(|_| RuleDateError::Format)?;
        let day: u32 = day.trim().parse().map_err(|_| RuleDateError::Format)?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(RuleDate)
            .ok_or(RuleDateError::NoSuchDay)
    }
}
