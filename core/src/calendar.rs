use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A Gregorian year-month, the scope every grid and statistic is derived for.
/// Always constructed through `new`/`parse`, so `month` is known to be 1..=12.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(CoreError::InvalidMonth(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn current() -> Self {
        let today = today();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Cannot fail: fields were validated on construction.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    pub fn days_in_month(&self) -> u32 {
        let next_first = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1).unwrap()
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1).unwrap()
        };
        (next_first - self.first_day()).num_days() as u32
    }

    /// The date of `day` (1-based) within this month, as a `NaiveDate`
    /// formatting to `YYYY-MM-DD`.
    pub fn date_at(&self, day: u32) -> Result<NaiveDate> {
        if day < 1 || day > self.days_in_month() {
            return Err(CoreError::InvalidDay { month: *self, day });
        }
        Ok(NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap())
    }

    /// All dates of the month in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.first_day()
            .iter_days()
            .take(self.days_in_month() as usize)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn prev(&self) -> Self {
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

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = CoreError;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidMonth(input.to_string());
        let (year_str, month_str) = input.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year_str.parse().map_err(|_| invalid())?;
        let month: u32 = month_str.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month)
    }
}

/// The wall-clock current date, read at call time so a long-lived session
/// crossing midnight never sees a stale "today".
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn is_today(date: NaiveDate) -> bool {
    date == today()
}

pub fn is_future(date: NaiveDate) -> bool {
    is_future_at(today(), date)
}

/// Strict comparison: today itself is never "future".
pub fn is_future_at(today: NaiveDate, date: NaiveDate) -> bool {
    date > today
}

/// Fixed Saturday/Sunday convention, independent of locale.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
