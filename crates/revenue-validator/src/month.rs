//! Calendar month value type

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A calendar month (year + month), stored as the first day of the month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// Build a month from year and 1-based month number
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Month)
            .ok_or(ValidationError::InvalidMonth { year, month })
    }

    /// Month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        // Day 1 exists for every month chrono can represent
        Month(date - chrono::Duration::days(i64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Whole months from `self` to `other` (negative if `other` is earlier)
    pub fn months_until(&self, other: &Month) -> i32 {
        (other.year() - self.year()) * 12 + other.month() as i32 - self.month() as i32
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = ValidationError;

    /// Accepts `YYYY-MM` or a full `YYYY-MM-DD` date
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Month::from_date(date));
        }
        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map(Month)
            .map_err(|_| ValidationError::InvalidFormat(format!("unrecognised month '{}'", s)))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let month: Month = "1995-03".parse().unwrap();
        assert_eq!(month.year(), 1995);
        assert_eq!(month.month(), 3);
        assert_eq!(month.to_string(), "1995-03");
    }

    #[test]
    fn test_parse_full_date() {
        let month: Month = "1995-03-17".parse().unwrap();
        assert_eq!(month, Month::new(1995, 3).unwrap());
    }

    #[test]
    fn test_invalid_month() {
        assert!(Month::new(1995, 13).is_err());
        assert!(Month::new(1995, 0).is_err());
        assert!("1995-13".parse::<Month>().is_err());
        assert!("march".parse::<Month>().is_err());
    }

    #[test]
    fn test_ordering_across_years() {
        let dec = Month::new(1994, 12).unwrap();
        let jan = Month::new(1995, 1).unwrap();
        assert!(dec < jan);
        assert_eq!(dec.months_until(&jan), 1);
        assert_eq!(jan.months_until(&Month::new(1994, 1).unwrap()), -12);
    }

    #[test]
    fn test_serde_as_string() {
        let month = Month::new(1998, 8).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"1998-08\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month);
    }
}
