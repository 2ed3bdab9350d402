use crate::consts::{
    FACTORY_CODE_LEN, LAST_WEEK_ANCHOR, MAX_MONTH, MAX_WEEK, MIN_MONTH, MIN_WEEK,
    SHORT_YEAR_WEEKS,
};
use crate::prelude::*;
use crate::DateCodeError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroU8;
use std::str::FromStr;

/// Country a factory location belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
pub enum Country {
    France,
    Italy,
    Spain,
    #[display(fmt = "USA")]
    #[serde(rename = "USA")]
    Usa,
    Germany,
    Switzerland,
}

/// A two-letter factory location code, stored upper-cased.
/// Always exactly two ASCII letters; digits and other characters are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FactoryCode([u8; FACTORY_CODE_LEN]);

impl FactoryCode {
    /// Creates a new factory code, case-folding it to upper case
    ///
    /// # Errors
    /// Returns `DateCodeError::MissingInput` for an empty string and
    /// `DateCodeError::MalformedCode` unless the input is exactly two letters.
    pub fn new(code: &str) -> Result<Self, DateCodeError> {
        match code.as_bytes() {
            [] => Err(DateCodeError::MissingInput {
                field: "factory location code",
            }),
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Ok(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            [_, _] => Err(DateCodeError::malformed(
                code,
                "factory location code must be alphabetic",
            )),
            _ => Err(DateCodeError::malformed(
                code,
                "factory location code must be two characters",
            )),
        }
    }

    /// Returns the upper-cased code bytes
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; FACTORY_CODE_LEN] {
        &self.0
    }

    /// Countries this factory location belongs to
    ///
    /// # Errors
    /// Returns `DateCodeError::UnknownLocation` if the code is not in the location table.
    pub fn countries(&self) -> Result<BTreeSet<Country>, DateCodeError> {
        crate::country::lookup(self)
    }
}

impl FromStr for FactoryCode {
    type Err = DateCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for FactoryCode {
    type Error = DateCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<FactoryCode> for String {
    fn from(code: FactoryCode) -> Self {
        code.to_string()
    }
}

impl fmt::Display for FactoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(self.0[0]), char::from(self.0[1]))
    }
}

/// A month value guaranteed to be in the range `MIN_MONTH..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's within `MIN_MONTH..=MAX_MONTH`
    ///
    /// # Errors
    /// Returns `DateCodeError::OutOfRange` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u32) -> Result<Self, DateCodeError> {
        let out_of_range = || {
            DateCodeError::out_of_range("month", value, MIN_MONTH.into(), MAX_MONTH.into())
        };
        let byte = u8::try_from(value).map_err(|_| out_of_range())?;
        let non_zero = NonZeroU8::new(byte).ok_or_else(out_of_range)?;
        if byte > MAX_MONTH {
            return Err(out_of_range());
        }
        Ok(Self(non_zero))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Month {
    type Error = DateCodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value.into())
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ISO 8601 week number valid for a given week-based year
/// Uses `NonZeroU8` internally, so 0 is not a valid week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Week(NonZeroU8);

impl Week {
    /// Creates a new Week, validating it against the ISO week count of `year`
    ///
    /// # Errors
    /// Returns `DateCodeError::OutOfRange` if the value is 0 or past the last week of `year`.
    pub fn new(value: u32, year: i32) -> Result<Self, DateCodeError> {
        let max = iso_weeks_in_year(year);
        let out_of_range =
            || DateCodeError::out_of_range("week", value, MIN_WEEK.into(), max.into());
        let byte = u8::try_from(value).map_err(|_| out_of_range())?;
        let non_zero = NonZeroU8::new(byte).ok_or_else(out_of_range)?;
        if byte > max {
            return Err(out_of_range());
        }
        Ok(Self(non_zero))
    }

    /// Returns the week value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Week {
    type Error = DateCodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // Can't check the year's week count without context, so only the widest bound applies
        let non_zero = NonZeroU8::new(value).ok_or_else(|| {
            DateCodeError::out_of_range("week", value.into(), MIN_WEEK.into(), MAX_WEEK.into())
        })?;
        if value > MAX_WEEK {
            return Err(DateCodeError::out_of_range(
                "week",
                value.into(),
                MIN_WEEK.into(),
                MAX_WEEK.into(),
            ));
        }
        Ok(Self(non_zero))
    }
}

impl From<Week> for u8 {
    fn from(week: Week) -> Self {
        week.0.get()
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of ISO 8601 weeks in `year` (52 or 53).
pub fn iso_weeks_in_year(year: i32) -> u8 {
    let (month, day) = LAST_WEEK_ANCHOR;
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|anchor| u8::try_from(anchor.iso_week().week()).ok())
        .unwrap_or(SHORT_YEAR_WEEKS)
}
