use crate::{DateCodeError, Era, Result};
use crate::consts::{EIGHTIES_LAST_YEAR, NINETIES_LAST_YEAR};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Codec settings.
///
/// Every field has a default, so an empty document (`{}`) is a valid config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Newest year accepted for week-based codes. Defaults to the current UTC year.
    pub ceiling_year: Option<u16>,
}

impl CodecConfig {
    /// Pins the newest accepted week-based year
    pub const fn with_ceiling_year(mut self, year: u16) -> Self {
        self.ceiling_year = Some(year);
        self
    }
}

/// Entry point for generating and parsing date codes under a [`CodecConfig`].
///
/// The crate-level functions use `DateCodec::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateCodec {
    config: CodecConfig,
}

impl DateCodec {
    pub const fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Newest year accepted for week-based codes
    pub fn ceiling_year(&self) -> u16 {
        self.config.ceiling_year.unwrap_or_else(current_year)
    }

    /// Inclusive `(first, last)` manufacturing years for `era`
    pub fn year_window(&self, era: Era) -> (u16, u16) {
        let last = match era {
            Era::Early1980 | Era::Late1980 => EIGHTIES_LAST_YEAR,
            Era::Mid1990 => NINETIES_LAST_YEAR,
            Era::Post2007 => self.ceiling_year(),
        };
        (era.first_year(), last)
    }

    /// Validates `year` against the era's window
    pub(crate) fn check_year(&self, era: Era, year: u32) -> Result<u16> {
        let (first, last) = self.year_window(era);
        u16::try_from(year)
            .ok()
            .filter(|y| (first..=last).contains(y))
            .ok_or_else(|| DateCodeError::out_of_range("year", year, first.into(), last.into()))
    }
}

fn current_year() -> u16 {
    u16::try_from(Utc::now().year()).unwrap_or(u16::MAX)
}
