//! Building date codes from structured fields.
//!
//! Every input is validated before anything is rendered: the factory code first, then the
//! year against the era window, then the month or ISO week.

use crate::types::{FactoryCode, Month, Week};
use crate::{DateCode, DateCodec, Era, Result};
use chrono::{Datelike, NaiveDate};
use tracing::{debug, trace};

impl DateCodec {
    /// Builds an early-1980s code.
    ///
    /// # Errors
    /// Returns `DateCodeError::OutOfRange` for a year outside 1980-1989 or a month outside 1-12.
    pub fn early_1980(&self, year: u32, month: u32) -> Result<DateCode> {
        let year = self.check_year(Era::Early1980, year)?;
        let month = Month::new(month)?;
        Ok(DateCode::Early1980 { year, month })
    }

    /// Builds a late-1980s code.
    ///
    /// # Errors
    /// Returns `MissingInput`/`MalformedCode` for a bad factory code and `OutOfRange`
    /// for a year outside 1980-1989 or a month outside 1-12.
    pub fn late_1980(&self, factory: &str, year: u32, month: u32) -> Result<DateCode> {
        let factory = FactoryCode::new(factory)?;
        let year = self.check_year(Era::Late1980, year)?;
        let month = Month::new(month)?;
        Ok(DateCode::Late1980 {
            factory,
            year,
            month,
        })
    }

    /// Builds a 1990-2006 code.
    ///
    /// # Errors
    /// Returns `MissingInput`/`MalformedCode` for a bad factory code and `OutOfRange`
    /// for a year outside 1990-2006 or a month outside 1-12.
    pub fn mid_1990(&self, factory: &str, year: u32, month: u32) -> Result<DateCode> {
        let factory = FactoryCode::new(factory)?;
        let year = self.check_year(Era::Mid1990, year)?;
        let month = Month::new(month)?;
        Ok(DateCode::Mid1990 {
            factory,
            year,
            month,
        })
    }

    /// Builds a week-based code. `year` is the ISO week-based year.
    ///
    /// # Errors
    /// Returns `MissingInput`/`MalformedCode` for a bad factory code, and `OutOfRange` for a
    /// year outside 2007 to [`DateCodec::ceiling_year`] or a week past the year's ISO week count.
    pub fn post_2007(&self, factory: &str, year: u32, week: u32) -> Result<DateCode> {
        let factory = FactoryCode::new(factory)?;
        let year = self.check_year(Era::Post2007, year)?;
        let week = Week::new(week, year.into())?;
        Ok(DateCode::Post2007 {
            factory,
            year,
            week,
        })
    }

    /// Generates an early-1980s code string.
    ///
    /// # Errors
    /// See [`DateCodec::early_1980`].
    pub fn generate_early_1980(&self, year: u32, month: u32) -> Result<String> {
        rendered(Era::Early1980, self.early_1980(year, month))
    }

    /// Generates a late-1980s code string.
    ///
    /// # Errors
    /// See [`DateCodec::late_1980`].
    pub fn generate_late_1980(&self, factory: &str, year: u32, month: u32) -> Result<String> {
        rendered(Era::Late1980, self.late_1980(factory, year, month))
    }

    /// Generates a 1990-2006 code string.
    ///
    /// # Errors
    /// See [`DateCodec::mid_1990`].
    pub fn generate_1990(&self, factory: &str, year: u32, month: u32) -> Result<String> {
        rendered(Era::Mid1990, self.mid_1990(factory, year, month))
    }

    /// Generates a week-based code string.
    ///
    /// # Errors
    /// See [`DateCodec::post_2007`].
    pub fn generate_2007(&self, factory: &str, year: u32, week: u32) -> Result<String> {
        rendered(Era::Post2007, self.post_2007(factory, year, week))
    }

    /// Generates an early-1980s code string for a manufacturing date.
    ///
    /// # Errors
    /// See [`DateCodec::early_1980`].
    pub fn generate_early_1980_from_date(&self, date: NaiveDate) -> Result<String> {
        self.generate_early_1980(calendar_year(date.year()), date.month())
    }

    /// Generates a late-1980s code string for a manufacturing date.
    ///
    /// # Errors
    /// See [`DateCodec::late_1980`].
    pub fn generate_late_1980_from_date(&self, factory: &str, date: NaiveDate) -> Result<String> {
        self.generate_late_1980(factory, calendar_year(date.year()), date.month())
    }

    /// Generates a 1990-2006 code string for a manufacturing date.
    ///
    /// # Errors
    /// See [`DateCodec::mid_1990`].
    pub fn generate_1990_from_date(&self, factory: &str, date: NaiveDate) -> Result<String> {
        self.generate_1990(factory, calendar_year(date.year()), date.month())
    }

    /// Generates a week-based code string for a manufacturing date.
    ///
    /// The year digits come from the ISO week-based year, so an early-January date that still
    /// belongs to week 52 or 53 is stamped with the previous year, and a late-December date in
    /// week 1 with the next.
    ///
    /// # Errors
    /// See [`DateCodec::post_2007`].
    pub fn generate_2007_from_date(&self, factory: &str, date: NaiveDate) -> Result<String> {
        let iso = date.iso_week();
        self.generate_2007(factory, calendar_year(iso.year()), iso.week())
    }
}

/// Negative years can never match an era window; map them to 0 so the window check rejects them.
fn calendar_year(year: i32) -> u32 {
    u32::try_from(year).unwrap_or(0)
}

fn rendered(era: Era, code: Result<DateCode>) -> Result<String> {
    match code {
        Ok(code) => {
            let rendered = code.encode();
            trace!(%era, code = %rendered, "generated date code");
            Ok(rendered)
        }
        Err(error) => {
            debug!(%era, %error, "rejected date code fields");
            Err(error)
        }
    }
}
