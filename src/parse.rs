//! Recovering structured fields from date code strings.
//!
//! Fields sit at fixed positions per era. Each parse runs the same stages in order:
//! length check, positional extraction (`MalformedCode`), range and century checks, then
//! factory location resolution.

use crate::consts::{
    CENTURY_1900, CENTURY_2000, FACTORY_CODE_LEN, INTERLEAVED_LEN, NINETIES_NEW_CENTURY_MAX,
    NINETIES_OLD_CENTURY_MIN, WEEKLY_FRAGMENT_MIN,
};
use crate::types::{Country, FactoryCode, Month, Week};
use crate::{DateCode, DateCodeError, DateCodec, DecodedDateCode, Era, Result};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Digits of an interleaved code after the factory letters.
struct Interleaved {
    factory: FactoryCode,
    /// Month or week, from the first and third digits
    unit: u32,
    /// Leading year digit (the tens)
    lead: u8,
    /// Both year digits as a number
    fragment: u8,
}

type FactoryFields<U> = (BTreeSet<Country>, FactoryCode, u16, U);

impl DateCodec {
    /// Parses `code` under the rules of `era`.
    ///
    /// # Errors
    /// Returns `MissingInput` for an empty string, `MalformedCode` for a length outside the
    /// era's window or a non-numeric date fragment, `OutOfRange` for an invalid year, month or
    /// week, `AmbiguousCentury` for an interleaved year fragment between the century
    /// thresholds, and `UnknownLocation` if the factory code is not in the location table.
    pub fn decode(&self, era: Era, code: &str) -> Result<DecodedDateCode> {
        match era {
            Era::Early1980 => {
                let (year, month) = logged(era, code, self.early_1980_fields(code))?;
                Ok(DecodedDateCode {
                    code: DateCode::Early1980 { year, month },
                    countries: BTreeSet::new(),
                })
            }
            Era::Late1980 => {
                let (countries, factory, year, month) =
                    logged(era, code, self.late_1980_fields(code))?;
                Ok(DecodedDateCode {
                    code: DateCode::Late1980 {
                        factory,
                        year,
                        month,
                    },
                    countries,
                })
            }
            Era::Mid1990 => {
                let (countries, factory, year, month) =
                    logged(era, code, self.mid_1990_fields(code))?;
                Ok(DecodedDateCode {
                    code: DateCode::Mid1990 {
                        factory,
                        year,
                        month,
                    },
                    countries,
                })
            }
            Era::Post2007 => {
                let (countries, factory, year, week) =
                    logged(era, code, self.post_2007_fields(code))?;
                Ok(DecodedDateCode {
                    code: DateCode::Post2007 {
                        factory,
                        year,
                        week,
                    },
                    countries,
                })
            }
        }
    }

    /// Parses an early-1980s code into `(year, month)`.
    ///
    /// # Errors
    /// See [`DateCodec::decode`].
    pub fn parse_early_1980(&self, code: &str) -> Result<(u16, u8)> {
        let (year, month) = logged(Era::Early1980, code, self.early_1980_fields(code))?;
        Ok((year, month.get()))
    }

    /// Parses a late-1980s code into `(countries, factory, year, month)`.
    ///
    /// # Errors
    /// See [`DateCodec::decode`].
    pub fn parse_late_1980(&self, code: &str) -> Result<FactoryFields<u8>> {
        let (countries, factory, year, month) =
            logged(Era::Late1980, code, self.late_1980_fields(code))?;
        Ok((countries, factory, year, month.get()))
    }

    /// Parses a 1990-2006 code into `(countries, factory, year, month)`.
    ///
    /// # Errors
    /// See [`DateCodec::decode`].
    pub fn parse_1990(&self, code: &str) -> Result<FactoryFields<u8>> {
        let (countries, factory, year, month) =
            logged(Era::Mid1990, code, self.mid_1990_fields(code))?;
        Ok((countries, factory, year, month.get()))
    }

    /// Parses a week-based code into `(countries, factory, year, week)`.
    ///
    /// # Errors
    /// See [`DateCodec::decode`].
    pub fn parse_2007(&self, code: &str) -> Result<FactoryFields<u8>> {
        let (countries, factory, year, week) =
            logged(Era::Post2007, code, self.post_2007_fields(code))?;
        Ok((countries, factory, year, week.get()))
    }

    fn early_1980_fields(&self, code: &str) -> Result<(u16, Month)> {
        let bytes = checked_len(Era::Early1980, code)?;
        let (yy, month) = bytes.split_at(2);
        let yy = number(code, yy)?;
        // A leading `0` is an empty tens digit, so `01` reads as January
        let month = number(code, month)?;

        let year = self.eighties_year(Era::Early1980, yy)?;
        Ok((year, Month::new(month)?))
    }

    fn late_1980_fields(&self, code: &str) -> Result<FactoryFields<Month>> {
        let bytes = checked_len(Era::Late1980, code)?;
        let (date, _) = bytes.split_at(bytes.len() - FACTORY_CODE_LEN);
        let (yy, month) = date.split_at(2);
        let yy = number(code, yy)?;
        let month = number(code, month)?;
        let factory = FactoryCode::new(&code[date.len()..])?;

        let year = self.eighties_year(Era::Late1980, yy)?;
        let month = Month::new(month)?;
        Ok((factory.countries()?, factory, year, month))
    }

    fn mid_1990_fields(&self, code: &str) -> Result<FactoryFields<Month>> {
        let parts = interleaved(Era::Mid1990, code)?;
        let month = Month::new(parts.unit)?;
        let year = if parts.fragment <= NINETIES_NEW_CENTURY_MAX {
            CENTURY_2000 + u16::from(parts.fragment)
        } else if parts.fragment >= NINETIES_OLD_CENTURY_MIN {
            CENTURY_1900 + u16::from(parts.fragment)
        } else {
            return Err(DateCodeError::AmbiguousCentury {
                fragment: parts.fragment,
            });
        };

        Ok((parts.factory.countries()?, parts.factory, year, month))
    }

    fn post_2007_fields(&self, code: &str) -> Result<FactoryFields<Week>> {
        let parts = interleaved(Era::Post2007, code)?;
        if parts.lead == 0 && parts.fragment < WEEKLY_FRAGMENT_MIN {
            return Err(DateCodeError::AmbiguousCentury {
                fragment: parts.fragment,
            });
        }
        let year = self.check_year(
            Era::Post2007,
            u32::from(CENTURY_2000) + u32::from(parts.fragment),
        )?;
        // Re-checked against the recovered year: week 53 only exists in long ISO years
        let week = Week::new(parts.unit, year.into())?;

        Ok((parts.factory.countries()?, parts.factory, year, week))
    }

    fn eighties_year(&self, era: Era, yy: u32) -> Result<u16> {
        self.check_year(era, u32::from(CENTURY_1900) + yy)
    }
}

fn logged<T>(era: Era, code: &str, result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => trace!(%era, code, "decoded date code"),
        Err(error) => debug!(%era, code, %error, "rejected date code"),
    }
    result
}

/// Rejects empty, non-ASCII and wrongly sized input. ASCII lets later stages slice by byte.
fn checked_len(era: Era, code: &str) -> Result<&[u8]> {
    if code.is_empty() {
        return Err(DateCodeError::MissingInput { field: "date code" });
    }
    if !code.is_ascii() {
        return Err(DateCodeError::malformed(code, "date code must be ASCII"));
    }
    let (min, max) = era.code_len();
    let len = code.len();
    if len < min || max.is_some_and(|max| len > max) {
        let expected = match max {
            Some(max) if max == min => format!("{min}"),
            Some(max) => format!("{min}-{max}"),
            None => format!("at least {min}"),
        };
        return Err(DateCodeError::malformed(
            code,
            format!("{era} codes are {expected} characters long, got {len}"),
        ));
    }
    Ok(code.as_bytes())
}

fn digit(code: &str, byte: u8) -> Result<u8> {
    if byte.is_ascii_digit() {
        Ok(byte - b'0')
    } else {
        Err(DateCodeError::malformed(
            code,
            format!("expected a digit, found {:?}", char::from(byte)),
        ))
    }
}

fn number(code: &str, bytes: &[u8]) -> Result<u32> {
    bytes.iter().try_fold(0u32, |acc, &byte| {
        digit(code, byte).map(|d| acc * 10 + u32::from(d))
    })
}

/// Splits `<factory><u0><y2><u1><y3>`. A `0` in the unit tens position means a single-digit unit.
///
/// Only the first six positions are read. Anything after them is ignored in eras whose length
/// window is open; [`checked_len`] has already rejected it where the window is exact.
fn interleaved(era: Era, code: &str) -> Result<Interleaved> {
    let bytes = checked_len(era, code)?;
    let Some(&[_, _, u0, y2, u1, y3]) = bytes.get(..INTERLEAVED_LEN) else {
        return Err(DateCodeError::malformed(
            code,
            format!("{era} codes are at least {INTERLEAVED_LEN} characters long"),
        ));
    };
    let factory = FactoryCode::new(&code[..FACTORY_CODE_LEN])?;
    let (u0, y2, u1, y3) = (
        digit(code, u0)?,
        digit(code, y2)?,
        digit(code, u1)?,
        digit(code, y3)?,
    );
    Ok(Interleaved {
        factory,
        unit: u32::from(u0 * 10 + u1),
        lead: y2,
        fragment: y2 * 10 + y3,
    })
}
