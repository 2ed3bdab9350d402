/// First year of the early/late 1980s eras
pub const EIGHTIES_FIRST_YEAR: u16 = 1980;
/// Last year of the early/late 1980s eras (inclusive)
pub const EIGHTIES_LAST_YEAR: u16 = 1989;

/// First year of the 1990-2006 era
pub const NINETIES_FIRST_YEAR: u16 = 1990;
/// Last year of the 1990-2006 era (inclusive)
pub const NINETIES_LAST_YEAR: u16 = 2006;

/// First year of the week-based era
pub const WEEKLY_FIRST_YEAR: u16 = 2007;

/// Minimum valid month (January)
pub const MIN_MONTH: u8 = 1;
/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Minimum ISO week number
pub const MIN_WEEK: u8 = 1;
/// Maximum ISO week number in a long year
pub const MAX_WEEK: u8 = 53;
/// ISO week count of a regular year
pub const SHORT_YEAR_WEEKS: u8 = 52;

/// December 28th always falls in the last ISO week of its year
pub(crate) const LAST_WEEK_ANCHOR: (u32, u32) = (12, 28);

/// Width of a factory location code
pub const FACTORY_CODE_LEN: usize = 2;

/// Accepted early-1980s code lengths, inclusive
pub const EARLY_1980_LEN: (usize, usize) = (3, 4);
/// Accepted late-1980s code lengths, inclusive
pub const LATE_1980_LEN: (usize, usize) = (5, 6);
/// Positions read from an interleaved code; 1990-2006 codes may carry more, which are ignored
pub const INTERLEAVED_LEN: usize = FACTORY_CODE_LEN + 4;

pub(crate) const CENTURY_1900: u16 = 1900;
pub(crate) const CENTURY_2000: u16 = 2000;

/// 1990-2006 codes: a year fragment at or below this is 20xx
pub const NINETIES_NEW_CENTURY_MAX: u8 = 6;
/// 1990-2006 codes: a year fragment at or above this is 19xx
pub const NINETIES_OLD_CENTURY_MIN: u8 = 90;

/// Week-based codes with a leading `0` fragment digit must be at least this
pub const WEEKLY_FRAGMENT_MIN: u8 = 7;
