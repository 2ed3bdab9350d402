//! Factory location lookup.
//!
//! Maps a two-letter factory location code to the countries that registered it. A few codes
//! are shared by two national registries, so a lookup always yields a set.

use crate::types::{Country, FactoryCode};
use crate::DateCodeError;
use std::collections::BTreeSet;

use Country::{France, Germany, Italy, Spain, Switzerland, Usa};

const FR: &[Country] = &[France];
const IT: &[Country] = &[Italy];
const ES: &[Country] = &[Spain];
const US: &[Country] = &[Usa];
const DE: &[Country] = &[Germany];
const CH: &[Country] = &[Switzerland];
const FR_US: &[Country] = &[France, Usa];
const FR_ES: &[Country] = &[France, Spain];

/// Factory location table, sorted by code for binary search.
static LOCATIONS: &[([u8; 2], &[Country])] = &[
    (*b"AA", FR),
    (*b"AH", FR),
    (*b"AN", FR),
    (*b"AR", FR),
    (*b"AS", FR),
    (*b"BA", FR),
    (*b"BC", IT),
    (*b"BJ", FR),
    (*b"BO", IT),
    (*b"BU", FR),
    (*b"CA", ES),
    (*b"CE", IT),
    (*b"CO", FR),
    (*b"CT", FR),
    (*b"CX", FR),
    (*b"DI", CH),
    (*b"DR", FR),
    (*b"DT", FR),
    (*b"DU", FR),
    (*b"ET", FR),
    (*b"FA", CH),
    (*b"FC", US),
    (*b"FH", US),
    (*b"FL", FR_US),
    (*b"FO", IT),
    (*b"GI", ES),
    (*b"LA", US),
    (*b"LB", ES),
    (*b"LM", ES),
    (*b"LO", ES),
    (*b"LP", DE),
    (*b"LW", FR_ES),
    (*b"MA", IT),
    (*b"MB", FR),
    (*b"MI", FR),
    (*b"NO", FR),
    (*b"OB", IT),
    (*b"OL", DE),
    (*b"OS", US),
    (*b"RA", FR),
    (*b"RC", IT),
    (*b"RE", IT),
    (*b"RI", FR),
    (*b"SA", IT),
    (*b"SD", FR_US),
    (*b"SF", FR),
    (*b"SL", FR),
    (*b"SN", FR),
    (*b"SP", FR),
    (*b"SR", FR),
    (*b"TD", IT),
    (*b"TH", FR),
    (*b"TJ", FR),
    (*b"TR", FR),
    (*b"TS", FR),
    (*b"VI", FR),
    (*b"VX", FR),
];

/// Resolve a factory location code to every country it belongs to.
///
/// Matching is exact and case-insensitive.
///
/// # Errors
/// Returns `DateCodeError::MissingInput` for an empty string, `DateCodeError::MalformedCode`
/// unless the input is two letters, and `DateCodeError::UnknownLocation` if no table entry matches.
pub fn resolve_country(code: &str) -> Result<BTreeSet<Country>, DateCodeError> {
    FactoryCode::new(code)?.countries()
}

pub(crate) fn lookup(code: &FactoryCode) -> Result<BTreeSet<Country>, DateCodeError> {
    LOCATIONS
        .binary_search_by(|(key, _)| key.cmp(code.as_bytes()))
        .map(|idx| LOCATIONS[idx].1.iter().copied().collect())
        .map_err(|_| DateCodeError::UnknownLocation(code.to_string()))
}
