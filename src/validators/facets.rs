//! XSD constraining facets
//!
//! Checks a lexically valid value against the facets of a restriction.
//! Facets are evaluated in a fixed order and the first violation is
//! returned.

use tracing::debug;

use super::exceptions::ValueError;
use super::patterns::PatternCache;
use super::schemas::Restriction;

/// Check `value` against every enforced facet of `restriction`
///
/// `numeric` tells whether the restriction's base resolves to a type the
/// numeric bound facets apply to.
pub fn check_facets(
    value: &str,
    restriction: &Restriction,
    numeric: bool,
    patterns: &PatternCache,
) -> Result<(), ValueError> {
    check_length(value, restriction)?;
    if numeric {
        check_bounds(value, restriction)?;
    }
    check_patterns(value, restriction, patterns)?;
    check_enumeration(value, restriction)
}

/// `length`, `minLength` and `maxLength`, counted in characters
fn check_length(value: &str, restriction: &Restriction) -> Result<(), ValueError> {
    let actual = value.chars().count();

    if let Some(expected) = length_facet("length", restriction.length.as_deref()) {
        if actual != expected {
            return Err(ValueError::LengthMismatch { expected, actual });
        }
    }
    if let Some(min) = length_facet("minLength", restriction.min_length.as_deref()) {
        if actual < min {
            return Err(ValueError::TooShort { min, actual });
        }
    }
    if let Some(max) = length_facet("maxLength", restriction.max_length.as_deref()) {
        if actual > max {
            return Err(ValueError::TooLong { max, actual });
        }
    }
    Ok(())
}

/// `minInclusive`, `maxInclusive`, `minExclusive` and `maxExclusive`
fn check_bounds(value: &str, restriction: &Restriction) -> Result<(), ValueError> {
    let Ok(actual) = value.trim().parse::<f64>() else {
        return Ok(());
    };

    if let Some(bound) = bound_facet("minInclusive", restriction.min_inclusive.as_deref()) {
        if actual < bound {
            return Err(ValueError::BelowMinInclusive { bound, actual });
        }
    }
    if let Some(bound) = bound_facet("maxInclusive", restriction.max_inclusive.as_deref()) {
        if actual > bound {
            return Err(ValueError::AboveMaxInclusive { bound, actual });
        }
    }
    if let Some(bound) = bound_facet("minExclusive", restriction.min_exclusive.as_deref()) {
        if actual <= bound {
            return Err(ValueError::NotAboveMinExclusive { bound, actual });
        }
    }
    if let Some(bound) = bound_facet("maxExclusive", restriction.max_exclusive.as_deref()) {
        if actual >= bound {
            return Err(ValueError::NotBelowMaxExclusive { bound, actual });
        }
    }
    Ok(())
}

/// Every `pattern` must match the whole value
fn check_patterns(
    value: &str,
    restriction: &Restriction,
    patterns: &PatternCache,
) -> Result<(), ValueError> {
    for pattern in &restriction.patterns {
        if !patterns
            .is_match(pattern, value)
            .map_err(ValueError::InvalidPattern)?
        {
            return Err(ValueError::PatternMismatch(pattern.clone()));
        }
    }
    Ok(())
}

/// Exact, case-sensitive membership when any `enumeration` is declared
fn check_enumeration(value: &str, restriction: &Restriction) -> Result<(), ValueError> {
    if restriction.enumerations.is_empty() || restriction.enumerations.iter().any(|e| e == value) {
        Ok(())
    } else {
        Err(ValueError::NotEnumerated)
    }
}

fn length_facet(facet: &str, raw: Option<&str>) -> Option<usize> {
    let raw = raw?;
    match raw.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            debug!(facet, value = raw, "skipping unparsable length facet");
            None
        }
    }
}

fn bound_facet(facet: &str, raw: Option<&str>) -> Option<f64> {
    let raw = raw?;
    match raw.trim().parse::<f64>() {
        Ok(n) => Some(n),
        Err(_) => {
            debug!(facet, value = raw, "skipping unparsable bound facet");
            None
        }
    }
}
