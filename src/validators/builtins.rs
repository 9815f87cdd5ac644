//! XSD built-in types
//!
//! Lexical checks for the built-in primitive and derived types the
//! validator understands. A type that is not listed here is looked up as a
//! named simple type of the schema instead.

use super::exceptions::ValueError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

/// XSD 1.0 Namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

// Lexical shapes. `[0-9]` keeps digit classes ASCII-only.
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());
static TIME_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?$").unwrap());
static DATETIME_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?$").unwrap()
});
static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^-?P(([0-9]+Y)?([0-9]+M)?([0-9]+D)?)?(T([0-9]+H)?([0-9]+M)?([0-9]+(\.[0-9]+)?S)?)?$",
    )
    .unwrap()
});
static GYEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]{4}$").unwrap());
static GYEAR_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]{4}-[0-9]{2}$").unwrap());
static HEX_BINARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]*$").unwrap());
static BASE64_BINARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/]*={0,2}$").unwrap());
static ANY_URI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap());

/// Built-in XSD type recognised by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    /// xs:string
    String,
    /// xs:integer (64-bit here)
    Integer,
    /// xs:int
    Int,
    /// xs:long
    Long,
    /// xs:positiveInteger
    PositiveInteger,
    /// xs:decimal
    Decimal,
    /// xs:float
    Float,
    /// xs:double
    Double,
    /// xs:boolean
    Boolean,
    /// xs:date
    Date,
    /// xs:time
    Time,
    /// xs:dateTime
    DateTime,
    /// xs:duration
    Duration,
    /// xs:gYear
    GYear,
    /// xs:gYearMonth
    GYearMonth,
    /// xs:hexBinary
    HexBinary,
    /// xs:base64Binary
    Base64Binary,
    /// xs:anyURI
    AnyUri,
}

impl BuiltinType {
    /// All supported built-in types
    pub const ALL: [BuiltinType; 18] = [
        BuiltinType::String,
        BuiltinType::Integer,
        BuiltinType::Int,
        BuiltinType::Long,
        BuiltinType::PositiveInteger,
        BuiltinType::Decimal,
        BuiltinType::Float,
        BuiltinType::Double,
        BuiltinType::Boolean,
        BuiltinType::Date,
        BuiltinType::Time,
        BuiltinType::DateTime,
        BuiltinType::Duration,
        BuiltinType::GYear,
        BuiltinType::GYearMonth,
        BuiltinType::HexBinary,
        BuiltinType::Base64Binary,
        BuiltinType::AnyUri,
    ];

    /// Look up a built-in by its local name
    pub fn from_name(local_name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == local_name)
    }

    /// Local name of the type in the XSD namespace
    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::String => "string",
            BuiltinType::Integer => "integer",
            BuiltinType::Int => "int",
            BuiltinType::Long => "long",
            BuiltinType::PositiveInteger => "positiveInteger",
            BuiltinType::Decimal => "decimal",
            BuiltinType::Float => "float",
            BuiltinType::Double => "double",
            BuiltinType::Boolean => "boolean",
            BuiltinType::Date => "date",
            BuiltinType::Time => "time",
            BuiltinType::DateTime => "dateTime",
            BuiltinType::Duration => "duration",
            BuiltinType::GYear => "gYear",
            BuiltinType::GYearMonth => "gYearMonth",
            BuiltinType::HexBinary => "hexBinary",
            BuiltinType::Base64Binary => "base64Binary",
            BuiltinType::AnyUri => "anyURI",
        }
    }

    /// Whether numeric bound facets apply to restrictions of this type
    pub fn has_numeric_bounds(self) -> bool {
        matches!(
            self,
            BuiltinType::Decimal | BuiltinType::Integer | BuiltinType::Float | BuiltinType::Double
        )
    }

    /// Check that `value` is in the lexical space of this type
    pub fn check(self, value: &str) -> Result<(), ValueError> {
        let ok = match self {
            BuiltinType::String => true,
            BuiltinType::Integer | BuiltinType::Long => value.parse::<i64>().is_ok(),
            BuiltinType::Int => value.parse::<i32>().is_ok(),
            BuiltinType::PositiveInteger => return check_positive_integer(value),
            BuiltinType::Decimal | BuiltinType::Double => {
                parse_finite(value, value.parse::<f64>().ok())
            }
            BuiltinType::Float => parse_finite(value, value.parse::<f32>().ok().map(f64::from)),
            BuiltinType::Boolean => matches!(value, "true" | "false" | "1" | "0"),
            BuiltinType::Date => {
                DATE_SHAPE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
            }
            BuiltinType::Time => {
                TIME_SHAPE.is_match(value)
                    && NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
                        .map(|t| !is_leap_second(&t))
                        .unwrap_or(false)
            }
            BuiltinType::DateTime => {
                DATETIME_SHAPE.is_match(value)
                    && NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                        .map(|dt| !is_leap_second(&dt.time()))
                        .unwrap_or(false)
            }
            BuiltinType::Duration => DURATION.is_match(value),
            BuiltinType::GYear => GYEAR.is_match(value),
            BuiltinType::GYearMonth => GYEAR_MONTH.is_match(value),
            BuiltinType::HexBinary => HEX_BINARY.is_match(value),
            BuiltinType::Base64Binary => BASE64_BINARY.is_match(value),
            BuiltinType::AnyUri => ANY_URI.is_match(value),
        };

        if ok {
            Ok(())
        } else {
            Err(ValueError::InvalidLexical {
                type_name: self.name(),
                value: value.to_string(),
            })
        }
    }
}

fn check_positive_integer(value: &str) -> Result<(), ValueError> {
    let parsed = value
        .parse::<i64>()
        .map_err(|_| ValueError::InvalidPositiveInteger(value.to_string()))?;
    if parsed <= 0 {
        return Err(ValueError::NotPositive(parsed));
    }
    Ok(())
}

/// Overflowing literals parse to infinity; only a spelled-out infinity is accepted
fn parse_finite(value: &str, parsed: Option<f64>) -> bool {
    match parsed {
        Some(n) if n.is_infinite() => value.to_ascii_lowercase().contains("inf"),
        Some(_) => true,
        None => false,
    }
}

// chrono encodes a leap second as nanoseconds >= 1e9
fn is_leap_second(time: &NaiveTime) -> bool {
    time.nanosecond() >= 1_000_000_000
}
