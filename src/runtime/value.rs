//! Scalar values bound to queries and read back from result rows.
//!
//! The query layer binds scalars only: dates are rendered to text before
//! they reach a statement.

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default text rendering for date/time values bound without an explicit format.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default text rendering for date values bound without an explicit format.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A single column value, as bound to a statement or fetched from a row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// One fetched row, keyed by column name in select order.
pub type Row = IndexMap<String, SqlValue>;

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(i) => Some(*i),
            SqlValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Loose textual form used when fingerprinting cache keys.
    ///
    /// Null and `false` render empty, `true` renders `1`, floats follow
    /// [`render_float`].
    pub fn render_loose(&self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Bool(true) => "1".to_string(),
            SqlValue::Bool(false) => String::new(),
            SqlValue::Int(i) => i.to_string(),
            SqlValue::Float(f) => render_float(*f),
            SqlValue::Text(s) => s.clone(),
        }
    }
}

/// Significant digits kept when a float is rendered loosely.
const FLOAT_PRECISION: i32 = 14;

/// Render a float with 14 significant digits and no trailing zeros.
///
/// Decimal exponents below -4 or from 14 up switch to exponent form with a
/// signed exponent and at least one fractional digit: `1.0E+20`, `2.5E-7`.
/// Everything else is plain: `0.3`, `100`, `0.0001`.
pub fn render_float(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        let infinity = if value > 0.0 { "INF" } else { "-INF" };
        return infinity.to_string();
    }

    let scientific = format!("{:.*e}", (FLOAT_PRECISION - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    if exponent < -4 || exponent >= FLOAT_PRECISION {
        let (lead, fraction) = digits.split_at(1);
        let fraction = if fraction.is_empty() { "0" } else { fraction };
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}{}.{}E{}{}",
            sign,
            lead,
            fraction,
            exponent_sign,
            exponent.abs()
        );
    }

    let rendered = if exponent < 0 {
        format!("0.{}{}", "0".repeat((-exponent - 1) as usize), digits)
    } else {
        let integer_len = (exponent + 1) as usize;
        if digits.len() <= integer_len {
            format!("{}{}", digits, "0".repeat(integer_len - digits.len()))
        } else {
            format!("{}.{}", &digits[..integer_len], &digits[integer_len..])
        }
    };
    format!("{}{}", sign, rendered)
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(b) => write!(f, "{}", b),
            SqlValue::Int(i) => write!(f, "{}", i),
            SqlValue::Float(fl) => write!(f, "{}", fl),
            SqlValue::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::Text(value.format(DEFAULT_DATETIME_FORMAT).to_string())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Text(value.format(DEFAULT_DATE_FORMAT).to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}
