#![forbid(unsafe_code)]

//! JSON-like values held by a [`DataStore`](crate::DataStore).
//!
//! Every bound view location is plain text, so a [`Value`] is only ever
//! observed through its string form. The `Display` impl defines that
//! coercion and is the single place the engine turns data into text.
//!
//! # Coercion Table
//!
//! | Value | Rendered as |
//! |-------|-------------|
//! | `Null` | `null` |
//! | `Bool(b)` | `true` / `false` |
//! | `Number(n)` | integral values without a fraction (`3`, not `3.0`); exponent form outside `1e-6..1e21` (`1e-7`, `1e+21`); `NaN`, `Infinity`, `-Infinity` |
//! | `String(s)` | `s` verbatim |
//! | `List(xs)` | elements joined by `,`; `Null` elements render empty |
//! | `Map(_)` | `[object Object]` |

use std::collections::BTreeMap;
use std::fmt;

/// Magnitudes at or above this print in exponent notation.
const INTEGER_RENDER_LIMIT: f64 = 1e21;

/// Non-zero magnitudes below this print in exponent notation.
const SMALL_RENDER_LIMIT: f64 = 1e-6;

/// A dynamically typed data value.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Any number; integers are stored as `f64`.
    Number(f64),
    /// UTF-8 text.
    String(String),
    /// Ordered list.
    List(Vec<Value>),
    /// String-keyed object.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Borrow the inner string, if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The inner number, if this is a `Number`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The inner boolean, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether this is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render the value the way a bound view displays it.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("NaN");
    }
    if n.is_infinite() {
        return f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    let abs = n.abs();
    if abs >= INTEGER_RENDER_LIMIT || (abs < SMALL_RENDER_LIMIT && n != 0.0) {
        return write_exponent(f, n);
    }
    if n.fract() == 0.0 {
        // Covers -0.0 as well, which renders as "0".
        return write!(f, "{}", n as i128);
    }
    write!(f, "{n}")
}

/// Shortest digits with a signed exponent: `1e-7`, `1.5e+21`.
fn write_exponent(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let digits = format!("{n:e}");
    match digits.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
        _ => f.write_str(&digits),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write_number(f, *n),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !item.is_null() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Self::Map(_) => f.write_str("[object Object]"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_render() {
        assert_eq!(Value::Null.render(), "null");
        assert_eq!(Value::from(true).render(), "true");
        assert_eq!(Value::from(false).render(), "false");
        assert_eq!(Value::from("hi").render(), "hi");
    }

    #[test]
    fn integral_numbers_have_no_fraction() {
        assert_eq!(Value::from(3).render(), "3");
        assert_eq!(Value::from(-42i64).render(), "-42");
        assert_eq!(Value::from(1.0).render(), "1");
        assert_eq!(Value::from(-0.0).render(), "0");
    }

    #[test]
    fn fractional_numbers_use_shortest_form() {
        assert_eq!(Value::from(1.5).render(), "1.5");
        assert_eq!(Value::from(0.1).render(), "0.1");
        assert_eq!(Value::from(0.000001).render(), "0.000001");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_form() {
        assert_eq!(Value::from(1e-7).render(), "1e-7");
        assert_eq!(Value::from(-2.5e-8).render(), "-2.5e-8");
        assert_eq!(Value::from(1e21).render(), "1e+21");
        assert_eq!(Value::from(1.5e300).render(), "1.5e+300");
        assert_eq!(Value::from(1e20).render(), "100000000000000000000");
    }

    #[test]
    fn non_finite_numbers() {
        assert_eq!(Value::from(f64::NAN).render(), "NaN");
        assert_eq!(Value::from(f64::INFINITY).render(), "Infinity");
        assert_eq!(Value::from(f64::NEG_INFINITY).render(), "-Infinity");
    }

    #[test]
    fn list_joins_with_comma() {
        let v = Value::List(vec![1.into(), Value::Null, "x".into()]);
        assert_eq!(v.render(), "1,,x");
        assert_eq!(Value::List(Vec::new()).render(), "");
    }

    #[test]
    fn map_renders_as_object_tag() {
        let mut m = BTreeMap::new();
        m.insert("a".to_owned(), Value::from(1));
        assert_eq!(Value::Map(m).render(), "[object Object]");
    }

    #[test]
    fn option_conversion() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::from("a"));
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from("a").as_str(), Some("a"));
        assert_eq!(Value::from(2).as_f64(), Some(2.0));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert!(Value::default().is_null());
        assert_eq!(Value::from(1).as_str(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_from_json() {
        let v: Value = serde_json::from_str(r#"{"a": [1, null, "x"], "b": true}"#).unwrap();
        let Value::Map(m) = v else {
            panic!("expected map");
        };
        assert_eq!(m["a"].render(), "1,,x");
        assert_eq!(m["b"], Value::Bool(true));
    }

    proptest::proptest! {
        #[test]
        fn integers_render_like_integers(n in -1_000_000_000i64..1_000_000_000) {
            proptest::prop_assert_eq!(Value::from(n).render(), n.to_string());
        }
    }
}
