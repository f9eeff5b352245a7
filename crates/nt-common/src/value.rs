//! The "ranked or unranked" value stored at each series position.
//!
//! Persisted data marks a missing year with the text `"x"`. That marker is
//! converted to [`SeriesValue::Unranked`] when a record is read and written
//! back only when it is serialized; computation never sees the text or a
//! magic number standing in for it.

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// One position of a rank or count series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeriesValue {
    /// An observed rank (>= 1) or birth count (>= 0).
    Present(u32),
    /// Not on the list that year.
    #[default]
    Unranked,
}

impl SeriesValue {
    /// Persisted marker for [`SeriesValue::Unranked`].
    pub const MARKER: &'static str = "x";

    /// Parse persisted text. Anything that is not a non-negative integer is
    /// unranked.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::MARKER) {
            return SeriesValue::Unranked;
        }
        if let Ok(v) = trimmed.parse::<u32>() {
            return SeriesValue::Present(v);
        }
        match trimmed.parse::<f64>() {
            Ok(f) => Self::from_f64(f),
            Err(_) => SeriesValue::Unranked,
        }
    }

    fn from_f64(f: f64) -> Self {
        if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
            SeriesValue::Present(f as u32)
        } else {
            SeriesValue::Unranked
        }
    }

    /// The observed value, if any.
    pub fn get(self) -> Option<u32> {
        match self {
            SeriesValue::Present(v) => Some(v),
            SeriesValue::Unranked => None,
        }
    }

    pub fn is_present(self) -> bool {
        matches!(self, SeriesValue::Present(_))
    }

    pub fn is_unranked(self) -> bool {
        matches!(self, SeriesValue::Unranked)
    }

    /// The observed value as `f64` for the statistics crate.
    pub fn as_f64(self) -> Option<f64> {
        self.get().map(f64::from)
    }

    /// Present and no worse than `limit` (rank `<= limit`).
    ///
    /// An unranked position never satisfies a numeric comparison.
    pub fn within(self, limit: u32) -> bool {
        matches!(self, SeriesValue::Present(v) if v <= limit)
    }

    /// Present and strictly worse than `limit` (rank `> limit`).
    pub fn beyond(self, limit: u32) -> bool {
        matches!(self, SeriesValue::Present(v) if v > limit)
    }
}

impl From<Option<u32>> for SeriesValue {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(v) => SeriesValue::Present(v),
            None => SeriesValue::Unranked,
        }
    }
}

impl From<u32> for SeriesValue {
    fn from(value: u32) -> Self {
        SeriesValue::Present(value)
    }
}

/// Summation keeps "nobody contributed" distinct from zero.
impl Add for SeriesValue {
    type Output = SeriesValue;

    fn add(self, rhs: SeriesValue) -> SeriesValue {
        match (self, rhs) {
            (SeriesValue::Present(a), SeriesValue::Present(b)) => {
                SeriesValue::Present(a.saturating_add(b))
            }
            (SeriesValue::Present(a), SeriesValue::Unranked)
            | (SeriesValue::Unranked, SeriesValue::Present(a)) => SeriesValue::Present(a),
            (SeriesValue::Unranked, SeriesValue::Unranked) => SeriesValue::Unranked,
        }
    }
}

impl Sum for SeriesValue {
    fn sum<I: Iterator<Item = SeriesValue>>(iter: I) -> SeriesValue {
        iter.fold(SeriesValue::Unranked, Add::add)
    }
}

impl fmt::Display for SeriesValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesValue::Present(v) => write!(f, "{}", v),
            SeriesValue::Unranked => write!(f, "{}", Self::MARKER),
        }
    }
}

impl Serialize for SeriesValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct SeriesValueVisitor;

impl<'de> Visitor<'de> for SeriesValueVisitor {
    type Value = SeriesValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a rank/count number, numeric string, or \"x\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<SeriesValue, E> {
        Ok(u32::try_from(v)
            .map(SeriesValue::Present)
            .unwrap_or(SeriesValue::Unranked))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<SeriesValue, E> {
        Ok(u32::try_from(v)
            .map(SeriesValue::Present)
            .unwrap_or(SeriesValue::Unranked))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<SeriesValue, E> {
        Ok(SeriesValue::from_f64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<SeriesValue, E> {
        Ok(SeriesValue::parse(v))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<SeriesValue, E> {
        Ok(SeriesValue::Unranked)
    }

    fn visit_unit<E: de::Error>(self) -> Result<SeriesValue, E> {
        Ok(SeriesValue::Unranked)
    }

    fn visit_none<E: de::Error>(self) -> Result<SeriesValue, E> {
        Ok(SeriesValue::Unranked)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<SeriesValue, D::Error> {
        d.deserialize_any(SeriesValueVisitor)
    }
}

impl<'de> Deserialize<'de> for SeriesValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SeriesValueVisitor)
    }
}

/// Serde adapter for scalar `Option<u32>` fields (current rank and count)
/// that may be persisted as numbers, numeric strings, `"x"` or `null`.
pub mod lenient {
    use super::{SeriesValue, SeriesValueVisitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_u32(*v),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        deserializer
            .deserialize_any(SeriesValueVisitor)
            .map(SeriesValue::get)
    }
}

/// Deserialize `null` as the field's default; used for strings, lists and
/// nested objects that upstream exports sometimes write as `null`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de> + Default,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_marker_and_numbers() {
        assert_eq!(SeriesValue::parse("x"), SeriesValue::Unranked);
        assert_eq!(SeriesValue::parse("X"), SeriesValue::Unranked);
        assert_eq!(SeriesValue::parse(""), SeriesValue::Unranked);
        assert_eq!(SeriesValue::parse(" 42 "), SeriesValue::Present(42));
        assert_eq!(SeriesValue::parse("0"), SeriesValue::Present(0));
        assert_eq!(SeriesValue::parse("12.0"), SeriesValue::Present(12));
    }

    #[test]
    fn malformed_text_is_unranked() {
        assert_eq!(SeriesValue::parse("12abc"), SeriesValue::Unranked);
        assert_eq!(SeriesValue::parse("-3"), SeriesValue::Unranked);
        assert_eq!(SeriesValue::parse("1.5"), SeriesValue::Unranked);
        assert_eq!(SeriesValue::parse("NaN"), SeriesValue::Unranked);
    }

    #[test]
    fn sentinel_never_satisfies_comparisons() {
        assert!(!SeriesValue::Unranked.within(u32::MAX));
        assert!(!SeriesValue::Unranked.beyond(0));
        assert!(SeriesValue::Present(100).within(100));
        assert!(SeriesValue::Present(101).beyond(100));
    }

    #[test]
    fn sum_of_unranked_stays_unranked() {
        let total: SeriesValue = vec![SeriesValue::Unranked, SeriesValue::Unranked]
            .into_iter()
            .sum();
        assert_eq!(total, SeriesValue::Unranked);

        let empty: SeriesValue = Vec::<SeriesValue>::new().into_iter().sum();
        assert_eq!(empty, SeriesValue::Unranked);
    }

    #[test]
    fn sum_mixes_present_values() {
        let total: SeriesValue = vec![
            SeriesValue::Present(5),
            SeriesValue::Unranked,
            SeriesValue::Present(0),
            SeriesValue::Present(7),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, SeriesValue::Present(12));
    }

    #[test]
    fn real_zero_is_not_unranked() {
        let total = SeriesValue::Present(0) + SeriesValue::Unranked;
        assert_eq!(total, SeriesValue::Present(0));
        assert_ne!(total, SeriesValue::Unranked);
    }

    #[test]
    fn serde_roundtrip_text_form() {
        let values = vec![SeriesValue::Present(12), SeriesValue::Unranked];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"["12","x"]"#);
        let back: Vec<SeriesValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn deserialize_accepts_numbers_and_null() {
        let back: Vec<SeriesValue> = serde_json::from_str(r#"[3, null, "7", "oops", -1, 2.5]"#).unwrap();
        assert_eq!(
            back,
            vec![
                SeriesValue::Present(3),
                SeriesValue::Unranked,
                SeriesValue::Present(7),
                SeriesValue::Unranked,
                SeriesValue::Unranked,
                SeriesValue::Unranked,
            ]
        );
    }
}
