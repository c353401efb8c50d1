//! Numbers carried as JSON strings
//!
//! Some fields travel as `"12"` instead of `12`. Use with
//! `#[serde(with = "quoted")]`, or `quoted::option` for nullable fields.
//! Input is accepted either quoted or as a bare number; output is always
//! quoted.

use serde::{Deserialize, Deserializer, Serializer};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Str(String),
    Num(serde_json::Number),
}

impl Raw {
    fn parse<T, E>(self) -> Result<T, E>
    where
        T: FromStr,
        T::Err: Display,
        E: serde::de::Error,
    {
        let text = match self {
            Raw::Str(s) => s,
            Raw::Num(n) => n.to_string(),
        };
        text.trim()
            .parse::<T>()
            .map_err(|e| E::custom(format!("invalid number {:?}: {}", text, e)))
    }
}

pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: FromStr,
    T::Err: Display,
    D: Deserializer<'de>,
{
    Raw::deserialize(deserializer)?.parse()
}

pub mod option {
    use super::Raw;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value {
            Some(v) => serializer.collect_str(v),
            None => serializer.serialize_none(),
        }
    }

    /// `null`, a missing field and `""` all decode to `None`
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Str(s)) if s.trim().is_empty() => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        #[serde(with = "super")]
        target: i32,
        #[serde(default, with = "super::option")]
        realisasi: Option<f32>,
    }

    #[test]
    fn test_accepts_quoted_and_bare_numbers() {
        let a: Sample = serde_json::from_str(r#"{"target":"12","realisasi":"7.5"}"#).unwrap();
        let b: Sample = serde_json::from_str(r#"{"target":12,"realisasi":7.5}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.target, 12);
        assert_eq!(a.realisasi, Some(7.5));
    }

    #[test]
    fn test_missing_null_and_empty_are_none() {
        let missing: Sample = serde_json::from_str(r#"{"target":"1"}"#).unwrap();
        let null: Sample = serde_json::from_str(r#"{"target":"1","realisasi":null}"#).unwrap();
        let empty: Sample = serde_json::from_str(r#"{"target":"1","realisasi":""}"#).unwrap();
        assert_eq!(missing.realisasi, None);
        assert_eq!(null.realisasi, None);
        assert_eq!(empty.realisasi, None);
    }

    #[test]
    fn test_output_is_quoted() {
        let value = serde_json::to_value(Sample {
            target: 3,
            realisasi: None,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({ "target": "3", "realisasi": null }));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Sample>(r#"{"target":"abc"}"#).is_err());
    }
}
