//! Wire types shared by every service.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to any control plane entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Eid {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: String,
}

impl Eid {
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for Eid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::\"{}\"", self.entity_type, self.id)
    }
}

/// Protobuf duration, encoded in JSON as a decimal string of seconds
/// (`"3600s"`, `"1.5s"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    pub seconds: i64,
    /// Same sign as `seconds` when both are non-zero.
    pub nanos: i32,
}

impl Duration {
    #[must_use]
    pub fn from_secs(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Seconds rounded to the nearest whole second, halves away from zero.
    #[must_use]
    pub fn round_secs(&self) -> i64 {
        const HALF: i32 = 500_000_000;
        match self.nanos {
            n if n >= HALF => self.seconds.saturating_add(1),
            n if n <= -HALF => self.seconds.saturating_sub(1),
            _ => self.seconds,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        let body = s.strip_suffix('s')?;
        let (negative, digits) = match body.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, body),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() || fraction.len() > 9 {
            return None;
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let seconds: i64 = whole.parse().ok()?;
        let nanos: i32 = if fraction.is_empty() {
            0
        } else {
            format!("{fraction:0<9}").parse().ok()?
        };

        Some(if negative {
            Self { seconds: -seconds, nanos: -nanos }
        } else {
            Self { seconds, nanos }
        })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos == 0 {
            return write!(f, "{}s", self.seconds);
        }
        let sign = if self.seconds < 0 || self.nanos < 0 { "-" } else { "" };
        let nanos = i64::from(self.nanos).abs();
        let fraction = format!("{nanos:09}");
        write!(
            f,
            "{sign}{}.{}s",
            self.seconds.abs(),
            fraction.trim_end_matches('0')
        )
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid duration {s:?}")))
    }
}

/// Proto3 JSON int64 fields: written as numbers, read as numbers or strings.
pub mod int64 {
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(i64),
        Text(String),
    }

    impl Repr {
        fn into_i64<E: de::Error>(self) -> Result<i64, E> {
            match self {
                Self::Number(n) => Ok(n),
                Self::Text(s) => s.parse().map_err(|_| E::custom(format!("invalid int64 {s:?}"))),
            }
        }
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Repr::deserialize(deserializer)?.into_i64()
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        Option::<Repr>::deserialize(deserializer)?
            .map(Repr::into_i64)
            .transpose()
    }
}

/// Severity of a diagnostic returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    #[serde(rename = "DIAGNOSTIC_LEVEL_WARNING")]
    Warning,
    #[serde(rename = "DIAGNOSTIC_LEVEL_ERROR")]
    Error,
    #[serde(rename = "DIAGNOSTIC_LEVEL_UNSPECIFIED", other)]
    Unspecified,
}

/// A message the API attached to a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    #[serde(default = "unspecified")]
    pub level: DiagnosticLevel,
    #[serde(default)]
    pub message: String,
}

fn unspecified() -> DiagnosticLevel {
    DiagnosticLevel::Unspecified
}

impl Diagnostic {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }
}

/// A decoded response together with its diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Response<T> {
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Drop the value, keeping the diagnostics.
    pub fn discard(self) -> Response<()> {
        Response {
            value: (),
            diagnostics: self.diagnostics,
        }
    }
}
