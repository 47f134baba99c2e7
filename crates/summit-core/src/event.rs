use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Theme color applied when the upstream record omits one.
pub const DEFAULT_THEME_COLOR: &str = "#2563eb";

/// Upstream event identifier.
///
/// The upstream API is inconsistent about id encoding: list endpoints emit
/// JSON numbers while some detail endpoints emit numeric strings. The
/// original lexical form is preserved for outgoing request URLs; comparison
/// goes through [`EventId::numeric`] so `"177"` and `177` refer to the same
/// event.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct EventId(String);

impl EventId {
    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical numeric form, when the raw id parses as an integer.
    pub fn numeric(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }

    /// Normalized comparison: numeric when both sides parse, lexical otherwise.
    pub fn matches(&self, other: &EventId) -> bool {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a == b,
            _ => self.0 == other.0,
        }
    }
}

impl From<i64> for EventId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for EventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Round-trip the original representation: ids that arrived as JSON
        // numbers serialize back as numbers, string ids stay strings.
        match self.numeric() {
            Some(n) if n.to_string() == self.0 => serializer.serialize_i64(n),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = EventId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or numeric string event id")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<EventId, E> {
                Ok(EventId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<EventId, E> {
                Ok(EventId(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<EventId, E> {
                Ok(EventId(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<EventId, E> {
                Ok(EventId(v))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self(String::new())
    }
}

/// Organization hosting an event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<String>,
}

/// One conference/summit record as the portal renders it.
///
/// Every field except `id` and `name` carries a defined fallback default so
/// partially-populated upstream payloads still deserialize and display.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub city: String,
    pub venue: String,
    pub start_date: String,
    pub end_date: String,
    /// Bare filename to resolve against upstream image hosting, or an
    /// already-absolute URL.
    pub banner_image: Option<String>,
    pub banner_thumbnail: Option<String>,
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_private: bool,
    pub signature_required: bool,
    pub access_code: Option<String>,
    pub organization: Organization,
}

fn default_theme_color() -> String {
    DEFAULT_THEME_COLOR.to_string()
}

impl Event {
    /// An event is valid for display only when `id` and `name` are present.
    pub fn is_renderable(&self) -> bool {
        !self.id.as_str().is_empty() && !self.name.is_empty()
    }

    /// Parsed start instant, when `startDate` is valid ISO-8601.
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.start_date)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    /// Parsed end instant, when `endDate` is valid ISO-8601.
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.end_date)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }
}
