// Nullable timestamp
//
// JSON `null` and the zero timestamp (0001-01-01T00:00:00Z, what most
// producers emit for "unset") both mean Absent. Absent serializes to an
// explicit null, Present to the RFC 3339 form of the instant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seconds since the Unix epoch of 0001-01-01T00:00:00Z
const ZERO_TIME_UNIX_SECONDS: i64 = -62_135_596_800;

/// Whether `t` is the zero timestamp
pub fn is_zero_time(t: &DateTime<Utc>) -> bool {
    t.timestamp() == ZERO_TIME_UNIX_SECONDS && t.timestamp_subsec_nanos() == 0
}

/// A timestamp with an explicit presence flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullTime {
    #[default]
    Absent,
    Present(DateTime<Utc>),
}

impl NullTime {
    /// Build from an instant, mapping the zero timestamp to Absent
    pub fn from_time(t: DateTime<Utc>) -> Self {
        if is_zero_time(&t) {
            NullTime::Absent
        } else {
            NullTime::Present(t)
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, NullTime::Present(_))
    }

    pub fn as_option(&self) -> Option<DateTime<Utc>> {
        match self {
            NullTime::Absent => None,
            NullTime::Present(t) => Some(*t),
        }
    }

    /// Mark absent
    pub fn clear(&mut self) {
        *self = NullTime::Absent;
    }
}

impl From<Option<DateTime<Utc>>> for NullTime {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map(NullTime::from_time).unwrap_or_default()
    }
}

impl From<NullTime> for Option<DateTime<Utc>> {
    fn from(value: NullTime) -> Self {
        value.as_option()
    }
}

impl Serialize for NullTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NullTime::Absent => serializer.serialize_none(),
            NullTime::Present(t) => t.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for NullTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<DateTime<Utc>>::deserialize(deserializer)?;
        Ok(NullTime::from(value))
    }
}
