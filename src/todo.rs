//! The todo entity.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One task. Immutable once built; compared by value.
///
/// On the wire the fields are camelCase:
///
/// ```json
/// {"id": 1, "name": "A", "dueDate": "2030-01-01T00:00:00Z", "isCompleted": false}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i32,
    pub name: String,
    #[serde(deserialize_with = "lenient_utc")]
    pub due_date: DateTime<Utc>,
    pub is_completed: bool,
}

impl Todo {
    pub fn new(id: i32, name: impl Into<String>, due_date: DateTime<Utc>, is_completed: bool) -> Self {
        Self { id, name: name.into(), due_date, is_completed }
    }
}

/// Accepts RFC 3339 timestamps with any offset, plus offset-less date-times
/// and bare dates, which are read as UTC.
fn lenient_utc<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_utc(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date-time `{raw}`")))
}

fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
