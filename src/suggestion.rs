use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A suggestion as persisted in the `suggestions` table and returned by the
/// retrieval endpoint. Field names are the column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SuggestionRow {
    pub id: u64,
    pub song1: String,
    pub artist1: String,
    pub song2: Option<String>,
    pub artist2: Option<String>,
    pub suggester_name: String,
    pub suggester_email: Option<String>,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub likes: u32,
}

/// Body of a submission. Every field is optional on the wire so that a
/// missing required field is answered with a validation error instead of a
/// deserialisation failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSuggestion {
    pub song1: Option<String>,
    pub artist1: Option<String>,
    pub song2: Option<String>,
    pub artist2: Option<String>,
    pub suggester_name: Option<String>,
    pub suggester_email: Option<String>,
    pub reason: Option<String>,
}

/// A submission that passed the presence checks. Optional fields are `None`
/// when they were omitted or empty, which is what ends up as NULL in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSuggestion {
    pub song1: String,
    pub artist1: String,
    pub song2: Option<String>,
    pub artist2: Option<String>,
    pub suggester_name: String,
    pub suggester_email: Option<String>,
    pub reason: Option<String>,
}

fn present(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

impl NewSuggestion {
    /// Returns `None` if song1, artist1 or suggesterName is missing or empty.
    /// Any other text, whitespace included, is kept as sent.
    pub fn validate(&self) -> Option<ValidSuggestion> {
        Some(ValidSuggestion {
            song1: present(&self.song1)?,
            artist1: present(&self.artist1)?,
            suggester_name: present(&self.suggester_name)?,
            song2: present(&self.song2),
            artist2: present(&self.artist2),
            suggester_email: present(&self.suggester_email),
            reason: present(&self.reason),
        })
    }
}

impl SuggestionRow {
    pub fn from_valid(id: u64, suggestion: ValidSuggestion, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            song1: suggestion.song1,
            artist1: suggestion.artist1,
            song2: suggestion.song2,
            artist2: suggestion.artist2,
            suggester_name: suggestion.suggester_name,
            suggester_email: suggestion.suggester_email,
            reason: suggestion.reason,
            timestamp,
            likes: 0,
        }
    }
}

/// The client's view of a suggestion. Optional text is an empty string
/// rather than `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub song1: String,
    pub artist1: String,
    pub song2: String,
    pub artist2: String,
    pub suggester_name: String,
    pub suggester_email: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u32,
}

impl Suggestion {
    /// True when both halves of the second song were given.
    pub fn has_second_song(&self) -> bool {
        !self.song2.is_empty() && !self.artist2.is_empty()
    }
}

/// Text fields of a retrieved record: (field, snake_case key, camelCase key).
/// The snake_case key is what the store returns and wins when both exist.
pub const FIELD_KEYS: [(&str, &str, &str); 7] = [
    ("song1", "song1", "song1"),
    ("artist1", "artist1", "artist1"),
    ("song2", "song2", "song2"),
    ("artist2", "artist2", "artist2"),
    ("suggesterName", "suggester_name", "suggesterName"),
    ("suggesterEmail", "suggester_email", "suggesterEmail"),
    ("reason", "reason", "reason"),
];

fn lookup<'a>(record: &'a Value, snake: &str, camel: &str) -> Option<&'a Value> {
    record
        .get(snake)
        .filter(|value| !value.is_null())
        .or_else(|| record.get(camel).filter(|value| !value.is_null()))
}

fn text(record: &Value, snake: &str, camel: &str) -> String {
    match lookup(record, snake, camel) {
        Some(Value::String(value)) => value.clone(),
        Some(Value::Number(value)) => value.to_string(),
        _ => String::new(),
    }
}

/// Turns one record from the retrieval endpoint into a [`Suggestion`].
///
/// Text fields follow [`FIELD_KEYS`] and default to `""`. `likes` defaults to
/// 0 and anything that is not a non-negative integer counts as 0. `id` may be
/// a number or a string; without one, the record gets `<now millis>-<index>`.
/// A missing or unparseable RFC 3339 `timestamp` becomes `now`.
pub fn normalize_record(record: &Value, index: usize, now: DateTime<Utc>) -> Suggestion {
    let [song1, artist1, song2, artist2, suggester_name, suggester_email, reason] =
        FIELD_KEYS.map(|(_, snake, camel)| text(record, snake, camel));

    let id = match record.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => format!("{}-{}", now.timestamp_millis(), index),
    };

    let likes = record
        .get("likes")
        .and_then(Value::as_u64)
        .map(|likes| u32::try_from(likes).unwrap_or(u32::MAX))
        .unwrap_or(0);

    let timestamp = record
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or(now);

    Suggestion {
        id,
        song1,
        artist1,
        song2,
        artist2,
        suggester_name,
        suggester_email,
        reason,
        timestamp,
        likes,
    }
}
