//! Generic wrappers around backend rows.

use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::kind::ResourceKind;

/// Domain fields of one backend resource.
pub trait ResourceSpec:
    Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static
{
    const KIND: ResourceKind;
}

/// A row as returned by the server: identity, timestamps and the flattened domain fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub spec: T,
}

/// Offset formats seen from the backend besides RFC 3339, e.g. `2024-03-01 08:00:00+00`.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Formats without an offset; these are read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a backend timestamp. Returns `None` for anything unrecognised.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|naive| naive.and_utc())
        })
}

/// A timestamp the client cannot read is dropped rather than failing the whole row.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| {
        let parsed = parse_timestamp(&raw);
        if parsed.is_none() {
            warn!("Ignoring unreadable timestamp '{}'", raw);
        }
        parsed
    }))
}

impl<T> Record<T> {
    pub fn new(id: impl Into<String>, spec: T) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            updated_at: None,
            spec,
        }
    }

    /// Re-stamps `updated_at` with the current time, as sent on update.
    pub fn restamped(mut self) -> Self {
        self.updated_at = Some(Utc::now());
        self
    }
}

/// Payload of a create request. The client stamps both timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecord<T> {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub spec: T,
}

impl<T> NewRecord<T> {
    pub fn stamped(spec: T) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            spec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Cheese {
        name: String,
    }

    #[test]
    fn test_record_flattens_spec() {
        let record: Record<Cheese> = serde_json::from_value(json!({
            "id": "c-1",
            "created_at": "2024-03-01T08:00:00Z",
            "updated_at": "2024-03-01T09:30:00.000Z",
            "name": "gouda"
        }))
        .unwrap();

        assert_eq!(record.id, "c-1");
        assert_eq!(record.spec.name, "gouda");
        assert!(record.updated_at > record.created_at);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "gouda");
        assert!(value.get("spec").is_none());
    }

    #[test]
    fn test_record_without_timestamps() {
        let record: Record<Cheese> =
            serde_json::from_value(json!({ "id": "c-2", "name": "brie" })).unwrap();
        assert!(record.created_at.is_none());
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_non_rfc3339_timestamps_are_accepted() {
        let expected = "2024-03-01T08:00:00Z".parse::<DateTime<Utc>>().unwrap();

        assert_eq!(parse_timestamp("2024-03-01 08:00:00+00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 10:00:00.000+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T08:00:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_unreadable_timestamp_does_not_fail_the_list() {
        let records: Vec<Record<Cheese>> = serde_json::from_value(json!([
            { "id": "c-1", "created_at": "2024-03-01 08:00:00+00", "name": "gouda" },
            { "id": "c-2", "created_at": "not a date", "updated_at": null, "name": "brie" }
        ]))
        .unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].created_at.is_some());
        assert!(records[1].created_at.is_none());
        assert!(records[1].updated_at.is_none());
    }

    #[test]
    fn test_new_record_stamps_both_timestamps() {
        let before = Utc::now();
        let draft = NewRecord::stamped(Cheese {
            name: "feta".to_string(),
        });
        assert!(draft.created_at >= before);
        assert_eq!(draft.created_at, draft.updated_at);

        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["name"], "feta");
    }

    #[test]
    fn test_restamped_moves_updated_at_only() {
        let original = Record {
            id: "c-3".to_string(),
            created_at: Some(Utc::now() - chrono::Duration::days(1)),
            updated_at: Some(Utc::now() - chrono::Duration::days(1)),
            spec: Cheese {
                name: "edam".to_string(),
            },
        };
        let restamped = original.clone().restamped();
        assert_eq!(restamped.created_at, original.created_at);
        assert!(restamped.updated_at > original.updated_at);
    }
}
