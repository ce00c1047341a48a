//! Waypoint records and validation
//!
//! This module is the sole gate between raw MongoDB documents and encodable
//! records. A [`Waypoint`] can only be constructed from a document that
//! carries all mandatory fields; everything else is dropped silently during
//! validation.

use bson::{Bson, Document};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use tracing::debug;

/// Fields a document must carry to become a [`Waypoint`], checked in order.
pub const REQUIRED_FIELDS: [&str; 3] = ["lat", "long", "name"];

/// A validated point-of-interest record.
///
/// Field names on the wire (JSON export) match the stored document schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    /// Latitude in signed decimal degrees
    #[serde(rename = "lat")]
    pub latitude: f64,

    /// Longitude in signed decimal degrees
    #[serde(rename = "long")]
    pub longitude: f64,

    /// Display name, non-empty
    pub name: String,

    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Category / type label
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Elevation above sea level in meters
    #[serde(rename = "seaLevel", skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,

    /// Symbol identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    /// Record creation timestamp
    #[serde(
        rename = "createdAt",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Waypoint {
    /// Construct a waypoint from a raw document.
    ///
    /// Required fields are checked in the fixed order `lat`, `long`, `name`,
    /// short-circuiting on the first missing one. Returns `None` when the
    /// document does not qualify; absence of geodata is expected and not
    /// exceptional.
    ///
    /// # Arguments
    /// * `doc` - Raw document fetched from the data source
    ///
    /// # Returns
    /// * `Option<Waypoint>` - The validated record, or None
    pub fn from_document(doc: &Document) -> Option<Self> {
        let latitude = numeric_field(doc, "lat")?;
        let longitude = numeric_field(doc, "long")?;
        let name = string_field(doc, "name")?;

        Some(Self {
            latitude,
            longitude,
            name,
            description: string_field(doc, "description"),
            kind: string_field(doc, "type"),
            elevation: numeric_field(doc, "seaLevel"),
            symbol: symbol_field(doc),
            created_at: datetime_field(doc, "createdAt"),
        })
    }
}

/// Filter raw documents down to valid waypoints.
///
/// Pure and synchronous. Output preserves input order; records failing the
/// required-field check are dropped without raising an error.
///
/// # Arguments
/// * `docs` - Raw documents in fetch order
///
/// # Returns
/// * `Vec<Waypoint>` - Order-preserving subsequence of valid records
pub fn validate(docs: &[Document]) -> Vec<Waypoint> {
    let valid: Vec<Waypoint> = docs.iter().filter_map(Waypoint::from_document).collect();

    if valid.len() < docs.len() {
        debug!(
            "Dropped {} of {} records missing required fields",
            docs.len() - valid.len(),
            docs.len()
        );
    }

    valid
}

/// Render a timestamp the way `Date.prototype.toISOString` does:
/// RFC 3339 with millisecond precision and a `Z` suffix.
pub(crate) fn iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_timestamp<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // skip_serializing_if guarantees Some here
    match dt {
        Some(dt) => serializer.serialize_str(&iso8601(dt)),
        None => serializer.serialize_none(),
    }
}

/// Extract a numeric field, accepting BSON numbers and numeric strings.
fn numeric_field(doc: &Document, key: &str) -> Option<f64> {
    match doc.get(key)? {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Extract a non-empty string field.
fn string_field(doc: &Document, key: &str) -> Option<String> {
    match doc.get(key)? {
        Bson::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Extract the symbol field, which may be stored as a string or a number.
fn symbol_field(doc: &Document) -> Option<String> {
    match doc.get("symbol")? {
        Bson::String(s) if !s.is_empty() => Some(s.clone()),
        Bson::Int32(v) => Some(v.to_string()),
        Bson::Int64(v) => Some(v.to_string()),
        Bson::Double(v) => Some(v.to_string()),
        _ => None,
    }
}

/// Extract a timestamp field, accepting BSON dates, RFC 3339 strings
/// and millisecond epochs.
fn datetime_field(doc: &Document, key: &str) -> Option<DateTime<Utc>> {
    match doc.get(key)? {
        Bson::DateTime(dt) => DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()),
        Bson::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Bson::Int64(millis) => DateTime::<Utc>::from_timestamp_millis(*millis),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_valid_waypoint() {
        let doc = doc! {
            "lat": 48.2082,
            "long": 16.3738,
            "name": "Vienna",
            "description": "Capital",
            "type": "city",
            "seaLevel": 170.5,
            "symbol": "pin",
        };

        let wp = Waypoint::from_document(&doc).unwrap();
        assert_eq!(wp.latitude, 48.2082);
        assert_eq!(wp.longitude, 16.3738);
        assert_eq!(wp.name, "Vienna");
        assert_eq!(wp.elevation, Some(170.5));
        assert_eq!(wp.kind.as_deref(), Some("city"));
    }

    #[test]
    fn test_missing_required_field_drops_record() {
        assert!(Waypoint::from_document(&doc! { "long": 9, "name": "C" }).is_none());
        assert!(Waypoint::from_document(&doc! { "lat": 1, "name": "C" }).is_none());
        assert!(Waypoint::from_document(&doc! { "lat": 1, "long": 2 }).is_none());
        assert!(Waypoint::from_document(&doc! { "lat": 1, "long": 2, "name": "" }).is_none());
    }

    #[test]
    fn test_zero_coordinates_are_valid() {
        // Presence, not truthiness: the equator is a real place
        let wp = Waypoint::from_document(&doc! { "lat": 0, "long": 0, "name": "Null Island" });
        assert!(wp.is_some());
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let wp =
            Waypoint::from_document(&doc! { "lat": "48.2", "long": "16.3", "name": "S" }).unwrap();
        assert_eq!(wp.latitude, 48.2);
    }

    #[test]
    fn test_validate_preserves_order_and_drops_invalid() {
        let docs = vec![
            doc! { "lat": 1, "long": 2, "name": "A" },
            doc! { "long": 9, "name": "C" },
            doc! { "lat": 3, "long": 4, "name": "B" },
        ];

        let valid = validate(&docs);
        let names: Vec<&str> = valid.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_validate_never_errors_on_garbage() {
        let docs = vec![
            doc! {},
            doc! { "lat": Bson::Null, "long": 2, "name": "X" },
            doc! { "lat": "not-a-number", "long": 2, "name": "Y" },
        ];

        assert!(validate(&docs).is_empty());
    }

    #[test]
    fn test_created_at_from_bson_datetime() {
        let doc = doc! {
            "lat": 1, "long": 2, "name": "A",
            "createdAt": bson::DateTime::from_millis(1_700_000_000_000),
        };

        let wp = Waypoint::from_document(&doc).unwrap();
        assert_eq!(
            wp.created_at.unwrap().timestamp_millis(),
            1_700_000_000_000
        );
    }

    #[test]
    fn test_json_serialization_shape() {
        let wp = Waypoint::from_document(&doc! { "lat": 1, "long": 2, "name": "A" }).unwrap();
        let json = serde_json::to_string(&wp).unwrap();

        assert!(json.contains("\"lat\":1.0"));
        assert!(json.contains("\"name\":\"A\""));
        // Absent optionals stay off the wire
        assert!(!json.contains("seaLevel"));
        assert!(!json.contains("createdAt"));
    }
}
