//! Export request decoding and gateway interface
//!
//! This module owns the boundary between a transport (HTTP gateway, CLI) and
//! the export engine:
//! - Decoding raw request parts into a validated [`ExportRequest`]
//! - The supported-format set with content types and file extensions
//! - Download filename generation
//! - Mapping engine errors to HTTP status codes
//!
//! Transport plumbing itself (routes, URL decoding, response writing) stays
//! outside this crate; parts arrive here already URL-decoded.

use std::fmt;
use std::str::FromStr;

use bson::{Document, doc};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, RequestError, Result};

/// Supported export format names, in the order reported to clients.
pub const VALID_FORMATS: [&str; 7] = ["gpx", "asc", "kml", "loc", "xml", "csv", "json"];

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// GPS Exchange Format 1.1
    Gpx,
    /// Plain `long,lat,"name"` lines
    Asc,
    /// Keyhole Markup Language 2.2
    Kml,
    /// EasyGPS LOC 1.0
    Loc,
    /// RSS 2.0 with GeoRSS extensions
    Xml,
    /// `Latitude,Longitude,Elevation` rows
    Csv,
    /// Single JSON array of validated records
    Json,
}

impl ExportFormat {
    /// Canonical lowercase name, doubling as the file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Gpx => "gpx",
            ExportFormat::Asc => "asc",
            ExportFormat::Kml => "kml",
            ExportFormat::Loc => "loc",
            ExportFormat::Xml => "xml",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// HTTP content type for the streamed body.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Gpx => "text/gpx; charset=utf-8",
            ExportFormat::Xml => "text/xml; charset=utf-8",
            ExportFormat::Asc => "text/asc; charset=utf-8",
            ExportFormat::Loc => "text/loc; charset=utf-8",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Kml => "text/kml; charset=utf-8",
            ExportFormat::Json => "application/json; charset=utf-8",
        }
    }

    /// Whether this format streams per-waypoint fragments.
    ///
    /// JSON is the exception: the whole validated list is serialized as one
    /// structured document instead of a header/fragment/footer stream.
    pub fn is_streaming(&self) -> bool {
        !matches!(self, ExportFormat::Json)
    }
}

impl FromStr for ExportFormat {
    type Err = RequestError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gpx" => Ok(ExportFormat::Gpx),
            "asc" => Ok(ExportFormat::Asc),
            "kml" => Ok(ExportFormat::Kml),
            "loc" => Ok(ExportFormat::Loc),
            "xml" => Ok(ExportFormat::Xml),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(RequestError::InvalidFormat {
                given: other.to_string(),
                valid: &VALID_FORMATS,
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-format custom icon URL overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomIcons {
    /// Icon link emitted per gpx waypoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpx: Option<String>,

    /// Shared icon style referenced by kml placemarks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kml: Option<String>,
}

impl CustomIcons {
    /// An empty override map.
    pub fn none() -> Self {
        Self::default()
    }
}

/// The query envelope a client serializes into the `query` parameter.
///
/// `limit` and `page` seen in older request shapes are deliberately ignored:
/// the engine always streams the whole result set in fixed internal pages.
#[derive(Debug, Default, Deserialize)]
struct QueryEnvelope {
    #[serde(default)]
    query: Option<Document>,
    #[serde(default)]
    sort: Option<Document>,
    #[serde(default)]
    projection: Option<Document>,
}

/// Immutable, validated export request
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Output format
    pub format: ExportFormat,

    /// Opaque filter, passed through to the data source
    pub filter: Document,

    /// Sort specification; newest-first by creation when not given
    pub sort: Document,

    /// Optional field projection
    pub projection: Option<Document>,

    /// Optional per-format icon overrides
    pub custom_icons: CustomIcons,
}

impl ExportRequest {
    /// Decode raw request parts into a validated request.
    ///
    /// Mirrors the gateway contract: `format` and `query` are required,
    /// `custom_icon` is optional. All parse failures are client errors.
    ///
    /// # Arguments
    /// * `format` - Format name, case-insensitive
    /// * `query` - JSON query envelope `{query, sort, projection}`
    /// * `custom_icon` - Optional JSON icon map `{gpx, kml}`
    ///
    /// # Returns
    /// * `Result<ExportRequest>` - Validated request or a request error
    pub fn from_parts(
        format: Option<&str>,
        query: Option<&str>,
        custom_icon: Option<&str>,
    ) -> Result<Self> {
        let format = format.ok_or(RequestError::MissingFormat)?;
        let query = query.ok_or(RequestError::MissingQuery)?;

        let format = ExportFormat::from_str(format)?;

        let envelope: QueryEnvelope = serde_json::from_str(query)
            .map_err(|e| RequestError::InvalidQuery(e.to_string()))?;

        let custom_icons = match custom_icon {
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| RequestError::InvalidIconMap(e.to_string()))?,
            None => CustomIcons::none(),
        };

        Ok(Self {
            format,
            filter: envelope.query.unwrap_or_default(),
            sort: envelope.sort.unwrap_or_else(default_sort),
            projection: envelope.projection,
            custom_icons,
        })
    }

    /// Build a request directly from already-typed parts.
    pub fn new(format: ExportFormat, filter: Document) -> Self {
        Self {
            format,
            filter,
            sort: default_sort(),
            projection: None,
            custom_icons: CustomIcons::none(),
        }
    }
}

fn default_sort() -> Document {
    doc! { "_createdAt": -1 }
}

/// Download filename for an export: `<prefix>_<DD.MM.YYYY>.<ext>`.
///
/// # Arguments
/// * `prefix` - Filename prefix from configuration
/// * `format` - Export format, supplies the extension
/// * `date` - Export date
pub fn attachment_filename(prefix: &str, format: ExportFormat, date: NaiveDate) -> String {
    format!("{}_{}.{}", prefix, date.format("%d.%m.%Y"), format.as_str())
}

/// `Content-Disposition` header value for a download response.
pub fn content_disposition(prefix: &str, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "attachment;filename={}",
        attachment_filename(prefix, format, date)
    )
}

/// HTTP status code a gateway should answer with for a failed export.
///
/// Only meaningful before any bytes are written; mid-stream failures surface
/// to the client as a truncated document instead.
pub fn http_status(err: &ExportError) -> u16 {
    match err {
        ExportError::Request(_) => 400,
        ExportError::Unauthorized(_) => 401,
        ExportError::Busy => 503,
        _ => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_round_trip() {
        for name in VALID_FORMATS {
            let format = ExportFormat::from_str(name).unwrap();
            assert_eq!(format.as_str(), name);
        }
    }

    #[test]
    fn test_format_case_insensitive() {
        assert_eq!(ExportFormat::from_str("GPX").unwrap(), ExportFormat::Gpx);
    }

    #[test]
    fn test_invalid_format_lists_valid_set() {
        let err = ExportFormat::from_str("shp").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invalid format \"shp\""));
        assert!(msg.contains("gpx, asc, kml, loc, xml, csv, json"));
    }

    #[test]
    fn test_from_parts_requires_format_and_query() {
        assert!(matches!(
            ExportRequest::from_parts(None, Some("{}"), None),
            Err(ExportError::Request(RequestError::MissingFormat))
        ));
        assert!(matches!(
            ExportRequest::from_parts(Some("gpx"), None, None),
            Err(ExportError::Request(RequestError::MissingQuery))
        ));
    }

    #[test]
    fn test_from_parts_decodes_envelope() {
        let query = r#"{"query": {"type": "summit"}, "sort": {"name": 1}, "projection": {"name": 1}}"#;
        let request = ExportRequest::from_parts(Some("kml"), Some(query), None).unwrap();

        assert_eq!(request.format, ExportFormat::Kml);
        assert_eq!(request.filter.get_str("type").unwrap(), "summit");
        assert!(request.sort.contains_key("name"));
        assert!(request.projection.unwrap().contains_key("name"));
    }

    #[test]
    fn test_from_parts_default_sort() {
        let request = ExportRequest::from_parts(Some("csv"), Some("{}"), None).unwrap();
        assert!(request.sort.contains_key("_createdAt"));
    }

    #[test]
    fn test_from_parts_ignores_outer_limit_and_page() {
        let query = r#"{"query": {}, "limit": 10, "page": 3}"#;
        let request = ExportRequest::from_parts(Some("csv"), Some(query), None).unwrap();
        assert!(request.filter.is_empty());
    }

    #[test]
    fn test_from_parts_bad_json_is_client_error() {
        let err = ExportRequest::from_parts(Some("gpx"), Some("{nope"), None).unwrap_err();
        assert_eq!(http_status(&err), 400);
    }

    #[test]
    fn test_custom_icon_decoding() {
        let icons = r#"{"gpx": "https://example.com/i.png"}"#;
        let request = ExportRequest::from_parts(Some("gpx"), Some("{}"), Some(icons)).unwrap();
        assert_eq!(
            request.custom_icons.gpx.as_deref(),
            Some("https://example.com/i.png")
        );
        assert_eq!(request.custom_icons.kml, None);
    }

    #[test]
    fn test_attachment_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            attachment_filename("POI-EXPORT", ExportFormat::Gpx, date),
            "POI-EXPORT_07.03.2024.gpx"
        );
        assert_eq!(
            content_disposition("POI-EXPORT", ExportFormat::Csv, date),
            "attachment;filename=POI-EXPORT_07.03.2024.csv"
        );
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(http_status(&ExportError::Busy), 503);
        assert_eq!(http_status(&ExportError::Unauthorized("find".into())), 401);
        assert_eq!(
            http_status(&RequestError::MissingFormat.into()),
            400
        );
        assert_eq!(
            http_status(&crate::error::UpstreamError::QueryFailed("boom".into()).into()),
            500
        );
    }

    #[test]
    fn test_json_is_not_streaming() {
        assert!(!ExportFormat::Json.is_streaming());
        assert!(ExportFormat::Gpx.is_streaming());
    }
}
