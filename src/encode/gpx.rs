//! GPX 1.1 encoder
//!
//! Emits a GPX envelope with a metadata/author block and one `<wpt>` element
//! per waypoint.

use super::markup::MarkupBuilder;
use super::{DEFAULT_ELEVATION, decimal, elevation_text, symbol_text};
use crate::request::CustomIcons;
use crate::waypoint::{Waypoint, iso8601};

const GPX_NS: &str = "http://www.topografix.com/GPX/1/1";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd";

pub(super) fn header() -> String {
    let mut b = MarkupBuilder::new();
    b.declaration()
        .open(
            "gpx",
            &[
                ("xmlns", GPX_NS),
                ("creator", "POI Export"),
                ("version", "1.1"),
                ("xmlns:xsi", XSI_NS),
                ("xsi:schemaLocation", SCHEMA_LOCATION),
            ],
        )
        .open("metadata", &[])
        .open("author", &[])
        .element("name", &[], "POI Export")
        .close("author")
        .close("metadata");
    b.finish()
}

pub(super) fn waypoint(wp: &Waypoint, icons: &CustomIcons) -> String {
    let lat = decimal(wp.latitude);
    let lon = decimal(wp.longitude);

    let mut b = MarkupBuilder::at_depth(1);
    b.open("wpt", &[("lat", lat.as_str()), ("lon", lon.as_str())]);
    b.element("name", &[], &wp.name);

    if let Some(ref description) = wp.description {
        b.element("desc", &[], description);
    }
    if let Some(ref kind) = wp.kind {
        b.element("type", &[], kind);
    }

    b.element("ele", &[], &elevation_text(wp, DEFAULT_ELEVATION));

    if let Some(ref created_at) = wp.created_at {
        b.element("time", &[], &iso8601(created_at));
    }

    b.element("sym", &[], &symbol_text(wp));

    if let Some(ref href) = icons.gpx {
        b.empty("link", &[("href", href.as_str())]);
    }

    b.close("wpt");
    b.finish()
}

pub(super) fn footer() -> String {
    "</gpx>\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_header_envelope() {
        let header = header();
        assert!(header.starts_with("<?xml version=\"1.0\""));
        assert!(header.contains("<gpx xmlns=\"http://www.topografix.com/GPX/1/1\""));
        assert!(header.contains("creator=\"POI Export\""));
        assert!(header.contains("<author>"));
    }

    #[test]
    fn test_waypoint_fields_and_defaults() {
        let wp = Waypoint::from_document(&doc! {
            "lat": 48.2,
            "long": 16.3,
            "name": "Vienna",
            "createdAt": bson::DateTime::from_millis(1_700_000_000_000),
        })
        .unwrap();

        let fragment = waypoint(&wp, &CustomIcons::none());
        assert!(fragment.contains("<wpt lat=\"48.2\" lon=\"16.3\">"));
        assert!(fragment.contains("<name>Vienna</name>"));
        assert!(fragment.contains("<ele>0.0000000</ele>"));
        assert!(fragment.contains("<sym>0</sym>"));
        assert!(fragment.contains("<time>2023-11-14T22:13:20.000Z</time>"));
        assert!(!fragment.contains("<desc>"));
        assert!(!fragment.contains("<link"));
    }

    #[test]
    fn test_waypoint_without_timestamp_omits_time() {
        let wp = Waypoint::from_document(&doc! { "lat": 1, "long": 2, "name": "A" }).unwrap();
        let fragment = waypoint(&wp, &CustomIcons::none());
        assert!(!fragment.contains("<time>"));
    }

    #[test]
    fn test_custom_icon_link() {
        let wp = Waypoint::from_document(&doc! { "lat": 1, "long": 2, "name": "A" }).unwrap();
        let icons = CustomIcons {
            gpx: Some("https://example.com/pin.png".to_string()),
            kml: None,
        };

        let fragment = waypoint(&wp, &icons);
        assert!(fragment.contains("<link href=\"https://example.com/pin.png\" />"));
    }

    #[test]
    fn test_name_is_escaped() {
        let wp =
            Waypoint::from_document(&doc! { "lat": 1, "long": 2, "name": "Fish & Chips" }).unwrap();
        let fragment = waypoint(&wp, &CustomIcons::none());
        assert!(fragment.contains("<name>Fish &amp; Chips</name>"));
    }
}
