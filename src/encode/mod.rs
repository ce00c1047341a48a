//! Format encoders for export operations
//!
//! This module maps validated waypoints to wire-format text in three pure
//! stages, mirroring a streamed document's lifecycle:
//!
//! 1. [`file_header`] - emitted once, before any waypoint
//! 2. [`waypoint_fragment`] - emitted once per valid waypoint
//! 3. [`file_footer`] - emitted once, after the last waypoint, only on
//!    clean completion
//!
//! One submodule per format family; all XML-bearing formats go through the
//! [`markup`] builder, which centralizes entity escaping. The `json` format
//! does not stream fragments at all - the coordinator serializes the full
//! validated list in one piece - so its three stages are empty.

pub(crate) mod markup;

mod gpx;
mod kml;
mod loc;
mod rss;
mod text;

use crate::request::{CustomIcons, ExportFormat};
use crate::waypoint::Waypoint;

/// Missing elevation renders as this literal in gpx/loc/kml output.
pub const DEFAULT_ELEVATION: &str = "0.0000000";

/// Missing elevation renders as this literal in csv output.
pub const DEFAULT_ELEVATION_CSV: &str = "0.0";

/// Missing symbol renders as this literal.
pub const DEFAULT_SYMBOL: &str = "0";

/// File header for a format.
pub fn file_header(format: ExportFormat, icons: &CustomIcons) -> String {
    match format {
        ExportFormat::Gpx => gpx::header(),
        ExportFormat::Xml => rss::header(),
        ExportFormat::Loc => loc::header(),
        ExportFormat::Kml => kml::header(icons),
        ExportFormat::Csv => text::csv_header(),
        ExportFormat::Asc => String::new(),
        ExportFormat::Json => String::new(),
    }
}

/// Serialized fragment for one waypoint.
///
/// Deterministic: the same waypoint and options yield byte-identical text.
pub fn waypoint_fragment(format: ExportFormat, wp: &Waypoint, icons: &CustomIcons) -> String {
    match format {
        ExportFormat::Gpx => gpx::waypoint(wp, icons),
        ExportFormat::Xml => rss::item(wp),
        ExportFormat::Loc => loc::waypoint(wp),
        ExportFormat::Kml => kml::placemark(wp, icons),
        ExportFormat::Csv => text::csv_row(wp),
        ExportFormat::Asc => text::asc_row(wp),
        ExportFormat::Json => String::new(),
    }
}

/// File footer for a format.
pub fn file_footer(format: ExportFormat) -> String {
    match format {
        ExportFormat::Gpx => gpx::footer(),
        ExportFormat::Xml => rss::footer(),
        ExportFormat::Loc => loc::footer(),
        ExportFormat::Kml => kml::footer(),
        ExportFormat::Csv | ExportFormat::Asc | ExportFormat::Json => String::new(),
    }
}

/// Render a coordinate or elevation as plain decimal text, source units.
pub(crate) fn decimal(value: f64) -> String {
    value.to_string()
}

/// Elevation text with the format's default placeholder when absent.
pub(crate) fn elevation_text(wp: &Waypoint, default: &str) -> String {
    match wp.elevation {
        Some(v) => decimal(v),
        None => default.to_string(),
    }
}

/// Symbol text, falling back to the default categorical value.
pub(crate) fn symbol_text(wp: &Waypoint) -> String {
    wp.symbol.clone().unwrap_or_else(|| DEFAULT_SYMBOL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn sample() -> Waypoint {
        Waypoint::from_document(&doc! {
            "lat": 48.2082,
            "long": 16.3738,
            "name": "Vienna",
            "seaLevel": 170.5,
        })
        .unwrap()
    }

    #[test]
    fn test_fragment_encoding_is_deterministic() {
        let wp = sample();
        let icons = CustomIcons::none();

        for format in [
            ExportFormat::Gpx,
            ExportFormat::Xml,
            ExportFormat::Loc,
            ExportFormat::Kml,
            ExportFormat::Csv,
            ExportFormat::Asc,
        ] {
            let first = waypoint_fragment(format, &wp, &icons);
            let second = waypoint_fragment(format, &wp, &icons);
            assert_eq!(first, second, "format {format} not deterministic");
        }
    }

    #[test]
    fn test_empty_document_is_balanced_for_xml_formats() {
        let icons = CustomIcons::none();

        for format in [
            ExportFormat::Gpx,
            ExportFormat::Xml,
            ExportFormat::Loc,
            ExportFormat::Kml,
        ] {
            let doc = format!("{}{}", file_header(format, &icons), file_footer(format));
            let opens = doc.matches('<').count();
            let closes = doc.matches('>').count();
            assert_eq!(opens, closes, "unbalanced brackets for {format}");

            // Every opened element is closed again
            let open_tags = doc.matches("</").count();
            assert!(open_tags > 0, "no closing tags for {format}");
        }
    }

    #[test]
    fn test_json_bypasses_fragment_stream() {
        let icons = CustomIcons::none();
        assert_eq!(file_header(ExportFormat::Json, &icons), "");
        assert_eq!(waypoint_fragment(ExportFormat::Json, &sample(), &icons), "");
        assert_eq!(file_footer(ExportFormat::Json), "");
    }

    #[test]
    fn test_decimal_renders_shortest_form() {
        assert_eq!(decimal(1.0), "1");
        assert_eq!(decimal(5.5), "5.5");
        assert_eq!(decimal(-16.3738), "-16.3738");
    }

    #[test]
    fn test_elevation_defaults() {
        let wp = Waypoint::from_document(&doc! { "lat": 1, "long": 2, "name": "A" }).unwrap();
        assert_eq!(elevation_text(&wp, DEFAULT_ELEVATION), "0.0000000");
        assert_eq!(elevation_text(&wp, DEFAULT_ELEVATION_CSV), "0.0");
        assert_eq!(elevation_text(&sample(), DEFAULT_ELEVATION), "170.5");
    }
}
