//! LOC 1.0 encoder
//!
//! The EasyGPS interchange format: one `<waypoint>` per record with a
//! self-closing coordinate element. The record name doubles as the waypoint
//! id attribute.

use super::markup::MarkupBuilder;
use super::{DEFAULT_ELEVATION, decimal, elevation_text, symbol_text};
use crate::waypoint::Waypoint;

pub(super) fn header() -> String {
    let mut b = MarkupBuilder::new();
    b.declaration()
        .open("loc", &[("version", "1.0"), ("src", "POI Export")]);
    b.finish()
}

pub(super) fn waypoint(wp: &Waypoint) -> String {
    let lat = decimal(wp.latitude);
    let lon = decimal(wp.longitude);

    let mut b = MarkupBuilder::at_depth(1);
    b.open("waypoint", &[]);
    b.empty("coord", &[("lat", lat.as_str()), ("lon", lon.as_str())]);

    if let Some(ref kind) = wp.kind {
        b.element("type", &[], kind);
    }

    b.element("sym", &[], &symbol_text(wp));
    b.element("ele", &[], &elevation_text(wp, DEFAULT_ELEVATION));
    b.element("name", &[("id", wp.name.as_str())], &wp.name);
    b.close("waypoint");
    b.finish()
}

pub(super) fn footer() -> String {
    "</loc>\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_header_and_footer() {
        assert!(header().contains("<loc version=\"1.0\" src=\"POI Export\">"));
        assert_eq!(footer(), "</loc>\n");
    }

    #[test]
    fn test_waypoint_structure() {
        let wp = Waypoint::from_document(&doc! {
            "lat": 10, "long": 20, "name": "Spot", "type": "cache", "symbol": "7",
        })
        .unwrap();

        let fragment = waypoint(&wp);
        assert!(fragment.contains("<coord lat=\"10\" lon=\"20\" />"));
        assert!(fragment.contains("<type>cache</type>"));
        assert!(fragment.contains("<sym>7</sym>"));
        assert!(fragment.contains("<ele>0.0000000</ele>"));
        assert!(fragment.contains("<name id=\"Spot\">Spot</name>"));
    }

    #[test]
    fn test_name_escaped_in_both_positions() {
        let wp =
            Waypoint::from_document(&doc! { "lat": 1, "long": 2, "name": "A \"B\" & C" }).unwrap();
        let fragment = waypoint(&wp);

        // Attribute position quotes the quotes, text position keeps them
        assert!(fragment.contains("id=\"A &quot;B&quot; &amp; C\""));
        assert!(fragment.contains(">A \"B\" &amp; C</name>"));
    }
}
