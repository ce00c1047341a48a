//! KML 2.2 encoder
//!
//! Emits a Document envelope with an optional shared custom-icon style and
//! one `<Placemark>` per waypoint. KML coordinates are `lon,lat,ele`.

use super::markup::MarkupBuilder;
use super::{DEFAULT_ELEVATION, decimal, elevation_text};
use crate::request::CustomIcons;
use crate::waypoint::Waypoint;

const KML_NS: &str = "http://www.opengis.net/kml/2.2";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "http://www.opengis.net/kml/2.2 http://schemas.opengis.net/kml/2.2.0/ogckml22.xsd";

/// Style id referenced by placemarks when a custom kml icon is configured.
const CUSTOM_ICON_STYLE_ID: &str = "kmlCustomIcon";

pub(super) fn header(icons: &CustomIcons) -> String {
    let mut b = MarkupBuilder::new();
    b.declaration()
        .open(
            "kml",
            &[
                ("xmlns", KML_NS),
                ("xmlns:xsi", XSI_NS),
                ("xsi:schemaLocation", SCHEMA_LOCATION),
            ],
        )
        .open("Document", &[])
        .element("name", &[], "POI Export")
        .element("description", &[], "POI Export");

    if let Some(ref href) = icons.kml {
        b.open("Style", &[("id", CUSTOM_ICON_STYLE_ID)])
            .open("IconStyle", &[])
            .open("Icon", &[])
            .element("href", &[], href)
            .close("Icon")
            .close("IconStyle")
            .close("Style");
    }

    b.finish()
}

pub(super) fn placemark(wp: &Waypoint, icons: &CustomIcons) -> String {
    let coordinates = format!(
        "{},{},{}",
        decimal(wp.longitude),
        decimal(wp.latitude),
        elevation_text(wp, DEFAULT_ELEVATION)
    );

    let mut b = MarkupBuilder::at_depth(2);
    b.open("Placemark", &[]);
    b.element("name", &[], &wp.name);

    if icons.kml.is_some() {
        b.element("styleUrl", &[], &format!("#{CUSTOM_ICON_STYLE_ID}"));
    }

    b.open("Point", &[])
        .element("coordinates", &[], &coordinates)
        .close("Point")
        .close("Placemark");
    b.finish()
}

pub(super) fn footer() -> String {
    "    </Document>\n</kml>\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_header_without_icon_has_no_style() {
        let header = header(&CustomIcons::none());
        assert!(header.contains("<Document>"));
        assert!(!header.contains("<Style"));
    }

    #[test]
    fn test_header_with_icon_declares_style() {
        let icons = CustomIcons {
            gpx: None,
            kml: Some("https://example.com/pin.png".to_string()),
        };

        let header = header(&icons);
        assert!(header.contains("<Style id=\"kmlCustomIcon\">"));
        assert!(header.contains("<href>https://example.com/pin.png</href>"));
    }

    #[test]
    fn test_placemark_coordinates_are_lon_lat_ele() {
        let wp = Waypoint::from_document(&doc! {
            "lat": 10, "long": 20, "name": "Spot", "seaLevel": 5.5,
        })
        .unwrap();

        let fragment = placemark(&wp, &CustomIcons::none());
        assert!(fragment.contains("<coordinates>20,10,5.5</coordinates>"));
        assert!(!fragment.contains("styleUrl"));
    }

    #[test]
    fn test_placemark_references_custom_style() {
        let wp = Waypoint::from_document(&doc! { "lat": 1, "long": 2, "name": "A" }).unwrap();
        let icons = CustomIcons {
            gpx: None,
            kml: Some("https://example.com/pin.png".to_string()),
        };

        let fragment = placemark(&wp, &icons);
        assert!(fragment.contains("<styleUrl>#kmlCustomIcon</styleUrl>"));
        assert!(fragment.contains("<coordinates>2,1,0.0000000</coordinates>"));
    }
}
