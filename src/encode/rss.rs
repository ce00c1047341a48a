//! RSS 2.0 / GeoRSS encoder
//!
//! Emits an RSS channel with the GeoRSS family of namespaces and one
//! `<item>` per waypoint carrying a `georss:point`.

use super::markup::MarkupBuilder;
use super::decimal;
use crate::waypoint::{Waypoint, iso8601};

pub(super) fn header() -> String {
    let mut b = MarkupBuilder::new();
    b.open(
        "rss",
        &[
            ("version", "2.0"),
            ("xmlns:georss", "http://www.georss.org/georss"),
            ("xmlns:gml", "http://www.opengis.net/gml"),
            ("xmlns:geo", "http://www.w3.org/2003/01/geo/wgs84_pos#"),
            ("xmlns:kml", "http://www.opengis.net/kml/2.2"),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
        ],
    )
    .open("channel", &[])
    .element("title", &[], "POI Export");
    b.finish()
}

pub(super) fn item(wp: &Waypoint) -> String {
    let point = format!("{} {}", decimal(wp.latitude), decimal(wp.longitude));

    let mut b = MarkupBuilder::at_depth(2);
    b.open("item", &[]);

    if let Some(ref created_at) = wp.created_at {
        b.element("pubDate", &[], &iso8601(created_at));
    }

    b.element("title", &[], &wp.name);

    if let Some(ref description) = wp.description {
        b.element("description", &[], description);
    }

    b.element("georss:point", &[], &point);
    b.close("item");
    b.finish()
}

pub(super) fn footer() -> String {
    "    </channel>\n</rss>\n".to_string()
}
