//! Plain-text encoders: csv and asc
//!
//! csv carries `Latitude,Longitude,Elevation` rows; asc carries
//! `longitude,latitude,"name"` lines for POI loaders. Neither has a footer.

use super::{DEFAULT_ELEVATION_CSV, decimal, elevation_text};
use crate::waypoint::Waypoint;

pub(super) fn csv_header() -> String {
    "Latitude,Longitude,Elevation\n".to_string()
}

pub(super) fn csv_row(wp: &Waypoint) -> String {
    format!(
        "{},{},{}\n",
        decimal(wp.latitude),
        decimal(wp.longitude),
        elevation_text(wp, DEFAULT_ELEVATION_CSV)
    )
}

pub(super) fn asc_row(wp: &Waypoint) -> String {
    // Embedded quotes double per CSV convention so the name stays one field
    let name = wp.name.replace('"', "\"\"");
    format!("{},{},\"{}\"\n", decimal(wp.longitude), decimal(wp.latitude), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_csv_scenario() {
        // Three records, third missing lat; validation drops it upstream
        let docs = vec![
            doc! { "lat": 1, "long": 2, "name": "A" },
            doc! { "lat": 3, "long": 4, "name": "B", "seaLevel": 5.5 },
            doc! { "long": 9, "name": "C" },
        ];

        let mut output = csv_header();
        for wp in crate::waypoint::validate(&docs) {
            output.push_str(&csv_row(&wp));
        }

        assert_eq!(output, "Latitude,Longitude,Elevation\n1,2,0.0\n3,4,5.5\n");
    }

    #[test]
    fn test_asc_scenario() {
        let wp = Waypoint::from_document(&doc! { "lat": 10, "long": 20, "name": "Spot" }).unwrap();
        assert_eq!(asc_row(&wp), "20,10,\"Spot\"\n");
    }

    #[test]
    fn test_asc_doubles_embedded_quotes() {
        let wp =
            Waypoint::from_document(&doc! { "lat": 1, "long": 2, "name": "Say \"hi\"" }).unwrap();
        assert_eq!(asc_row(&wp), "2,1,\"Say \"\"hi\"\"\"\n");
    }
}
