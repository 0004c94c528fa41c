//! 最小地理位置记录
//!
//! Only the four fields the HTTP API returns are decoded from the database.

use serde::Serialize;

use crate::errors::Result;

/// Minimal location data for one IP address.
///
/// Built only from a successful decode. An unknown country is an empty
/// string, unknown coordinates are `0.0`; absence of the whole record is
/// reported through the error channel instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationRecord {
    /// ISO 3166-1 alpha-2 国家代码 (e.g. "US")
    pub country_iso_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Approximate radius in kilometers around the coordinates, at 67%
    /// confidence.
    pub accuracy_radius_km: u16,
}

#[derive(Serialize)]
struct CountryView<'a> {
    iso_code: &'a str,
}

#[derive(Serialize)]
struct CoordinatesView {
    latitude: f64,
    longitude: f64,
    accuracy_radius: u16,
}

#[derive(Serialize)]
struct RecordView<'a> {
    country: CountryView<'a>,
    location: CoordinatesView,
}

impl LocationRecord {
    /// Resets the record in place, keeping the string allocation.
    pub fn clear(&mut self) {
        self.country_iso_code.clear();
        self.latitude = 0.0;
        self.longitude = 0.0;
        self.accuracy_radius_km = 0;
    }

    /// Serialize to the response body shape:
    /// `{"country":{"iso_code":..},"location":{"latitude":..,"longitude":..,"accuracy_radius":..}}`
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let view = RecordView {
            country: CountryView {
                iso_code: &self.country_iso_code,
            },
            location: CoordinatesView {
                latitude: self.latitude,
                longitude: self.longitude,
                accuracy_radius: self.accuracy_radius_km,
            },
        };
        Ok(serde_json::to_vec(&view)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_bytes_shape() {
        let record = LocationRecord {
            country_iso_code: "US".to_string(),
            latitude: 37.751,
            longitude: -97.822,
            accuracy_radius_km: 1000,
        };

        let body = String::from_utf8(record.to_json_bytes().unwrap()).unwrap();
        assert_eq!(
            body,
            r#"{"country":{"iso_code":"US"},"location":{"latitude":37.751,"longitude":-97.822,"accuracy_radius":1000}}"#
        );
    }

    #[test]
    fn test_default_record_serializes_zero_values() {
        let body = String::from_utf8(LocationRecord::default().to_json_bytes().unwrap()).unwrap();
        assert_eq!(
            body,
            r#"{"country":{"iso_code":""},"location":{"latitude":0.0,"longitude":0.0,"accuracy_radius":0}}"#
        );
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut record = LocationRecord {
            country_iso_code: "DE".to_string(),
            latitude: 51.0,
            longitude: 9.0,
            accuracy_radius_km: 100,
        };
        let capacity = record.country_iso_code.capacity();

        record.clear();

        assert_eq!(record, LocationRecord::default());
        assert_eq!(record.country_iso_code.capacity(), capacity);
    }
}
