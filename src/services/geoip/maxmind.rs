//! MaxMind DB 读取器
//!
//! Wraps `maxminddb::Reader` and exposes the locate/decode protocol from
//! [`RecordSource`]. Only the four location fields are decoded, so lookups
//! never pay for names, subdivisions or postal data.

use std::net::IpAddr;
use std::path::Path;

use maxminddb::{LookupResult, Reader};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::provider::{Located, RecordSource};
use super::record::LocationRecord;
use crate::errors::{GeominderError, Result};

#[derive(Debug, Default, Deserialize)]
struct CountryProjection<'a> {
    #[serde(borrow, default)]
    iso_code: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
struct CoordinatesProjection {
    latitude: Option<f64>,
    longitude: Option<f64>,
    accuracy_radius: Option<u16>,
}

/// The slice of a GeoIP2/GeoLite2 City record we care about.
#[derive(Debug, Default, Deserialize)]
struct LocationProjection<'a> {
    #[serde(borrow, default)]
    country: CountryProjection<'a>,
    #[serde(default)]
    location: CoordinatesProjection,
}

impl LocationProjection<'_> {
    fn write_into(&self, record: &mut LocationRecord) {
        record.clear();
        if let Some(iso_code) = self.country.iso_code {
            record.country_iso_code.push_str(iso_code);
        }
        record.latitude = self.location.latitude.unwrap_or_default();
        record.longitude = self.location.longitude.unwrap_or_default();
        record.accuracy_radius_km = self.location.accuracy_radius.unwrap_or_default();
    }
}

/// Summary of the database header, logged at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub database_type: String,
    pub build_epoch: u64,
    pub ip_version: u16,
    pub node_count: u32,
}

impl DatabaseInfo {
    /// Location fields only exist in City-precision databases.
    pub fn has_city_precision(&self) -> bool {
        self.database_type.contains("City")
    }
}

/// MaxMind 数据库读取器
pub struct DatabaseReader {
    reader: Reader<Vec<u8>>,
    path: String,
}

impl DatabaseReader {
    /// Open a MaxMind DB file.
    ///
    /// Fails with `DatabaseOpen` if the file is missing, unreadable or not a
    /// MaxMind DB.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let display = path.as_ref().display().to_string();
        let reader = Reader::open_readfile(path.as_ref()).map_err(|e| {
            GeominderError::database_open(format!(
                "failed to open database at {}: {}",
                display, e
            ))
        })?;

        let db = Self {
            reader,
            path: display,
        };
        let info = db.info();
        info!(
            "Opened {} database at {} (build epoch {}, IPv{}, {} nodes)",
            info.database_type, db.path, info.build_epoch, info.ip_version, info.node_count
        );
        if !info.has_city_precision() {
            warn!(
                "Database type {} is not City precision, location fields will decode as zero values",
                info.database_type
            );
        }
        Ok(db)
    }

    pub fn info(&self) -> DatabaseInfo {
        let metadata = &self.reader.metadata;
        DatabaseInfo {
            database_type: metadata.database_type.clone(),
            build_epoch: metadata.build_epoch,
            ip_version: metadata.ip_version,
            node_count: metadata.node_count,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Release the database. Consumes the reader, so no lookup can follow.
    pub fn close(self) {
        debug!("Closing database at {}", self.path);
        drop(self.reader);
    }
}

impl RecordSource for DatabaseReader {
    type Offset<'a> = LookupResult<'a, Vec<u8>>;

    fn locate(&self, ip: IpAddr) -> Result<Located<Self::Offset<'_>>> {
        let result = self.reader.lookup(ip).map_err(|e| {
            GeominderError::database_read(format!("lookup of {} failed: {}", ip, e))
        })?;

        // maxminddb 不会对未命中报错，必须先检查 has_data
        if !result.has_data() {
            return Ok(Located::Absent);
        }
        Ok(Located::Found(result))
    }

    fn decode_at<'a>(&'a self, offset: Self::Offset<'a>, into: &mut LocationRecord) -> Result<()> {
        let projection: LocationProjection<'a> = offset
            .decode()
            .map_err(|e| GeominderError::decode(format!("failed to decode record: {}", e)))?
            .ok_or_else(|| GeominderError::decode("record at offset has no data"))?;

        projection.write_into(into);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_missing_file() {
        let result = DatabaseReader::open("/nonexistent/GeoLite2-City.mmdb");

        match result {
            Err(GeominderError::DatabaseOpen(msg)) => {
                assert!(msg.contains("/nonexistent/GeoLite2-City.mmdb"));
            }
            Err(other) => panic!("expected DatabaseOpen, got {:?}", other),
            Ok(_) => panic!("opening a missing file should fail"),
        }
    }

    #[test]
    fn test_open_garbage_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is definitely not a maxmind database")
            .unwrap();
        file.flush().unwrap();

        let result = DatabaseReader::open(file.path());
        assert!(matches!(result, Err(GeominderError::DatabaseOpen(_))));
    }

    #[test]
    fn test_projection_write_into_fills_all_fields() {
        let projection = LocationProjection {
            country: CountryProjection {
                iso_code: Some("US"),
            },
            location: CoordinatesProjection {
                latitude: Some(37.751),
                longitude: Some(-97.822),
                accuracy_radius: Some(1000),
            },
        };
        let mut record = LocationRecord::default();

        projection.write_into(&mut record);

        assert_eq!(record.country_iso_code, "US");
        assert_eq!(record.latitude, 37.751);
        assert_eq!(record.longitude, -97.822);
        assert_eq!(record.accuracy_radius_km, 1000);
    }

    #[test]
    fn test_projection_missing_fields_reset_stale_values() {
        let mut record = LocationRecord {
            country_iso_code: "FR".to_string(),
            latitude: 48.0,
            longitude: 2.0,
            accuracy_radius_km: 50,
        };

        LocationProjection::default().write_into(&mut record);

        assert_eq!(record, LocationRecord::default());
    }

    #[test]
    fn test_city_precision_detection() {
        let mut info = DatabaseInfo {
            database_type: "GeoLite2-City".to_string(),
            build_epoch: 0,
            ip_version: 6,
            node_count: 0,
        };
        assert!(info.has_city_precision());

        info.database_type = "GeoLite2-Country".to_string();
        assert!(!info.has_city_precision());
    }

    /// 需要真实的 GeoLite2-City 数据库
    /// GEOMINDER_TEST_DB=/path/to/GeoLite2-City.mmdb cargo test -- --ignored
    #[test]
    #[ignore]
    fn test_real_database_lookup() {
        let path = std::env::var("GEOMINDER_TEST_DB").expect("GEOMINDER_TEST_DB not set");
        let db = DatabaseReader::open(&path).unwrap();

        let ip: IpAddr = "8.8.8.8".parse().unwrap();
        let Located::Found(offset) = db.locate(ip).unwrap() else {
            panic!("8.8.8.8 should be in the database");
        };
        let mut record = LocationRecord::default();
        db.decode_at(offset, &mut record).unwrap();
        assert_eq!(record.country_iso_code, "US");

        let private: IpAddr = "10.0.0.1".parse().unwrap();
        assert!(!db.locate(private).unwrap().is_found());

        db.close();
    }
}
