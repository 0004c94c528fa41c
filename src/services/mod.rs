//! Service layer
//!
//! Lookup logic shared by the HTTP handler, benchmarks and tests.

pub mod geoip;

pub use geoip::{
    DatabaseInfo, DatabaseReader, Located, LocationLookup, LocationRecord, LookupService,
    RecordSource,
};
