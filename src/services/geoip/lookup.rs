//! 位置查询服务
//!
//! Runs the two-phase protocol against a [`RecordSource`] and turns an
//! absent entry into an explicit `NotFound` error before any decode happens.

use std::net::IpAddr;

use tracing::trace;

use super::provider::{Located, LocationLookup, RecordSource};
use super::record::LocationRecord;
use crate::errors::{GeominderError, Result};

pub struct LookupService<S> {
    source: S,
}

impl<S: RecordSource> LookupService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Look up `ip` and return a freshly allocated record.
    pub fn lookup(&self, ip: IpAddr) -> Result<LocationRecord> {
        let mut record = LocationRecord::default();
        self.lookup_into(ip, &mut record)?;
        Ok(record)
    }

    /// Same as [`lookup`](Self::lookup), decoding into a caller-owned record
    /// so its string buffer can be reused across calls.
    pub fn lookup_into(&self, ip: IpAddr, record: &mut LocationRecord) -> Result<()> {
        match self.source.locate(ip)? {
            Located::Absent => {
                trace!("No database entry for {}", ip);
                Err(GeominderError::no_match(ip))
            }
            Located::Found(offset) => self.source.decode_at(offset, record),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Give the source back, e.g. to close the database on shutdown.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: RecordSource> LocationLookup for LookupService<S> {
    fn lookup(&self, ip: IpAddr) -> Result<LocationRecord> {
        LookupService::lookup(self, ip)
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<S>()
            .rsplit("::")
            .next()
            .unwrap_or("RecordSource")
    }
}
