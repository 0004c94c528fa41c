//! GeoIP 抽象层
//!
//! Two seams live here:
//! - [`RecordSource`]: the two-phase locate/decode protocol a database
//!   must provide.
//! - [`LocationLookup`]: the object-safe lookup the HTTP handler depends on.

use std::net::IpAddr;

use super::record::LocationRecord;
use crate::errors::Result;

/// Outcome of the locate phase.
///
/// `Absent` carries nothing to decode, so decoding a missing entry cannot
/// be written by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Located<O> {
    Found(O),
    Absent,
}

impl<O> Located<O> {
    pub fn is_found(&self) -> bool {
        matches!(self, Located::Found(_))
    }
}

/// A database that can locate an address and decode the record it points to.
///
/// Implementations must be safe to share across threads; both phases are
/// read-only.
pub trait RecordSource: Send + Sync {
    /// Opaque position token handed from `locate` to `decode_at`.
    type Offset<'a>
    where
        Self: 'a;

    /// Find the data for `ip`. Fails with `DatabaseRead` on I/O or
    /// corruption problems.
    fn locate(&self, ip: IpAddr) -> Result<Located<Self::Offset<'_>>>;

    /// Decode the record at `offset` into `into`. Fails with `Decode` when
    /// the data does not fit the location shape.
    fn decode_at<'a>(&'a self, offset: Self::Offset<'a>, into: &mut LocationRecord) -> Result<()>;
}

/// 位置查询 trait
pub trait LocationLookup: Send + Sync {
    /// Resolve `ip` to a location, failing with `NotFound` when the
    /// database has no entry.
    fn lookup(&self, ip: IpAddr) -> Result<LocationRecord>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}
