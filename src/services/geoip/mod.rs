//! GeoIP 服务模块
//!
//! 提供 IP 地址地理位置查询功能：
//! - MaxMind 数据库读取（只解码四个字段）
//! - 两阶段查询协议（locate → decode），未命中显式返回 NotFound

mod lookup;
mod maxmind;
mod provider;
mod record;

pub use lookup::LookupService;
pub use maxmind::{DatabaseInfo, DatabaseReader};
pub use provider::{Located, LocationLookup, RecordSource};
pub use record::LocationRecord;
