//! Location endpoint
//!
//! Every request, whatever its method or path, lands here. The request key
//! is the percent-decoded path with its leading `/` removed; an empty path
//! falls back to the `ip` query parameter. Per request:
//!
//! 1. empty key → 400
//! 2. cache hit → cached bytes verbatim
//! 3. unparsable address → 400
//! 4. lookup failure (including no match) → 500, never cached
//! 5. success → 200, body written to the cache under the request key

use std::borrow::Cow;
use std::net::IpAddr;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, web};
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, error, trace};

use crate::cache::{CacheResult, ResponseCache, ResponseCacheHandle};
use crate::errors::{GeominderError, Result};
use crate::services::geoip::LocationLookup;

pub const MISSING_IP_ERROR: &str = "missing IP query parameter, try ?ip=foo";
pub const INVALID_IP_ERROR: &str = "could not parse invalid IP address";

/// Handler options fixed at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocateConfig {
    /// `Access-Control-Allow-Origin` value; empty omits the header.
    pub origin_policy: String,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            origin_policy: crate::config::DEFAULT_ORIGIN_POLICY.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Where a response body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySource {
    Cache,
    Lookup,
    Error,
}

/// Status and body for one request, before HTTP headers are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub status: StatusCode,
    pub body: Bytes,
    pub source: BodySource,
}

impl Resolved {
    /// 请求键无效时 400，其余错误一律 500
    fn failure(err: &GeominderError) -> Self {
        let status = match err {
            GeominderError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::to_vec(&ErrorBody {
            error: err.message(),
        })
            .map(Bytes::from)
            .unwrap_or_default();
        Self {
            status,
            body,
            source: BodySource::Error,
        }
    }
}

/// Shared state for the location endpoint.
///
/// One instance serves every worker; the lookup and the cache are both safe
/// for concurrent use.
pub struct LocateState {
    lookup: Arc<dyn LocationLookup>,
    cache: Arc<ResponseCacheHandle>,
    origin_policy: Option<HeaderValue>,
}

impl LocateState {
    pub fn new(
        lookup: Arc<dyn LocationLookup>,
        cache: Arc<ResponseCacheHandle>,
        config: &LocateConfig,
    ) -> Result<Self> {
        let origin_policy = if config.origin_policy.is_empty() {
            None
        } else {
            Some(HeaderValue::from_str(&config.origin_policy).map_err(|e| {
                GeominderError::config(format!(
                    "invalid origin policy '{}': {}",
                    config.origin_policy, e
                ))
            })?)
        };

        Ok(Self {
            lookup,
            cache,
            origin_policy,
        })
    }

    pub fn cache(&self) -> &Arc<ResponseCacheHandle> {
        &self.cache
    }

    /// Run the cache-aside flow for one request key.
    pub async fn resolve(&self, key: &str) -> Resolved {
        if key.is_empty() {
            return Resolved::failure(&GeominderError::invalid_address(MISSING_IP_ERROR));
        }

        // 快速路径：缓存命中直接返回，不解析 IP
        if let CacheResult::Hit(body) = self.cache.get(key).await {
            trace!("Cache hit for {}", key);
            return Resolved {
                status: StatusCode::OK,
                body,
                source: BodySource::Cache,
            };
        }

        let ip: IpAddr = match key.parse() {
            Ok(ip) => ip,
            Err(_) => {
                trace!("Rejected unparsable address: {}", key);
                return Resolved::failure(&GeominderError::invalid_address(INVALID_IP_ERROR));
            }
        };

        let record = match self.lookup.lookup(ip) {
            Ok(record) => record,
            Err(e) => {
                if e.is_per_request() {
                    debug!("Lookup for {} via {} failed: {}", ip, self.lookup.name(), e);
                } else {
                    error!("Lookup for {} via {} failed: {}", ip, self.lookup.name(), e);
                }
                return Resolved::failure(&e);
            }
        };

        let body = match record.to_json_bytes() {
            Ok(body) => Bytes::from(body),
            Err(e) => {
                error!("Failed to serialize location for {}: {}", ip, e);
                return Resolved::failure(&e);
            }
        };

        self.cache.insert(key, body.clone()).await;
        Resolved {
            status: StatusCode::OK,
            body,
            source: BodySource::Lookup,
        }
    }

    fn respond(&self, resolved: Resolved) -> HttpResponse {
        let mut builder = HttpResponse::build(resolved.status);
        builder.insert_header((header::CONTENT_TYPE, "application/json"));
        if let Some(origin) = &self.origin_policy {
            builder.insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone()));
        }
        builder.body(resolved.body)
    }
}

pub struct LocateService;

impl LocateService {
    pub async fn handle_locate(req: HttpRequest, state: web::Data<LocateState>) -> HttpResponse {
        let key = Self::extract_key(&req);
        let resolved = state.resolve(&key).await;
        state.respond(resolved)
    }

    /// Request key: the path minus one leading `/`, or `?ip=` when the path
    /// is empty. Both forms are percent-decoded; the decoded text is the
    /// cache key.
    pub fn extract_key(req: &HttpRequest) -> Cow<'_, str> {
        let path = req.path();
        let from_path = path.strip_prefix('/').unwrap_or(path);
        if !from_path.is_empty() {
            // 非法 UTF-8 编码时保留原文，后续按无效地址处理
            return urlencoding::decode(from_path).unwrap_or(Cow::Borrowed(from_path));
        }

        req.uri()
            .query()
            .and_then(|query| Self::extract_query_param(query, "ip"))
            .unwrap_or(Cow::Borrowed(""))
    }

    /// 从 query string 提取指定参数值
    #[inline]
    fn extract_query_param<'a>(query: &'a str, key: &str) -> Option<Cow<'a, str>> {
        for part in query.split('&') {
            if let Some(value) = part.strip_prefix(key).and_then(|s| s.strip_prefix('=')) {
                // urlencoding::decode 返回 Cow，未编码时零分配
                return urlencoding::decode(value).ok();
            }
        }
        None
    }
}

/// Register the location endpoint for every method and path.
pub fn locate_routes(cfg: &mut web::ServiceConfig) {
    cfg.default_service(web::to(LocateService::handle_locate));
}
