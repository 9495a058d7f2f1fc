//! Session info caching and parsing
//!
//! The session string only changes when the simulator bumps its update
//! counter, so parsed results are cached per version and shared via `Arc`.

use super::SessionInfo;
use crate::error::OverlayError;
use crate::yaml_utils::preprocess_session_yaml;
use crate::Result;
use std::sync::Arc;
use tracing::debug;

/// Session info cache entry with version tracking
#[derive(Debug, Clone)]
pub struct SessionInfoCache {
    /// Cached session info
    pub session_info: Arc<SessionInfo>,
    /// Update counter this entry was parsed for
    pub version: u32,
}

impl SessionInfoCache {
    /// Create new cache entry
    pub fn new(session_info: Arc<SessionInfo>, version: u32) -> Self {
        Self { session_info, version }
    }

    /// Check if cache is valid for given version
    pub fn is_valid(&self, current_version: u32) -> bool {
        self.version == current_version
    }
}

/// Session string parser with preprocessing and a one-entry version cache
#[derive(Debug, Clone, Default)]
pub struct SessionInfoParser {
    cache: Option<SessionInfoCache>,
}

impl SessionInfoParser {
    /// Create new session info parser
    pub fn new() -> Self {
        Self { cache: None }
    }

    /// Parse a raw session string for `version`, reusing the cached result
    /// when the version has not changed.
    pub fn parse_versioned(&mut self, raw: &str, version: u32) -> Result<Arc<SessionInfo>> {
        if let Some(cached) = self.get_cached(version) {
            debug!(version, "Using cached session info");
            return Ok(cached);
        }

        debug!(version, bytes = raw.len(), "Parsing fresh session info");
        let session_info = Arc::new(self.parse(raw)?);
        self.cache = Some(SessionInfoCache::new(Arc::clone(&session_info), version));
        Ok(session_info)
    }

    /// Preprocess and parse a raw session string.
    pub fn parse(&self, raw: &str) -> Result<SessionInfo> {
        let cleaned = preprocess_session_yaml(raw)?;
        let session_info = SessionInfo::parse(&cleaned)?;
        if !session_info.has_known_blocks() {
            return Err(OverlayError::parse(
                "Session validation",
                "no WeekendInfo, SessionInfo, DriverInfo, SplitTimeInfo or QualifyResultsInfo block",
            ));
        }
        Ok(session_info)
    }

    /// Get cached session info if valid for version
    pub fn get_cached(&self, version: u32) -> Option<Arc<SessionInfo>> {
        self.cache
            .as_ref()
            .filter(|cache| cache.is_valid(version))
            .map(|cache| Arc::clone(&cache.session_info))
    }

    /// Clear session info cache
    pub fn clear_cache(&mut self) {
        self.cache = None;
    }
}
