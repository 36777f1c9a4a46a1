//! Expiring cache for the company record
//!
//! Keeps a single entry, `dadosCNPJ_<cnpj>`, holding the record and the
//! instant it stops being valid. Reading an expired or unreadable entry
//! deletes it and reports a miss.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, warn};

use super::store::{KeyValueStore, StoreError};
use crate::data::{Company, CNPJ};

/// How long a cached record stays valid, in hours
pub const RETENTION_HOURS: i64 = 24;

/// Errors that can occur when saving to the cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Wrapper stored under the cache key
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached record
    dados: T,
    /// When the entry expires
    #[serde(with = "iso_millis")]
    validade: DateTime<Utc>,
}

/// ISO-8601 instants with millisecond precision and a `Z` suffix
mod iso_millis {
    use super::*;

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}

/// Returns the cache key for an identifier
pub fn cache_key(cnpj: &str) -> String {
    format!("dadosCNPJ_{}", cnpj)
}

/// Reads and writes the cached company record
pub struct CompanyCache {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl CompanyCache {
    /// Creates a cache for the fixed identifier on top of `store`
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: cache_key(CNPJ),
        }
    }

    /// The key this cache reads and writes
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Loads the cached record if it is still valid
    pub fn load(&mut self) -> Option<Company> {
        self.load_at(Utc::now())
    }

    /// Loads the cached record as seen at `now`
    ///
    /// Returns `None` when the entry is missing, expired or malformed; the
    /// last two cases also delete the entry.
    pub fn load_at(&mut self, now: DateTime<Utc>) -> Option<Company> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "cache miss");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry<Company>>(&raw) {
            Ok(entry) if entry.validade > now => {
                debug!(key = %self.key, expires = %entry.validade, "cache hit");
                Some(entry.dados)
            }
            Ok(entry) => {
                debug!(key = %self.key, expired = %entry.validade, "cache entry expired");
                self.evict();
                None
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "cache entry malformed");
                self.evict();
                None
            }
        }
    }

    /// Saves `record`, valid for the next 24 hours
    pub fn save(&mut self, record: &Company) -> Result<(), CacheError> {
        self.save_at(record, Utc::now())
    }

    /// Saves `record` as if written at `now`, replacing any prior entry
    pub fn save_at(&mut self, record: &Company, now: DateTime<Utc>) -> Result<(), CacheError> {
        let entry = CacheEntry {
            dados: record,
            validade: now + Duration::hours(RETENTION_HOURS),
        };
        let json = serde_json::to_string(&entry)?;
        self.store.set(&self.key, &json)?;
        debug!(key = %self.key, expires = %entry.validade, "cache entry written");
        Ok(())
    }

    fn evict(&mut self) {
        if let Err(err) = self.store.delete(&self.key) {
            warn!(error = %err, "failed to delete cache entry");
        }
    }
}
