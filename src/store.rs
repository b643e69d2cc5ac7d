//! The domain-indexed rule store: a single SQLite table mapping each
//! applicable domain (or the sentinel `"global"` key) to the source text
//! of the rules that apply there. Lookups fan out over the dot-suffix
//! chain of the queried host and re-parse each row; the attached
//! [`FilterCache`] amortises the re-parse under repeated queries.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use rusqlite::{params, Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::{FilterCache, DEFAULT_TTL};
use crate::filters::url::UrlFilter;
use crate::parser::{self, Filter};
use crate::utils;

/// Index key for rules with no applicable domain.
pub const GLOBAL_DOMAIN: &str = "global";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store is finalized for reading; ingest is no longer permitted")]
    Finalized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Delete an existing database file before opening.
    pub overwrite: bool,
    /// How long a materialised lookup result stays cached.
    pub cache_ttl: Duration,
    /// SQLite page cache budget in KiB.
    pub page_cache_kib: u32,
}

impl Default for StoreOptions {
    fn default() -> StoreOptions {
        StoreOptions {
            overwrite: false,
            cache_ttl: DEFAULT_TTL,
            page_cache_kib: 64 * 1024,
        }
    }
}

static MEMORY_STORE_ID: AtomicU64 = AtomicU64::new(0);

/// The writer handle. Owns the ingest connection and the lookup cache;
/// additional read connections are spawned with [`FilterStore::reader`].
pub struct FilterStore {
    conn: Connection,
    target: String,
    cache: Arc<FilterCache>,
    finalized: bool,
}

/// An independent read-only connection sharing the writer's cache, so
/// concurrent lookups do not serialise behind a single handle.
pub struct StoreReader {
    conn: Connection,
    cache: Arc<FilterCache>,
}

impl FilterStore {
    pub fn open<P: AsRef<Path>>(path: P, options: StoreOptions) -> Result<FilterStore, StoreError> {
        let path = path.as_ref();
        if options.overwrite && path.exists() {
            std::fs::remove_file(path)?;
        }
        FilterStore::open_target(path.to_string_lossy().into_owned(), &options)
    }

    /// Opens a named in-memory database. The shared-cache URI lets
    /// [`FilterStore::reader`] connections see the same data.
    pub fn open_in_memory(options: StoreOptions) -> Result<FilterStore, StoreError> {
        let id = MEMORY_STORE_ID.fetch_add(1, Ordering::Relaxed);
        let target = format!("file:urlfilter-store-{}?mode=memory&cache=shared", id);
        FilterStore::open_target(target, &options)
    }

    fn open_target(target: String, options: &StoreOptions) -> Result<FilterStore, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_SHARED_CACHE;
        let conn = Connection::open_with_flags(&target, flags)?;

        // Bulk-load tuning: write throughput over durability.
        conn.pragma_update(None, "synchronous", "OFF")?;
        conn.pragma_update(None, "journal_mode", "OFF")?;
        conn.pragma_update(None, "automatic_index", "OFF")?;
        conn.pragma_update(None, "cache_size", -(i64::from(options.page_cache_kib)))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS UrlFiltersIndex (
                Domains VARCHAR(255) NOT NULL,
                CategoryId INTEGER NOT NULL,
                IsWhitelist BOOLEAN NOT NULL,
                Source TEXT NOT NULL
            )",
        )?;

        Ok(FilterStore {
            conn,
            target,
            cache: Arc::new(FilterCache::new(options.cache_ttl)),
            finalized: false,
        })
    }

    /// Parses and indexes every line inside one transaction, returning
    /// `(loaded, failed)`. A rule is inserted once per applicable domain,
    /// or once under [`GLOBAL_DOMAIN`] when it names none. Element-hide
    /// rules have no URL index row and count toward `failed`. Any
    /// previously cached lookups are dropped.
    pub fn ingest<I, S>(&mut self, lines: I, category_id: i16) -> Result<(usize, usize), StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.finalized {
            return Err(StoreError::Finalized);
        }
        let mut loaded = 0;
        let mut failed = 0;
        let tx = self.conn.transaction()?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO UrlFiltersIndex (Domains, CategoryId, IsWhitelist, Source)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for line in lines {
                match parser::parse(line.as_ref(), category_id) {
                    Ok(Filter::Url(filter)) => {
                        let source = line.as_ref().trim();
                        if filter.applicable_domains.is_empty() {
                            insert.execute(params![
                                GLOBAL_DOMAIN,
                                category_id,
                                filter.is_exception,
                                source
                            ])?;
                        } else {
                            for domain in &filter.applicable_domains {
                                insert.execute(params![
                                    domain,
                                    category_id,
                                    filter.is_exception,
                                    source
                                ])?;
                            }
                        }
                        loaded += 1;
                    }
                    Ok(Filter::Html(_)) | Err(_) => failed += 1,
                }
            }
        }
        tx.commit()?;
        self.cache.clear();
        info!("ingested {} url filter rules, rejected {}", loaded, failed);
        Ok((loaded, failed))
    }

    /// Creates the read indexes and flips the store to query-only.
    pub fn finalize_for_read(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS UrlFiltersIndexByDomain
                 ON UrlFiltersIndex (Domains);
             CREATE INDEX IF NOT EXISTS UrlFiltersIndexByWhitelist
                 ON UrlFiltersIndex (IsWhitelist);
             CREATE INDEX IF NOT EXISTS UrlFiltersIndexByDomainWhitelist
                 ON UrlFiltersIndex (Domains, IsWhitelist);",
        )?;
        self.finalized = true;
        Ok(())
    }

    pub fn get_filters_for_domain(
        &self,
        host: &str,
        whitelist: bool,
    ) -> Result<Arc<Vec<UrlFilter>>, StoreError> {
        query_filters(&self.conn, &self.cache, host, whitelist)
    }

    pub fn global_filters(&self, whitelist: bool) -> Result<Arc<Vec<UrlFilter>>, StoreError> {
        self.get_filters_for_domain(GLOBAL_DOMAIN, whitelist)
    }

    /// Opens an independent read-only connection sharing this store's
    /// cache.
    pub fn reader(&self) -> Result<StoreReader, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_SHARED_CACHE;
        let conn = Connection::open_with_flags(&self.target, flags)?;
        Ok(StoreReader {
            conn,
            cache: Arc::clone(&self.cache),
        })
    }
}

impl StoreReader {
    pub fn get_filters_for_domain(
        &self,
        host: &str,
        whitelist: bool,
    ) -> Result<Arc<Vec<UrlFilter>>, StoreError> {
        query_filters(&self.conn, &self.cache, host, whitelist)
    }

    pub fn global_filters(&self, whitelist: bool) -> Result<Arc<Vec<UrlFilter>>, StoreError> {
        self.get_filters_for_domain(GLOBAL_DOMAIN, whitelist)
    }
}

/// Cache probe, then the suffix fan-out: the host and each of its
/// dot-parents are queried with the prepared select, every row is
/// re-parsed into a fresh filter, and the combined list is cached under
/// the original query key.
fn query_filters(
    conn: &Connection,
    cache: &FilterCache,
    host: &str,
    whitelist: bool,
) -> Result<Arc<Vec<UrlFilter>>, StoreError> {
    if let Some(cached) = cache.get(host, whitelist) {
        return Ok(cached);
    }
    let mut filters = Vec::new();
    let mut select = conn.prepare_cached(
        "SELECT Source, CategoryId FROM UrlFiltersIndex
         WHERE Domains = ?1 AND IsWhitelist = ?2",
    )?;
    for suffix in utils::domain_suffixes(host) {
        let mut rows = select.query(params![suffix, whitelist])?;
        while let Some(row) = rows.next()? {
            let source: String = row.get(0)?;
            let category_id: i16 = row.get(1)?;
            match parser::parse(&source, category_id) {
                Ok(Filter::Url(filter)) => filters.push(filter),
                _ => warn!("stored rule no longer parses: {}", source),
            }
        }
    }
    Ok(cache.insert(host, whitelist, filters))
}
