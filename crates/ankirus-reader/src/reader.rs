use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ankirus_config::SourceConfig;
use ankirus_core::{EnrichError, Record, Snapshot, TextEnricher};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::ReaderError;
use crate::extract::Extractor;
use crate::freshness::{self, side_file};
use crate::temp_copy::{TempCopy, remove_temporaries};

/// Where the reader reads from and how long a snapshot stays valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Live collection file.
    pub source: PathBuf,
    /// Path of the private copy; its side-file appends `-wal`.
    pub temp: PathBuf,
    /// Maximum snapshot age.
    pub ttl: Duration,
}

impl ReaderOptions {
    #[must_use]
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            source: config.collection_path(),
            temp: config.tmp_path(),
            ttl: config.ttl(),
        }
    }

    /// Current view of the source and temporary files, without reading them.
    pub async fn probe(&self) -> SourceProbe {
        let temp_side_file = side_file(&self.temp);
        SourceProbe {
            side_file: side_file(&self.source),
            last_modified: freshness::last_modified(&self.source).await,
            leftover_temporaries: tokio::fs::try_exists(&self.temp).await.unwrap_or(false)
                || tokio::fs::try_exists(&temp_side_file).await.unwrap_or(false),
            source: self.source.clone(),
            temp: self.temp.clone(),
            temp_side_file,
            ttl_secs: self.ttl.as_secs(),
            snapshot: None,
        }
    }
}

/// Report produced by [`ReaderOptions::probe`] and [`CachedReader::probe`].
#[derive(Debug, Clone, Serialize)]
pub struct SourceProbe {
    pub source: PathBuf,
    pub side_file: PathBuf,
    pub last_modified: Option<DateTime<Utc>>,
    pub temp: PathBuf,
    pub temp_side_file: PathBuf,
    pub leftover_temporaries: bool,
    pub ttl_secs: u64,
    pub snapshot: Option<SnapshotInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotInfo {
    pub records: usize,
    /// Distinct record groups.
    pub groups: usize,
    pub fetched_at: DateTime<Utc>,
    pub enriched: bool,
}

impl<R: Record> From<&Snapshot<R>> for SnapshotInfo {
    fn from(snapshot: &Snapshot<R>) -> Self {
        Self {
            records: snapshot.len(),
            groups: snapshot
                .iter()
                .map(Record::group)
                .collect::<BTreeSet<_>>()
                .len(),
            fetched_at: snapshot.fetched_at(),
            enriched: snapshot.is_enriched(),
        }
    }
}

/// Why a read decided to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    /// Nothing published yet.
    Empty,
    /// The source (or its side-file) changed after the last copy was taken.
    SourceModified,
    /// The snapshot outlived the TTL.
    Expired,
    /// The caller wants enriched text and the snapshot was built without it.
    NotEnriched,
}

fn stale_reason<R>(
    snapshot: &Snapshot<R>,
    source_modified: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    ttl: Duration,
    want_enriched: bool,
) -> Option<RefreshReason> {
    let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
    if source_modified.is_some_and(|modified| snapshot.fetched_at() < modified) {
        Some(RefreshReason::SourceModified)
    } else if now - snapshot.fetched_at() > ttl {
        Some(RefreshReason::Expired)
    } else if want_enriched && !snapshot.is_enriched() {
        Some(RefreshReason::NotEnriched)
    } else {
        None
    }
}

/// Stands in for "no enricher" so both read paths share one body.
enum NoEnricher {}

#[async_trait]
impl TextEnricher for NoEnricher {
    async fn enrich(&self, _text: &str) -> Result<String, EnrichError> {
        match *self {}
    }
}

/// Serves snapshots of a live collection, refreshing only when needed.
///
/// All reads go through one lock. A read that finds the cached snapshot
/// fresh returns it immediately; otherwise it copies the source aside,
/// extracts from the copy on the blocking pool, optionally enriches every
/// text field, and publishes the result. Callers queued behind a refresh see
/// the snapshot it published rather than starting their own.
pub struct CachedReader<X: Extractor> {
    extractor: Arc<X>,
    options: ReaderOptions,
    snapshot: Arc<Mutex<Option<Arc<Snapshot<X::Record>>>>>,
}

impl<X: Extractor> CachedReader<X> {
    pub fn new(extractor: X, options: ReaderOptions) -> Self {
        Self {
            extractor: Arc::new(extractor),
            options,
            snapshot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn from_config(extractor: X, config: &SourceConfig) -> Self {
        Self::new(extractor, ReaderOptions::from_config(config))
    }

    pub const fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Current snapshot, refreshed first if stale. Text fields are returned
    /// as extracted.
    ///
    /// # Errors
    ///
    /// See [`ReaderError`]. The previous snapshot is kept on any failure.
    pub async fn read(&self) -> Result<Arc<Snapshot<X::Record>>, ReaderError> {
        self.read_with(None::<&NoEnricher>).await
    }

    /// Like [`read`](Self::read), but every text field of a freshly extracted
    /// snapshot passes through `enricher`. A cached snapshot built without
    /// enrichment is never returned from here.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Enrich` if any field fails; nothing is published
    /// in that case.
    pub async fn read_enriched<E: TextEnricher>(
        &self,
        enricher: &E,
    ) -> Result<Arc<Snapshot<X::Record>>, ReaderError> {
        self.read_with(Some(enricher)).await
    }

    /// [`read_enriched`](Self::read_enriched) when `enricher` is given,
    /// [`read`](Self::read) otherwise.
    ///
    /// # Errors
    ///
    /// See [`ReaderError`].
    pub async fn read_with<E: TextEnricher>(
        &self,
        enricher: Option<&E>,
    ) -> Result<Arc<Snapshot<X::Record>>, ReaderError> {
        let cached = Arc::clone(&self.snapshot).lock_owned().await;
        let source_modified = freshness::last_modified(&self.options.source).await;
        let now = Utc::now();

        let reason = match cached.as_ref() {
            None => RefreshReason::Empty,
            Some(snapshot) => {
                match stale_reason(
                    snapshot,
                    source_modified,
                    now,
                    self.options.ttl,
                    enricher.is_some(),
                ) {
                    Some(reason) => reason,
                    None => return Ok(Arc::clone(snapshot)),
                }
            }
        };

        // Taken before the copy so that writes landing mid-copy trigger the
        // next refresh. Never earlier than the snapshot being replaced.
        let fetched_at = cached
            .as_ref()
            .map_or(now, |previous| now.max(previous.fetched_at()));

        tracing::info!(
            source = %self.options.source.display(),
            ?reason,
            enrich = enricher.is_some(),
            "refreshing snapshot"
        );
        let started = Instant::now();

        let extractor = Arc::clone(&self.extractor);
        let source = self.options.source.clone();
        let temp = self.options.temp.clone();
        // The guard travels with the blocking task: if this future is dropped
        // mid-extraction, the temp path stays locked until the copy is gone.
        let (mut cached, extracted) = tokio::task::spawn_blocking(move || {
            let extracted = TempCopy::create(&source, &temp)
                .and_then(|copy| extractor.extract(copy.path()).map_err(ReaderError::Extract));
            (cached, extracted)
        })
        .await?;
        let mut records = extracted?;

        if let Some(enricher) = enricher {
            for record in &mut records {
                for field in record.text_fields_mut() {
                    let enriched = enricher.enrich(field.as_str()).await?;
                    *field = enriched;
                }
            }
        }

        let snapshot = Arc::new(Snapshot::new(records, fetched_at, enricher.is_some()));
        *cached = Some(Arc::clone(&snapshot));

        tracing::info!(
            records = snapshot.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "snapshot published"
        );
        Ok(snapshot)
    }

    /// The published snapshot, without checking freshness.
    pub async fn cached(&self) -> Option<Arc<Snapshot<X::Record>>> {
        self.snapshot.lock().await.clone()
    }

    /// Source probe plus a summary of the published snapshot.
    pub async fn probe(&self) -> SourceProbe {
        let cached = self.snapshot.lock().await;
        let mut probe = self.options.probe().await;
        probe.snapshot = cached.as_deref().map(SnapshotInfo::from);
        probe
    }

    /// Delete leftover temporary files. Safe to call any number of times;
    /// the published snapshot stays available.
    pub async fn close(&self) {
        let _guard = self.snapshot.lock().await;
        let temp = self.options.temp.clone();
        if let Err(error) = tokio::task::spawn_blocking(move || remove_temporaries(&temp)).await {
            tracing::warn!(%error, "temporary file cleanup task failed");
        }
    }
}
