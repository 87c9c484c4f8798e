//! Time-bounded cache in front of any source

use super::GridSource;
use crate::error::SourceError;
use crate::grid::RawGrid;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Caches successful fetches per sheet for `ttl`. Failures are never cached.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, RawGrid)>>,
}

impl<S: GridSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every cached grid
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: GridSource> GridSource for CachedSource<S> {
    fn document(&self) -> &str {
        self.inner.document()
    }

    fn fetch_grid(&self, sheet: &str) -> Result<RawGrid, SourceError> {
        {
            let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some((fetched_at, grid)) = entries.get(sheet) {
                if fetched_at.elapsed() < self.ttl {
                    debug!(sheet, "serving cached grid");
                    return Ok(grid.clone());
                }
            }
        }

        let grid = self.inner.fetch_grid(sheet)?;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(sheet.to_string(), (Instant::now(), grid.clone()));
        Ok(grid)
    }
}
