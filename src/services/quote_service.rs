use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::ai::QuoteGenerator;
use crate::cache::{is_valid, CacheStore};
use crate::daily::DayZone;
use crate::error::{AppError, Result};
use crate::models::{Artifact, Mode};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Serves today's quote from cache, generating it at most once per day and mode.
///
/// The cache store is owned here and only touched while the lock is held, so
/// concurrent `load_today` calls run one after another and a second caller
/// for the same day and mode gets the first caller's quote from cache.
pub struct QuoteService {
    cache: Mutex<CacheStore>,
    generator: Arc<dyn QuoteGenerator>,
    zone: DayZone,
    now: Clock,
}

impl QuoteService {
    pub fn new(cache: CacheStore, generator: Arc<dyn QuoteGenerator>, zone: DayZone) -> Self {
        Self {
            cache: Mutex::new(cache),
            generator,
            zone,
            now: Arc::new(Utc::now),
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, now: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.now = Arc::new(now);
        self
    }

    pub fn today_key(&self) -> String {
        self.zone.day_key((self.now)())
    }

    /// Return today's quote for `mode`, generating and caching it on a miss.
    ///
    /// Once `cancel` fires the call returns [`AppError::Cancelled`] and the
    /// cache is left untouched, even if the generated quote already arrived.
    pub async fn load_today(
        &self,
        user_guidance: &str,
        mode: Mode,
        cancel: &CancellationToken,
    ) -> Result<Artifact> {
        let cache = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            guard = self.cache.lock() => guard,
        };

        let day_key = self.today_key();

        match cache.load() {
            Some(cached) if is_valid(Some(&cached), &day_key, mode) => {
                tracing::info!(day_key = %day_key, mode = %mode, "quote cache hit");
                return Ok(cached);
            }
            _ => tracing::info!(day_key = %day_key, mode = %mode, "quote cache miss"),
        }

        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let generated = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(day_key = %day_key, mode = %mode, "quote generation cancelled");
                return Err(AppError::Cancelled);
            }
            result = self.generator.generate(&day_key, user_guidance, mode) => result?,
        };

        if cancel.is_cancelled() {
            tracing::info!(day_key = %day_key, mode = %mode, "discarding quote generated after cancellation");
            return Err(AppError::Cancelled);
        }

        cache.save(&generated).map_err(AppError::Storage)?;
        tracing::info!(day_key = %day_key, mode = %mode, "quote cached");

        Ok(generated)
    }

    pub async fn clear_cache(&self) -> Result<()> {
        let cache = self.cache.lock().await;
        cache.clear().map_err(AppError::Storage)?;
        tracing::info!("quote cache cleared");
        Ok(())
    }
}
