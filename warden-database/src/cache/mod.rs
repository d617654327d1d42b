mod redis_store;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use redis_store::RedisCacheStore;

/// Permission levels change rarely and are read on every command.
pub const LEVEL_CACHE_TTL: Duration = Duration::from_secs(10 * 60);
pub const CONFIG_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// With caching disabled every read misses and every write is dropped.
#[derive(Clone, Debug)]
enum CacheBackend {
    Disabled,
    Redis(RedisCacheStore),
}

impl CacheBackend {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        match self {
            Self::Disabled => Ok(None),
            Self::Redis(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> anyhow::Result<()> {
        match self {
            Self::Disabled => Ok(()),
            Self::Redis(store) => store.set(key, value, ttl_seconds).await,
        }
    }

    async fn del(&self, key: &str) -> anyhow::Result<()> {
        match self {
            Self::Disabled => Ok(()),
            Self::Redis(store) => store.del(key).await,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CacheService {
    key_prefix: String,
    backend: CacheBackend,
}

impl CacheService {
    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Disabled,
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Redis(RedisCacheStore::from_url(redis_url)?),
        })
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, CacheBackend::Redis(_))
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled => Ok(()),
            CacheBackend::Redis(store) => store.ping().await,
        }
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub async fn get_json<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(bytes) = self.backend.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| anyhow::anyhow!("corrupt cache entry `{key}`: {e}"))
    }

    pub async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let ttl_seconds = ttl.as_secs().max(1);
        let payload = serde_json::to_vec(value)
            .map_err(|e| anyhow::anyhow!("cannot encode cache entry `{key}`: {e}"))?;
        self.backend.set(key, payload, ttl_seconds).await
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        self.backend.del(key).await
    }

    pub async fn get_or_load_json<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        match self.get_json::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(
                ?e,
                cache_key = key,
                "cache get failed; falling back to database"
            ),
        }

        let loaded = loader().await?;

        if let Err(e) = self.set_json(key, &loaded, ttl).await {
            warn!(
                ?e,
                cache_key = key,
                "cache set failed; returning database value"
            );
        }

        Ok(loaded)
    }
}

pub fn level_key(cache: &CacheService, user_id: u64) -> String {
    cache.key(format!("level:{user_id}"))
}

pub fn verification_message_key(cache: &CacheService, guild_id: u64) -> String {
    cache.key(format!("verification:{guild_id}"))
}

/// Drop a cached level so the next read hits the database.
///
/// Cache failures are logged rather than returned; the TTL bounds staleness.
pub async fn invalidate_level(cache: &CacheService, user_id: u64) {
    let key = level_key(cache, user_id);
    if let Err(e) = cache.del(&key).await {
        warn!(?e, cache_key = %key, "failed to invalidate cached level");
    }
}

pub async fn invalidate_verification_message(cache: &CacheService, guild_id: u64) {
    let key = verification_message_key(cache, guild_id);
    if let Err(e) = cache.del(&key).await {
        warn!(?e, cache_key = %key, "failed to invalidate cached verification message");
    }
}
