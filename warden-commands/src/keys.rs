//! Activation key generation.

use rand::Rng;
use tracing::{error, info};

use warden_core::{Context, Error};
use warden_database::ModerationStore;
use warden_database::model::keys::ActivationKey;
use warden_utils::parse::{StrictDuration, parse_strict_duration};
use warden_utils::permissions::LEVEL_ADMIN;
use warden_utils::time::now_unix_secs;

use crate::access::{authorize, guild_gateway, interaction_lang, reply_ephemeral};
use crate::texts::{Reply, render};

pub const KEY_PREFIX: &str = "WRD";
pub const KEY_SEGMENTS: [usize; 3] = [5, 6, 5];
pub const MAX_KEY_ATTEMPTS: usize = 10;

const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, thiserror::Error)]
pub enum KeyGenerationError {
    #[error("no unique activation key after {attempts} attempts")]
    Exhausted { attempts: usize },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// `WRD-XXXXX-XXXXXX-XXXXX` with uppercase alphanumeric segments.
pub fn generate_key<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut key = String::from(KEY_PREFIX);
    for len in KEY_SEGMENTS {
        key.push('-');
        key.extend(
            (0..len).map(|_| char::from(KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())])),
        );
    }
    key
}

/// Draw candidates until one is not yet stored, giving up after `max_attempts`.
pub async fn unique_key(
    store: &dyn ModerationStore,
    mut generate: impl FnMut() -> String,
    max_attempts: usize,
) -> Result<String, KeyGenerationError> {
    for _ in 0..max_attempts {
        let candidate = generate();
        if !store.key_exists(&candidate).await? {
            return Ok(candidate);
        }
    }

    Err(KeyGenerationError::Exhausted {
        attempts: max_attempts,
    })
}

pub async fn create_activation_key(
    store: &dyn ModerationStore,
    created_by: u64,
    duration: Option<&StrictDuration>,
    now: u64,
) -> Result<ActivationKey, KeyGenerationError> {
    let key = unique_key(
        store,
        || generate_key(&mut rand::thread_rng()),
        MAX_KEY_ATTEMPTS,
    )
    .await?;

    let key = ActivationKey {
        key,
        created_by,
        created_at: now,
        is_used: false,
        duration: duration.map(|d| d.iso.clone()),
        expires_at: duration.map(|d| now.saturating_add(d.millis / 1_000)),
        expired: false,
    };
    store.insert_key(&key).await?;

    Ok(key)
}

/// Generate a new activation key.
#[poise::command(slash_command, guild_only, category = "Keys")]
pub async fn generatekey(
    ctx: Context<'_>,
    #[description = "Validity, e.g. 1d, 12h or 30m"] duration: Option<String>,
) -> Result<(), Error> {
    let lang = interaction_lang(ctx);
    let Some(gateway) = guild_gateway(ctx, lang).await? else {
        return Ok(());
    };

    if !authorize(ctx, &gateway, lang, LEVEL_ADMIN).await? {
        return Ok(());
    }

    let duration = match duration.as_deref().map(parse_strict_duration).transpose() {
        Ok(duration) => duration,
        Err(source) => {
            let detail = source.to_string();
            return reply_ephemeral(ctx, render(lang, Reply::KeyInvalidDuration { error: &detail }))
                .await;
        }
    };

    let author_id = ctx.author().id.get();
    let key = match create_activation_key(
        ctx.data().store.as_ref(),
        author_id,
        duration.as_ref(),
        now_unix_secs(),
    )
    .await
    {
        Ok(key) => key,
        Err(source) => {
            error!(?source, "activation key generation failed");
            return reply_ephemeral(ctx, render(lang, Reply::KeyGenerationFailed)).await;
        }
    };

    info!(created_by = author_id, expires_at = ?key.expires_at, "activation key generated");

    let label = duration.as_ref().map(|d| d.label(lang));
    reply_ephemeral(
        ctx,
        render(
            lang,
            Reply::KeyGenerated {
                key: &key.key,
                duration: label.as_deref(),
            },
        ),
    )
    .await
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use regex::Regex;

    use warden_database::model::keys::ActivationKey;
    use warden_database::{MemoryStore, ModerationStore};
    use warden_utils::parse::parse_strict_duration;

    use super::{KeyGenerationError, create_activation_key, generate_key, unique_key};

    fn key_pattern() -> Regex {
        Regex::new(r"^WRD-[A-Z0-9]{5}-[A-Z0-9]{6}-[A-Z0-9]{5}$").unwrap()
    }

    #[test]
    fn generated_keys_match_the_format() {
        let pattern = key_pattern();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();

        for _ in 0..500 {
            let key = generate_key(&mut rng);
            assert!(pattern.is_match(&key), "{key}");
            seen.insert(key);
        }
        assert_eq!(seen.len(), 500);
    }

    fn stored(key: &str) -> ActivationKey {
        ActivationKey {
            key: key.to_owned(),
            created_by: 1,
            created_at: 0,
            is_used: false,
            duration: None,
            expires_at: None,
            expired: false,
        }
    }

    #[tokio::test]
    async fn skips_taken_candidates() {
        let store = MemoryStore::new();
        store.insert_key(&stored("WRD-AAAAA-AAAAAA-AAAAA")).await.unwrap();

        let mut candidates = ["WRD-AAAAA-AAAAAA-AAAAA", "WRD-BBBBB-BBBBBB-BBBBB"].into_iter();
        let key = unique_key(&store, || candidates.next().unwrap().to_owned(), 10)
            .await
            .unwrap();
        assert_eq!(key, "WRD-BBBBB-BBBBBB-BBBBB");
    }

    #[tokio::test]
    async fn exhaustion_is_a_hard_failure() {
        let store = MemoryStore::new();
        store.insert_key(&stored("WRD-AAAAA-AAAAAA-AAAAA")).await.unwrap();

        let mut calls = 0;
        let result = unique_key(
            &store,
            || {
                calls += 1;
                "WRD-AAAAA-AAAAAA-AAAAA".to_owned()
            },
            10,
        )
        .await;

        assert!(matches!(result, Err(KeyGenerationError::Exhausted { attempts: 10 })));
        assert_eq!(calls, 10);
    }

    #[tokio::test]
    async fn persists_keys_with_expiry() {
        let store = MemoryStore::new();
        let duration = parse_strict_duration("2h").unwrap();

        let key = create_activation_key(&store, 5, Some(&duration), 1_000).await.unwrap();

        assert!(key_pattern().is_match(&key.key));
        assert_eq!(key.duration.as_deref(), Some("PT2H"));
        assert_eq!(key.expires_at, Some(1_000 + 7_200));
        let fetched = store.key(&key.key).await;
        assert_eq!(fetched, Some(key));

        let open_ended = create_activation_key(&store, 5, None, 1_000).await.unwrap();
        assert_eq!(open_ended.expires_at, None);
        assert_eq!(open_ended.duration, None);
    }
}
