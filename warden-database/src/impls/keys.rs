use anyhow::Context as _;

use crate::database::Database;
use crate::model::keys::ActivationKey;

pub async fn key_exists(db: &Database, key: &str) -> anyhow::Result<bool> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM activation_keys WHERE key = $1)")
            .bind(key)
            .fetch_one(db.pool())
            .await?;

    Ok(exists)
}

pub async fn insert_key(db: &Database, key: &ActivationKey) -> anyhow::Result<()> {
    let created_by_i64 = i64::try_from(key.created_by).context("created_by out of i64 range")?;
    let created_at_i64 = i64::try_from(key.created_at).context("created_at out of i64 range")?;
    let expires_at_i64 = key
        .expires_at
        .map(i64::try_from)
        .transpose()
        .context("expires_at out of i64 range")?;

    sqlx::query(
        "INSERT INTO activation_keys (key, created_by, created_at, is_used, duration, expires_at, expired)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&key.key)
    .bind(created_by_i64)
    .bind(created_at_i64)
    .bind(key.is_used)
    .bind(key.duration.as_deref())
    .bind(expires_at_i64)
    .bind(key.expired)
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Flag keys whose expiry has passed. Returns the number of keys flagged.
pub async fn expire_keys(db: &Database, now: u64) -> anyhow::Result<u64> {
    let now_i64 = i64::try_from(now).context("now out of i64 range")?;

    let flagged = sqlx::query(
        "UPDATE activation_keys SET expired = TRUE
         WHERE expired = FALSE AND expires_at IS NOT NULL AND expires_at <= $1",
    )
    .bind(now_i64)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(flagged)
}
